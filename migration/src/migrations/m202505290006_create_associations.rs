use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202505290006_create_associations"
    }
}

/// Edge tables: `(table, owner column, target column)`.
///
/// `group_courses` backs both `Group.courses` and `Course.groups`.
const EDGES: [(&str, &str, &str); 3] = [
    ("group_students", "group_id", "student_id"),
    ("group_courses", "group_id", "course_id"),
    ("course_files", "course_id", "file_id"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (table, owner, target) in EDGES {
            manager
                .create_table(
                    Table::create()
                        .table(Alias::new(table))
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Alias::new(owner))
                                .string_len(24)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Alias::new(target))
                                .string_len(24)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Alias::new("added_at"))
                                .timestamp()
                                .not_null()
                                .default(Expr::cust("CURRENT_TIMESTAMP")),
                        )
                        .primary_key(
                            Index::create()
                                .col(Alias::new(owner))
                                .col(Alias::new(target)),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name(format!("idx_{table}_{target}"))
                        .table(Alias::new(table))
                        .col(Alias::new(target))
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (table, _, _) in EDGES {
            manager
                .drop_table(Table::drop().table(Alias::new(table)).to_owned())
                .await?;
        }
        Ok(())
    }
}
