use std::path::{Path, PathBuf};

use chrono::Utc;
use db::models::course;
use db::models::file::{ActiveModel, Column, Entity, Model};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set, TransactionTrait};
use util::{config, paths};

use crate::error::AppError;
use crate::reference;
use crate::views::{self, FileView};

pub const DEFAULT_SECTION: &str = "general";

#[derive(Debug, Clone)]
pub struct UploadFile {
    pub course_id: String,
    pub section: Option<String>,
    /// Name the client gave the file.
    pub original_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateFile {
    pub filename: Option<String>,
    pub file_path: Option<String>,
    pub course_id: Option<String>,
}

/// Size and type policy applied to every upload.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_bytes: usize,
    /// Lowercase extensions without the dot.
    pub allowed_extensions: Vec<String>,
}

impl UploadPolicy {
    pub fn from_config() -> Self {
        Self {
            max_bytes: config::max_upload_bytes(),
            allowed_extensions: config::allowed_upload_extensions(),
        }
    }

    /// Checks size and extension, returning the lowercase extension.
    pub fn check(&self, original_name: &str, size: usize) -> Result<String, AppError> {
        if size == 0 {
            return Err(AppError::Validation("File is required".into()));
        }
        if size > self.max_bytes {
            return Err(AppError::Validation(format!(
                "File exceeds the {} byte limit",
                self.max_bytes
            )));
        }

        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if !self.allowed_extensions.iter().any(|allowed| *allowed == ext) {
            let allowed: Vec<String> = self
                .allowed_extensions
                .iter()
                .map(|e| format!(".{e}"))
                .collect();
            return Err(AppError::Validation(format!(
                "Only the following file types are allowed: {}",
                allowed.join(", ")
            )));
        }
        Ok(ext)
    }
}

/// `{stem}-{millis}-{random}.{ext}`, with path separators stripped from the stem.
pub fn stored_name(original_name: &str, ext: &str) -> String {
    let stem: String = Path::new(original_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("file")
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let suffix = rand::random::<u32>() % 1_000_000_000;
    format!("{stem}-{}-{suffix}.{ext}", Utc::now().timestamp_millis())
}

fn check_section(section: &str) -> Result<(), AppError> {
    if !paths::is_safe_segment(section) {
        return Err(AppError::Validation(format!("'{section}' is not a valid section")));
    }
    Ok(())
}

fn io_error(context: &str, e: std::io::Error) -> AppError {
    AppError::Internal(format!("{context}: {e}"))
}

pub struct FileService;

impl FileService {
    /// Stores the bytes and records the file against its course.
    ///
    /// The course's own file set is not touched; use `CourseService::add_file`.
    pub async fn upload(
        db: &DatabaseConnection,
        policy: &UploadPolicy,
        params: UploadFile,
    ) -> Result<FileView, AppError> {
        let course = reference::find_required::<course::Entity, _>(db, "courseId", &params.course_id).await?;

        let section = params
            .section
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SECTION)
            .to_owned();
        check_section(&section)?;
        let ext = policy.check(&params.original_name, params.bytes.len())?;

        let name = stored_name(&params.original_name, &ext);
        let path = paths::upload_path(&section, &name);
        tokio::fs::create_dir_all(paths::upload_section_dir(&section))
            .await
            .map_err(|e| io_error("cannot create upload directory", e))?;
        tokio::fs::write(&path, &params.bytes)
            .await
            .map_err(|e| io_error("cannot store upload", e))?;

        let locator = paths::upload_locator(&section, &name);
        let file = match Model::create(db, &name, &locator, &course.id, &section).await {
            Ok(file) => file,
            Err(e) => {
                if let Err(rm) = tokio::fs::remove_file(&path).await {
                    tracing::warn!(path = %path.display(), error = %rm, "cannot remove orphaned upload");
                }
                return Err(e.into());
            }
        };

        tracing::info!(
            file_id = %file.id,
            course_id = %file.course_id,
            section = %file.section,
            bytes = params.bytes.len(),
            "file uploaded"
        );
        Ok(views::file_view(db, file).await?)
    }

    /// Files whose owning course is `course_id`. An empty result is `NotFound`.
    pub async fn list_by_course(db: &DatabaseConnection, course_id: &str) -> Result<Vec<FileView>, AppError> {
        let course_id = reference::parse_id("courseId", course_id)?;
        let files = Model::find_by_course(db, &course_id).await?;
        if files.is_empty() {
            return Err(AppError::NotFound(format!("files for course {course_id}")));
        }

        let mut out = Vec::with_capacity(files.len());
        for file in files {
            out.push(views::file_view(db, file).await?);
        }
        Ok(out)
    }

    pub async fn list(db: &DatabaseConnection) -> Result<Vec<FileView>, AppError> {
        let files = Entity::find().order_by_asc(Column::CreatedAt).all(db).await?;
        let mut out = Vec::with_capacity(files.len());
        for file in files {
            out.push(views::file_view(db, file).await?);
        }
        Ok(out)
    }

    pub async fn get(db: &DatabaseConnection, id: &str) -> Result<FileView, AppError> {
        let file = reference::find_required::<Entity, _>(db, "id", id).await?;
        Ok(views::file_view(db, file).await?)
    }

    pub async fn update(db: &DatabaseConnection, id: &str, params: UpdateFile) -> Result<FileView, AppError> {
        let txn = db.begin().await?;
        let file = reference::find_required::<Entity, _>(&txn, "id", id).await?;
        let mut active: ActiveModel = file.into();

        if let Some(course_id) = &params.course_id {
            let course = reference::find_required::<course::Entity, _>(&txn, "courseId", course_id).await?;
            active.course_id = Set(course.id);
        }
        if let Some(filename) = &params.filename {
            active.filename = Set(filename.trim().to_owned());
        }
        if let Some(file_path) = &params.file_path {
            active.file_path = Set(file_path.trim().to_owned());
        }

        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(file_id = %updated.id, "file updated");
        Ok(views::file_view(db, updated).await?)
    }

    /// Removes the record. Stored bytes and course edges are left in place.
    pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<(), AppError> {
        let id = reference::parse_id("id", id)?;
        let res = Entity::delete_by_id(id.clone()).exec(db).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound(format!("files {id}")));
        }
        tracing::info!(file_id = %id, "file deleted");
        Ok(())
    }

    /// On-disk location of a public upload.
    pub async fn resolve_download(section: &str, name: &str) -> Result<PathBuf, AppError> {
        if !paths::is_safe_segment(section) || !paths::is_safe_segment(name) {
            return Err(AppError::NotFound(format!("upload {section}/{name}")));
        }
        let path = paths::upload_path(section, name);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            _ => Err(AppError::NotFound(format!("upload {section}/{name}"))),
        }
    }
}
