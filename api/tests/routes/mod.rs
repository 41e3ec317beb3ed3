mod courses_test;
mod files_test;
mod groups_test;
mod health_test;
mod sessions_test;
mod system_test;
mod users_test;
