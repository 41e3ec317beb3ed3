use std::{env, fs, path::Path, process::ExitCode};

use colored::*;
use util::config;

mod runner;

#[tokio::main]
async fn main() -> ExitCode {
    let db_path = config::database_path();
    let url = format!("sqlite://{}?mode=rwc", db_path);
    let args: Vec<String> = env::args().collect();

    let result = match args.get(1).map(|s| s.as_str()) {
        Some("clean") => remove_db_file(&db_path),
        Some("fresh") => match remove_db_file(&db_path).and_then(|_| create_db_dir(&db_path)) {
            Ok(()) => runner::run_all_migrations(&url).await.map_err(|e| e.to_string()),
            Err(e) => Err(e),
        },
        _ => match create_db_dir(&db_path) {
            Ok(()) => runner::run_all_migrations(&url).await.map_err(|e| e.to_string()),
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn remove_db_file(path: &str) -> Result<(), String> {
    let db_path = Path::new(path);
    if db_path.exists() {
        fs::remove_file(db_path).map_err(|e| format!("Failed to delete DB file: {e}"))?;
        println!("Deleted DB: {}", db_path.display());
    } else {
        println!("DB file does not exist: {}", db_path.display());
    }

    // Uploaded files go with the database they were registered in.
    let storage_root = config::storage_root();
    let storage_path = Path::new(&storage_root);
    if storage_path.exists() {
        fs::remove_dir_all(storage_path)
            .map_err(|e| format!("Failed to delete uploaded files: {e}"))?;
        println!("Deleted uploaded files: {}", storage_path.display());
    } else {
        println!("Upload storage does not exist: {}", storage_path.display());
    }
    Ok(())
}

fn create_db_dir(path: &str) -> Result<(), String> {
    if let Some(parent) = Path::new(path).parent() {
        fs::create_dir_all(parent).map_err(|e| format!("Failed to create DB directory: {e}"))?;
    }
    Ok(())
}
