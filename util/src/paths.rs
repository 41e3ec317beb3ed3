use crate::config;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Create a directory (and all parents) if it doesn't exist, and return the path.
pub fn ensure_dir<P: AsRef<Path>>(path: P) -> io::Result<PathBuf> {
    let p = path.as_ref();
    fs::create_dir_all(p)?;
    Ok(p.to_path_buf())
}

/// Global storage root (absolute), from `config::storage_root()`.
/// If relative in env, resolve against current_dir().
pub fn storage_root() -> PathBuf {
    let p = PathBuf::from(config::storage_root());
    if p.is_absolute() {
        p
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(p)
    }
}

/// Upload folder:  {STORAGE_ROOT}/uploads
pub fn uploads_dir() -> PathBuf {
    storage_root().join("uploads")
}

/// One section of the upload area:  {STORAGE_ROOT}/uploads/{section}
pub fn upload_section_dir(section: &str) -> PathBuf {
    uploads_dir().join(section)
}

/// Build a path for a stored upload (does not create).
/// Example: upload_path("syllabus", "intro-1700000000000-42.pdf")
pub fn upload_path(section: &str, stored_name: &str) -> PathBuf {
    upload_section_dir(section).join(stored_name)
}

/// Public locator handed back to clients for a stored upload.
pub fn upload_locator(section: &str, stored_name: &str) -> String {
    format!(
        "{}/uploads/{}/{}",
        config::public_base_url().trim_end_matches('/'),
        section,
        stored_name
    )
}

/// True when a single path segment is safe to join under the storage root.
pub fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\', '\0'])
}
