pub mod association;
pub mod cleanup;
pub mod course;
pub mod error;
pub mod file;
pub mod group;
pub mod progress;
pub mod reference;
pub mod session;
pub mod user;
pub mod views;

pub use error::AppError;
