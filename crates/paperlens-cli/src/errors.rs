//! Error types for the paperlens CLI application.
//!
//! Wraps the failure modes of running the CLI into a single type:
//! - Analysis errors from the underlying paperlens library
//! - File system operations
//! - JSON serialization of results
//!
//! The errors are transparent so the underlying message reaches the user
//! unchanged.

use thiserror::Error;

/// Errors that can occur during CLI operations.
#[derive(Error, Debug)]
pub enum PaperlensCliError {
  /// Errors from the underlying paperlens library
  #[error(transparent)]
  Paperlens(#[from] paperlens::errors::PaperlensError),

  /// File system and IO operation errors
  #[error(transparent)]
  IO(#[from] std::io::Error),

  /// JSON serialization errors
  #[error(transparent)]
  Json(#[from] serde_json::Error),
}
