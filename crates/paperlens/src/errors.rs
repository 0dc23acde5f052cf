//! Error types for the paperlens library.
//!
//! Only structurally fatal input problems surface as errors to the caller:
//! - A PDF that cannot be parsed at all
//! - A password-protected PDF
//! - An input stream above the configured size cap
//!
//! Every other failure mode (metadata lookup, oracle calls, malformed
//! reference entries) is absorbed locally with a documented fallback, so a
//! valid PDF always yields a well-formed result object.

use thiserror::Error;

/// Errors that can occur when analyzing a paper.
///
/// The variants split into two groups:
/// - Fatal input errors for the current request (`UnreadablePdf`,
///   `EncryptedPdf`, `InputTooLarge`), which abort analysis with no partial
///   result.
/// - Infrastructure errors (`Network`, `ApiError`, `InvalidUrl`, `Io`) which
///   the pipeline converts into degraded results before they reach a caller;
///   they only propagate out of the low-level client methods.
#[derive(Error, Debug)]
pub enum PaperlensError {
  /// The PDF byte stream could not be parsed as a document, or parsed to a
  /// document with zero pages.
  ///
  /// The string carries the underlying parser message for diagnostics.
  #[error("unreadable PDF: {0}")]
  UnreadablePdf(String),

  /// The PDF is password protected. Decryption is out of scope, so this is
  /// fatal for the request.
  #[error("PDF is password protected")]
  EncryptedPdf,

  /// The input exceeds the configured size cap. The check runs before any
  /// parsing so oversized inputs fail fast instead of degrading silently.
  #[error("input is {got} bytes which exceeds the {limit} byte limit")]
  InputTooLarge {
    /// Observed input size in bytes.
    got:   u64,
    /// Configured maximum in bytes.
    limit: u64,
  },

  /// A network request failed. Only the metadata and oracle clients perform
  /// network I/O, and both absorb this into a fallback at the call site.
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// An external API returned a response we could not use (non-success
  /// status, unparseable body, missing entry).
  #[error("API error: {0}")]
  ApiError(String),

  /// Failed to parse a URL when building an API request.
  #[error(transparent)]
  InvalidUrl(#[from] url::ParseError),

  /// A file system operation failed, e.g. reading a PDF from a path.
  #[error(transparent)]
  Io(#[from] std::io::Error),
}

impl From<lopdf::Error> for PaperlensError {
  fn from(err: lopdf::Error) -> Self { PaperlensError::UnreadablePdf(err.to_string()) }
}
