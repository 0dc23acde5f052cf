//! Client implementations for the external services the pipeline consumes.
//!
//! Two bibliographic sources and one generative-text endpoint:
//! - [`arxiv`] - arXiv.org Atom feed lookups by arXiv ID
//! - [`crossref`] - Crossref REST lookups by DOI
//! - [`oracle`] - the generative-text oracle used by the summarizer
//!
//! Each client owns its `reqwest::Client`, constructed once with an explicit
//! request timeout. Clients return errors; deciding that a failure is
//! non-fatal (and what to degrade to) is the caller's job, which keeps the
//! fallback policy in one place per component.

use quick_xml::de::from_str;

pub mod arxiv;
pub mod crossref;
pub mod oracle;

pub use arxiv::ArxivClient;
pub use crossref::CrossrefClient;
pub use oracle::{HttpOracle, OracleError, TextOracle};

use super::*;
