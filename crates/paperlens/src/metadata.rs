//! Bibliographic metadata resolution.
//!
//! Given an optional arXiv ID, DOI, or title, the resolver issues at most
//! one bounded-timeout lookup per identifier and merges the first success
//! into a [`Metadata`] record. Lookup failure of any kind (timeout,
//! non-success status, no match, parse error) is a normal outcome, not an
//! error: the resolver logs it and returns empty metadata so a backend
//! outage can never fail a parse request.

use super::*;

/// Resolved paper metadata. Every field is optional; absence is a valid,
/// expected state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
  /// The paper's title.
  pub title:         Option<String>,
  /// Ordered author names. Empty means unknown.
  pub authors:       Vec<String>,
  /// Publication date.
  pub published:     Option<DateTime<Utc>>,
  /// Source identifier, e.g. "arXiv:2301.07041" or "doi:10.1145/...".
  pub source_id:     Option<String>,
  /// Abstract text as reported by the source.
  pub abstract_text: Option<String>,
  /// Subject categories as reported by the source.
  pub categories:    Vec<String>,
}

impl Metadata {
  /// True when no field carries any information.
  pub fn is_empty(&self) -> bool {
    self.title.is_none()
      && self.authors.is_empty()
      && self.published.is_none()
      && self.source_id.is_none()
      && self.abstract_text.is_none()
      && self.categories.is_empty()
  }
}

/// Resolves paper identifiers against bibliographic APIs.
///
/// Tries identifiers in order of specificity: arXiv ID, then DOI, then
/// title. The title path performs no network call at all; it just seeds the
/// title field so callers still get something to display.
pub struct MetadataResolver {
  /// arXiv Atom feed client.
  arxiv:    ArxivClient,
  /// Crossref REST client.
  crossref: CrossrefClient,
}

impl MetadataResolver {
  /// Creates a resolver whose lookups use the configured timeout.
  pub fn new(config: &AnalyzerConfig) -> Self {
    Self {
      arxiv:    ArxivClient::new(config.lookup_timeout),
      crossref: CrossrefClient::new(config.lookup_timeout),
    }
  }

  /// Resolves whatever identifiers are present into a [`Metadata`].
  ///
  /// Never returns an error and never retries a failed lookup: each
  /// identifier gets one attempt within the timeout budget, and on total
  /// failure the result is [`Metadata::default`].
  pub async fn resolve(
    &self,
    arxiv_id: Option<&str>,
    doi: Option<&str>,
    title: Option<&str>,
  ) -> Metadata {
    if let Some(id) = arxiv_id {
      match self.arxiv.fetch_metadata(id).await {
        Ok(metadata) => return metadata,
        Err(e) => debug!("arXiv lookup for {id} failed, degrading: {e}"),
      }
    }

    if let Some(doi) = doi {
      match self.crossref.fetch_metadata(doi).await {
        Ok(metadata) => return metadata,
        Err(e) => debug!("Crossref lookup for {doi} failed, degrading: {e}"),
      }
    }

    if let Some(title) = title {
      return Metadata { title: Some(title.to_owned()), ..Metadata::default() };
    }

    Metadata::default()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_no_identifiers_yields_empty_metadata() {
    let resolver = MetadataResolver::new(&AnalyzerConfig::default());
    let metadata = resolver.resolve(None, None, None).await;
    assert!(metadata.is_empty());
  }

  #[tokio::test]
  async fn test_title_only_seeds_title() {
    let resolver = MetadataResolver::new(&AnalyzerConfig::default());
    let metadata = resolver.resolve(None, None, Some("A Study of Things")).await;
    assert_eq!(metadata.title.as_deref(), Some("A Study of Things"));
    assert!(metadata.authors.is_empty());
    assert!(metadata.published.is_none());
  }
}
