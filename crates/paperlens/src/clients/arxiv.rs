//! Client for fetching paper metadata from arXiv.org.
//!
//! Uses arXiv's Atom feed API (http://export.arxiv.org/api/query) and
//! converts the XML response into the pipeline's [`Metadata`] record. Both
//! new-style (2301.07041) and old-style (math.AG/0601001) identifiers are
//! accepted; the identifier is passed through verbatim.

use super::*;

/// Internal representation of the arXiv Atom feed response.
#[derive(Debug, Deserialize)]
struct Feed {
  /// A feed may contain multiple entries; a lookup by id yields at most one.
  #[serde(rename = "entry", default)]
  entries: Vec<Entry>,
}

/// One paper entry from the feed.
#[derive(Debug, Deserialize)]
struct Entry {
  /// Paper title (may contain LaTeX markup).
  title:      String,
  /// List of paper authors.
  #[serde(rename = "author", default)]
  authors:    Vec<Author>,
  /// Paper abstract.
  summary:    Option<String>,
  /// Publication or last update date.
  published:  Option<DateTime<Utc>>,
  /// Subject categories.
  #[serde(rename = "category", default)]
  categories: Vec<Category>,
}

/// An author element.
#[derive(Debug, Deserialize)]
struct Author {
  /// Author's full name.
  name: String,
}

/// A category element; the subject lives in the `term` attribute.
#[derive(Debug, Deserialize)]
struct Category {
  /// Subject classification, e.g. "cs.CL".
  #[serde(rename = "@term")]
  term: String,
}

/// Client for the arXiv metadata API.
pub struct ArxivClient {
  /// Internal web client, configured with the lookup timeout.
  client: reqwest::Client,
}

impl ArxivClient {
  /// Creates a client whose requests abort after `timeout`.
  pub fn new(timeout: Duration) -> Self {
    Self {
      client: reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new()),
    }
  }

  /// Fetches metadata for an arXiv identifier.
  ///
  /// # Errors
  ///
  /// Returns an error when the request fails, times out, the XML cannot be
  /// parsed, or the feed contains no entry. The [`MetadataResolver`]
  /// converts all of these into empty metadata.
  pub async fn fetch_metadata(&self, identifier: &str) -> Result<Metadata, PaperlensError> {
    let url = url::Url::parse(&format!(
      "http://export.arxiv.org/api/query?id_list={identifier}&max_results=1"
    ))?;
    debug!("fetching from arXiv via: {url}");

    let response = self.client.get(url).send().await?.error_for_status()?.text().await?;
    trace!("arXiv response: {response}");

    let feed: Feed = from_str(&response)
      .map_err(|e| PaperlensError::ApiError(format!("failed to parse arXiv XML: {e}")))?;
    let entry = feed
      .entries
      .into_iter()
      .next()
      .ok_or_else(|| PaperlensError::ApiError("no arXiv entry found".into()))?;

    Ok(Metadata {
      title:         Some(entry.title.split_whitespace().collect::<Vec<_>>().join(" ")),
      authors:       entry.authors.into_iter().map(|author| author.name).collect(),
      published:     entry.published,
      source_id:     Some(format!("arXiv:{identifier}")),
      abstract_text: entry.summary.map(|s| s.trim().to_owned()),
      categories:    entry.categories.into_iter().map(|c| c.term).collect(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  // Network-dependent; run with `cargo test -- --ignored` when online.
  #[ignore]
  #[tokio::test]
  async fn test_arxiv_metadata_fetch() {
    let client = ArxivClient::new(Duration::from_secs(5));
    let metadata = client.fetch_metadata("2301.07041").await.unwrap();

    assert!(metadata.title.is_some());
    assert!(!metadata.authors.is_empty());
    assert_eq!(metadata.source_id.as_deref(), Some("arXiv:2301.07041"));
  }

  #[test]
  fn test_feed_parsing() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
      <feed xmlns="http://www.w3.org/2005/Atom">
        <entry>
          <title>A Sample  Paper</title>
          <author><name>Ada Lovelace</name></author>
          <author><name>Alan Turing</name></author>
          <summary> An abstract. </summary>
          <published>2023-01-17T00:00:00Z</published>
          <category term="cs.CL"/>
        </entry>
      </feed>"#;

    let feed: Feed = from_str(xml).unwrap();
    assert_eq!(feed.entries.len(), 1);
    assert_eq!(feed.entries[0].authors.len(), 2);
    assert_eq!(feed.entries[0].categories[0].term, "cs.CL");
  }
}
