//! Client for resolving DOIs via the Crossref REST API.
//!
//! Converts Crossref's work metadata (https://api.crossref.org/works) into
//! the pipeline's [`Metadata`] record, handling the partial `date-parts`
//! date format and the given/family author name split.

use super::*;

/// Response envelope from the Crossref API.
#[derive(Debug, Deserialize)]
struct CrossrefResponse {
  /// The work metadata container.
  message: CrossrefWork,
}

/// Metadata about an academic work from Crossref.
#[derive(Debug, Deserialize)]
struct CrossrefWork {
  /// Paper titles, usually one item.
  #[serde(default)]
  title:            Vec<String>,
  /// Paper authors.
  #[serde(default)]
  author:           Vec<CrossrefAuthor>,
  /// Paper abstract, often absent.
  #[serde(rename = "abstract")]
  abstract_text:    Option<String>,
  /// Print publication date, if available.
  published_print:  Option<CrossrefDate>,
  /// Online publication date, if available.
  published_online: Option<CrossrefDate>,
  /// The work's DOI.
  #[serde(rename = "DOI")]
  doi:              String,
  /// Creation date in Crossref's system, the last-resort date.
  created:          Option<CrossrefDate>,
}

/// Author information from Crossref.
#[derive(Debug, Deserialize)]
struct CrossrefAuthor {
  /// Given (first) name.
  given:  Option<String>,
  /// Family (last) name.
  family: Option<String>,
}

/// Crossref's date representation: `[[year, month, day]]` with month and
/// day optional.
#[derive(Debug, Deserialize)]
struct CrossrefDate {
  /// Nested date parts.
  #[serde(rename = "date-parts")]
  date_parts: Vec<Vec<i32>>,
}

/// Client for DOI lookups against Crossref.
pub struct CrossrefClient {
  /// Internal web client, configured with the lookup timeout.
  client:   reqwest::Client,
  /// API base URL.
  base_url: String,
}

impl CrossrefClient {
  /// Creates a client whose requests abort after `timeout`.
  ///
  /// Crossref asks API users to identify themselves, so the client carries
  /// a descriptive user agent.
  pub fn new(timeout: Duration) -> Self {
    Self {
      client:   reqwest::Client::builder()
        .user_agent("paperlens/0.1 (https://github.com/paperlens/paperlens)")
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new()),
      base_url: "https://api.crossref.org/works".to_string(),
    }
  }

  /// Fetches metadata for a DOI.
  ///
  /// # Errors
  ///
  /// Returns an error when the request fails, times out, returns a
  /// non-success status, or the JSON cannot be parsed. The
  /// [`MetadataResolver`] converts all of these into empty metadata.
  pub async fn fetch_metadata(&self, doi: &str) -> Result<Metadata, PaperlensError> {
    let url = url::Url::parse(&format!("{}/{doi}", self.base_url))?;
    debug!("fetching from Crossref via: {url}");

    let text = self.client.get(url).send().await?.error_for_status()?.text().await?;
    trace!("Crossref response: {text}");

    let response: CrossrefResponse = serde_json::from_str(&text)
      .map_err(|e| PaperlensError::ApiError(format!("failed to parse Crossref JSON: {e}")))?;
    let work = response.message;

    let authors = work
      .author
      .into_iter()
      .map(|author| match (author.given, author.family) {
        (Some(given), Some(family)) => format!("{given} {family}"),
        (Some(given), None) => given,
        (None, Some(family)) => family,
        (None, None) => "Unknown".to_string(),
      })
      .collect();

    let published = work
      .published_print
      .as_ref()
      .and_then(parse_date)
      .or_else(|| work.published_online.as_ref().and_then(parse_date))
      .or_else(|| work.created.as_ref().and_then(parse_date));

    Ok(Metadata {
      title: work.title.into_iter().next(),
      authors,
      published,
      source_id: Some(format!("doi:{}", work.doi)),
      abstract_text: work.abstract_text,
      categories: Vec::new(),
    })
  }
}

/// Parses Crossref `date-parts` into a UTC datetime, defaulting month and
/// day to 1 when absent.
fn parse_date(date: &CrossrefDate) -> Option<DateTime<Utc>> {
  let parts = date.date_parts.first()?;
  let year = *parts.first()?;
  let month = parts.get(1).copied().unwrap_or(1);
  let day = parts.get(2).copied().unwrap_or(1);
  Utc.with_ymd_and_hms(year, month as u32, day as u32, 0, 0, 0).single()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_date_parsing() {
    let full = CrossrefDate { date_parts: vec![vec![2008, 1, 15]] };
    assert_eq!(parse_date(&full).unwrap().to_rfc3339(), "2008-01-15T00:00:00+00:00");

    let year_only = CrossrefDate { date_parts: vec![vec![2008]] };
    assert_eq!(parse_date(&year_only).unwrap().to_rfc3339(), "2008-01-01T00:00:00+00:00");

    let empty = CrossrefDate { date_parts: vec![] };
    assert!(parse_date(&empty).is_none());
  }

  #[test]
  fn test_work_parsing() {
    let json = r#"{
      "message": {
        "title": ["MapReduce"],
        "author": [{"given": "Jeffrey", "family": "Dean"}, {"family": "Ghemawat"}],
        "DOI": "10.1145/1327452.1327492",
        "created": {"date-parts": [[2008, 1, 3]]}
      }
    }"#;

    let response: CrossrefResponse = serde_json::from_str(json).unwrap();
    assert_eq!(response.message.title[0], "MapReduce");
    assert_eq!(response.message.author.len(), 2);
  }

  // Network-dependent; run with `cargo test -- --ignored` when online.
  #[ignore]
  #[tokio::test]
  async fn test_crossref_metadata_fetch() {
    let client = CrossrefClient::new(Duration::from_secs(5));
    let metadata = client.fetch_metadata("10.1145/1327452.1327492").await.unwrap();

    assert!(metadata.title.is_some());
    assert!(!metadata.authors.is_empty());
  }
}
