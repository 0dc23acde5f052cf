//! The generative-text oracle capability.
//!
//! The summarizer treats its model backend as a pluggable text-in/text-out
//! oracle behind the [`TextOracle`] trait: a prompt and an input go in,
//! generated text or an [`OracleError`] comes out, always within a bounded
//! time. Which implementation is used is decided at construction time via
//! dependency injection; the pipeline never inspects types at runtime.
//!
//! [`HttpOracle`] is the production implementation, a thin JSON client for a
//! hosted completion endpoint. Tests inject failing doubles to exercise the
//! rule-based fallback path.

use std::future::Future;

use super::*;

/// Ways an oracle call can fail.
///
/// None of these propagate to a pipeline caller; the summarizer absorbs
/// them into the extractive fallback and records the degradation in the
/// result's generation-method tag.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
  /// The call did not complete within the configured timeout.
  #[error("oracle call timed out")]
  Timeout,

  /// No oracle is configured or the endpoint is unreachable.
  #[error("oracle unavailable")]
  Unavailable,

  /// The endpoint answered but the response was unusable.
  #[error("oracle API error: {0}")]
  Api(String),
}

/// A bounded-latency generative-text capability.
pub trait TextOracle: Send + Sync {
  /// Generates text for `input` under the given instruction `prompt`.
  ///
  /// Implementations must enforce their own request timeout; the summarizer
  /// additionally wraps every call in a `tokio::time::timeout` ceiling, so
  /// a caller dropping the future cancels the request promptly.
  fn generate(
    &self,
    prompt: &str,
    input: &str,
  ) -> impl Future<Output = Result<String, OracleError>> + Send;
}

/// JSON request body for the completion endpoint.
#[derive(Debug, Serialize)]
struct OracleRequest<'a> {
  /// Instruction for the generation.
  prompt: &'a str,
  /// The text to operate on.
  input:  &'a str,
}

/// JSON response body from the completion endpoint.
#[derive(Debug, Deserialize)]
struct OracleResponse {
  /// The generated text.
  text: String,
}

/// A [`TextOracle`] backed by a hosted HTTP completion endpoint.
pub struct HttpOracle {
  /// Internal web client, configured with the oracle timeout.
  client:   reqwest::Client,
  /// Endpoint URL.
  base_url: String,
  /// Optional bearer token.
  token:    Option<String>,
}

impl HttpOracle {
  /// Creates an oracle client for `base_url` with the given per-request
  /// timeout.
  pub fn new(base_url: impl Into<String>, token: Option<String>, timeout: Duration) -> Self {
    Self {
      client: reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new()),
      base_url: base_url.into(),
      token,
    }
  }

  /// Builds an oracle from `PAPERLENS_ORACLE_URL` and
  /// `PAPERLENS_ORACLE_TOKEN`, returning `None` when no endpoint is
  /// configured. The CLI uses this to decide between model-backed and
  /// rule-based summarization at startup.
  pub fn from_env(timeout: Duration) -> Option<Self> {
    let base_url = std::env::var("PAPERLENS_ORACLE_URL").ok()?;
    let token = std::env::var("PAPERLENS_ORACLE_TOKEN").ok();
    Some(Self::new(base_url, token, timeout))
  }
}

impl TextOracle for HttpOracle {
  async fn generate(&self, prompt: &str, input: &str) -> Result<String, OracleError> {
    debug!("oracle call to {}", self.base_url);

    let mut request = self.client.post(&self.base_url).json(&OracleRequest { prompt, input });
    if let Some(token) = &self.token {
      request = request.bearer_auth(token);
    }

    let response = request.send().await.map_err(classify)?;
    if !response.status().is_success() {
      return Err(OracleError::Api(format!("status {}", response.status())));
    }

    let body: OracleResponse =
      response.json().await.map_err(|e| OracleError::Api(e.to_string()))?;
    if body.text.trim().is_empty() {
      return Err(OracleError::Api("empty generation".into()));
    }
    Ok(body.text)
  }
}

/// Maps transport failures onto the oracle error taxonomy.
fn classify(err: reqwest::Error) -> OracleError {
  if err.is_timeout() {
    OracleError::Timeout
  } else if err.is_connect() {
    OracleError::Unavailable
  } else {
    OracleError::Api(err.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_unreachable_endpoint_maps_to_unavailable() {
    // Port 9 (discard) is unbound in the test environment.
    let oracle = HttpOracle::new("http://127.0.0.1:9/generate", None, Duration::from_millis(500));
    let result = oracle.generate("summarize", "some text").await;
    assert!(matches!(result, Err(OracleError::Unavailable) | Err(OracleError::Timeout)));
  }
}
