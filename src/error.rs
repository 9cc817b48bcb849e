use thiserror::Error;

/// Failures talking to the dashboard server.
#[derive(Debug, Error)]
pub enum ApiError {
	#[error("no global window")]
	NoWindow,
	#[error("could not build request for {url}: {reason}")]
	Request { url: String, reason: String },
	#[error("network error: {0}")]
	Network(String),
	#[error("server answered HTTP {0}")]
	Status(u16),
	#[error("could not read response body: {0}")]
	Body(String),
	#[error("malformed JSON payload: {0}")]
	Decode(#[from] serde_json::Error),
}
