/// Failure of a single language-model call.
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("rate limit exceeded")]
    RateLimit,
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("upstream returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("empty response")]
    EmptyResponse,
}
