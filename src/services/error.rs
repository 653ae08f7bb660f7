use thiserror::Error;

/// Failures of the outbound AI and weather calls. These never leave the
/// services layer; callers get fallback text instead.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("{0} API key is not set")]
    MissingApiKey(&'static str),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
    #[error("response contained no content")]
    EmptyContent,
}

/// Keeps error bodies readable in logs.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX_CHARS: usize = 200;
    if body.chars().count() <= MAX_CHARS {
        return body.to_string();
    }
    let cut: String = body.chars().take(MAX_CHARS).collect();
    format!("{}...", cut)
}
