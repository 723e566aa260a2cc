use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Missing or placeholder credential: {0}")]
    MissingCredential(&'static str),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response: {0}")]
    Parse(String),

    #[error("Gave up paging after {0} pages")]
    TooManyPages(usize),
}

impl ResolveError {
    /// Whether the credentials themselves were rejected, as opposed to the
    /// service being unreachable
    pub fn is_auth(&self) -> bool {
        matches!(self, ResolveError::MissingCredential(_) | ResolveError::Auth(_))
    }
}
