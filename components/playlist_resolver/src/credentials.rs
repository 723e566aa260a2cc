use crate::error::ResolveError;
use std::fmt;

/// Environment / `.env` key holding the application's client id
pub const CLIENT_ID_KEY: &str = "CLIENT_ID";

/// Environment / `.env` key holding the application's client secret
pub const CLIENT_SECRET_KEY: &str = "CLIENT_SECRET";

/// Values shipped in template `.env` files. They count as "not configured".
pub const PLACEHOLDER_VALUES: [&str; 4] = [
    "",
    "YOUR_SPOTIFY_CLIENT_ID_HERE",
    "YOUR_SPOTIFY_CLIENT_SECRET_HERE",
    "your_key_here",
];

/// A credential is valid when present and not one of [`PLACEHOLDER_VALUES`]
pub fn is_valid_credential(value: Option<&str>) -> bool {
    match value {
        Some(value) => !PLACEHOLDER_VALUES.contains(&value),
        None => false,
    }
}

/// Client-credentials pair for the streaming service's Web API
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
}

impl Credentials {
    /// Validate a client id / secret pair. Surrounding whitespace is ignored.
    pub fn new(
        client_id: Option<&str>,
        client_secret: Option<&str>,
    ) -> Result<Self, ResolveError> {
        let client_id = client_id
            .map(str::trim)
            .filter(|id| is_valid_credential(Some(*id)))
            .ok_or(ResolveError::MissingCredential(CLIENT_ID_KEY))?;
        let client_secret = client_secret
            .map(str::trim)
            .filter(|secret| is_valid_credential(Some(*secret)))
            .ok_or(ResolveError::MissingCredential(CLIENT_SECRET_KEY))?;

        Ok(Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub(crate) fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}
