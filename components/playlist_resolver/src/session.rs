//! Authenticated access to the streaming service's Web API.
//!
//! A [`SpotifySession`] is created once per run with the client-credentials
//! flow and handed to whoever needs playlist data. There is no shared
//! global client.

use crate::credentials::Credentials;
use crate::dto::{ErrorBody, PlaylistInfo, PlaylistTracks, TokenResponse};
use crate::error::ResolveError;
use crate::source::{PlaylistSource, TrackPage};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use track_primitives::PlaylistId;

pub const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const API_BASE_URL: &str = "https://api.spotify.com/v1";

/// Only ask for what we turn into tracks; keeps pages small
const TRACK_FIELDS: &str = "items(track(name,artists(name))),next";

/// Largest page size the playlist items endpoint accepts
const PAGE_LIMIT: &str = "100";

/// Base URLs of the two services a session talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub token_url: String,
    pub api_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            token_url: TOKEN_URL.to_string(),
            api_base: API_BASE_URL.to_string(),
        }
    }
}

pub struct SpotifySession {
    http: reqwest::Client,
    api_base: String,
    access_token: String,
}

impl SpotifySession {
    /// Authenticate against the public service
    pub async fn connect(credentials: &Credentials) -> Result<Self, ResolveError> {
        Self::connect_to(credentials, Endpoints::default()).await
    }

    /// Authenticate and check the token with one cheap request.
    ///
    /// Rejected credentials come back as [`ResolveError::Auth`], anything
    /// that kept us from getting an answer as [`ResolveError::Network`].
    pub async fn connect_to(
        credentials: &Credentials,
        endpoints: Endpoints,
    ) -> Result<Self, ResolveError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ResolveError::Network(e.to_string()))?;

        let access_token = request_token(&http, credentials, &endpoints.token_url).await?;

        let session = Self {
            http,
            api_base: endpoints.api_base.trim_end_matches('/').to_string(),
            access_token,
        };
        session.verify().await?;

        info!("Authenticated as client {}", credentials.client_id());
        Ok(session)
    }

    async fn verify(&self) -> Result<(), ResolveError> {
        let url = format!("{}/browse/categories", self.api_base);
        let _: serde_json::Value = self.get_json(&url, &[("limit", "1")]).await?;
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ResolveError> {
        debug!("GET {} {:?}", url, query);

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| ResolveError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ResolveError::Parse(e.to_string()))
    }
}

#[async_trait]
impl PlaylistSource for SpotifySession {
    async fn playlist_name(&self, id: &PlaylistId) -> Result<String, ResolveError> {
        let url = format!("{}/playlists/{}", self.api_base, id);
        let info: PlaylistInfo = self.get_json(&url, &[("fields", "name")]).await?;

        Ok(info
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| id.to_string()))
    }

    async fn tracks_page(
        &self,
        id: &PlaylistId,
        cursor: Option<&str>,
    ) -> Result<TrackPage, ResolveError> {
        let page: PlaylistTracks = match cursor {
            // the cursor is the absolute URL of the next page, query included
            Some(next) => self.get_json(next, &[]).await?,
            None => {
                let url = format!("{}/playlists/{}/tracks", self.api_base, id);
                self.get_json(&url, &[("fields", TRACK_FIELDS), ("limit", PAGE_LIMIT)])
                    .await?
            }
        };

        Ok(page.into())
    }
}

async fn request_token(
    http: &reqwest::Client,
    credentials: &Credentials,
    token_url: &str,
) -> Result<String, ResolveError> {
    let response = http
        .post(token_url)
        .basic_auth(credentials.client_id(), Some(credentials.client_secret()))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await
        .map_err(|e| ResolveError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        // bad client id/secret is a 400 `invalid_client` on this endpoint
        if status == StatusCode::BAD_REQUEST {
            return Err(ResolveError::Auth(describe_failure(status, &body)));
        }
        return Err(classify_failure(status, &body));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| ResolveError::Parse(e.to_string()))?;

    Ok(token.access_token)
}

pub(crate) fn classify_failure(status: StatusCode, body: &str) -> ResolveError {
    let detail = describe_failure(status, body);

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        ResolveError::Auth(detail)
    } else {
        ResolveError::Network(detail)
    }
}

fn describe_failure(status: StatusCode, body: &str) -> String {
    let summary = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.summary())
        .unwrap_or_else(|| body.chars().take(200).collect());

    format!("HTTP {}: {}", status, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// `(request line prefix, status, JSON body)`
    type Route = (&'static str, u16, &'static str);

    const TOKEN_OK: Route = (
        "POST /api/token",
        200,
        r#"{"access_token": "t0ken", "token_type": "Bearer", "expires_in": 3600}"#,
    );

    /// Answers each connection with the first route whose prefix matches
    /// the request line, 404 otherwise.
    async fn serve(routes: Vec<Route>) -> Endpoints {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let request = read_request(&mut socket).await;
                let (status, body) = routes
                    .iter()
                    .find(|(prefix, _, _)| request.starts_with(prefix))
                    .map(|(_, status, body)| (*status, *body))
                    .unwrap_or((404, r#"{"error": {"status": 404, "message": "no route"}}"#));
                let response = format!(
                    "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
            }
        });

        Endpoints {
            token_url: format!("http://{}/api/token", addr),
            api_base: format!("http://{}/v1", addr),
        }
    }

    /// Reads headers and the full body so closing the socket never resets
    /// a request that is still being sent
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut received = Vec::new();
        let mut chunk = [0u8; 1024];

        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            received.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&received);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let body_len = text[..header_end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if received.len() >= header_end + 4 + body_len {
                    break;
                }
            }
        }

        String::from_utf8_lossy(&received).into_owned()
    }

    fn credentials() -> Credentials {
        Credentials::new(Some("id"), Some("secret")).unwrap()
    }

    #[test]
    fn test_default_endpoints() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.token_url, "https://accounts.spotify.com/api/token");
        assert_eq!(endpoints.api_base, "https://api.spotify.com/v1");
    }

    #[test]
    fn test_rejected_token_is_auth_error() {
        let error = classify_failure(
            StatusCode::UNAUTHORIZED,
            r#"{"error": {"status": 401, "message": "Invalid access token"}}"#,
        );

        assert_matches!(&error, ResolveError::Auth(detail) if detail.contains("Invalid access token"));
        assert!(error.is_auth());
    }

    #[test]
    fn test_server_failure_is_network_error() {
        let error = classify_failure(StatusCode::SERVICE_UNAVAILABLE, "upstream timed out");

        assert_matches!(&error, ResolveError::Network(detail) if detail.contains("503"));
        assert!(!error.is_auth());
    }

    #[tokio::test]
    async fn test_invalid_client_is_auth_error() {
        let endpoints = serve(vec![(
            "POST /api/token",
            400,
            r#"{"error": "invalid_client", "error_description": "Invalid client secret"}"#,
        )])
        .await;

        let error = SpotifySession::connect_to(&credentials(), endpoints)
            .await
            .err()
            .unwrap();

        assert_matches!(&error, ResolveError::Auth(detail) if detail.contains("Invalid client secret"));
        assert!(error.is_auth());
    }

    #[tokio::test]
    async fn test_token_rejected_by_api_is_auth_error() {
        let endpoints = serve(vec![
            TOKEN_OK,
            (
                "GET /v1/browse/categories",
                401,
                r#"{"error": {"status": 401, "message": "Invalid access token"}}"#,
            ),
        ])
        .await;

        let error = SpotifySession::connect_to(&credentials(), endpoints)
            .await
            .err()
            .unwrap();

        assert_matches!(&error, ResolveError::Auth(detail) if detail.contains("Invalid access token"));
        assert!(error.is_auth());
    }

    #[tokio::test]
    async fn test_accounts_service_outage_is_network_error() {
        let endpoints = serve(vec![("POST /api/token", 503, r#"{"error": "server_error"}"#)]).await;

        let error = SpotifySession::connect_to(&credentials(), endpoints)
            .await
            .err()
            .unwrap();

        assert_matches!(error, ResolveError::Network(_));
        assert!(!error.is_auth());
    }

    #[tokio::test]
    async fn test_connected_session_fetches_playlist_name() {
        let endpoints = serve(vec![
            TOKEN_OK,
            ("GET /v1/browse/categories", 200, r#"{"categories": {"items": []}}"#),
            ("GET /v1/playlists/abc123?fields=name", 200, r#"{"name": "Road Trip"}"#),
        ])
        .await;
        let id: PlaylistId = "spotify:playlist:abc123".parse().unwrap();

        let session = SpotifySession::connect_to(&credentials(), endpoints)
            .await
            .unwrap();

        assert_eq!(session.playlist_name(&id).await.unwrap(), "Road Trip");
    }

    #[tokio::test]
    async fn test_unreachable_accounts_service_is_network_error() {
        let credentials = credentials();
        let endpoints = Endpoints {
            // nothing listens on the discard port
            token_url: "http://127.0.0.1:9/api/token".to_string(),
            api_base: "http://127.0.0.1:9/v1".to_string(),
        };

        let result = SpotifySession::connect_to(&credentials, endpoints).await;

        assert_matches!(result.err(), Some(ResolveError::Network(_)));
    }
}
