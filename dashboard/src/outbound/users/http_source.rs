//! Reqwest-backed user source adapter.
//!
//! This adapter owns transport details only: the GET request, timeout and
//! HTTP error mapping, and JSON decoding into canonical users.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

use super::dto::UsersDocumentDto;
use super::normalize::normalize_user;
use crate::domain::ports::{UserSource, UserSourceError};
use crate::domain::user::User;

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// User source that issues GET requests against one static JSON resource.
pub struct HttpUserSource {
    client: Client,
    endpoint: Url,
}

impl HttpUserSource {
    /// Build an adapter with the default request timeout.
    ///
    /// # Errors
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url) -> Result<Self, reqwest::Error> {
        Self::with_timeout(endpoint, DEFAULT_FETCH_TIMEOUT)
    }

    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_timeout(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl UserSource for HttpUserSource {
    async fn fetch_users(&self) -> Result<Vec<User>, UserSourceError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_users(body.as_ref())
    }
}

fn parse_users(body: &[u8]) -> Result<Vec<User>, UserSourceError> {
    let document: UsersDocumentDto = serde_json::from_slice(body).map_err(|error| {
        UserSourceError::decode(format!("invalid users JSON payload: {error}"))
    })?;
    Ok(document.into_raw_users().iter().map(normalize_user).collect())
}

fn map_transport_error(error: reqwest::Error) -> UserSourceError {
    if error.is_timeout() {
        UserSourceError::transport(format!("request timed out: {error}"))
    } else {
        UserSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> UserSourceError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_owned()
    } else {
        preview
    };
    UserSourceError::status(status.as_u16(), message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network parsing and mapping helpers.

    use rstest::rstest;

    use super::*;
    use crate::domain::user::UserStatus;

    #[test]
    fn parses_a_bare_array_of_records() {
        let body = br#"[
            { "id": "LSQ001", "organization": "Lendsqr", "status": "Pending" },
            { "id": "IRO001", "organization": "Irorun" }
        ]"#;

        let users = parse_users(body).expect("body decodes");
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].id, "LSQ001");
        assert_eq!(users[0].status, UserStatus::Pending);
        assert_eq!(users[1].status, UserStatus::Active, "status defaults");
    }

    #[test]
    fn parses_an_enveloped_document() {
        let body = br#"{ "users": [ { "id": "LSQ001" } ] }"#;
        let users = parse_users(body).expect("body decodes");
        assert_eq!(users.len(), 1);
    }

    #[test]
    fn object_without_users_key_reads_as_empty() {
        let body = br#"{ "count": 0 }"#;
        let users = parse_users(body).expect("body decodes");
        assert!(users.is_empty());
    }

    #[test]
    fn invalid_json_maps_to_a_decode_error() {
        let error = parse_users(b"not json").expect_err("decode must fail");
        assert!(matches!(error, UserSourceError::Decode { .. }));
    }

    #[rstest]
    #[case::not_found(StatusCode::NOT_FOUND, 404)]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, 500)]
    fn non_success_statuses_map_to_status_errors(
        #[case] status: StatusCode,
        #[case] expected: u16,
    ) {
        let error = map_status_error(status, b"");
        match error {
            UserSourceError::Status { status, .. } => assert_eq!(status, expected),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn status_error_includes_a_compact_body_preview() {
        let error = map_status_error(
            StatusCode::SERVICE_UNAVAILABLE,
            b"upstream\n   maintenance window",
        );
        assert!(error.to_string().contains("upstream maintenance window"));
    }
}
