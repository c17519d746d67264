//! HTTP proposal service implementation

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::service::{ProposalService, SubmissionResponse};
use crate::submit::ProposalPayload;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;
use url::Url;

/// Marketplace API client using reqwest
pub struct HttpProposalService {
    client: Client,
    token: String,
    api_url: Url,
}

impl HttpProposalService {
    /// Create a new service for `config`, authenticating with `token`
    pub fn new(config: &ClientConfig, token: String) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            token,
            api_url: config.api_url.clone(),
        })
    }

    /// Endpoint receiving proposals for `opportunity_id`
    pub fn endpoint(&self, opportunity_id: &str) -> Result<Url> {
        let path = format!(
            "opportunities/{}/proposals",
            urlencoding::encode(opportunity_id)
        );
        self.api_url
            .join(&path)
            .map_err(|e| Error::Config(format!("invalid endpoint for {opportunity_id}: {e}")))
    }

    fn build_form(payload: &ProposalPayload) -> Form {
        let mut form = Form::new();
        for (name, value) in payload.form_fields() {
            form = form.text(name, value);
        }
        for attachment in &payload.attachments {
            let part = Part::bytes(attachment.data.to_vec()).file_name(attachment.file_name.clone());
            form = form.part("attachments", part);
        }
        form
    }
}

/// Body shape the endpoint answers with
#[derive(Deserialize)]
struct WireResponse {
    success: Option<bool>,
    #[serde(alias = "error")]
    message: Option<String>,
}

/// Read an endpoint reply into a [`SubmissionResponse`]
///
/// The body is trusted when it parses; otherwise the status decides.
pub(crate) fn interpret_response(status: StatusCode, body: &str) -> SubmissionResponse {
    let parsed = serde_json::from_str::<WireResponse>(body).ok();
    let fallback = || format!("Failed to submit proposal (HTTP {})", status.as_u16());

    match (status.is_success(), parsed) {
        (true, Some(wire)) => SubmissionResponse {
            success: wire.success.unwrap_or(true),
            message: wire.message,
        },
        (true, None) => SubmissionResponse::accepted(),
        (false, Some(wire)) => SubmissionResponse {
            success: false,
            message: wire.message.or_else(|| Some(fallback())),
        },
        (false, None) => SubmissionResponse::rejected(fallback()),
    }
}

#[async_trait]
impl ProposalService for HttpProposalService {
    async fn submit_proposal(&self, payload: &ProposalPayload) -> Result<SubmissionResponse> {
        let url = self.endpoint(&payload.opportunity_id)?;
        debug!("POST {url}");

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .multipart(Self::build_form(payload))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Submission endpoint answered {status}");

        Ok(interpret_response(status, &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpret_success_body() {
        let r = interpret_response(StatusCode::OK, r#"{"success":true,"message":"Sent"}"#);
        assert!(r.success);
        assert_eq!(r.message.as_deref(), Some("Sent"));
    }

    #[test]
    fn test_interpret_success_flag_false_on_200() {
        let r = interpret_response(
            StatusCode::OK,
            r#"{"success":false,"message":"Already applied"}"#,
        );
        assert!(!r.success);
        assert_eq!(r.message.as_deref(), Some("Already applied"));
    }

    #[test]
    fn test_interpret_error_alias() {
        let r = interpret_response(StatusCode::BAD_REQUEST, r#"{"error":"Opportunity closed"}"#);
        assert!(!r.success);
        assert_eq!(r.message.as_deref(), Some("Opportunity closed"));
    }

    #[test]
    fn test_interpret_unparseable_failure() {
        let r = interpret_response(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert!(!r.success);
        assert_eq!(r.message.as_deref(), Some("Failed to submit proposal (HTTP 502)"));
    }

    #[test]
    fn test_interpret_success_without_flag() {
        let r = interpret_response(StatusCode::OK, r#"{"message":"Received"}"#);
        assert!(r.success);
        assert_eq!(r.message.as_deref(), Some("Received"));
    }

    #[test]
    fn test_interpret_empty_success() {
        let r = interpret_response(StatusCode::CREATED, "");
        assert!(r.success);
    }

    #[test]
    fn test_endpoint_encodes_id() {
        let config = ClientConfig::new("https://api.example.com/v1", 5).unwrap();
        let service = HttpProposalService::new(&config, "tok".to_string()).unwrap();
        let url = service.endpoint("a b").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/v1/opportunities/a%20b/proposals"
        );
    }
}
