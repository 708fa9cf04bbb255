//! Client for the skill feedback service.

use reqwest::header::USER_AGENT;
use serde::{Deserialize, Serialize};

const FEEDBACK_USER_AGENT: &str = "skillsrc-cli";

/// A feedback report about one skill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackData {
    pub skill: String,
    pub issue: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Exact quote from the skill that was not followed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_instruction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_reason: Option<String>,
    /// Comma-separated ids of the skills active at the time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loaded_skills: Option<String>,
}

/// Posts [`FeedbackData`] to the feedback endpoint.
#[derive(Debug, Clone)]
pub struct FeedbackClient {
    http: reqwest::Client,
    api_url: Option<String>,
}

impl FeedbackClient {
    /// Client for `FEEDBACK_API_URL`, if set.
    pub fn from_env() -> Self {
        Self::with_url(skillsrc_state::feedback_api_url())
    }

    pub fn with_url(api_url: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.filter(|u| !u.trim().is_empty()),
        }
    }

    pub fn api_url(&self) -> Option<&str> {
        self.api_url.as_deref()
    }

    /// Sends the report. Returns `false` when no endpoint is configured, the
    /// request fails, or the service answers with a non-success status.
    pub async fn submit(&self, data: &FeedbackData) -> bool {
        let Some(url) = &self.api_url else {
            return false;
        };
        match self
            .http
            .post(url)
            .header(USER_AGENT, FEEDBACK_USER_AGENT)
            .json(data)
            .send()
            .await
        {
            Ok(response) => {
                let ok = response.status().is_success();
                if !ok {
                    tracing::warn!(status = %response.status(), url, "Feedback rejected");
                }
                ok
            }
            Err(e) => {
                tracing::warn!(error = %e, url, "Feedback request failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use skillsrc_test_utils::set_env_var;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn report() -> FeedbackData {
        FeedbackData {
            skill: "flutter/bloc-state-management".into(),
            issue: "Suggests deprecated API".into(),
            skill_instruction: Some("Use emit.forEach".into()),
            ..Default::default()
        }
    }

    #[test]
    fn serializes_camel_case_without_empty_fields() {
        let json = serde_json::to_value(report()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "skill": "flutter/bloc-state-management",
                "issue": "Suggests deprecated API",
                "skillInstruction": "Use emit.forEach"
            })
        );
    }

    #[tokio::test]
    async fn posts_report_as_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/feedback"))
            .and(header("user-agent", "skillsrc-cli"))
            .and(body_json(serde_json::to_value(report()).unwrap()))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let client = FeedbackClient::with_url(Some(format!("{}/feedback", server.uri())));
        assert!(client.submit(&report()).await);
    }

    #[tokio::test]
    async fn server_error_is_reported_as_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let client = FeedbackClient::with_url(Some(server.uri()));
        assert!(!client.submit(&report()).await);
    }

    #[tokio::test]
    async fn unconfigured_client_sends_nothing() {
        let client = FeedbackClient::with_url(Some("  ".into()));
        assert_eq!(client.api_url(), None);
        assert!(!client.submit(&report()).await);
    }

    #[test]
    #[serial]
    fn endpoint_comes_from_environment() {
        let _url = set_env_var("FEEDBACK_API_URL", Some("https://feedback.example.com/api"));
        assert_eq!(
            FeedbackClient::from_env().api_url(),
            Some("https://feedback.example.com/api")
        );

        let _url = set_env_var("FEEDBACK_API_URL", None);
        assert_eq!(FeedbackClient::from_env().api_url(), None);
    }
}
