use async_trait::async_trait;
use parcel_core::lead_form::{
    GENERIC_SUBMISSION_ERROR, LeadForm, LeadFormSubmitter, SubmissionOutcome,
};
use reqwest::Client;
use tracing::{info, warn};

/// Posts lead forms as JSON to a fixed endpoint.
pub struct HttpLeadFormSubmitter {
    client: Client,
    endpoint: String,
}

impl HttpLeadFormSubmitter {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(
        client: Client,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LeadFormSubmitter for HttpLeadFormSubmitter {
    async fn submit(
        &self,
        form: &LeadForm,
    ) -> SubmissionOutcome {
        let response = match self
            .client
            .post(&self.endpoint)
            .json(&form.to_payload())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, endpoint = %self.endpoint, "lead form submission failed");
                return SubmissionOutcome::TransportFailure(e.to_string());
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(
                    error = %e,
                    status = status.as_u16(),
                    "cannot read lead form reply; treating it as empty"
                );
                String::new()
            }
        };

        if !status.is_success() {
            warn!(status = status.as_u16(), "lead form endpoint returned an error status");
            return match SubmissionOutcome::from_reply_body(&body) {
                SubmissionOutcome::Success => {
                    SubmissionOutcome::ApplicationError(GENERIC_SUBMISSION_ERROR.to_string())
                }
                other => other,
            };
        }

        let outcome = SubmissionOutcome::from_reply_body(&body);
        if outcome.is_success() {
            info!("lead form submitted");
        }
        outcome
    }
}
