//! Early-access lead form submitted to a spreadsheet-backed endpoint.
//!
//! The payload is every named field plus a derived `Consent` field. The
//! endpoint's reply is reduced to a [`SubmissionOutcome`], so callers never
//! inspect raw responses. After a successful submission the form is cleared.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Shown when the endpoint reports an error without a message, or when the
/// request never completes.
pub const GENERIC_SUBMISSION_ERROR: &str = "There was an error submitting the form.";

pub const SUBMISSION_SUCCESS: &str = "Thank you! Your submission has been received.";

/// Key of the derived consent field in the payload.
pub const CONSENT_FIELD: &str = "Consent";

/// Field values in entry order plus the consent checkbox.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadForm {
    fields: Vec<(String, String)>,
    consent: bool,
}

impl LeadForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a named field, replacing any earlier value. Unnamed fields are
    /// not part of the payload and are ignored.
    pub fn set_field(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) {
        let name = name.into();
        if name.trim().is_empty() {
            return;
        }
        let value = value.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn field(
        &self,
        name: &str,
    ) -> Option<&str> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn set_consent(
        &mut self,
        consent: bool,
    ) {
        self.consent = consent;
    }

    pub fn consent(&self) -> bool {
        self.consent
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && !self.consent
    }

    /// JSON object sent to the endpoint.
    pub fn to_payload(&self) -> Map<String, Value> {
        let mut payload: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), Value::String(value.clone())))
            .collect();
        let consent = if self.consent { "Yes" } else { "No" };
        payload.insert(CONSENT_FIELD.to_string(), Value::String(consent.to_string()));
        payload
    }

    /// Clears every field and the consent checkbox.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Result of a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Success,
    /// The endpoint answered but reported a failure.
    ApplicationError(String),
    /// The request never completed.
    TransportFailure(String),
}

#[derive(Deserialize)]
struct EndpointReply {
    result: Option<String>,
    error: Option<Value>,
    message: Option<String>,
}

impl SubmissionOutcome {
    /// Interprets an endpoint reply body.
    ///
    /// Only an explicit `{"result": "error"}` counts as a failure; bodies that
    /// are empty or not JSON are treated as success, matching endpoints whose
    /// replies cannot be read.
    pub fn from_reply_body(body: &str) -> Self {
        let Ok(reply) = serde_json::from_str::<EndpointReply>(body) else {
            debug!("unreadable submission reply; assuming success");
            return Self::Success;
        };

        if reply.result.as_deref() != Some("error") {
            return Self::Success;
        }

        let message = match reply.error {
            Some(Value::String(text)) if !text.trim().is_empty() => Some(text),
            Some(Value::Object(obj)) => obj
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        }
        .or(reply.message)
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| GENERIC_SUBMISSION_ERROR.to_string());

        warn!(%message, "submission rejected by endpoint");
        Self::ApplicationError(message)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Text for the confirmation alert.
    pub fn user_message(&self) -> String {
        match self {
            Self::Success => SUBMISSION_SUCCESS.to_string(),
            Self::ApplicationError(message) => format!("Error: {message}"),
            Self::TransportFailure(_) => GENERIC_SUBMISSION_ERROR.to_string(),
        }
    }
}

/// Sends a lead form somewhere.
#[async_trait]
pub trait LeadFormSubmitter: Send + Sync {
    async fn submit(
        &self,
        form: &LeadForm,
    ) -> SubmissionOutcome;
}

/// Submits `form` and clears it when the submission succeeds.
pub async fn submit_and_reset<S: LeadFormSubmitter + ?Sized>(
    submitter: &S,
    form: &mut LeadForm,
) -> SubmissionOutcome {
    let outcome = submitter.submit(form).await;
    if outcome.is_success() {
        form.reset();
    }
    outcome
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn filled_form() -> LeadForm {
        let mut form = LeadForm::new();
        form.set_field("Name", "Ada");
        form.set_field("Email", "ada@example.com");
        form
    }

    // =========================================================================
    // payload tests
    // =========================================================================

    #[test]
    fn payload_contains_fields_and_consent_no() {
        let payload = filled_form().to_payload();

        assert_eq!(
            Value::Object(payload),
            json!({ "Name": "Ada", "Email": "ada@example.com", "Consent": "No" })
        );
    }

    #[test]
    fn payload_consent_yes_when_checked() {
        let mut form = filled_form();
        form.set_consent(true);

        assert_eq!(form.to_payload()["Consent"], "Yes");
    }

    #[test]
    fn consent_overrides_a_field_with_the_same_name() {
        let mut form = LeadForm::new();
        form.set_field("Consent", "maybe");
        form.set_consent(true);

        assert_eq!(form.to_payload()["Consent"], "Yes");
    }

    #[test]
    fn set_field_replaces_and_ignores_unnamed() {
        let mut form = filled_form();

        form.set_field("Name", "Grace");
        form.set_field("  ", "ignored");

        assert_eq!(form.field("Name"), Some("Grace"));
        assert_eq!(form.fields().len(), 2);
    }

    // =========================================================================
    // reply interpretation tests
    // =========================================================================

    #[test]
    fn success_reply_is_success() {
        let outcome = SubmissionOutcome::from_reply_body(r#"{"result":"success","row":12}"#);

        assert_eq!(outcome, SubmissionOutcome::Success);
    }

    #[test]
    fn unreadable_reply_is_success() {
        assert_eq!(SubmissionOutcome::from_reply_body(""), SubmissionOutcome::Success);
        assert_eq!(
            SubmissionOutcome::from_reply_body("<html>ok</html>"),
            SubmissionOutcome::Success
        );
    }

    #[test]
    fn error_reply_uses_server_message() {
        let outcome =
            SubmissionOutcome::from_reply_body(r#"{"result":"error","error":"Sheet is full"}"#);

        assert_eq!(
            outcome,
            SubmissionOutcome::ApplicationError("Sheet is full".to_string())
        );
        assert_eq!(outcome.user_message(), "Error: Sheet is full");
    }

    #[test]
    fn error_reply_reads_nested_message() {
        let outcome = SubmissionOutcome::from_reply_body(
            r#"{"result":"error","error":{"name":"Exception","message":"Quota exceeded"}}"#,
        );

        assert_eq!(
            outcome,
            SubmissionOutcome::ApplicationError("Quota exceeded".to_string())
        );
    }

    #[test]
    fn error_reply_without_message_falls_back_to_generic() {
        let outcome = SubmissionOutcome::from_reply_body(r#"{"result":"error"}"#);

        assert_eq!(
            outcome,
            SubmissionOutcome::ApplicationError(GENERIC_SUBMISSION_ERROR.to_string())
        );
    }

    // =========================================================================
    // submit_and_reset tests
    // =========================================================================

    struct FixedSubmitter(SubmissionOutcome);

    #[async_trait]
    impl LeadFormSubmitter for FixedSubmitter {
        async fn submit(
            &self,
            _form: &LeadForm,
        ) -> SubmissionOutcome {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn successful_submission_resets_the_form() {
        let mut form = filled_form();
        form.set_consent(true);

        let outcome = submit_and_reset(&FixedSubmitter(SubmissionOutcome::Success), &mut form).await;

        assert!(outcome.is_success());
        assert!(form.is_empty());
    }

    #[tokio::test]
    async fn failed_submission_keeps_the_form() {
        let mut form = filled_form();
        let submitter = FixedSubmitter(SubmissionOutcome::TransportFailure("offline".to_string()));

        let outcome = submit_and_reset(&submitter, &mut form).await;

        assert_eq!(outcome.user_message(), GENERIC_SUBMISSION_ERROR);
        assert_eq!(form, filled_form());
    }
}
