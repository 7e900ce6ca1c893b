use serde::{Deserialize, Serialize};

/// Connection settings for the analysis API.
///
/// Passed explicitly to the client so tests can point it anywhere without
/// touching process-wide state.
///
/// | field                  | default                 |
/// |------------------------|-------------------------|
/// | `base_url`             | `http://localhost:8000` |
/// | `login_route`          | `/login`                |
/// | `request_timeout_secs` | none (wait forever)     |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Where the user is sent after a 401.
    pub login_route: String,
    /// Per-request timeout. Unset means requests may wait indefinitely.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            login_route: "/login".to_string(),
            request_timeout_secs: None,
        }
    }
}

impl ApiConfig {
    /// Joins `path` onto the base URL with exactly one slash between them.
    pub fn endpoint(
        &self,
        path: &str,
    ) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn endpoint_joins_with_single_slash() {
        let config = ApiConfig {
            base_url: "https://api.example.com/".to_string(),
            ..Default::default()
        };

        assert_eq!(
            config.endpoint("/api/ports"),
            "https://api.example.com/api/ports"
        );
        assert_eq!(config.endpoint("health"), "https://api.example.com/health");
    }

    #[test]
    fn default_has_no_timeout() {
        assert_eq!(ApiConfig::default().request_timeout_secs, None);
    }
}
