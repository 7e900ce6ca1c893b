//! `reqwest` implementations of the parcel-core network contracts.

mod form;

pub use form::HttpLeadFormSubmitter;

use std::time::Duration;

use async_trait::async_trait;
use parcel_core::api::{KpiRequest, RouteAnalysisRequest, StrategicRequest};
use parcel_core::{
    ApiConfig, ApiError, ApiVessel, ForecastData, HealthStatus, KpiData, MaritimeApi, Port,
    RouteAnalysis, SensitivityAnalysis, Session, StrategicLever,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Deserialize)]
struct PortsResponse {
    ports: Option<Vec<Port>>,
}

#[derive(Deserialize)]
struct VesselsResponse {
    vessels: Option<Vec<ApiVessel>>,
}

#[derive(Deserialize)]
struct RoutesResponse {
    routes: Option<Vec<RouteAnalysis>>,
}

#[derive(Deserialize)]
struct StrategicResponse {
    strategic_levers: Option<Vec<StrategicLever>>,
}

#[derive(Deserialize)]
struct SensitivityResponse {
    sensitivity_analysis: Option<Vec<SensitivityAnalysis>>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    detail: String,
}

/// HTTP client for the analysis API.
///
/// Every request carries `Content-Type: application/json` and, when the
/// session holds a token, `Authorization: Bearer <token>`. A 401 expires the
/// session before the error is returned.
pub struct HttpMaritimeApi {
    client: Client,
    config: ApiConfig,
    session: Session,
}

impl HttpMaritimeApi {
    pub fn new(
        config: ApiConfig,
        session: Session,
    ) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            config,
            session,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn request(
        &self,
        method: Method,
        path: &str,
    ) -> RequestBuilder {
        let builder = self
            .client
            .request(method, self.config.endpoint(path))
            .header(CONTENT_TYPE, "application/json");

        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ApiError> {
        debug!(path, "GET");
        self.execute(self.request(Method::GET, path)).await
    }

    async fn post<B, T>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(path, "POST");
        let bytes = serde_json::to_vec(body)
            .map_err(|e| ApiError::Configuration(format!("cannot encode request: {e}")))?;
        self.execute(self.request(Method::POST, path).body(bytes))
            .await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        self.check_status(status, &body)?;
        decode_body(&body)
    }

    fn check_status(
        &self,
        status: StatusCode,
        body: &str,
    ) -> Result<(), ApiError> {
        if status == StatusCode::UNAUTHORIZED {
            self.session.expire(&self.config.login_route);
            return Err(ApiError::Unauthorized {
                login_route: self.config.login_route.clone(),
            });
        }

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(status, body),
            });
        }

        Ok(())
    }
}

/// Decodes a JSON body; an empty body reads as `null`.
fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Prefers the API's `{"detail": ...}` error message, then the raw body.
fn error_message(
    status: StatusCode,
    body: &str,
) -> String {
    if let Ok(ErrorDetail { detail }) = serde_json::from_str(body) {
        return detail;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        trimmed.to_string()
    }
}

#[async_trait]
impl MaritimeApi for HttpMaritimeApi {
    async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        let status: Option<HealthStatus> = self.get("/health").await?;
        Ok(status.unwrap_or_default())
    }

    async fn analyze_routes(
        &self,
        request: &RouteAnalysisRequest,
    ) -> Result<Vec<RouteAnalysis>, ApiError> {
        let response: Option<RoutesResponse> = self.post("/api/routes/analyze", request).await?;
        Ok(response.and_then(|r| r.routes).unwrap_or_default())
    }

    async fn calculate_kpis(
        &self,
        request: &KpiRequest,
    ) -> Result<Option<KpiData>, ApiError> {
        self.post("/api/kpis/calculate", request).await
    }

    async fn generate_forecast(
        &self,
        request: &KpiRequest,
    ) -> Result<Option<ForecastData>, ApiError> {
        self.post("/api/forecast/generate", request).await
    }

    async fn analyze_strategic_levers(
        &self,
        request: &StrategicRequest,
    ) -> Result<Vec<StrategicLever>, ApiError> {
        let response: Option<StrategicResponse> =
            self.post("/api/strategic/analyze", request).await?;
        Ok(response
            .and_then(|r| r.strategic_levers)
            .unwrap_or_default())
    }

    async fn analyze_sensitivity(
        &self,
        ports: &[Port],
    ) -> Result<Vec<SensitivityAnalysis>, ApiError> {
        let response: Option<SensitivityResponse> =
            self.post("/api/sensitivity/analyze", ports).await?;
        Ok(response
            .and_then(|r| r.sensitivity_analysis)
            .unwrap_or_default())
    }

    async fn get_ports(&self) -> Result<Vec<Port>, ApiError> {
        let response: Option<PortsResponse> = self.get("/api/ports").await?;
        Ok(response.and_then(|r| r.ports).unwrap_or_default())
    }

    async fn get_vessels(&self) -> Result<Vec<ApiVessel>, ApiError> {
        let response: Option<VesselsResponse> = self.get("/api/vessels").await?;
        Ok(response.and_then(|r| r.vessels).unwrap_or_default())
    }
}
