pub mod config;
pub mod session;

pub use config::ApiConfig;
pub use session::Session;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    ApiGangSchedule, ApiVessel, ForecastData, HealthStatus, KpiData, Port, Route, RouteAnalysis,
    SensitivityAnalysis, StrategicLever,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never completed (connection, DNS, timeout, body read).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered 401; the session token has been cleared.
    #[error("Unauthorized; sign in again at {login_route}")]
    Unauthorized { login_route: String },

    /// Any other non-success status.
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Body of the KPI and forecast endpoints. Both fields are optional; the
/// server supplies defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_forecast: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategicRequest {
    pub ports: Vec<Port>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_constraint: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteAnalysisRequest {
    pub routes: Vec<Route>,
    pub vessels: Vec<ApiVessel>,
    pub gang_schedules: Vec<ApiGangSchedule>,
}

/// Client-side contract of the external analysis API.
///
/// Implementations own transport concerns (base URL, auth header, 401
/// handling). KPI and forecast bodies may legitimately be `null`, which is
/// reported as `None` so callers can degrade that section only.
#[async_trait]
pub trait MaritimeApi: Send + Sync {
    async fn health_check(&self) -> Result<HealthStatus, ApiError>;

    async fn analyze_routes(
        &self,
        request: &RouteAnalysisRequest,
    ) -> Result<Vec<RouteAnalysis>, ApiError>;

    async fn calculate_kpis(
        &self,
        request: &KpiRequest,
    ) -> Result<Option<KpiData>, ApiError>;

    async fn generate_forecast(
        &self,
        request: &KpiRequest,
    ) -> Result<Option<ForecastData>, ApiError>;

    async fn analyze_strategic_levers(
        &self,
        request: &StrategicRequest,
    ) -> Result<Vec<StrategicLever>, ApiError>;

    async fn analyze_sensitivity(
        &self,
        ports: &[Port],
    ) -> Result<Vec<SensitivityAnalysis>, ApiError>;

    async fn get_ports(&self) -> Result<Vec<Port>, ApiError>;

    async fn get_vessels(&self) -> Result<Vec<ApiVessel>, ApiError>;
}
