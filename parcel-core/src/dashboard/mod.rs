//! Dashboard load orchestration.
//!
//! A load runs three independent requests concurrently (KPIs, forecast,
//! ports) and waits for all of them. Only when the port list comes back
//! non-empty is the strategic-lever analysis requested, with exactly that
//! list. Any failure in the sequence discards everything fetched so far and
//! leaves the dashboard in [`DashboardState::Failed`]; [`Dashboard::retry`]
//! starts over from scratch.
//!
//! Dropping an in-flight [`Dashboard::load`] future cancels its requests.

mod mock;

pub use mock::{mock_levers, mock_routes};

use tracing::{debug, error, info};

use crate::api::{ApiError, KpiRequest, MaritimeApi, StrategicRequest};
use crate::models::{ForecastData, KpiData, Port, Route, StrategicLever};

/// Message shown for any failed load.
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load dashboard data. Please try again.";

/// Everything a successful load produces. Missing sections stay empty so the
/// rest of the dashboard can still render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    pub routes: Vec<Route>,
    pub kpis: Option<KpiData>,
    pub forecast: Option<ForecastData>,
    pub ports: Vec<Port>,
    pub strategic_levers: Vec<StrategicLever>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardState {
    Loading,
    Failed {
        message: String,
        /// The underlying failure, kept for logs and diagnostics.
        cause: ApiError,
    },
    Ready(DashboardData),
}

impl DashboardState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn data(&self) -> Option<&DashboardData> {
        match self {
            Self::Ready(data) => Some(data),
            _ => None,
        }
    }
}

/// Owns the dashboard state and the API client used to fill it.
pub struct Dashboard<A> {
    api: A,
    state: DashboardState,
}

impl<A: MaritimeApi> Dashboard<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: DashboardState::Loading,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Runs the full load sequence and stores the outcome.
    pub async fn load(&mut self) -> &DashboardState {
        self.state = DashboardState::Loading;

        self.state = match fetch_dashboard(&self.api).await {
            Ok(data) => {
                info!(
                    ports = data.ports.len(),
                    levers = data.strategic_levers.len(),
                    "dashboard loaded"
                );
                DashboardState::Ready(data)
            }
            Err(cause) => {
                error!(%cause, "error loading dashboard data");
                DashboardState::Failed {
                    message: LOAD_ERROR_MESSAGE.to_string(),
                    cause,
                }
            }
        };

        &self.state
    }

    /// Re-runs the whole sequence; nothing from a failed attempt is reused.
    pub async fn retry(&mut self) -> &DashboardState {
        debug!("retrying dashboard load");
        self.load().await
    }
}

/// The load sequence without any state handling.
pub async fn fetch_dashboard<A: MaritimeApi + ?Sized>(api: &A) -> Result<DashboardData, ApiError> {
    let request = KpiRequest::default();

    let (kpis, forecast, ports) = tokio::try_join!(
        api.calculate_kpis(&request),
        api.generate_forecast(&request),
        api.get_ports(),
    )?;

    let strategic_levers = if ports.is_empty() {
        debug!("no ports returned; skipping strategic lever analysis");
        Vec::new()
    } else {
        api.analyze_strategic_levers(&StrategicRequest {
            ports: ports.clone(),
            budget_constraint: None,
        })
        .await?
    };

    Ok(DashboardData {
        routes: mock_routes(),
        kpis,
        forecast,
        ports,
        strategic_levers,
    })
}
