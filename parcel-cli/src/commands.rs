//! Subcommand flows, kept free of process setup so they can be driven with
//! stub API implementations.

use anyhow::{Context, Result, bail};
use parcel_core::api::RouteAnalysisRequest;
use parcel_core::calculations::{DischargePlan, PlanTotals};
use parcel_core::dashboard::{Dashboard, DashboardState, mock_routes};
use parcel_core::lead_form::{LeadForm, LeadFormSubmitter, SubmissionOutcome, submit_and_reset};
use parcel_core::models::{ApiGangSchedule, ApiVessel, RouteAnalysis, SensitivityAnalysis};
use parcel_core::search::{Named, ReferenceSearch, SearchEvent};
use parcel_core::{MaritimeApi, ReferenceCatalog};
use tracing::{info, warn};

use crate::cli::{FormField, PlanArgs};

/// Picks one entry by driving the dropdown the way a user would: focus,
/// type the search text, then choose from the visible options.
///
/// An exact (case-insensitive) name wins; otherwise the search must leave
/// exactly one option.
pub fn choose<'a, T: Named>(
    kind: &str,
    entries: &'a [T],
    search: &str,
) -> Result<&'a T> {
    let search = search.trim();
    let mut dropdown = ReferenceSearch::new(entries);
    dropdown.handle(SearchEvent::Focus);
    dropdown.handle(SearchEvent::TextChanged(search.to_string()));

    let visible = dropdown.visible_options();
    let wanted = search.to_lowercase();
    let name = match visible
        .iter()
        .find(|entry| entry.name().to_lowercase() == wanted)
    {
        Some(exact) => exact.name().to_string(),
        None => match visible.as_slice() {
            [only] => only.name().to_string(),
            [] => bail!("no {kind} matches '{search}'"),
            several => {
                let names: Vec<_> = several.iter().map(|entry| entry.name()).collect();
                bail!("'{search}' matches several {kind}s: {}", names.join(", "))
            }
        },
    };

    dropdown
        .handle(SearchEvent::OptionChosen(name))
        .with_context(|| format!("{kind} option disappeared while choosing"))
}

/// Applies port and vessel selection, then row and vessel edits, then
/// recomputes.
pub fn build_plan(
    catalog: &ReferenceCatalog,
    args: &PlanArgs,
) -> Result<(DischargePlan, PlanTotals)> {
    let mut plan = DischargePlan::new();

    if let Some(search) = &args.port {
        let port = choose("port", &catalog.ports, search)?;
        info!(port = %port.name, "applying port");
        plan.select_port(port);
    }
    if let Some(search) = &args.vessel {
        let vessel = choose("vessel", &catalog.vessels, search)?;
        info!(vessel = %vessel.name, "applying vessel");
        plan.select_vessel(vessel);
    }

    for edit in &args.row_edits {
        plan.set_row_field(edit.row, edit.field, &edit.value)
            .with_context(|| format!("cannot apply --row {edit}"))?;
    }
    for edit in &args.vessel_edits {
        plan.set_vessel_field(edit.field, &edit.value);
    }

    let totals = plan.simulate();
    Ok((plan, totals))
}

/// Loads the dashboard, retrying up to `retries` more times after a
/// failure. Returns the final state.
pub async fn load_dashboard<A: MaritimeApi>(
    dashboard: &mut Dashboard<A>,
    retries: u32,
) -> DashboardState {
    let mut state = dashboard.load().await.clone();
    let mut attempt = 0;
    while let DashboardState::Failed { cause, .. } = &state {
        if attempt >= retries {
            break;
        }
        attempt += 1;
        warn!(%cause, attempt, retries, "dashboard load failed; retrying");
        state = dashboard.retry().await.clone();
    }
    state
}

/// Runs the sensitivity analysis over every port the API knows.
pub async fn run_sensitivity<A: MaritimeApi + ?Sized>(api: &A) -> Result<Vec<SensitivityAnalysis>> {
    let ports = api.get_ports().await.context("cannot load ports")?;
    if ports.is_empty() {
        warn!("API returned no ports; nothing to analyze");
        return Ok(Vec::new());
    }
    api.analyze_sensitivity(&ports)
        .await
        .context("sensitivity analysis failed")
}

/// The route analysis body for a plan: the demonstration routes, the plan's
/// vessel and its gang schedule.
pub fn route_analysis_request(plan: &DischargePlan) -> RouteAnalysisRequest {
    RouteAnalysisRequest {
        routes: mock_routes(),
        vessels: vec![ApiVessel::from(plan.vessel())],
        gang_schedules: plan.rows().iter().map(ApiGangSchedule::from).collect(),
    }
}

pub async fn run_route_analysis<A: MaritimeApi + ?Sized>(
    api: &A,
    plan: &DischargePlan,
) -> Result<Vec<RouteAnalysis>> {
    api.analyze_routes(&route_analysis_request(plan))
        .await
        .context("route analysis failed")
}

pub fn lead_form(
    fields: &[FormField],
    consent: bool,
) -> LeadForm {
    let mut form = LeadForm::new();
    for field in fields {
        form.set_field(field.name.as_str(), field.value.as_str());
    }
    form.set_consent(consent);
    form
}

/// Submits the form; the form is cleared only when the endpoint accepts it.
pub async fn submit_lead<S: LeadFormSubmitter + ?Sized>(
    submitter: &S,
    form: &mut LeadForm,
) -> SubmissionOutcome {
    let outcome = submit_and_reset(submitter, form).await;
    match &outcome {
        SubmissionOutcome::Success => info!("lead form accepted"),
        SubmissionOutcome::ApplicationError(message) => warn!(%message, "lead form rejected"),
        SubmissionOutcome::TransportFailure(cause) => warn!(%cause, "lead form not delivered"),
    }
    outcome
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use parcel_core::api::{ApiError, KpiRequest, StrategicRequest};
    use parcel_core::lead_form::GENERIC_SUBMISSION_ERROR;
    use parcel_core::models::{
        ForecastData, GangField, HealthStatus, KpiData, Port, ReferencePort, StrategicLever,
        VesselField,
    };
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::cli::{RowEdit, VesselEdit};

    // =========================================================================
    // choose tests
    // =========================================================================

    #[test]
    fn choose_unique_partial_match() {
        let catalog = ReferenceCatalog::builtin();

        let port = choose("port", &catalog.ports, "calla").unwrap();

        assert_eq!(port.name, "Callao");
    }

    #[test]
    fn choose_prefers_exact_name_over_longer_matches() {
        let ports = vec![
            ReferencePort {
                name: "Santos".to_string(),
                ..catalog_port("Santos")
            },
            ReferencePort {
                name: "Santos Norte".to_string(),
                ..catalog_port("Santos")
            },
        ];

        let port = choose("port", &ports, "santos").unwrap();

        assert_eq!(port.name, "Santos");
    }

    #[test]
    fn choose_ignores_surrounding_whitespace() {
        let ports = vec![
            catalog_port("Santos"),
            ReferencePort {
                name: "Santos Norte".to_string(),
                ..catalog_port("Santos")
            },
        ];

        let port = choose("port", &ports, " Santos ").unwrap();

        assert_eq!(port.name, "Santos");
    }

    #[test]
    fn choose_reports_ambiguous_search() {
        let catalog = ReferenceCatalog::builtin();

        let err = choose("vessel", &catalog.vessels, "steel").unwrap_err();

        let message = err.to_string();
        assert!(message.contains("Steel Carrier Alpha"), "{message}");
        assert!(message.contains("Steel Carrier Beta"), "{message}");
    }

    #[test]
    fn choose_reports_no_match() {
        let catalog = ReferenceCatalog::builtin();

        let err = choose("port", &catalog.ports, "atlantis").unwrap_err();

        assert_eq!(err.to_string(), "no port matches 'atlantis'");
    }

    fn catalog_port(name: &str) -> ReferencePort {
        ReferenceCatalog::builtin()
            .find_port(name)
            .cloned()
            .unwrap()
    }

    // =========================================================================
    // build_plan tests
    // =========================================================================

    #[test]
    fn build_plan_without_arguments_is_default_plan() {
        let (plan, totals) = build_plan(&ReferenceCatalog::builtin(), &PlanArgs::default()).unwrap();

        assert_eq!(totals.total_gang_cost, dec!(322000));
        assert_eq!(totals.grand_total, dec!(3.52));
        assert_eq!(plan.vessel().grand_total(), dec!(3.52));
    }

    #[test]
    fn build_plan_applies_selection_before_edits() {
        let args = PlanArgs {
            port: Some("callao".to_string()),
            vessel: Some("ocean".to_string()),
            row_edits: vec![RowEdit {
                row: 0,
                field: GangField::NumberOfGangs,
                value: "4".to_string(),
            }],
            vessel_edits: vec![VesselEdit {
                field: VesselField::UnderHolding,
                value: "0.5".to_string(),
            }],
        };

        let (plan, totals) = build_plan(&ReferenceCatalog::builtin(), &args).unwrap();

        assert_eq!(plan.rows()[0].total_cost(), dec!(64000));
        assert_eq!(plan.rows()[1].total_cost(), dec!(48000));
        assert_eq!(totals.total_gang_cost, dec!(352000));
        assert_eq!(plan.vessel().vessel_name, "Ocean Explorer");
        // 3.60 + 0.30 + 0 + 0.5
        assert_eq!(totals.grand_total, dec!(4.40));
    }

    #[test]
    fn build_plan_rejects_row_out_of_range() {
        let args = PlanArgs {
            row_edits: vec![RowEdit {
                row: 7,
                field: GangField::CostPerGang,
                value: "1".to_string(),
            }],
            ..Default::default()
        };

        let err = build_plan(&ReferenceCatalog::builtin(), &args).unwrap_err();

        assert!(err.to_string().contains("--row 8:cost_per_gang=1"));
    }

    #[test]
    fn route_analysis_request_carries_plan() {
        let (plan, _) = build_plan(&ReferenceCatalog::builtin(), &PlanArgs::default()).unwrap();

        let request = route_analysis_request(&plan);

        assert_eq!(request.routes.len(), 2);
        assert_eq!(request.vessels.len(), 1);
        assert_eq!(request.vessels[0].name, "Steel Carrier Alpha");
        assert_eq!(request.gang_schedules.len(), 7);
    }

    // =========================================================================
    // dashboard and API flow tests
    // =========================================================================

    // ── stub API ─────────────────────────────────────────────────────────
    // Ports fail until `failures` reaches zero.
    #[derive(Default)]
    struct FlakyApi {
        failures: AtomicUsize,
        port_calls: AtomicUsize,
        ports: Vec<Port>,
    }

    #[async_trait]
    impl MaritimeApi for FlakyApi {
        async fn health_check(&self) -> Result<HealthStatus, ApiError> {
            Ok(HealthStatus::default())
        }
        async fn analyze_routes(
            &self,
            request: &RouteAnalysisRequest,
        ) -> Result<Vec<RouteAnalysis>, ApiError> {
            Ok(request
                .routes
                .iter()
                .map(|route| RouteAnalysis {
                    name: route.name.clone(),
                    ..Default::default()
                })
                .collect())
        }
        async fn calculate_kpis(
            &self,
            _request: &KpiRequest,
        ) -> Result<Option<KpiData>, ApiError> {
            Ok(None)
        }
        async fn generate_forecast(
            &self,
            _request: &KpiRequest,
        ) -> Result<Option<ForecastData>, ApiError> {
            Ok(None)
        }
        async fn analyze_strategic_levers(
            &self,
            _request: &StrategicRequest,
        ) -> Result<Vec<StrategicLever>, ApiError> {
            Ok(Vec::new())
        }
        async fn analyze_sensitivity(
            &self,
            ports: &[Port],
        ) -> Result<Vec<SensitivityAnalysis>, ApiError> {
            Ok(ports
                .iter()
                .map(|port| SensitivityAnalysis {
                    port: port.clone(),
                    ..Default::default()
                })
                .collect())
        }
        async fn get_ports(&self) -> Result<Vec<Port>, ApiError> {
            self.port_calls.fetch_add(1, Ordering::SeqCst);
            let remaining = self.failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures.store(remaining - 1, Ordering::SeqCst);
                return Err(ApiError::Transport("timed out".to_string()));
            }
            Ok(self.ports.clone())
        }
        async fn get_vessels(&self) -> Result<Vec<ApiVessel>, ApiError> {
            Ok(Vec::new())
        }
    }

    fn flaky(failures: usize) -> FlakyApi {
        FlakyApi {
            failures: AtomicUsize::new(failures),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn load_dashboard_retries_until_success() {
        let mut dashboard = Dashboard::new(flaky(2));

        let state = load_dashboard(&mut dashboard, 3).await;

        assert!(state.is_ready());
        assert_eq!(dashboard.api().port_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn load_dashboard_gives_up_after_retries() {
        let mut dashboard = Dashboard::new(flaky(5));

        let state = load_dashboard(&mut dashboard, 1).await;

        assert!(matches!(state, DashboardState::Failed { .. }));
        assert_eq!(dashboard.api().port_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn sensitivity_posts_every_port() {
        let api = FlakyApi {
            ports: vec![
                Port {
                    name: "Santos".to_string(),
                    ..Default::default()
                },
                Port {
                    name: "Callao".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        let results = run_sensitivity(&api).await.unwrap();

        let names: Vec<_> = results.iter().map(|r| r.port.name.as_str()).collect();
        assert_eq!(names, vec!["Santos", "Callao"]);
    }

    #[tokio::test]
    async fn sensitivity_with_no_ports_is_empty() {
        let results = run_sensitivity(&FlakyApi::default()).await.unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn sensitivity_propagates_port_failure() {
        let err = run_sensitivity(&flaky(1)).await.unwrap_err();

        assert_eq!(err.to_string(), "cannot load ports");
    }

    #[tokio::test]
    async fn route_analysis_returns_api_results() {
        let plan = DischargePlan::new();

        let results = run_route_analysis(&FlakyApi::default(), &plan)
            .await
            .unwrap();

        let names: Vec<_> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Port X", "Port Y"]);
    }

    // =========================================================================
    // lead form tests
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

    fn fields() -> Vec<FormField> {
        vec![
            "Name=Ada".parse().unwrap(),
            "Company=Analytical Shipping".parse().unwrap(),
        ]
    }

    #[test]
    fn lead_form_keeps_field_order_and_consent() {
        let form = lead_form(&fields(), true);

        let names: Vec<_> = form.fields().iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["Name", "Company"]);
        assert!(form.consent());
    }

    #[tokio::test]
    async fn submit_lead_clears_form_on_success() {
        let mut form = lead_form(&fields(), true);

        let outcome = submit_lead(&FixedSubmitter(SubmissionOutcome::Success), &mut form).await;

        assert!(outcome.is_success());
        assert!(form.is_empty());
    }

    #[tokio::test]
    async fn submit_lead_keeps_form_on_transport_failure() {
        let mut form = lead_form(&fields(), false);
        let submitter = FixedSubmitter(SubmissionOutcome::TransportFailure("dns".to_string()));

        let outcome = submit_lead(&submitter, &mut form).await;

        assert_eq!(outcome.user_message(), GENERIC_SUBMISSION_ERROR);
        assert_eq!(form.field("Name"), Some("Ada"));
    }
}
