use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{debug, warn};

use parcel_cli::cli::{Cli, Command};
use parcel_cli::commands;
use parcel_cli::config::AppConfig;
use parcel_cli::logging;
use parcel_cli::report::{
    CatalogReport, DashboardReport, PlanReport, PortsReport, RouteAnalysisReport, SensitivityReport,
    VesselsReport, health_report,
};
use parcel_core::dashboard::{Dashboard, DashboardState};
use parcel_core::{ApiError, MaritimeApi, Session};
use parcel_data::CatalogLoader;
use parcel_http::{HttpLeadFormSubmitter, HttpMaritimeApi};

// ─── setup ───────────────────────────────────────────────────────────────────

/// Config file, then environment, then command line flags.
fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_process_env();
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(token) = &cli.token {
        config.api.token = Some(token.clone());
    }
    Ok(config)
}

fn api_client(config: &AppConfig) -> Result<HttpMaritimeApi> {
    let session = match &config.api.token {
        Some(token) => Session::with_token(token.as_str()),
        None => Session::new(),
    };
    HttpMaritimeApi::new(config.api.client_config(), session).context("cannot build API client")
}

/// Tells the user where to sign in again after a 401.
fn report_redirect(api: &HttpMaritimeApi) {
    if let Some(route) = api.session().take_redirect() {
        warn!(login_route = %route, "session expired");
        eprintln!("Session expired. Sign in again at {}{}", api.config().base_url, route);
    }
}

fn api_result<T>(
    api: &HttpMaritimeApi,
    result: Result<T, ApiError>,
    what: &str,
) -> Result<T> {
    report_redirect(api);
    result.with_context(|| format!("{what} failed"))
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    logging::init_logging(&config.logging.level, config.logging.file.as_deref())?;
    debug!(base_url = %config.api.base_url, "configuration resolved");

    match cli.command {
        Command::Plan(args) => {
            let catalog = CatalogLoader::load_catalog(
                config.catalog.ports_csv.as_deref(),
                config.catalog.vessels_csv.as_deref(),
            )?;
            let (plan, totals) = commands::build_plan(&catalog, &args)?;
            print!(
                "{}",
                PlanReport {
                    plan: &plan,
                    totals: &totals,
                }
            );
        }

        Command::Dashboard { retries } => {
            let mut dashboard = Dashboard::new(api_client(&config)?);
            let state = commands::load_dashboard(&mut dashboard, retries).await;
            report_redirect(dashboard.api());
            match state {
                DashboardState::Ready(data) => print!("{}", DashboardReport(&data)),
                DashboardState::Failed { message, cause } => {
                    eprintln!("{message}");
                    return Err(cause).context("dashboard load failed");
                }
                DashboardState::Loading => bail!("dashboard load did not finish"),
            }
        }

        Command::Health => {
            let api = api_client(&config)?;
            let health = api_result(&api, api.health_check().await, "health check")?;
            println!("{}", health_report(&health));
        }

        Command::Ports => {
            let api = api_client(&config)?;
            let ports = api_result(&api, api.get_ports().await, "port listing")?;
            print!("{}", PortsReport(&ports));
        }

        Command::Vessels => {
            let api = api_client(&config)?;
            let vessels = api_result(&api, api.get_vessels().await, "vessel listing")?;
            print!("{}", VesselsReport(&vessels));
        }

        Command::Sensitivity => {
            let api = api_client(&config)?;
            let results = commands::run_sensitivity(&api).await;
            report_redirect(&api);
            print!("{}", SensitivityReport(&results?));
        }

        Command::AnalyzeRoutes(args) => {
            let catalog = CatalogLoader::load_catalog(
                config.catalog.ports_csv.as_deref(),
                config.catalog.vessels_csv.as_deref(),
            )?;
            let (plan, _) = commands::build_plan(&catalog, &args)?;
            let api = api_client(&config)?;
            let analyses = commands::run_route_analysis(&api, &plan).await;
            report_redirect(&api);
            print!("{}", RouteAnalysisReport(&analyses?));
        }

        Command::SubmitLead {
            fields,
            consent,
            endpoint,
        } => {
            let Some(endpoint) = endpoint.or(config.form.endpoint) else {
                bail!("no lead form endpoint; set [form] endpoint or pass --endpoint");
            };
            let submitter = HttpLeadFormSubmitter::new(endpoint);
            let mut form = commands::lead_form(&fields, consent);
            let outcome = commands::submit_lead(&submitter, &mut form).await;
            println!("{}", outcome.user_message());
            if !outcome.is_success() {
                bail!("lead form submission failed");
            }
        }

        Command::Catalog { search } => {
            let catalog = CatalogLoader::load_catalog(
                config.catalog.ports_csv.as_deref(),
                config.catalog.vessels_csv.as_deref(),
            )?;
            print!(
                "{}",
                CatalogReport {
                    catalog: &catalog,
                    search: search.as_deref(),
                }
            );
        }
    }

    Ok(())
}
