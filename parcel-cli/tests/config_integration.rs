//! Reads the fixture config from disk and wires it into a plan.

use std::path::{Path, PathBuf};

use parcel_cli::cli::PlanArgs;
use parcel_cli::commands;
use parcel_cli::config::{AppConfig, ENV_API_TOKEN, ENV_API_URL};
use parcel_data::CatalogLoader;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("parcel.toml")
}

#[test]
fn test_load_fixture_config() {
    let config = AppConfig::load(Some(&fixture_path())).expect("fixture config should load");

    assert_eq!(config.api.base_url, "https://analysis.example.com");
    assert_eq!(config.api.login_route, "/auth/login");
    assert_eq!(config.api.request_timeout_secs, Some(20));
    assert_eq!(config.api.token, None);
    assert_eq!(
        config.form.endpoint.as_deref(),
        Some("https://forms.example.com/exec")
    );
    assert_eq!(config.catalog.vessels_csv, None);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_env_overrides_fixture_values() {
    let mut config = AppConfig::load(Some(&fixture_path())).unwrap();

    config.apply_env_overrides(|key| match key {
        ENV_API_URL => Some("http://localhost:9999".to_string()),
        ENV_API_TOKEN => Some("from-env".to_string()),
        _ => None,
    });

    assert_eq!(config.api.base_url, "http://localhost:9999");
    assert_eq!(config.api.token.as_deref(), Some("from-env"));
    assert_eq!(config.api.client_config().login_route, "/auth/login");
}

#[test]
fn test_configured_port_catalog_drives_plan() {
    let config = AppConfig::load(Some(&fixture_path())).unwrap();
    // Relative catalog paths resolve from the crate directory under test.
    let ports_csv = config
        .catalog
        .ports_csv
        .as_deref()
        .map(|path| Path::new(env!("CARGO_MANIFEST_DIR")).join(path));
    let catalog = CatalogLoader::load_catalog(ports_csv.as_deref(), None).unwrap();
    let args = PlanArgs {
        port: Some("durban".to_string()),
        ..Default::default()
    };

    let (plan, totals) = commands::build_plan(&catalog, &args).unwrap();

    // 7 rows of 4 gangs at 12,500
    assert_eq!(totals.total_gang_cost, dec!(350000));
    assert_eq!(plan.vessel().discharge, dec!(4.5));
    // 2.95 + 0.21
    assert_eq!(totals.grand_total, dec!(3.16));
}
