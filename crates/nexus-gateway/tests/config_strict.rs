#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use nexus_gateway::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
feeds:
  - id: "dashboard"
    amplitudes: { gdpGrowht: 0.1 } # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
feeds:
  - id: "dashboard"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);

    let feed = &cfg.feeds[0];
    assert_eq!(feed.id, "dashboard");
    assert_eq!(feed.period_ms, 5000);
    assert_eq!(feed.seed, None);
    assert_eq!(feed.initial.population, 218_541_065);
    assert_eq!(feed.amplitudes.security_level, 2.0);

    let spec = feed.spec();
    assert_eq!(spec.period, Duration::from_secs(5));
    assert_eq!(cfg.simulation.step_interval_ms, 500);
    assert_eq!(cfg.simulation.max_step, 10.0);
    assert_eq!(cfg.simulation.refresh_delay(), Duration::from_secs(2));
    assert_eq!(cfg.simulation.refresh.gdp_growth, 0.2);
    assert_eq!(cfg.simulation.refresh.unemployment, 0.1);
}

#[test]
fn shipped_config_parses() {
    let s = std::fs::read_to_string("../../nexus.yaml").unwrap();
    let cfg = config::load_from_str(&s).expect("shipped config must be valid");
    let ids: Vec<&str> = cfg.feeds.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, ["dashboard", "stats"]);
    assert_eq!(cfg.feeds[1].period_ms, 10000);
}

#[test]
fn wrong_version_rejected() {
    let bad = r#"
version: 2
feeds:
  - id: "dashboard"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn feeds_required_and_unique() {
    let empty = "version: 1\n";
    assert!(config::load_from_str(empty).is_err());

    let dup = r#"
version: 1
feeds:
  - id: "dashboard"
  - id: "dashboard"
    period_ms: 10000
"#;
    let err = config::load_from_str(dup).expect_err("must fail");
    assert!(err.to_string().contains("duplicate feed id"));
}

#[test]
fn period_out_of_range_rejected() {
    let bad = r#"
version: 1
feeds:
  - id: "dashboard"
    period_ms: 0
"#;
    assert!(config::load_from_str(bad).is_err());
}

#[test]
fn initial_snapshot_must_be_in_range() {
    let bad = r#"
version: 1
feeds:
  - id: "dashboard"
    initial: { population: 10, gdpGrowth: 1.0, unemployment: 5.0, securityLevel: 120.0 }
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("securityLevel"));
}

#[test]
fn negative_amplitude_rejected() {
    let bad = r#"
version: 1
feeds:
  - id: "dashboard"
    amplitudes: { unemployment: -0.5 }
"#;
    assert!(config::load_from_str(bad).is_err());
}

#[test]
fn simulation_section_validated() {
    let bad = r#"
version: 1
feeds:
  - id: "dashboard"
simulation:
  max_step: 0.0
"#;
    assert!(config::load_from_str(bad).is_err());
}

#[test]
fn refresh_settings_are_checked() {
    let bad_amp = r#"
version: 1
feeds:
  - id: "dashboard"
simulation:
  refresh: { gdpGrowth: 3.0 }
"#;
    let err = config::load_from_str(bad_amp).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");

    let bad_delay = r#"
version: 1
feeds:
  - id: "dashboard"
simulation:
  refresh_delay_ms: 0
"#;
    assert!(config::load_from_str(bad_delay).is_err());

    let typo = r#"
version: 1
feeds:
  - id: "dashboard"
simulation:
  refresh: { unemployement: 0.1 }
"#;
    assert!(config::load_from_str(typo).is_err());
}
