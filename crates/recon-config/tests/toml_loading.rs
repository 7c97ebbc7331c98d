//! Integration tests for TOML configuration loading.
//!
//! Uses `figment::Jail` for sandboxed env var and file manipulation.

use std::time::Duration;

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use recon_config::ReconConfig;

#[test]
fn loads_api_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[api]
base_url = "https://backend.example.org/api"
local_base_url = "http://localhost:8080/api"
token = "toml-token"
request_timeout_secs = 5
"#,
        )?;

        let config: ReconConfig = Figment::from(Serialized::defaults(ReconConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.api.base_url, "https://backend.example.org/api");
        assert_eq!(config.api.local_base_url, "http://localhost:8080/api");
        assert_eq!(config.api.token(), Some("toml-token"));
        assert_eq!(config.api.request_timeout_secs, 5);
        assert_eq!(config.api.user_agent, "recon/0.1");
        Ok(())
    });
}

#[test]
fn loads_resolution_bounds_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r"
[resolution]
rounds = 3
round_delay_ms = 250
poll_attempts = 10
poll_interval_ms = 500
",
        )?;

        let config: ReconConfig = Figment::from(Serialized::defaults(ReconConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        let budget = config.resolution.budget();
        assert_eq!(budget.rounds, 3);
        assert_eq!(budget.round_delay, Duration::from_millis(250));
        assert_eq!(budget.poll_attempts, 10);
        assert_eq!(budget.poll_interval, Duration::from_millis(500));
        // untouched fields keep their defaults
        assert_eq!(budget.max_attempts, 128);
        assert_eq!(budget.deadline, Duration::from_secs(90));
        Ok(())
    });
}

#[test]
fn project_config_is_picked_up_by_load() {
    Jail::expect_with(|jail| {
        jail.create_dir(".recon")?;
        jail.create_file(
            ".recon/config.toml",
            r#"
[api]
base_url = "https://project.example.org"
"#,
        )?;

        let config = ReconConfig::load().expect("config loads");
        assert_eq!(config.api.base_url, "https://project.example.org");
        Ok(())
    });
}

#[test]
fn env_var_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.set_env("RECON_API__BASE_URL", "https://from-env.example.org");
        jail.create_file(
            "config.toml",
            r#"
[api]
base_url = "https://from-toml.example.org"
token = "kept"
"#,
        )?;

        let config: ReconConfig = Figment::from(Serialized::defaults(ReconConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("RECON_").split("__"))
            .extract()?;

        assert_eq!(config.api.base_url, "https://from-env.example.org");
        assert_eq!(config.api.token, "kept");
        Ok(())
    });
}

#[test]
fn invalid_bounds_fail_load() {
    Jail::expect_with(|jail| {
        jail.set_env("RECON_RESOLUTION__ROUNDS", "0");

        let err = ReconConfig::load().expect_err("zero rounds must be rejected");
        assert!(err.to_string().contains("resolution.rounds"));
        Ok(())
    });
}

/// Typo'd env var keys are silently ignored by figment.
#[test]
fn typo_env_var_silently_ignored() {
    Jail::expect_with(|jail| {
        jail.set_env("RECON_API__BASE_URLL", "https://typo.example.org");

        let config = ReconConfig::load().expect("config loads");
        assert!(
            config.api.base_url.is_empty(),
            "typo'd env var should be silently ignored by figment"
        );
        Ok(())
    });
}
