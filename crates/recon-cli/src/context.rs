use std::sync::Arc;

use anyhow::Context;
use recon_client::{BackendOptions, HttpBackend};
use recon_config::ReconConfig;
use recon_resolve::Orchestrator;
use tokio_util::sync::CancellationToken;

/// Shared resources initialized once at startup.
pub struct AppContext {
    pub backend: Arc<HttpBackend>,
    pub orchestrator: Orchestrator,
    pub token: Option<String>,
}

impl AppContext {
    /// Build the HTTP backend and orchestrator from the loaded config.
    ///
    /// `token_override` (from `--token`) wins over `api.token`.
    pub fn init(config: ReconConfig, token_override: Option<String>) -> anyhow::Result<Self> {
        let api = config
            .require_api()
            .context("set api.base_url in .recon/config.toml or RECON_API__BASE_URL")?;
        let backend = Arc::new(
            HttpBackend::new(&BackendOptions::from(api))
                .context("failed to initialize the backend client")?,
        );
        let token = token_override
            .filter(|token| !token.trim().is_empty())
            .or_else(|| api.token().map(str::to_string));
        let orchestrator =
            Orchestrator::new(backend.clone()).with_budget(config.resolution.budget());

        Ok(Self {
            backend,
            orchestrator,
            token,
        })
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

/// Cancellation token fired by Ctrl-C.
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("received interrupt, abandoning resolution run");
            trigger.cancel();
        }
    });
    cancel
}

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &ReconConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &ReconConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();
    let mut warnings = Vec::new();

    if !config.api.is_configured() && has_env_prefix(&env_keys, "RECON_API") {
        warnings.push(
            "API config appears default while RECON_API* env vars exist. Use double underscores (example: RECON_API__BASE_URL)."
                .to_string(),
        );
    }

    if has_env_prefix(&env_keys, "RECON_RESOLUTION_")
        && !has_env_prefix(&env_keys, "RECON_RESOLUTION__")
    {
        warnings.push(
            "RECON_RESOLUTION* env vars are ignored without a double underscore (example: RECON_RESOLUTION__ROUNDS)."
                .to_string(),
        );
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}
