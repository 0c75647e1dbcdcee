use anyhow::{Context, Result};
use gqload_config::GqloadConfig;
use gqload_http::GraphqlExecutor;
use gqload_runner::{LoadExecutor, RunSummary};
use gqload_scenarios::{find_scenario, OperationRegistry, ParameterPools};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Command-line overrides for a load run
#[derive(Debug, Default)]
pub struct RunOptions {
    pub scenario: Option<String>,
    pub vus: Option<u32>,
    pub duration: Option<u64>,
    pub iterations: Option<u64>,
    pub seed: Option<u64>,
    pub summary_json: Option<PathBuf>,
}

impl RunOptions {
    /// Apply the overrides onto the loaded configuration
    pub fn apply(&self, config: &mut GqloadConfig) {
        if let Some(ref scenario) = self.scenario {
            config.load.scenario = scenario.clone();
        }
        if let (Some(vus), Some(duration)) = (self.vus, self.duration) {
            config.load.set_constant(vus, Duration::from_secs(duration));
        }
        if self.iterations.is_some() {
            config.load.iterations = self.iterations;
        }
        if self.seed.is_some() {
            config.load.seed = self.seed;
        }
    }
}

/// Run the configured scenario and report. Returns the summary so the
/// caller can decide the exit code.
pub async fn handle_run(mut config: GqloadConfig, options: RunOptions) -> Result<RunSummary> {
    options.apply(&mut config);
    config
        .validate_all()
        .context("Configuration is invalid after applying command-line overrides")?;

    let scenario = find_scenario(&config.load.scenario).context("Failed to select scenario")?;
    let client = GraphqlExecutor::from_config(&config).context("Failed to create GraphQL client")?;

    info!(
        "Running scenario '{}' against {} with {} token(s)",
        scenario.name(),
        config.target.url,
        client.resolver().token_count()
    );

    let registry = OperationRegistry::builtin().context("Failed to build operation registry")?;
    let executor = LoadExecutor::new(
        Arc::new(client),
        Arc::new(registry),
        Arc::new(ParameterPools::from(&config.pools)),
    );
    let summary = executor
        .run(scenario, &config.load)
        .await
        .context("Load run failed")?;

    println!("{}", summary.render());

    if let Some(path) = options.summary_json {
        let json = summary.to_json().context("Failed to serialize run summary")?;
        fs::write(&path, json).with_context(|| format!("Failed to write summary to {:?}", path))?;
        println!("📝 Summary written to {:?}", path);
    }

    Ok(summary)
}
