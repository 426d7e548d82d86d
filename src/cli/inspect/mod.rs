//! Inspect command - validates the configured artifacts and prints a summary

use clap::Args;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::infrastructure::services::ScoringService;

#[derive(Args, Debug, Default)]
pub struct InspectArgs {
    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct Summary {
    customers: usize,
    features: Vec<String>,
    expected_value: f64,
    sample_seed: u64,
}

impl Summary {
    fn new(service: &ScoringService, config: &AppConfig) -> Self {
        Self {
            customers: service.store().len(),
            features: service.store().feature_names().to_vec(),
            expected_value: service.expected_value(),
            sample_seed: config.explanation.sample_seed,
        }
    }

    fn render(&self) -> String {
        let mut out = format!(
            "customers:      {}\nexpected value: {}\nsample seed:    {}\nfeatures ({}):\n",
            self.customers,
            self.expected_value,
            self.sample_seed,
            self.features.len()
        );

        for name in &self.features {
            out.push_str("  ");
            out.push_str(name);
            out.push('\n');
        }

        out
    }
}

/// Build the scoring state exactly as `serve` would, without binding a port
pub fn run(args: InspectArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    // Diagnostics go to stderr so stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let service = crate::build_scoring_service(&config)?;
    let summary = Summary::new(&service, &config);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", summary.render());
    }

    Ok(())
}
