//! Runs the smoke tests against the configured service and exits non-zero if any case failed.
//!
//! Configuration comes from `smoke.toml` and `SMOKE_*` environment variables, log verbosity from
//! `RUST_LOG` (`info` by default).

use api_smoke::{run_suite, SmokeConfiguration};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let configuration = match SmokeConfiguration::load() {
        Ok(configuration) => configuration,
        Err(e) => {
            tracing::error!(error = %e, "Couldn't load the configuration");
            process::exit(2);
        }
    };

    match run_suite(&configuration) {
        Ok(report) => {
            println!("{}", report);
            process::exit(report.exit_code());
        }
        Err(e) => {
            tracing::error!(error = %e, "Couldn't run the smoke tests");
            process::exit(1);
        }
    }
}
