//! negafft — exact truncated FFT multiplication over Z/(2^N+1).

use anyhow::Result;
use negafft_cli::{app, config, errors};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let config = config::AppConfig::parse();
    if let Err(err) = app::run(&config) {
        eprintln!("Error: {err}");
        std::process::exit(errors::exit_code(&err));
    }
    Ok(())
}
