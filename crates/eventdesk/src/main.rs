//! EventDesk Inspector - Lists the dropdowns of an HTML page
//!
//! Usage: `eventdesk-inspect <file.html> [config.json]`

use std::fs;

use anyhow::{bail, Context, Result};
use eventdesk::{Config, Page};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(html_path) = args.next() else {
        bail!("usage: eventdesk-inspect <file.html> [config.json]");
    };

    let config = match args.next() {
        Some(path) => {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("failed to read config {}", path))?;
            Config::from_json(&json).with_context(|| format!("invalid config {}", path))?
        }
        None => Config::default(),
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("EventDesk inspector {}", eventdesk::VERSION);

    let html = fs::read_to_string(&html_path)
        .with_context(|| format!("failed to read {}", html_path))?;
    let page = Page::load(&html, &config).with_context(|| format!("failed to load {}", html_path))?;

    println!("{}", serde_json::to_string_pretty(&page.summary())?);
    Ok(())
}
