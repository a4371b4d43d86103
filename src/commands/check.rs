use crate::cli::Cli;
use crate::domain::errors::CheckError;
use crate::services::clock::SystemClock;
use crate::services::config::{self, FileConfig};
use crate::services::monitor;
use crate::services::output::print_report;
use crate::services::transport::{HttpTransport, RetryingTransport};

pub fn handle_check(cli: &Cli, file: &FileConfig) -> anyhow::Result<u8> {
    let settings = config::resolve(&cli.check, file)?;
    tracing::info!(
        target_url = %settings.target_url,
        fallbacks = settings.fallback_urls.len(),
        canonical = settings.pillars.canonical,
        content = settings.pillars.content,
        track_state = settings.track_state,
        "starting check"
    );

    let clock = SystemClock;
    let http = HttpTransport::new(settings.timeout)
        .map_err(|e| CheckError::Config(format!("building HTTP client: {e}")))?;
    let transport = RetryingTransport::new(http, settings.retry, &clock);

    let report = monitor::run_check(&settings, &transport, &clock)?;
    print_report(cli.json, &report)?;
    Ok(report.exit_code)
}
