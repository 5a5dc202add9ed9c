// boardwatch entry point.
// Loads configuration, wires the fetch stack and the quota poller, then runs the TUI.

use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};

use boardwatch::app::App;
use boardwatch::cancel::CancelHandle;
use boardwatch::config::{self, Config};
use boardwatch::fetch::FetchOrchestrator;
use boardwatch::github::GitHubClient;
use boardwatch::logging;
use boardwatch::rate_limit::spawn_rate_limit_poller;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "boardwatch exited with an error");
            eprintln!("boardwatch: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> boardwatch::Result<()> {
    let config = Config::from_env()?;
    let log_path = logging::init(&config.log_filter);
    let token = config::resolve_token()?;

    let client = Arc::new(GitHubClient::from_config(&config, &token)?);
    let orchestrator = Arc::new(FetchOrchestrator::from_config(client.clone(), &config));
    info!(org = %config.org, log = ?log_path, "starting dashboard");

    let runtime = tokio::runtime::Runtime::new()?;
    let (poller_handle, poller_token) = CancelHandle::new();

    let (result, poller) = {
        let _enter = runtime.enter();
        let poller = spawn_rate_limit_poller(
            orchestrator.context().clone(),
            client,
            config.rate_poll_interval,
            poller_token,
        );

        let mut terminal = ratatui::try_init()?;
        let result = App::new(orchestrator).run(&mut terminal);
        ratatui::restore();
        (result, poller)
    };

    poller_handle.cancel();
    if let Err(e) = runtime.block_on(poller) {
        error!(error = %e, "rate limit poller panicked");
    }

    result?;
    info!("dashboard closed");
    Ok(())
}
