use ai_json::cli::{execute_command, get_log_level, Cli};
use ai_json::config::load_config;
use anyhow::Context;
use clap::Parser;
use std::io::Write;
use tracing::{debug, error, trace};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let project_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => fail(anyhow::Error::new(e).context("resolve working directory")),
    };
    let explicit = cli.command.as_ref().and_then(|c| c.config_path());
    let config = match load_config(explicit.map(|p| p.as_path()), &project_dir)
        .await
        .context("config error")
    {
        Ok(config) => config,
        Err(e) => fail(e),
    };

    // -v flags win over the configured level
    let log_level = match (cli.verbose, config.log_level.as_deref()) {
        (0, Some(level)) => level,
        (verbose, _) => get_log_level(verbose),
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .with_target(cli.verbose >= 2) // Show target module for -vv and above
        .with_thread_ids(cli.verbose >= 3) // Show thread IDs for -vvv
        .with_line_number(cli.verbose >= 3) // Show line numbers for -vvv
        .init();

    debug!("ai-json started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    let mut report = Vec::new();
    let outcome = match execute_command(cli.command, &config, &mut report).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Fatal error: {:#}", e);
            fail(e)
        }
    };

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = stdout.write_all(&report).and_then(|()| stdout.flush()) {
        fail(anyhow::Error::new(e).context("write report"));
    }
    std::process::exit(outcome.exit_code());
}

fn fail(e: anyhow::Error) -> ! {
    eprintln!("Error: {e:#}");
    std::process::exit(2);
}
