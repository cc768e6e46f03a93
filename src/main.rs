//! chef-deploy: keeps an EC2 fleet enrolled in Chef
//!
//! Scans every region for instances missing from the node inventory and
//! bootstraps them with `knife`, either once (`--one-shot`) or on a fixed
//! schedule.

use anyhow::Result;
use chef_deploy::aws::Ec2Fleet;
use chef_deploy::credentials::{Keystore, PasswordStore, PASSWORDS_FILE};
use chef_deploy::deploy::{Deployer, RetryPolicy};
use chef_deploy::inventory::KnifeInventory;
use chef_deploy::knife::KnifeCli;
use chef_deploy::prompt::{AutoDecline, ConsolePrompt, Prompt};
use chef_deploy::settings::Settings;
use chef_deploy::{scheduler, settings};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "chef-deploy")]
#[command(about = "Keeps an EC2 fleet enrolled in Chef")]
#[command(version)]
struct Args {
    /// Directory holding SSH keyfiles and the windows password store
    #[arg(long, env = "KEYFILE_LOCATION", default_value = "keys")]
    keyfile_location: PathBuf,

    /// Global log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Space-separated per-target log overrides, e.g. "aws_config:warn"
    #[arg(long, env = "OTHER_LOG_LEVELS", default_value = "")]
    other_log_levels: String,

    /// Run a single reconciliation pass and exit
    #[arg(long, env = "RUN_AND_EXIT")]
    one_shot: bool,

    /// Minutes between reconciliation passes in scheduled mode
    #[arg(long, env = "RUN_INTERVAL", default_value_t = 60)]
    run_interval: u64,

    /// Never prompt; decline passwords and escalations automatically
    #[arg(long, env = "NON_INTERACTIVE")]
    non_interactive: bool,
}

impl From<&Args> for Settings {
    fn from(args: &Args) -> Self {
        Settings::new(
            args.keyfile_location.clone(),
            args.one_shot,
            args.run_interval,
            args.non_interactive,
        )
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&e);
        std::process::exit(1);
    }
}

/// Print error in a user-friendly way
fn print_error(e: &anyhow::Error) {
    use std::io::Write;

    let mut stderr = std::io::stderr();
    let _ = writeln!(stderr, "\nError: {e}");

    let mut source = e.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "  Caused by: {cause}");
        source = cause.source();
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();

    let filter = settings::log_filter(&args.log_level, &args.other_log_levels)?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = Settings::from(&args);
    info!(
        version = env!("CARGO_PKG_VERSION"),
        keyfile_location = %settings.keyfile_location.display(),
        run_mode = ?settings.run_mode,
        "Starting chef-deploy"
    );

    if settings.non_interactive {
        run_with_prompt(settings, AutoDecline).await
    } else {
        run_with_prompt(settings, ConsolePrompt).await
    }
}

async fn run_with_prompt<P: Prompt>(settings: Settings, prompt: P) -> Result<()> {
    let deployer = Deployer {
        cloud: Ec2Fleet::new().await,
        inventory: KnifeInventory,
        knife: KnifeCli,
        prompt,
        keystore: Keystore::new(settings.keyfile_location.clone()),
        passwords: PasswordStore::new(settings.keyfile_location.join(PASSWORDS_FILE)),
        policy: RetryPolicy::default(),
    };

    scheduler::run(&deployer, settings.run_mode).await
}
