mod cmd;
mod output;
mod settings;

use callpanel_core::types::Office;
use clap::{Parser, Subcommand};
use cmd::action::{NetworkArgs, WireArgs};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "callpanel",
    about = "Operator console for the election results calls panel",
    version,
    propagate_version = true
)]
struct Cli {
    /// YAML config file (default: built-in defaults)
    #[arg(long, global = true, env = "CALLPANEL_CONFIG")]
    config: Option<PathBuf>,

    /// Server origin, e.g. http://localhost:8000
    #[arg(long, global = true, env = "CALLPANEL_URL")]
    base_url: Option<String>,

    /// Office whose calls page to drive: senate, house or governor
    #[arg(long, global = true, env = "CALLPANEL_OFFICE")]
    office: Option<Office>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the panel, keep it refreshed, and print every event until Ctrl-C
    Watch {
        /// Refresh interval in seconds (default: from config)
        #[arg(long)]
        interval: Option<u64>,
    },

    /// List the clickable controls on the current page
    Bindings,

    /// Click a control on the current page and wait for the refresh
    Click {
        /// `.class` or `#id`, e.g. `.accept-ap` or `#uncall-chamber`
        selector: String,
        /// Which match to click when several elements share the selector
        #[arg(long, default_value = "0")]
        index: usize,
    },

    /// Accept the wire-service call for a race
    Accept(WireArgs),

    /// Reject the wire-service call for a race
    Reject(WireArgs),

    /// Call a race for a result on the network's own authority
    CallNpr(NetworkArgs),

    /// Withdraw the network's call for a result
    UncallNpr(NetworkArgs),

    /// Call the chamber for a party, or `none` to uncall it
    CallChamber {
        /// dem, gop, or none
        party: String,
    },

    /// Check that the server is up
    Ping,

    /// Show or validate the resolved configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Watch { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = settings::resolve_config(cli.config.as_deref(), cli.base_url, cli.office)
        .and_then(|config| match cli.command {
            Commands::Watch { interval } => cmd::watch::run(config, interval, cli.json),
            Commands::Bindings => cmd::bindings::run(config, cli.json),
            Commands::Click { selector, index } => {
                cmd::click::run(config, &selector, index, cli.json)
            }
            Commands::Accept(args) => cmd::action::run(config, args.accept(), cli.json),
            Commands::Reject(args) => cmd::action::run(config, args.reject(), cli.json),
            Commands::CallNpr(args) => cmd::action::run(config, args.call(), cli.json),
            Commands::UncallNpr(args) => cmd::action::run(config, args.uncall(), cli.json),
            Commands::CallChamber { party } => cmd::action::run_chamber(config, &party, cli.json),
            Commands::Ping => cmd::ping::run(config, cli.json),
            Commands::Config { subcommand } => cmd::config::run(config, subcommand, cli.json),
        });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
