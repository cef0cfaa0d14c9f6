//! Binary entrypoint for the Bartershop CLI.
//!
//! Commands:
//! - `init` - write a starter `config.toml`
//! - `types` - print the shop and sign types that are available after capability checks
//! - `replay <script.json>` - run a scripted event sequence and print one JSON decision per step
//!
//! See the library crate docs for module-level details: `bartershop::`.
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};

use bartershop::availability::TypeAvailabilityManager;
use bartershop::config::Config;
use bartershop::replay::{parse_script, Replay};

#[derive(Parser)]
#[command(name = "bartershop")]
#[command(about = "Sign shop interaction and container validation engine")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init,
    /// Show enabled shop and sign types
    Types {
        /// Treat the economy integration as present regardless of config
        #[arg(long)]
        economy: bool,
    },
    /// Replay a JSON script of shop events
    Replay {
        /// Path to the script file
        script: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Init runs before a config exists
    let pre_config = match cli.command {
        Commands::Init => None,
        _ => Config::load(&cli.config).await.ok(),
    };
    init_logging(&pre_config, cli.verbose);

    match cli.command {
        Commands::Init => {
            info!("Initializing new shop configuration");
            if std::path::Path::new(&cli.config).exists() {
                warn!("{} already exists; leaving it untouched", cli.config);
                return Ok(());
            }
            Config::create_default(&cli.config).await?;
            println!("Created default configuration at {}", cli.config);
        }
        Commands::Types { economy } => {
            let config = config_or_default(pre_config, &cli.config);
            let mut settings = config.type_settings();
            settings.economy_available |= economy;
            let availability = TypeAvailabilityManager::new(&settings);

            println!(
                "Economy: {}",
                if availability.economy_available() { "available" } else { "not available" }
            );
            println!("Shop types:");
            for shop_type in bartershop::shop::ShopType::ALL {
                let status = availability.validate_shop_type(shop_type);
                match status.reason() {
                    None => println!("  {:<8} enabled", shop_type),
                    Some(reason) => println!("  {:<8} {}", shop_type, reason),
                }
            }
            println!("Sign types:");
            for sign_type in bartershop::shop::SignType::ALL {
                let enabled = availability.is_sign_type_available(sign_type);
                println!(
                    "  {:<12} {}",
                    sign_type,
                    if enabled { "enabled" } else { "disabled" }
                );
            }
        }
        Commands::Replay { script } => {
            let config = config_or_default(pre_config, &cli.config);
            let text = tokio::fs::read_to_string(&script)
                .await
                .map_err(|e| anyhow!("Failed to read script {}: {}", script, e))?;
            let steps = parse_script(&text)?;
            info!("Replaying {} step(s) from {}", steps.len(), script);

            let mut replay = Replay::from_config(&config);
            for step in steps {
                let result = replay.run_step(step);
                println!("{}", serde_json::to_string(&result)?);
            }
            let idle = replay
                .router()
                .prune_idle_sessions(config.sessions.idle_timeout_minutes);
            if !idle.is_empty() {
                info!("Swept {} idle session(s)", idle.len());
            }
            replay.router().shutdown();
        }
    }

    Ok(())
}

fn config_or_default(config: Option<Config>, path: &str) -> Config {
    config.unwrap_or_else(|| {
        warn!("No usable config at {}; using defaults", path);
        Config::default()
    })
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity wins over the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|cfg| cfg.logging.level.parse().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config.as_ref().and_then(|cfg| cfg.logging.file.clone());
    match log_file.and_then(|file| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(file)
            .ok()
    }) {
        Some(f) => {
            let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
            // Echo to the console only when attached to a terminal
            let is_tty = atty::is(atty::Stream::Stderr);
            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());
                if let Ok(mut guard) = write_mutex.lock() {
                    let _ = writeln!(guard, "{}", line);
                }
                if is_tty {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
        }
        None => {
            builder.format(|fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
            });
        }
    }
    let _ = builder.try_init();
}
