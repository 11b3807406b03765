use anyhow::{Context, Result};
use clap::Parser;
use rephrase::monitor::utils;
use rephrase::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rephrase", version)]
#[command(about = "Search for a passphrase by testing mask-generated candidates against an external unlock command")]
#[command(after_help = mask_help())]
struct Cli {
    /// Mask mixing literal characters and charset tokens
    #[arg(short, long, required_unless_present = "config")]
    mask: Option<String>,

    /// Verifier command profile
    #[arg(short, long, value_enum, required_unless_present = "config")]
    profile: Option<Profile>,

    /// Parameter passed to the verifier command. For gpg-key, the private
    /// key name; for luks, the device
    #[arg(short = 'i', long, required_unless_present = "config")]
    param1: Option<String>,

    /// Custom charset ?1
    #[arg(short = '1', long, default_value = "")]
    custom_charset1: String,

    /// Custom charset ?2
    #[arg(short = '2', long, default_value = "")]
    custom_charset2: String,

    /// Custom charset ?3
    #[arg(short = '3', long, default_value = "")]
    custom_charset3: String,

    /// Custom charset ?4
    #[arg(short = '4', long, default_value = "")]
    custom_charset4: String,

    /// Once all attempts are exhausted, append this mask and restart
    #[arg(short = 'x', long)]
    increment_mask: Option<String>,

    /// Number of increments done total
    #[arg(short = 'c', long, default_value_t = rephrase::DEFAULT_INCREMENT_COUNT)]
    increment_count: u32,

    /// Number of parallel verifier processes
    #[arg(short = 'n', long)]
    nproc: Option<usize>,

    /// Load the search configuration from a JSON file instead of flags
    #[arg(long, conflicts_with_all = ["mask", "profile", "param1"])]
    config: Option<String>,

    /// Suppress the progress bar
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn into_config(self) -> Result<SearchConfig> {
        if let Some(path) = &self.config {
            return SearchConfig::from_file(path)
                .with_context(|| format!("failed to load config from {path}"));
        }

        Ok(SearchConfig {
            mask: self.mask.context("--mask is required")?,
            profile: self.profile.context("--profile is required")?,
            param: self.param1.context("--param1 is required")?,
            custom_charsets: [
                self.custom_charset1,
                self.custom_charset2,
                self.custom_charset3,
                self.custom_charset4,
            ],
            increment_mask: self.increment_mask,
            increment_count: self.increment_count,
            workers: self.nproc.unwrap_or_else(num_cpus::get),
        })
    }
}

fn mask_help() -> String {
    let mut help = String::from("Charset tokens:\n");
    for (token, expansion) in CharsetTable::default().descriptions() {
        let shown = if expansion.len() > 40 {
            format!("{}...", &expansion[..40])
        } else {
            expansion.to_string()
        };
        help.push_str(&format!("  {token}  {shown}\n"));
    }
    help.push_str("  ?-  the next literal or token is optional\n");
    help
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let quiet = cli.quiet;
    let config = cli.into_config()?;

    let verifier = config.profile.verifier(&config.param);
    info!(profile = config.profile.as_str(), workers = config.workers, "starting search");

    let monitor = (!quiet).then(|| {
        Arc::new(SearchMonitor::new(MonitorConfig {
            show_progress_bar: true,
        }))
    });

    let start = Instant::now();
    let outcome = run_search(&config, verifier, monitor.clone())?;
    let elapsed = start.elapsed();

    match outcome {
        Outcome::Success {
            passphrase,
            attempts,
            round,
        } => {
            if let Some(monitor) = &monitor {
                monitor.finish("found");
            }
            println!("\nsuccess:");
            println!("{passphrase}");
            println!(
                "\n{} attempts over {} round(s) in {}",
                utils::format_number(attempts),
                round + 1,
                utils::format_duration(elapsed)
            );
        }
        Outcome::Exhausted { attempts, rounds } => {
            if let Some(monitor) = &monitor {
                monitor.finish("exhausted");
            }
            println!(
                "exhausted: no passphrase found after {} attempts over {} round(s) in {}",
                utils::format_number(attempts),
                rounds,
                utils::format_duration(elapsed)
            );
        }
    }

    Ok(())
}
