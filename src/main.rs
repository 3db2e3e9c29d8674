use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use faultline::{is_crash_log_name, util};

#[derive(Parser)]
#[command(name = "faultline", about = "Inspect persisted crash logs")]
struct Cli {
    /// Crash log directory (default: ~/.faultline/crash)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List crash logs, oldest first
    List {
        /// Show only the most recent N logs
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print one crash log
    Show {
        /// Crash log file name
        name: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let dir = cli.dir.unwrap_or_else(util::crash_logs_dir);

    match cli.command {
        Command::List { limit } => {
            let mut names = crash_log_names(&dir)?;
            if let Some(limit) = limit {
                let skip = names.len().saturating_sub(limit);
                names.drain(..skip);
            }
            for name in names {
                println!("{name}");
            }
        }
        Command::Show { name } => {
            if !is_crash_log_name(&name) {
                bail!("'{name}' is not a crash log name");
            }
            let path = dir.join(&name);
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            print!("{contents}");
        }
    }

    Ok(())
}

/// Crash log file names in `dir`, sorted ascending. The fixed name format
/// makes lexicographic order creation order.
fn crash_log_names(dir: &PathBuf) -> Result<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e).with_context(|| format!("failed to read {}", dir.display())),
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| is_crash_log_name(name))
        .collect();
    names.sort();
    Ok(names)
}
