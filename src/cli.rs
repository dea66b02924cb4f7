use crate::commands;
use crate::config::Overrides;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "shadcn-deno-sync",
    version,
    about = "Mirror the shadcn/ui registry into a Deno source tree"
)]
struct Cli {
    /// Increase verbosity (-v, -vv). Uses RUST_LOG under the hood
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Defaults to `sync` when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Copy registry sources into the output tree, rewriting imports
    Sync {
        #[command(flatten)]
        paths: PathArgs,
        /// Prefix non-core external packages with the configured scheme
        #[arg(long)]
        rewrite_externals: bool,
        /// Print the import report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Report imports and pending rewrites without writing files
    Scan {
        #[command(flatten)]
        paths: PathArgs,
        #[arg(long)]
        rewrite_externals: bool,
        #[arg(long)]
        json: bool,
    },
    /// Remove the output tree
    Clean {
        #[command(flatten)]
        paths: PathArgs,
        /// Delete without confirmation
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Default)]
struct PathArgs {
    /// Path to the config file (defaults to ./shadcn-deno.toml when present)
    #[arg(long)]
    config: Option<String>,
    /// Registry directory to read from
    #[arg(long)]
    source: Option<PathBuf>,
    /// Output directory to write to
    #[arg(long)]
    out: Option<PathBuf>,
}

impl PathArgs {
    fn overrides(&self, rewrite_externals: bool) -> Overrides {
        Overrides {
            source: self.source.clone(),
            out: self.out.clone(),
            rewrite_externals,
        }
    }
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string());
    // a second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run_cli() -> Result<()> {
    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.verbose);

    match cli.command {
        None => commands::sync(None, &Overrides::default(), false)?,
        Some(Commands::Sync {
            paths,
            rewrite_externals,
            json,
        }) => commands::sync(
            paths.config.as_deref(),
            &paths.overrides(rewrite_externals),
            json,
        )?,
        Some(Commands::Scan {
            paths,
            rewrite_externals,
            json,
        }) => commands::scan(
            paths.config.as_deref(),
            &paths.overrides(rewrite_externals),
            json,
        )?,
        Some(Commands::Clean { paths, yes }) => {
            commands::clean(paths.config.as_deref(), &paths.overrides(false), yes)?
        }
    }

    Ok(())
}
