//! foo-mvc CLI
//!
//! Command-line tool for checking route tables and resolving paths.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use foo_router::{Resolution, ResolveOptions, RouteTable};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Route table tooling for foo-mvc.
#[derive(Parser)]
#[command(name = "foo-mvc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Route table file.
    #[arg(short, long, env = "FOO_MVC_ROUTES", default_value = "routes.ini")]
    routes: PathBuf,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the route table and report problems.
    Check,

    /// Resolve request paths against the route table.
    Resolve {
        /// Paths to resolve.
        #[arg(required = true)]
        paths: Vec<String>,

        /// Join path segments into a target when no route matches.
        #[arg(short, long)]
        fallback: bool,

        /// Separator for the fallback target.
        #[arg(short, long, default_value_t = '_')]
        join: char,

        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List compiled routes.
    Routes {
        /// Print the route tree as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    run(cli, &mut io::stdout().lock())
}

fn run(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let table = RouteTable::from_file(&cli.routes)
        .with_context(|| format!("failed to load {}", cli.routes.display()))?;
    let tree = table
        .compile()
        .with_context(|| format!("failed to compile {}", cli.routes.display()))?;

    match cli.command {
        Commands::Check => {
            let unbound = tree.unbound_placeholders();
            for issue in &unbound {
                warn!(
                    pattern = %issue.pattern,
                    placeholder = %issue.placeholder,
                    "target placeholder is never bound by its pattern"
                );
            }
            info!(
                "{}: {} routes, {} integrity warnings",
                cli.routes.display(),
                tree.len(),
                unbound.len()
            );
        }

        Commands::Resolve {
            paths,
            fallback,
            join,
            json,
        } => {
            let options = ResolveOptions::new().with_fallback(fallback).with_join(join);
            for path in &paths {
                let resolution = tree.resolve_with(path, &options);
                if json {
                    writeln!(
                        out,
                        "{}",
                        serde_json::json!({ "path": path, "resolution": resolution })
                    )?;
                } else {
                    let shown = resolution.target().unwrap_or("<unresolved>");
                    let kind = match resolution {
                        Resolution::Fallback { .. } => " (fallback)",
                        _ => "",
                    };
                    writeln!(out, "{path} -> {shown}{kind}")?;
                }
            }
        }

        Commands::Routes { json } => {
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&tree)?)?;
            } else {
                for def in tree.routes() {
                    let pattern = if def.pattern.is_empty() {
                        "(default)"
                    } else {
                        def.pattern.as_str()
                    };
                    writeln!(out, "{pattern:<40} {}", def.target)?;
                }
            }
        }
    }

    Ok(())
}
