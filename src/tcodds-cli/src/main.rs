mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::*;
use commands::configure::ConfigUpdate;

/// Log filter used when RUST_LOG is unset
fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "tcodds=warn,tcodds_cli=warn",
        1 => "tcodds=debug,tcodds_cli=debug",
        _ => "tcodds=trace,tcodds_cli=trace",
    }
}

fn init_tracing(verbose: u8) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(verbose).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Solve {
            tc,
            monster_level,
            calc,
            output,
        } => {
            commands::solve::solve(tc, monster_level, &calc, output)?;
        }

        Commands::Item {
            tc,
            monster_level,
            class,
            calc,
            output,
        } => {
            commands::solve::item(tc, monster_level, class, &calc, output)?;
        }

        Commands::Quality {
            class,
            monster_level,
            magic_find,
            catalog,
            output,
        } => {
            commands::inspect::quality(
                class,
                monster_level,
                magic_find,
                catalog.as_deref(),
                output,
            )?;
        }

        Commands::Show { tc, catalog } => {
            commands::inspect::show(tc, catalog.as_deref())?;
        }

        Commands::Configure {
            catalog,
            magic_find,
            players,
            show,
        } => {
            let update = ConfigUpdate {
                catalog,
                magic_find,
                players,
            };
            commands::configure::handle(update, show)?;
        }
    }

    Ok(())
}
