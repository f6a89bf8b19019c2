mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vrtlens=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    match cli.command {
        cli::Command::Init { force } => {
            commands::init(force)?;
        }
        cli::Command::Analyze {
            image,
            json,
            overrides,
        } => {
            commands::analyze(&image, json, &overrides)?;
        }
        cli::Command::Compare {
            reference,
            test,
            output,
            json,
            overrides,
        } => {
            let code = commands::compare(&reference, &test, output.as_deref(), json, &overrides)?;
            std::process::exit(code);
        }
        cli::Command::Suite {
            reference_dir,
            test_dir,
            output,
            filter,
            parallel,
            overrides,
        } => {
            let args = commands::SuiteArgs {
                reference_dir,
                test_dir,
                output,
                filter,
                parallel: usize::from(parallel),
            };
            let code = commands::suite(args, &overrides).await?;
            std::process::exit(code);
        }
    }

    Ok(())
}
