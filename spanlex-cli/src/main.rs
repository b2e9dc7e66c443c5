use clap::Parser;
use spanlex_cli::commands::Commands;
use spanlex_cli::handlers::*;
use spanlex_cli::{SpanlexCliContext, output_error_json};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

#[derive(Parser)]
#[command(name = "spanlex-cli")]
#[command(about = "Fuzzy entity extraction from the command line", long_about = None)]
#[command(version = spanlex::VERSION)]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Rule table file (JSON)
    #[arg(long, short, global = true)]
    rules: Option<PathBuf>,

    /// Output format (table, json) - use json for tool integration
    #[arg(long, short, default_value = "table", global = true)]
    output: String,

    /// Verbose output (debug level logging)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Quiet mode (suppress all logging output)
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli_args = Cli::parse();

    let output_format = cli_args.output.clone();

    let log_level = if cli_args.quiet || output_format == "json" {
        Level::ERROR
    } else if cli_args.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match run(cli_args, &output_format) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output_error_json(&e, &output_format);
            ExitCode::FAILURE
        }
    }
}

fn run(cli_args: Cli, output_format: &str) -> spanlex::Result<()> {
    match cli_args.command {
        Commands::Version => {
            println!("spanlex CLI v{}", spanlex::VERSION);
            Ok(())
        }

        Commands::Distance(args) => handle_distance_command(args, output_format),

        Commands::Search(args) => handle_search_command(args, output_format),

        Commands::Extract(args) => {
            let ctx =
                SpanlexCliContext::new(cli_args.config.as_deref(), cli_args.rules.as_deref())?;
            handle_extract_command(args, &ctx, output_format)
        }

        Commands::Rules(cmd) => {
            let mut ctx =
                SpanlexCliContext::new(cli_args.config.as_deref(), cli_args.rules.as_deref())?;
            handle_rules_command(cmd, &mut ctx, output_format)
        }
    }
}
