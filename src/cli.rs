use crate::inspect;
use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "opsbook", version)]
#[command(
    about = "Reconstruct and summarize operation event trees from logbook dumps",
    long_about = "opsbook reads a flat, timestamp-ordered NDJSON dump of logbook records for one operation, reconstructs the step/action/task tree implied by parent references and start/terminal pairing, and aggregates warning and error outcomes bottom-up."
)]
#[command(arg_required_else_help = true)]
#[command(after_long_help = "Examples:
  opsbook inspect operation.ndjson
  opsbook inspect operation.ndjson --json
  opsbook status operation.ndjson --log diagnostics.ndjson
  opsbook completion zsh > ~/.zsh/completions/_opsbook
  opsbook man > opsbook.1")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Reconstruct and print the event tree for one operation")]
    #[command(arg_required_else_help = true)]
    #[command(after_long_help = "Examples:
  opsbook inspect operation.ndjson
  opsbook inspect operation.ndjson --json")]
    Inspect {
        #[arg(value_name = "RECORDS_FILE", help = "NDJSON dump of logbook records")]
        records_file: PathBuf,
        #[arg(long, help = "Print the forest as JSON instead of text")]
        json: bool,
        #[arg(long, value_name = "PATH", help = "Append NDJSON diagnostics to file")]
        log: Option<PathBuf>,
    },
    #[command(about = "Aggregate warning/error outcomes and the terminal status")]
    #[command(arg_required_else_help = true)]
    #[command(after_long_help = "Examples:
  opsbook status operation.ndjson
  opsbook status operation.ndjson --config-root .")]
    Status {
        #[arg(value_name = "RECORDS_FILE", help = "NDJSON dump of logbook records")]
        records_file: PathBuf,
        #[arg(long, help = "Print the summary as JSON instead of text")]
        json: bool,
        #[arg(
            long,
            value_name = "DIR",
            help = "Directory holding .opsbook/config.toml (default: current directory)"
        )]
        config_root: Option<PathBuf>,
        #[arg(long, value_name = "PATH", help = "Append NDJSON diagnostics to file")]
        log: Option<PathBuf>,
    },
    #[command(
        about = "Generate shell completion script",
        long_about = "Generate shell completion script for your shell. Redirect output to your shell completion directory."
    )]
    #[command(arg_required_else_help = true)]
    Completion {
        #[arg(value_enum, value_name = "SHELL", help = "Target shell")]
        shell: Shell,
    },
    #[command(about = "Generate a man page")]
    Man {
        #[arg(
            long,
            value_name = "PATH",
            help = "Write man page to file (stdout when omitted)"
        )]
        output: Option<PathBuf>,
    },
}

pub fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Inspect {
            records_file,
            json,
            log,
        } => inspect::execute_inspect(inspect::InspectCommand {
            records_file,
            json,
            log,
        }),
        Commands::Status {
            records_file,
            json,
            config_root,
            log,
        } => inspect::execute_status(inspect::StatusCommand {
            records_file,
            json,
            config_root,
            log,
        }),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Commands::Man { output } => {
            let man = clap_mangen::Man::new(Cli::command());
            match output {
                Some(path) => {
                    let mut bytes = Vec::new();
                    man.render(&mut bytes)?;
                    fs::write(path, bytes)?;
                }
                None => {
                    man.render(&mut io::stdout())?;
                }
            }
            Ok(())
        }
    }
}
