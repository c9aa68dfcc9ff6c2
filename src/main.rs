use std::io;
use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use config::{Overrides, Settings, DEFAULT_CONFIG_FILE};
use log::{error, info};
use pipeline::PipelineError;

mod bus_line;
mod config;
mod pipeline;
mod profit;
mod rank;
mod record;
mod report;

#[derive(Parser, Debug)]
#[command(
    version,
    author,
    about = "Ranks bus lines by daily profit under a tiered subsidy model and writes a report"
)]
struct Cli {
    #[arg(
        value_name = "INPUT_FILE",
        conflicts_with = "input",
        help = "The bus line data file. Same as --input."
    )]
    input_file: Option<PathBuf>,

    #[arg(
        short = 'i',
        long,
        value_name = "FILE",
        help = "The bus line data file (default: from config)."
    )]
    input: Option<PathBuf>,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "The file to write the report to (default: from config)."
    )]
    output: Option<PathBuf>,

    #[arg(short = 's', long = "no-screen", help = "Disable output to screen.")]
    no_screen: bool,

    #[arg(short = 'f', long = "no-file", help = "Disable output to file.")]
    no_file: bool,

    #[arg(
        short = 'c',
        long,
        default_value = DEFAULT_CONFIG_FILE,
        help = "The key=value configuration file."
    )]
    config: PathBuf,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            input_file: self.input.clone().or_else(|| self.input_file.clone()),
            output_file: self.output.clone(),
            console_output: self.no_screen.then_some(false),
            file_output: self.no_file.then_some(false),
        }
    }
}

fn exit_code(err: &PipelineError) -> i32 {
    match err {
        PipelineError::SourceUnreadable { .. } => 1,
        PipelineError::EmptyResultSet { .. } => 2,
        PipelineError::SinkUnwritable { .. } => 3,
        PipelineError::ConsoleWrite(_) => 4,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("LOG", "info")).init();
    let cli = Cli::parse();

    let settings = Settings::resolve(&cli.config, cli.overrides()).unwrap_or_else(|it| {
        error!("Could not load configuration from {}: {}", cli.config.display(), it);
        exit(1);
    });

    let stdout = io::stdout();
    match pipeline::run(&settings, &mut stdout.lock()) {
        Ok(report) => info!(
            "All done: {} lines ranked, {} records rejected",
            report.lines.len(),
            report.rejected.len()
        ),
        Err(err) => {
            error!("{}", err);
            exit(exit_code(&err));
        }
    }
}
