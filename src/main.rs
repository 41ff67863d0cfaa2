use anyhow::{Context, Result};
use clap::Parser;
use jetsub::{
    cli::{Cli, OutputFormat},
    config::AnalysisConfig,
    csv_output::CsvWriter,
    json_output::{JsonLinesWriter, JsonSummary},
    runner::{RecordSink, Runner},
    JetAnalysis, Summary,
};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_config(cli: &Cli) -> Result<AnalysisConfig> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_toml_file(path)?,
        None => AnalysisConfig::default(),
    };
    cli.apply_overrides(&mut config);
    config.validate().context("Invalid command-line override")?;
    Ok(config)
}

fn open_input(cli: &Cli) -> Result<Box<dyn BufRead + Send>> {
    match cli.input_path() {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open event file: {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

fn open_output(cli: &Cli) -> Result<Box<dyn Write>> {
    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}

fn run_with<S: RecordSink>(runner: &Runner, input: Box<dyn BufRead + Send>, mut sink: S) -> Result<Summary> {
    runner.run(input, &mut sink)
}

fn write_summary(cli: &Cli, summary: &Summary) -> Result<()> {
    let json = JsonSummary::new(summary).to_json()?;
    match &cli.summary {
        Some(path) => std::fs::write(path, json + "\n")
            .with_context(|| format!("Failed to write summary: {}", path.display())),
        None => {
            eprintln!("{}", json);
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = load_config(&cli)?;
    if cli.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let include_gen = config.simulated;
    let analysis = JetAnalysis::prepare(config)?;
    let workers = cli.workers.unwrap_or_else(Runner::default_workers);
    let runner = Runner::new(&analysis, workers);

    tracing::debug!(workers, format = ?cli.format, "starting run");

    let input = open_input(&cli)?;
    let output = open_output(&cli)?;
    let summary = match cli.format {
        OutputFormat::Jsonl => run_with(&runner, input, JsonLinesWriter::new(output))?,
        OutputFormat::Csv => run_with(&runner, input, CsvWriter::new(output, include_gen))?,
    };

    write_summary(&cli, &summary)
}
