use clap::{Args, Parser};
use ksql_runner::{
    BatchInput, BatchReport, BatchRunner, DryRunExecutor, KsqlRestClient, ListStreams,
    Loader, RunnerError, StatementExecutor,
};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "ksql-runner")]
#[command(about = "Read ksqlDB statements and apply them.")]
#[command(version)]
struct Cli {
    /// ksqlDB connection configuration file
    #[arg(short = 'c', long = "config", required_unless_present = "dry_run")]
    config: Option<PathBuf>,

    /// Override `ksqldb.endpoint` from the configuration file
    #[arg(long, requires = "config")]
    endpoint: Option<String>,

    #[command(flatten)]
    input: InputArgs,

    /// When to list the engine's streams
    #[arg(long, value_enum, default_value_t = ListStreams::Before)]
    list_streams: ListStreams,

    /// Parse and log statements without contacting the engine
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct InputArgs {
    /// Directory containing ksqlDB execution files to be processed in order
    #[arg(short = 'd', long = "directory")]
    directory: Option<PathBuf>,

    /// Filename containing ksqlDB execution statements
    #[arg(short = 'f', long = "filename")]
    filename: Option<PathBuf>,
}

impl InputArgs {
    // clap 的参数组保证两者恰好有一个
    fn into_batch_input(self) -> BatchInput {
        match self.directory {
            Some(dir) => BatchInput::Directory(dir),
            None => BatchInput::File(self.filename.unwrap_or_default()),
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(report) if report.is_clean() => ExitCode::SUCCESS,
        Ok(report) => {
            for file in report.files.iter().filter(|f| !f.is_clean()) {
                error!("{} did not run to completion: {:?}", file.path.display(), file.termination);
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<BatchReport, RunnerError> {
    let input = cli.input.into_batch_input();

    let config = match &cli.config {
        Some(path) => {
            info!("Processing config file {}", path.display());
            let mut loader = Loader::new().with_properties_file(path).with_environment();
            if let Some(endpoint) = &cli.endpoint {
                loader = loader.set_override("ksqldb.endpoint", endpoint.as_str())?;
            }
            Some(loader.build()?)
        }
        None => None,
    };

    if cli.dry_run {
        return run_batch(DryRunExecutor::new(), &input, cli.list_streams);
    }

    let config = config.ok_or_else(|| RunnerError::InvalidConfig("--config is required".to_string()))?;
    let client = KsqlRestClient::new(&config)?;
    run_batch(client, &input, cli.list_streams)
}

fn run_batch<E: StatementExecutor>(
    executor: E,
    input: &BatchInput,
    list_streams: ListStreams,
) -> Result<BatchReport, RunnerError> {
    let mut runner = BatchRunner::new(executor)
        .with_list_streams(list_streams)
        .on_streams(|streams| {
            for stream in streams {
                println!("{}", stream);
            }
        })
        .on_result(|_, result| println!("{}", result));

    runner.run(input)
}
