use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use owo_colors::OwoColorize;
use peloton_core::{
    DEFAULT_OUTPUT_DIR, PelotonError, Race, Scraper, ScraperConfig, Stage, Year, fetch_file, fetch_stdin,
    stage_path, startlist_path, to_json, write_json,
};
use tracing_subscriber::EnvFilter;
use url::Url;

mod echo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Scrape cycling startlists and stage results into JSON
#[derive(Parser, Debug)]
#[command(name = "peloton")]
#[command(author = "Peloton Contributors")]
#[command(version)]
#[command(about = "Scrape cycling startlists and stage results into JSON", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Read the page from a saved HTML file, or "-" for stdin, instead of fetching it
    #[arg(long, global = true, value_name = "FILE")]
    input: Option<String>,

    /// Directory records are written under
    #[arg(long, global = true, default_value = DEFAULT_OUTPUT_DIR, value_name = "DIR")]
    output_dir: PathBuf,

    /// Also print the JSON record to stdout
    #[arg(long, global = true)]
    stdout: bool,

    /// Do not write the record file (prints to stdout instead)
    #[arg(long, global = true)]
    no_write: bool,

    /// Emit compact JSON instead of pretty-printed
    #[arg(long, global = true)]
    compact: bool,

    /// Abort on any missing flag or link instead of emitting null
    #[arg(long, global = true)]
    strict: bool,

    /// Origin of the results site
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<Url>,

    /// HTTP timeout in seconds
    #[arg(long, global = true, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, global = true, value_name = "UA")]
    user_agent: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape the startlist of a race
    Startlist {
        /// Race slug (e.g. tour-de-france)
        race: String,
        /// Season (default: current year)
        year: Option<String>,
    },
    /// Scrape the result page of one stage
    Stage {
        /// Race slug (e.g. tour-de-france)
        race: String,
        /// Stage identifier (e.g. 7)
        stage: String,
        /// Season (default: current year)
        year: Option<String>,
    },
    /// Generate shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Process exit statuses, one per failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    Internal = 1,
    Usage = 2,
    InvalidYear = 3,
    UnknownRace = 4,
    MissingCapability = 5,
    Http = 6,
}

impl Exit {
    fn classify(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<PelotonError>() {
            Some(PelotonError::InvalidYear(_)) => Exit::InvalidYear,
            Some(PelotonError::UnknownRace(_)) => Exit::UnknownRace,
            Some(PelotonError::InvalidStage(_) | PelotonError::InvalidUrl(_)) => Exit::Usage,
            Some(PelotonError::ClientUnavailable(_)) => Exit::MissingCapability,
            Some(e) if e.is_transport() => Exit::Http,
            _ => Exit::Internal,
        }
    }

    fn is_usage(self) -> bool {
        matches!(self, Exit::Usage | Exit::InvalidYear | Exit::UnknownRace)
    }
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit as u8)
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let exit = Exit::classify(&err);
            echo::print_error(&format!("{:#}", err));
            if exit.is_usage() {
                echo::print_usage_hint();
            }
            tracing::debug!(?err, ?exit, "run failed");
            exit.into()
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.verbose {
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
    }

    match &cli.command {
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "peloton", &mut io::stdout());
            Ok(())
        }
        Command::Startlist { race, year } => {
            let race: Race = race.parse()?;
            let year = parse_year(year.as_deref())?;
            scrape_startlist(&cli, race, year).await
        }
        Command::Stage { race, stage, year } => {
            let race: Race = race.parse()?;
            let stage: Stage = stage.parse()?;
            let year = parse_year(year.as_deref())?;
            scrape_stage(&cli, race, year, stage).await
        }
    }
}

fn parse_year(raw: Option<&str>) -> peloton_core::Result<Year> {
    raw.map_or_else(|| Ok(Year::current()), |s| s.parse())
}

fn build_scraper(cli: &Cli) -> anyhow::Result<Scraper> {
    let mut builder = ScraperConfig::builder().strict(cli.strict).timeout(cli.timeout);
    if let Some(base_url) = &cli.base_url {
        builder = builder.base_url(base_url.as_str());
    }
    if let Some(user_agent) = &cli.user_agent {
        builder = builder.user_agent(user_agent.clone());
    }
    Ok(Scraper::with_config(builder.build()?))
}

/// Reads the page named by `--input`, if any. `None` means fetch it live.
fn read_input(cli: &Cli) -> anyhow::Result<Option<String>> {
    let Some(input) = cli.input.as_deref() else {
        return Ok(None);
    };

    let started = Instant::now();
    let html = if input == "-" {
        if cli.verbose {
            echo::print_step(1, 3, "Reading page from stdin");
        }
        fetch_stdin().context("Failed to read from stdin")?
    } else {
        if cli.verbose {
            echo::print_step(1, 3, &format!("Reading page from file {}", input.bright_white()));
        }
        fetch_file(input).with_context(|| format!("Failed to read file: {}", input))?
    };

    if cli.verbose {
        eprintln!("  {} {}", "Size:".dimmed(), echo::format_size(html.len()).bright_white());
        echo::print_timing("Load", started.elapsed());
        eprintln!();
    }

    Ok(Some(html))
}

fn announce_fetch(cli: &Cli, url: &str) {
    if cli.verbose {
        echo::print_step(1, 3, &format!("Fetching {}", url.bright_white().underline()));
    }
}

async fn scrape_startlist(cli: &Cli, race: Race, year: Year) -> anyhow::Result<()> {
    let scraper = build_scraper(cli)?;
    let url = scraper.startlist_url(race, year);
    let started = Instant::now();

    let record = match read_input(cli)? {
        Some(html) => {
            if cli.verbose {
                echo::print_step(2, 3, "Extracting startlist");
            }
            scraper
                .startlist_from_html(&html, race, year, &url)
                .context("Failed to extract startlist")?
        }
        None => {
            announce_fetch(cli, &url);
            scraper
                .fetch_startlist(race, year)
                .await
                .with_context(|| format!("Failed to scrape {}", url))?
        }
    };

    if cli.verbose {
        echo::print_timing("Scrape", started.elapsed());
        echo::print_count("Teams", record.count);
        echo::print_count("Riders", peloton_core::rider_count(&record.teams));
        eprintln!();
    }

    let json = to_json(&record, !cli.compact).context("Failed to serialize startlist")?;
    emit(cli, &startlist_path(&cli.output_dir, race, year), &json)
}

async fn scrape_stage(cli: &Cli, race: Race, year: Year, stage: Stage) -> anyhow::Result<()> {
    let scraper = build_scraper(cli)?;
    let url = scraper.stage_url(race, year, &stage);
    let path = stage_path(&cli.output_dir, race, year, &stage);
    let started = Instant::now();

    let record = match read_input(cli)? {
        Some(html) => {
            if cli.verbose {
                echo::print_step(2, 3, "Extracting stage result");
            }
            scraper
                .stage_from_html(&html, race, year, stage, &url)
                .context("Failed to extract stage result")?
        }
        None => {
            announce_fetch(cli, &url);
            scraper
                .fetch_stage(race, year, stage)
                .await
                .with_context(|| format!("Failed to scrape {}", url))?
        }
    };

    if cli.verbose {
        echo::print_timing("Scrape", started.elapsed());
        eprintln!(
            "  {} {}",
            "Layout:".dimmed(),
            format!("{:?}", record.results.layout()).bright_white()
        );
        echo::print_count("Rows", record.count);
        echo::print_count("GC", record.gc.len());
        eprintln!();
    }

    let json = to_json(&record, !cli.compact).context("Failed to serialize stage result")?;
    emit(cli, &path, &json)
}

/// Writes the record file and/or prints it, per the output flags.
fn emit(cli: &Cli, path: &Path, json: &str) -> anyhow::Result<()> {
    if cli.verbose {
        echo::print_step(3, 3, "Writing output");
    }

    if !cli.no_write {
        write_json(path, json).with_context(|| format!("Failed to write to file: {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote record");
        echo::print_success(&format!("Output written to {}", path.display().bright_white()));
    }

    if cli.stdout || cli.no_write {
        println!("{}", json);
    }

    Ok(())
}
