use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use research_hub::client::SearchClient;
use research_hub::config::{
    default_config_path, find_config_file, get_config, load_config, save_config, to_toml, Config,
};
use research_hub::models::SourceCatalog;
use research_hub::session::SearchSession;
use research_hub::ui::interactive::{self, InteractiveOptions};
use research_hub::ui::presenter::print_notice;
use research_hub::ui::{is_terminal, print_status, OutputMode, Presenter, Status};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// research-hub - search academic papers through a paper search API
#[derive(Parser, Debug)]
#[command(name = "research-hub")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search academic papers through a paper search API", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Search endpoint (overrides the configuration file)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Print all result cards at once
    #[arg(long, global = true)]
    no_animation: bool,

    /// Show all environment variables
    #[arg(long, global = true)]
    env: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (cards if TTY, JSON otherwise)
    Auto,
    /// Result cards (human-readable)
    Cards,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search for papers by query string
    #[command(alias = "s")]
    Search {
        /// Search query string
        query: String,

        /// Source to search (default: the configured default source)
        #[arg(long, short)]
        source: Option<String>,
    },

    /// Read queries from the terminal, one per line (default)
    #[command(alias = "i")]
    Interactive {
        /// Initially selected source
        #[arg(long, short)]
        source: Option<String>,

        /// Skip the startup connectivity check
        #[arg(long)]
        no_probe: bool,
    },

    /// Check that the search service is reachable
    Probe,

    /// List the configured sources
    Sources,

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Write the effective configuration to a file
    Init {
        /// Destination (default: the per-user config file)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

/// Print all available environment variables
fn print_env_vars() {
    println!("research-hub - Environment Variables");
    println!();
    println!("Search API:");
    println!("  RESEARCH_HUB_API__BASE_URL         Search endpoint (default: http://localhost:5000/api/search)");
    println!("  RESEARCH_HUB_API__TIMEOUT_SECONDS  Request timeout (default: none)");
    println!("  RESEARCH_HUB_API__USER_AGENT       User agent override");
    println!("  RESEARCH_HUB_DEFAULT_SOURCE        Source selected by default (default: arxiv)");
    println!();
    println!("Connectivity Check:");
    println!("  RESEARCH_HUB_PROBE__ENABLED        Check the service on startup (default: true)");
    println!("  RESEARCH_HUB_PROBE__QUERY          Query used by the check (default: test)");
    println!();
    println!("Display:");
    println!("  RESEARCH_HUB_DISPLAY__ANIMATE      Reveal cards one by one (default: true)");
    println!("  RESEARCH_HUB_DISPLAY__STAGGER_MS   Delay between cards (default: 100)");
    println!();
    println!("Logging:");
    println!("  RESEARCH_HUB_LOGGING__LEVEL        Log level (default: info)");
    println!("  RESEARCH_HUB_LOGGING__FORMAT       text or json (default: text)");
    println!("  RUST_LOG                           Rust logging filter, overrides the above");
    println!();
    println!("Proxy:");
    println!("  HTTP_PROXY / HTTPS_PROXY / NO_PROXY are honoured by the HTTP client");
}

fn init_tracing(cli: &Cli, config: &Config) {
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => config.logging.level.as_str(),
        (false, 1) => "debug",
        _ => "trace",
    };

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("research_hub={}", level)),
    );
    let json = config.logging.is_json();

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        load_config(config_path)
            .with_context(|| format!("Failed to load config file {}", config_path.display()))?
    } else if let Some(config_path) = find_config_file() {
        load_config(&config_path)
            .with_context(|| format!("Failed to load config file {}", config_path.display()))?
    } else {
        get_config().context("Failed to read configuration from the environment")?
    };

    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.clone();
    }
    if cli.no_animation {
        config.display.animate = false;
    }

    Ok(config)
}

fn output_mode(format: OutputFormat) -> OutputMode {
    match format {
        OutputFormat::Auto if is_terminal() => OutputMode::Cards,
        OutputFormat::Auto => OutputMode::Json,
        OutputFormat::Cards => OutputMode::Cards,
        OutputFormat::Json => OutputMode::Json,
        OutputFormat::Plain => OutputMode::Plain,
    }
}

fn build_session(config: &Config, catalog: &SourceCatalog) -> Result<Arc<SearchSession>> {
    let client = SearchClient::from_config(config)?
        .with_probe(&config.probe.query, catalog.default_source().clone());
    Ok(Arc::new(SearchSession::new(
        Arc::new(client),
        config.display.stagger(),
    )))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Show environment variables and exit if requested
    if cli.env {
        print_env_vars();
        return Ok(ExitCode::SUCCESS);
    }

    let config = resolve_config(&cli)?;
    init_tracing(&cli, &config);
    if let Some(config_path) = cli.config.clone().or_else(find_config_file) {
        tracing::debug!("Using config file: {}", config_path.display());
    }

    let mode = output_mode(cli.output);
    let catalog = config.catalog()?;

    match cli.command {
        Some(Commands::Search { query, source }) => {
            let requested = source
                .as_deref()
                .unwrap_or(catalog.default_source().as_str());
            let source = match catalog.resolve(requested) {
                Ok(source) => source,
                Err(e) => {
                    print_status(Status::Error, &e.user_message());
                    return Ok(ExitCode::FAILURE);
                }
            };

            let session = build_session(&config, &catalog)?;
            let shutdown = CancellationToken::new();
            let drawing = tokio::spawn(
                Presenter::new(mode, config.display.animate).run(session.subscribe(), shutdown.clone()),
            );

            let completion = session.submit(&query, source).await;
            shutdown.cancel();
            drawing.await?;

            let failed = completion.state().and_then(|s| s.error()).is_some();
            Ok(if failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }

        Some(Commands::Probe) => {
            let session = build_session(&config, &catalog)?;
            let report = session.probe().await;
            print_notice(mode, report.is_ok(), &report.message());
            Ok(if report.is_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }

        Some(Commands::Sources) => {
            use comfy_table::{Attribute, Cell, Table};
            let mut table = Table::new();
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.set_header(vec!["ID", "Name", "Default"]);

            for option in catalog.options() {
                let is_default = &option.id == catalog.default_source();
                table.add_row(vec![
                    Cell::new(option.id.as_str()).add_attribute(Attribute::Bold),
                    Cell::new(&option.label),
                    Cell::new(if is_default { "✓" } else { "" }),
                ]);
            }
            println!("{table}");
            Ok(ExitCode::SUCCESS)
        }

        Some(Commands::Config { action }) => {
            match action {
                ConfigAction::Init { path, force } => {
                    let path = path
                        .or_else(default_config_path)
                        .context("No config directory on this platform; pass --path")?;
                    save_config(&config, &path, force)?;
                    if !cli.quiet {
                        print_status(
                            Status::Success,
                            &format!("Wrote configuration to {}", path.display()),
                        );
                    }
                }
                ConfigAction::Show => print!("{}", to_toml(&config)?),
            }
            Ok(ExitCode::SUCCESS)
        }

        Some(Commands::Completions { shell }) => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "research-hub",
                &mut std::io::stdout(),
            );
            Ok(ExitCode::SUCCESS)
        }

        Some(Commands::Interactive { source, no_probe }) => {
            run_interactive(&config, catalog, mode, source, !no_probe, cli.quiet).await
        }

        None => run_interactive(&config, catalog, mode, None, true, cli.quiet).await,
    }
}

async fn run_interactive(
    config: &Config,
    catalog: SourceCatalog,
    mode: OutputMode,
    source: Option<String>,
    probe: bool,
    quiet: bool,
) -> Result<ExitCode> {
    let catalog = match source {
        Some(id) => {
            let selected = catalog.resolve(&id)?;
            SourceCatalog::new(catalog.options().to_vec(), selected)?
        }
        None => catalog,
    };

    let session = build_session(config, &catalog)?;
    let presenter = Presenter::new(mode, config.display.animate);
    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let options = InteractiveOptions {
        probe: probe && config.probe.enabled,
        quiet,
    };

    tokio::select! {
        result = interactive::run(session, catalog, presenter, input, options) => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::debug!("Interrupted");
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_version() {
        let version = env!("CARGO_PKG_VERSION");
        assert!(!version.is_empty());
        let parts: Vec<&str> = version.split('.').collect();
        assert!(parts.len() >= 2);
        assert!(parts[0].parse::<u32>().is_ok());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["research-hub"]);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert_eq!(cli.output, OutputFormat::Auto);
        assert!(cli.base_url.is_none());
        assert!(!cli.no_animation);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::parse_from(["research-hub", "-v"]);
        assert_eq!(cli.verbose, 1);

        let cli = Cli::parse_from(["research-hub", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_output_format() {
        let cli = Cli::parse_from(["research-hub", "-o", "json"]);
        assert_eq!(cli.output, OutputFormat::Json);

        let cli = Cli::parse_from(["research-hub", "--output", "cards"]);
        assert_eq!(cli.output, OutputFormat::Cards);
    }

    #[test]
    fn test_output_mode_mapping() {
        assert_eq!(output_mode(OutputFormat::Json), OutputMode::Json);
        assert_eq!(output_mode(OutputFormat::Plain), OutputMode::Plain);
        assert_eq!(output_mode(OutputFormat::Cards), OutputMode::Cards);
    }

    #[test]
    fn test_cli_search_command() {
        let cli = Cli::parse_from(["research-hub", "search", "quantum computing"]);
        match &cli.command {
            Some(Commands::Search { query, source }) => {
                assert_eq!(query, "quantum computing");
                assert!(source.is_none());
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_cli_search_with_source() {
        let cli = Cli::parse_from([
            "research-hub",
            "search",
            "crispr",
            "--source",
            "biorxiv",
            "--base-url",
            "http://127.0.0.1:8080/api/search",
        ]);
        match &cli.command {
            Some(Commands::Search { source, .. }) => {
                assert_eq!(source.as_deref(), Some("biorxiv"));
            }
            _ => panic!("Expected Search command"),
        }
        assert_eq!(
            cli.base_url.as_deref(),
            Some("http://127.0.0.1:8080/api/search")
        );
    }

    #[test]
    fn test_cli_interactive_command() {
        let cli = Cli::parse_from(["research-hub", "interactive", "--no-probe", "-s", "arxiv"]);
        match &cli.command {
            Some(Commands::Interactive { source, no_probe }) => {
                assert!(*no_probe);
                assert_eq!(source.as_deref(), Some("arxiv"));
            }
            _ => panic!("Expected Interactive command"),
        }
    }

    #[test]
    fn test_cli_config_init() {
        let cli = Cli::parse_from(["research-hub", "config", "init", "--force"]);
        match &cli.command {
            Some(Commands::Config {
                action: ConfigAction::Init { path, force },
            }) => {
                assert!(path.is_none());
                assert!(*force);
            }
            _ => panic!("Expected Config Init command"),
        }
    }

    #[test]
    fn test_resolve_config_overrides() {
        let cli = Cli::parse_from([
            "research-hub",
            "--base-url",
            "https://example.org/search",
            "--no-animation",
            "probe",
        ]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.api.base_url, "https://example.org/search");
        assert!(!config.display.animate);
    }
}
