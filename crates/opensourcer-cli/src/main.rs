mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::EXIT_FAILURE;
use opensourcer_core::Config;
use opensourcer_store::{HomeLayout, LOCAL_TARGET};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

#[derive(Debug, Parser)]
#[command(
    name = "opensourcer",
    version,
    about = "Deploy self-hosted open-source software from a curated catalog"
)]
struct Cli {
    /// Opensourcer home directory (catalog, deployments, state, config).
    #[arg(long, default_value = "~/.opensourcer")]
    home: String,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List software available in the catalog.
    Catalog,
    /// Show a catalog entry and the inputs it accepts.
    Info {
        /// Software slug, e.g. "ghost".
        software: String,
    },
    /// Download or update the software catalog.
    Update,
    /// Deploy software from the catalog.
    Deploy {
        /// Software slug, e.g. "n8n".
        software: String,
        /// Deployment target.
        #[arg(long, default_value = LOCAL_TARGET)]
        target: String,
        /// Input value as KEY=VALUE (repeatable).
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        set: Vec<(String, String)>,
    },
    /// List tracked deployments.
    List,
    /// Show a deployment record.
    Inspect {
        /// Software slug.
        software: String,
    },
    /// Show recent output of a deployment's services.
    Logs {
        /// Software slug.
        software: String,
        /// Number of lines per service (defaults to `log_lines` from config).
        #[arg(short = 'n', long)]
        lines: Option<usize>,
    },
    /// Stop a deployment's containers.
    Stop {
        /// Software slug.
        software: String,
    },
    /// Start a stopped deployment.
    Start {
        /// Software slug.
        software: String,
    },
    /// Remove a deployment, its containers, and its volumes.
    Destroy {
        /// Software slug.
        software: String,
        /// Discard local state even if the container engine fails.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Run diagnostic checks on the system and home directory.
    Doctor,
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
    /// Generate man pages in the specified directory.
    ManPages {
        /// Output directory for man pages.
        #[arg(default_value = "man")]
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("OPENSOURCER_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let layout = HomeLayout::new(expand_tilde(&cli.home));
    let config = match Config::load(&layout.config_file()) {
        Ok(c) => c.with_env_overrides(),
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };
    debug!("home {} with engine '{}'", layout.root().display(), config.engine);
    let json_output = cli.json;

    if std::env::var("OPENSOURCER_SKIP_PREREQS").as_deref() != Ok("1") {
        let missing = match cli.command {
            Commands::Deploy { .. }
            | Commands::Logs { .. }
            | Commands::Stop { .. }
            | Commands::Start { .. }
            | Commands::Destroy { .. } => opensourcer_runtime::check_engine_prereqs(&config.engine),
            Commands::Update => opensourcer_runtime::check_git_prereqs(),
            _ => Vec::new(),
        };
        if !missing.is_empty() {
            eprintln!("error: {}", opensourcer_runtime::format_missing(&missing));
            return ExitCode::from(EXIT_FAILURE);
        }
    }

    let result = match cli.command {
        Commands::Catalog => commands::catalog::run(&layout, json_output),
        Commands::Info { software } => commands::info::run(&layout, &software, json_output),
        Commands::Update => commands::update::run(&layout, &config, json_output),
        Commands::Deploy {
            software,
            target,
            set,
        } => commands::deploy::run(&layout, &config, &software, &target, set, json_output),
        Commands::List => commands::list::run(&layout, &config, json_output),
        Commands::Inspect { software } => {
            commands::inspect::run(&layout, &config, &software, json_output)
        }
        Commands::Logs { software, lines } => {
            commands::logs::run(&layout, &config, &software, lines)
        }
        Commands::Stop { software } => commands::stop::run(&layout, &config, &software, json_output),
        Commands::Start { software } => {
            commands::start::run(&layout, &config, &software, json_output)
        }
        Commands::Destroy { software, force } => {
            commands::destroy::run(&layout, &config, &software, force, json_output)
        }
        Commands::Doctor => commands::doctor::run(&layout, &config, json_output),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
        Commands::ManPages { dir } => commands::man_pages::run::<Cli>(&dir),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(e.code)
        }
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_owned(), value.to_owned()))
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_val_splits_on_first_equals() {
        assert_eq!(
            parse_key_val("admin_password=a=b").unwrap(),
            ("admin_password".to_owned(), "a=b".to_owned())
        );
        assert_eq!(
            parse_key_val("domain=").unwrap(),
            ("domain".to_owned(), String::new())
        );
        assert!(parse_key_val("domain").is_err());
        assert!(parse_key_val("=x").is_err());
    }

    #[test]
    fn tilde_is_expanded_against_home() {
        let expanded = expand_tilde("/abs/path");
        assert_eq!(expanded, PathBuf::from("/abs/path"));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
