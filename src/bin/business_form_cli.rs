use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{builder::FalseyValueParser, Parser};
use tracing::{info, warn};

use business_form::cli::output::{self, OutputPreferences};
use business_form::cli::{run_cli, CliMode, ShellContext};
use business_form::config::{Config, ConfigManager, SubmissionTarget, CATEGORIES_URL_ENV};
use business_form::errors::CliError;
use business_form::submit::sink_for;
use business_form::taxonomy::{
    CategoryOptions, CategorySource, HttpCategorySource, StaticCategorySource, TaxonomyTask,
};
use business_form::utils::build_info;

#[derive(Parser, Debug)]
#[command(name = "business_form_cli", version, about = "Collect and submit a business profile")]
struct Args {
    /// Config file to use instead of the per-user default.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Endpoint serving the category taxonomy.
    #[arg(long, env = CATEGORIES_URL_ENV)]
    categories_url: Option<String>,

    /// Skip the taxonomy fetch; category suggestions stay empty.
    #[arg(long)]
    offline: bool,

    /// Wait for the taxonomy fetch before reading commands.
    #[arg(long)]
    wait_for_categories: bool,

    /// Write the submitted business as JSON to this file.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Read commands from stdin without prompts or colors.
    #[arg(long, env = "BUSINESS_FORM_CLI_SCRIPT", value_parser = FalseyValueParser::new())]
    script: bool,

    /// Print build metadata and exit.
    #[arg(long)]
    build_info: bool,
}

impl Args {
    fn mode(&self) -> CliMode {
        if self.script {
            CliMode::Script
        } else {
            CliMode::Interactive
        }
    }

    /// File values, then environment, then flags.
    fn resolve_config(&self) -> Result<Config, CliError> {
        let manager = match &self.config {
            Some(path) => ConfigManager::with_path(path),
            None => ConfigManager::new()?,
        };
        let mut config = manager.load()?.with_env_overrides();
        if let Some(url) = &self.categories_url {
            config.categories_url = url.clone();
        }
        if let Some(path) = &self.output {
            config.submission = SubmissionTarget::File { path: path.clone() };
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    business_form::init();
    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("business_form_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), CliError> {
    if args.build_info {
        println!("{}", build_info::current().long_version());
        return Ok(());
    }

    let config = args.resolve_config()?;
    let mode = args.mode();
    output::set_preferences(OutputPreferences {
        plain: mode == CliMode::Script,
        quiet: false,
    });

    let options = CategoryOptions::new();
    let source: Arc<dyn CategorySource> = if args.offline {
        info!("offline mode; serving an empty category taxonomy");
        Arc::new(StaticCategorySource::default())
    } else {
        Arc::new(HttpCategorySource::from_config(&config))
    };
    let mut task = TaxonomyTask::spawn(source, options.clone());
    if args.offline || args.wait_for_categories {
        let deadline = Duration::from_secs(config.request_timeout_secs.saturating_add(1));
        if !task.settle(deadline).await {
            warn!("category taxonomy still loading; continuing without it");
        }
    }

    let sink = sink_for(&config.submission)?;
    let grace = Duration::from_millis(config.suggestion_grace_ms);
    let outcome = tokio::task::spawn_blocking(move || {
        let mut context = ShellContext::new(mode, options, sink, grace);
        run_cli(&mut context)
    })
    .await
    .map_err(|err| CliError::Command(err.to_string()))?;

    task.cancel();
    outcome
}
