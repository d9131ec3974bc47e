mod config;
mod export_cmd;
mod generate_cmd;
mod init_cmd;
mod plan_cmds;
mod tui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use smartfit_core::GenerationSettings;
use smartfit_core::export::ExportFormat;
use smartfit_core::generator::{GeminiGenerator, TextGenerator};
use smartfit_store::{FileStore, KeyValueStore};

use config::{CliOverrides, SmartfitConfig};

#[derive(Parser)]
#[command(name = "smartfit", about = "AI-assisted weekly workout planner", version)]
struct Cli {
    /// Gemini API key (overrides GEMINI_API_KEY env var)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Gemini model (overrides SMARTFIT_MODEL env var)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Directory for saved plan and preferences (overrides SMARTFIT_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a smartfit config file
    ///
    /// Stores the global --api-key, --model and --data-dir values.
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Launch the interactive planner (default)
    Start,
    /// Generate a plan from a profile file (TOML or JSON)
    Generate {
        /// Path to the profile file
        #[arg(long)]
        profile: PathBuf,
        /// Discard the saved plan first
        #[arg(long)]
        replace: bool,
    },
    /// Print the saved plan
    Show {
        /// Only show this day (1-based)
        #[arg(long)]
        day: Option<usize>,
    },
    /// Suggest up to three substitutes for one exercise
    Alternatives {
        /// Day number (1-based)
        day: usize,
        /// Exercise ID (as shown by `smartfit show`)
        exercise_id: String,
    },
    /// Replace one exercise with an AI-suggested alternative
    Swap {
        /// Day number (1-based)
        day: usize,
        /// Exercise ID (as shown by `smartfit show`)
        exercise_id: String,
        /// Which suggestion to use (1-based)
        #[arg(long, default_value_t = 1)]
        pick: usize,
    },
    /// Export the saved plan
    Export {
        /// Output format
        #[arg(long, value_enum, default_value_t = FormatArg::Markdown)]
        format: FormatArg,
        /// Output file path (defaults to stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Delete the saved plan and preferences
    Reset,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Markdown,
    Csv,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Markdown => ExportFormat::Markdown,
            FormatArg::Csv => ExportFormat::Csv,
        }
    }
}

/// Services shared by the commands that touch the plan.
pub struct AppContext {
    pub config: SmartfitConfig,
    pub store: Arc<dyn KeyValueStore>,
}

impl AppContext {
    /// Resolve configuration, start logging, and open the store.
    fn load(overrides: &CliOverrides, log_to_file: bool) -> anyhow::Result<Self> {
        let config = SmartfitConfig::resolve(overrides)?;
        if log_to_file {
            init_file_logging(&config.store_config.data_dir)?;
        } else {
            init_stderr_logging();
        }
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config.store_config.clone()));
        Ok(Self { config, store })
    }

    pub fn settings(&self) -> GenerationSettings {
        GenerationSettings::new(self.config.model.clone())
    }

    /// The Gemini client. Fails when no API key is configured.
    pub fn generator(&self) -> anyhow::Result<Arc<dyn TextGenerator>> {
        let key = self.config.api_key()?;
        Ok(Arc::new(GeminiGenerator::new(key)))
    }
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Log to a dated file in the data directory so output does not corrupt
/// the alternate screen.
fn init_file_logging(data_dir: &std::path::Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;
    let path = data_dir.join(format!(
        "smartfit-{}.log",
        chrono::Local::now().format("%Y%m%d")
    ));
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .init();
    tracing::info!(path = %path.display(), "logging to file");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let overrides = CliOverrides {
        api_key: cli.api_key,
        model: cli.model,
        data_dir: cli.data_dir,
    };

    match cli.command.unwrap_or(Commands::Start) {
        Commands::Init { force } => {
            init_stderr_logging();
            init_cmd::run_init(&overrides, force)?;
        }
        Commands::Start => {
            let ctx = AppContext::load(&overrides, true)?;
            tui::run_planner(&ctx).await?;
        }
        Commands::Generate { profile, replace } => {
            let ctx = AppContext::load(&overrides, false)?;
            generate_cmd::run_generate(&ctx, &profile, replace).await?;
        }
        Commands::Show { day } => {
            let ctx = AppContext::load(&overrides, false)?;
            plan_cmds::run_show(&ctx, day)?;
        }
        Commands::Alternatives { day, exercise_id } => {
            let ctx = AppContext::load(&overrides, false)?;
            plan_cmds::run_alternatives(&ctx, day, &exercise_id).await?;
        }
        Commands::Swap {
            day,
            exercise_id,
            pick,
        } => {
            let ctx = AppContext::load(&overrides, false)?;
            plan_cmds::run_swap(&ctx, day, &exercise_id, pick).await?;
        }
        Commands::Export { format, output } => {
            let ctx = AppContext::load(&overrides, false)?;
            export_cmd::run_export(&ctx, format.into(), output.as_deref())?;
        }
        Commands::Reset => {
            let ctx = AppContext::load(&overrides, false)?;
            plan_cmds::run_reset(&ctx)?;
        }
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod test_util {
    use std::sync::{Mutex, MutexGuard};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Serialize tests that mutate process environment variables.
    pub fn lock_env() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }
}
