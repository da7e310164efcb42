//! Slidenav CLI
//!
//! Drive the navigation overlay from the terminal. `run` executes a
//! scripted session against the real transition scheduler; `labels` and
//! `check` inspect configuration and content files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use slidenav_animation::{SurfaceAnimator, TargetOffset, TransitionScheduler};
use slidenav_core::{
    LabelCatalog, Menu, MenuData, MenuView, NavigationBus, OverlayController, SlidenavConfig,
};

mod script;

use script::{Session, Step};

#[derive(Parser)]
#[command(name = "slidenav")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Slide-in navigation overlay harness", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted overlay session
    Run {
        /// Configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Menu content file (JSON)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Locale tag used to pick labels
        #[arg(short, long)]
        locale: Option<String>,

        /// Steps: toggle, close, status, navigate:<path>, activate:<path>, wait:<ms>
        #[arg(default_value = "status")]
        steps: Vec<Step>,
    },

    /// Print the label table
    Labels {
        /// Resolve a single locale tag instead of listing every entry
        locale: Option<String>,

        /// Configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Validate configuration and content files
    Check {
        /// Configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Menu content file (JSON)
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Run {
            config,
            data,
            locale,
            steps,
        } => cmd_run(config.as_deref(), data.as_deref(), locale.as_deref(), &steps),

        Commands::Labels { locale, config } => cmd_labels(locale.as_deref(), config.as_deref()),

        Commands::Check { config, data } => cmd_check(config.as_deref(), data.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<SlidenavConfig> {
    match path {
        Some(path) => SlidenavConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(SlidenavConfig::default()),
    }
}

fn load_data(path: Option<&Path>) -> Result<MenuData> {
    match path {
        Some(path) => MenuData::load(path)
            .with_context(|| format!("Failed to load menu content from {}", path.display())),
        None => Ok(MenuData::default()),
    }
}

fn cmd_run(
    config: Option<&Path>,
    data: Option<&Path>,
    locale: Option<&str>,
    steps: &[Step],
) -> Result<()> {
    let config = load_config(config)?;
    let data = load_data(data)?;
    let catalog = config.label_catalog()?;
    let locale = locale.unwrap_or(catalog.default_locale()).to_string();

    info!(
        "Running {} step(s) with locale '{}' at {} fps",
        steps.len(),
        locale,
        config.target_fps
    );

    let mut scheduler = TransitionScheduler::new();
    scheduler.set_target_fps(config.target_fps);
    scheduler.start_background();

    let animator = Arc::new(
        SurfaceAnimator::new(scheduler.handle(), TargetOffset::OffScreenUp)
            .context("Transition scheduler is not running")?,
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to build async runtime")?;

    runtime.block_on(run_session(&animator, &config, data, &catalog, &locale, steps))?;

    scheduler.stop_background();
    Ok(())
}

async fn run_session(
    animator: &Arc<SurfaceAnimator>,
    config: &SlidenavConfig,
    data: MenuData,
    catalog: &LabelCatalog,
    locale: &str,
    steps: &[Step],
) -> Result<()> {
    let bus = Arc::new(NavigationBus::new());
    let controller = OverlayController::new(animator.clone(), config.timings());
    controller
        .attach_navigation(bus.as_ref())
        .context("Failed to listen for navigation")?;

    let menu = Menu::new(controller, data, catalog, locale, bus.clone());
    let session = Session {
        menu: &menu,
        bus: &bus,
        animator,
    };
    session.run(steps).await
}

fn cmd_labels(locale: Option<&str>, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let catalog = config.label_catalog()?;

    match locale {
        Some(tag) => {
            let labels = catalog.labels(tag);
            println!("{}: {} / {} / {}", tag, labels.open, labels.close, labels.about);
        }
        None => {
            println!("Default locale: {}", catalog.default_locale());
            for tag in catalog.locales() {
                let labels = catalog.labels(tag);
                println!(
                    "  {:<6} {:<10} {:<10} {}",
                    tag, labels.open, labels.close, labels.about
                );
            }
        }
    }

    Ok(())
}

fn cmd_check(config: Option<&Path>, data: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let data = load_data(data)?;
    let catalog = config.label_catalog()?;

    info!(
        "Config OK: {} locale(s), default '{}'",
        catalog.len(),
        catalog.default_locale()
    );
    info!(
        "Enter: {}ms {}, exit: {}ms {}",
        config.enter.duration_ms,
        config.enter.easing.token(),
        config.exit.duration_ms,
        config.exit.easing.token()
    );

    let view = MenuView::build(&data, catalog.labels(catalog.default_locale()));
    info!(
        "Content OK: {} link(s), letter {}",
        view.links().count(),
        if data.letter().is_empty() {
            "empty"
        } else {
            "present"
        }
    );

    Ok(())
}
