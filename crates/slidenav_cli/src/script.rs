//! Scripted overlay sessions
//!
//! A script is a list of steps given on the command line:
//!
//! ```text
//! slidenav run toggle status activate:/porto status
//! ```

use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use slidenav_animation::SurfaceAnimator;
use slidenav_core::{Menu, MenuEntry, NavigationBus, NavigationSink};
use tracing::{info, warn};

/// Upper bound on how long a step may wait for the overlay to settle
const SETTLE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Click the toggle button
    Toggle,
    /// Ask the overlay to close
    Close,
    /// Host-initiated page change
    Navigate(String),
    /// Click the overlay link pointing at a path
    Activate(String),
    /// Sleep for a number of milliseconds
    Wait(u64),
    /// Print the toggle, icon and overlay content
    Status,
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };

        let step = match (name, arg) {
            ("toggle", None) => Step::Toggle,
            ("close", None) => Step::Close,
            ("status", None) => Step::Status,
            ("navigate", Some(path)) => Step::Navigate(path.to_string()),
            ("activate", Some(path)) => Step::Activate(path.to_string()),
            ("wait", Some(ms)) => Step::Wait(
                ms.parse()
                    .with_context(|| format!("Invalid wait duration '{}'", ms))?,
            ),
            _ => bail!(
                "Unknown step '{}'. Valid steps: toggle, close, status, navigate:<path>, activate:<path>, wait:<ms>",
                s
            ),
        };
        Ok(step)
    }
}

/// Everything a script can touch
pub struct Session<'a> {
    pub menu: &'a Menu,
    pub bus: &'a NavigationBus,
    pub animator: &'a SurfaceAnimator,
}

impl Session<'_> {
    pub async fn run(&self, steps: &[Step]) -> Result<()> {
        for step in steps {
            info!("Step: {:?}", step);
            self.run_step(step).await?;
        }
        Ok(())
    }

    async fn run_step(&self, step: &Step) -> Result<()> {
        match step {
            Step::Toggle => {
                let state = self.menu.toggle().await;
                info!("Overlay is {:?}", state);
            }
            Step::Close => {
                let state = self.menu.controller().request_close().await;
                info!("Overlay is {:?}", state);
            }
            Step::Navigate(path) => {
                self.bus.navigate(path);
                self.settle().await?;
            }
            Step::Activate(path) => {
                let Some(view) = self.menu.view() else {
                    warn!("Overlay is closed, nothing to activate");
                    return Ok(());
                };
                let Some(link) = view.link_to(path) else {
                    bail!("No overlay link points at '{}'", path);
                };
                self.menu.activate(link);
                self.settle().await?;
            }
            Step::Wait(ms) => tokio::time::sleep(Duration::from_millis(*ms)).await,
            Step::Status => self.print_status(),
        }
        Ok(())
    }

    /// Let the navigation listener react, then wait for any transition to land
    async fn settle(&self) -> Result<()> {
        tokio::task::yield_now().await;
        let mut states = self.menu.controller().watch_state();
        let state = tokio::time::timeout(SETTLE_TIMEOUT, states.wait_for(|s| !s.is_animating()))
            .await
            .context("Overlay transition did not settle")?
            .context("Overlay controller went away")?;
        info!("Overlay is {:?}", *state);
        Ok(())
    }

    fn print_status(&self) {
        println!("Overlay: {:?}", self.menu.state());
        println!(
            "Toggle:  [{}] {}",
            "=".repeat(self.menu.icon_bars()),
            self.menu.toggle_label()
        );
        if let Some(offset) = self.animator.offset() {
            println!("Offset:  {:.1}%", offset);
        }
        println!("Route:   {}", self.bus.current_path().as_deref().unwrap_or("/"));

        match self.menu.view() {
            Some(view) => {
                for entry in view.entries() {
                    match entry {
                        MenuEntry::Link(link) => println!("  > {:<24} {}", link.label, link.path),
                        MenuEntry::Heading(text) => println!("  # {}", text),
                    }
                }
            }
            None => println!("  (overlay unmounted)"),
        }
        println!();
    }
}
