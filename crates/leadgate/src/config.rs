//! CLI configuration: thin wrapper around `leadgate_config`.
//!
//! Resolves flag overrides (`--output`, `--color`, `--today`) against the
//! loaded file and builds the guard the commands run.

use std::path::PathBuf;
use std::sync::Arc;

use clap::ValueEnum;

use leadgate_core::{Clock, FixedClock, Guard, SystemClock};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::commands::util;
use crate::error::CliError;

pub use leadgate_config::{Config, config_path, load_config, save_config};

/// Everything a command handler needs besides its own arguments.
pub struct Context<'a> {
    pub global: &'a GlobalOpts,
    pub config: Config,
    pub output: OutputFormat,
    pub color: bool,
}

impl<'a> Context<'a> {
    pub fn load(global: &'a GlobalOpts) -> Result<Self, CliError> {
        let config = load_config(global.config.as_deref())?;
        let output = global
            .output
            .or_else(|| OutputFormat::from_str(&config.defaults.output, true).ok())
            .unwrap_or(OutputFormat::Table);
        let color_mode = global
            .color
            .or_else(|| ColorMode::from_str(&config.defaults.color, true).ok())
            .unwrap_or(ColorMode::Auto);
        Ok(Self {
            global,
            config,
            output,
            color: crate::output::should_color(color_mode),
        })
    }

    /// The guard, pinned to `--today` when given.
    pub fn guard(&self) -> Result<Guard<Arc<dyn Clock>>, CliError> {
        let clock: Arc<dyn Clock> = match self.global.today.as_deref() {
            Some(raw) => Arc::new(FixedClock::at_date(util::parse_date(raw, "today")?)),
            None => Arc::new(SystemClock),
        };
        Ok(Guard::with_clock(self.config.to_guard_config(), clock))
    }

    pub fn print(&self, rendered: &str) {
        crate::output::print_output(rendered, self.global.quiet);
    }
}

/// The config file in effect: `--config` if given, else the platform path.
pub fn effective_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config_path)
}
