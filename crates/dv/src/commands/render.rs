//! `dv render` command implementation.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use dv_config::{CliSettings, Config};
use dv_engine::{enrich, render_html};
use tracing::info;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render.
    file: PathBuf,

    /// Path to configuration file (default: auto-discover dv.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run the experimental diagram/table converters (overrides config).
    #[arg(long)]
    experimental: bool,

    /// Emit enriched Markdown instead of HTML.
    #[arg(long)]
    markdown: bool,

    /// Write output to a file instead of stdout.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Enable verbose output (per-step pipeline logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the input is missing or
    /// oversized, or the output cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            experimental: self.experimental.then_some(true),
            gfm: None,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let size = fs::metadata(&self.file)?.len();
        if size > config.limits.max_file_size {
            return Err(CliError::Validation(format!(
                "{} is {size} bytes, over the {} byte limit",
                self.file.display(),
                config.limits.max_file_size
            )));
        }

        let text = fs::read_to_string(&self.file)?;
        info!(file = %self.file.display(), experimental = config.render.experimental, "rendering");

        let rendered = if self.markdown {
            enrich(&text, config.render.experimental)
        } else {
            render_html(&text, config.render.experimental, config.render.gfm)
        };

        match &self.out {
            Some(path) => {
                fs::write(path, &rendered)?;
                output.success(&format!("Wrote {}", path.display()));
            }
            None => {
                std::io::stdout().write_all(rendered.as_bytes())?;
            }
        }
        Ok(())
    }
}
