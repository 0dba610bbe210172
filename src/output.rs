//! # Output Configuration
//!
//! Terminal presentation for the `isi-create` binary: colour and emoji
//! selection, the startup banner, status lines and progress spinners.
//!
//! ## Respecting User Preferences
//!
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! Spinners are only drawn when stdout is a terminal, so piped output and
//! tests see plain lines.

use std::env;
use std::time::Duration;

use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};

/// Output configuration for controlling colors, emojis and spinners.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
    /// Whether stdout is an interactive terminal.
    pub is_terminal: bool,
}

impl OutputConfig {
    /// Create an output configuration from the `--color` flag and the
    /// environment.
    ///
    /// `always` and `never` win over everything else; any other value
    /// detects support from the environment and the terminal.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let is_terminal = Term::stdout().is_term();
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => color_from_env().unwrap_or_else(|| {
                is_terminal && Term::stdout().features().colors_supported()
            }),
        };

        Self {
            use_color,
            is_terminal,
        }
    }

    /// Create a configuration without colors, for tests and piped output.
    pub fn plain() -> Self {
        Self {
            use_color: false,
            is_terminal: false,
        }
    }

    /// Print the startup banner.
    pub fn banner(&self) {
        println!("{}\n", self.banner_line());
    }

    fn banner_line(&self) -> String {
        let title = "ISI.INVOICE";
        let subtitle = format!("project generator v{}", env!("CARGO_PKG_VERSION"));
        if self.use_color {
            format!("{} {}", style(title).cyan().bold(), style(subtitle).dim())
        } else {
            format!("{} {}", title, subtitle)
        }
    }

    /// Print a status line.
    pub fn step(&self, emoji: &str, plain: &str, message: &str) {
        println!("{} {}", self.emoji(emoji, plain), message);
    }

    /// Print a success line.
    pub fn success(&self, message: &str) {
        let text = if self.use_color {
            style(message).green().to_string()
        } else {
            message.to_string()
        };
        println!("{} {}", self.emoji("✅", "[OK]"), text);
    }

    /// Print a warning line.
    pub fn warn(&self, message: &str) {
        let text = if self.use_color {
            style(message).yellow().to_string()
        } else {
            message.to_string()
        };
        println!("{}  {}", self.emoji("⚠️", "[WARN]"), text);
    }

    /// Pick the emoji or its plain-text fallback.
    pub fn emoji<'a>(&self, emoji: &'a str, plain: &'a str) -> &'a str {
        if self.use_color {
            emoji
        } else {
            plain
        }
    }

    /// A spinner showing `message`, hidden when stdout is not a terminal.
    pub fn spinner(&self, message: &str) -> ProgressBar {
        if !self.is_terminal {
            println!("{} {}", self.emoji("⏳", "[..]"), message);
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Colour preference expressed through environment variables, if any.
fn color_from_env() -> Option<bool> {
    // The presence of NO_COLOR (even if empty) disables colors
    if env::var_os("NO_COLOR").is_some() {
        return Some(false);
    }
    if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
        return Some(false);
    }
    if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
        return Some(true);
    }
    if env::var("TERM").is_ok_and(|v| v == "dumb") {
        return Some(false);
    }
    None
}
