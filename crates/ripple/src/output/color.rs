//! Color and styling helpers for CLI output.
//!
//! States are colored by severity:
//!   - Working:  green
//!   - AtRisk:   yellow
//!   - Degraded: magenta
//!   - Failed:   red, bold

use colored::Colorize;

use super::OutputConfig;
use crate::state::State;

/// Apply semantic "warning" color (yellow) to text.
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Apply semantic "info" color (cyan) to text.
pub fn info(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.cyan().to_string()
}

/// Apply dimmed style to text.
pub fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

/// Apply bold style to text.
pub fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}

/// Render a state name, padded to `width` before coloring.
pub fn colorize_state(state: State, width: usize, config: &OutputConfig) -> String {
    let text = format!("{:<width$}", state.as_str());
    if !config.use_colors {
        return text;
    }
    match state {
        State::Working => text.green().to_string(),
        State::AtRisk => text.yellow().to_string(),
        State::Degraded => text.magenta().to_string(),
        State::Failed => text.red().bold().to_string(),
    }
}
