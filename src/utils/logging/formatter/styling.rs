//! Styling for console log lines

use console::style;
use tracing::Level;

use super::levels::ProcessingLevel;

/// Level tag shown after the tree prefix; INFO stays silent
pub fn format_level(level: &Level, use_color: bool) -> String {
    let tag = match *level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARN ",
        Level::INFO => return String::new(),
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    };

    if !use_color {
        return tag.to_string();
    }

    match *level {
        Level::ERROR => style(tag).red().bold().to_string(),
        Level::WARN => style(tag).yellow().to_string(),
        Level::DEBUG => style(tag).blue().to_string(),
        _ => style(tag).magenta().to_string(),
    }
}

pub fn get_tree_prefix(level: ProcessingLevel) -> &'static str {
    match level {
        ProcessingLevel::Root => "▶",
        ProcessingLevel::Stage => "●",
        ProcessingLevel::Step => "·",
        ProcessingLevel::Detail => " ",
    }
}

/// Applies styling to message content; failed stages are shown in red
pub fn style_message(message: &str, level: ProcessingLevel, use_color: bool) -> String {
    if !use_color {
        return message.to_string();
    }

    let failed = message.contains("FAILED") || message.starts_with("All strategies failed");

    match level {
        ProcessingLevel::Root => style(message).bold().cyan().to_string(),
        ProcessingLevel::Stage if failed => style(message).bold().red().to_string(),
        ProcessingLevel::Stage => style(message).bold().green().to_string(),
        ProcessingLevel::Step => style(message).cyan().to_string(),
        ProcessingLevel::Detail => style(message).dim().to_string(),
    }
}
