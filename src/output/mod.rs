pub mod csv;
pub mod json;
pub mod table;

use std::io::IsTerminal;

use crate::cli::OutputFlags;
use crate::config::{OutputFormat, SettingsResolved};

pub use table::TableOptions;

pub fn select_format(flags: &OutputFlags, settings: &SettingsResolved) -> OutputFormat {
    resolve_format(flags, settings, std::io::stdout().is_terminal())
}

/// Explicit flags win. Without one, terminals get the configured default and
/// pipes get markdown so the rows stay greppable.
fn resolve_format(flags: &OutputFlags, settings: &SettingsResolved, is_tty: bool) -> OutputFormat {
    if flags.json {
        return OutputFormat::Json;
    }
    if flags.markdown {
        return OutputFormat::Markdown;
    }
    if flags.pretty {
        return OutputFormat::Pretty;
    }

    match settings.output.default_format {
        OutputFormat::Json => OutputFormat::Json,
        default if is_tty => default,
        _ => OutputFormat::Markdown,
    }
}
