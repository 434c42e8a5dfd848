use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{ColorMode, GlobalFlags, OutputFormat};

#[derive(Clone, Copy, Debug)]
pub struct UiPrefs {
    pub table_color: bool,
    pub progress: bool,
    pub term_width: Option<usize>,
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let is_tty = std::io::stdout().is_terminal();
    let no_color = std::env::var_os("NO_COLOR").is_some();
    let _ = UI_PREFS.set(resolve(flags, is_tty, no_color));
}

fn resolve(flags: &GlobalFlags, is_tty: bool, no_color: bool) -> UiPrefs {
    let table = flags.format == OutputFormat::Table;
    let table_color = match flags.color {
        ColorMode::Always => table,
        ColorMode::Never => false,
        ColorMode::Auto => is_tty && table && !flags.quiet && !no_color,
    };

    let term_width = std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= 40);

    UiPrefs {
        table_color,
        progress: is_tty && !flags.quiet && flags.format != OutputFormat::Json,
        term_width,
    }
}

#[must_use]
pub fn prefs() -> UiPrefs {
    *UI_PREFS.get().unwrap_or(&UiPrefs {
        table_color: false,
        progress: false,
        term_width: None,
    })
}

#[cfg(test)]
mod tests {
    use super::resolve;
    use crate::cli::{ColorMode, GlobalFlags, OutputFormat};

    fn flags(format: OutputFormat, color: ColorMode, quiet: bool) -> GlobalFlags {
        GlobalFlags {
            format,
            limit: None,
            quiet,
            color,
            fail_on: None,
        }
    }

    #[test]
    fn auto_color_needs_a_terminal() {
        assert!(resolve(&flags(OutputFormat::Table, ColorMode::Auto, false), true, false).table_color);
        assert!(!resolve(&flags(OutputFormat::Table, ColorMode::Auto, false), false, false).table_color);
        assert!(!resolve(&flags(OutputFormat::Table, ColorMode::Auto, false), true, true).table_color);
    }

    #[test]
    fn color_only_applies_to_tables() {
        assert!(!resolve(&flags(OutputFormat::Json, ColorMode::Always, false), true, false).table_color);
        assert!(!resolve(&flags(OutputFormat::Table, ColorMode::Never, false), true, false).table_color);
    }

    #[test]
    fn quiet_and_json_hide_progress() {
        assert!(!resolve(&flags(OutputFormat::Table, ColorMode::Auto, true), true, false).progress);
        assert!(!resolve(&flags(OutputFormat::Json, ColorMode::Auto, false), true, false).progress);
        assert!(resolve(&flags(OutputFormat::Raw, ColorMode::Auto, false), true, false).progress);
    }
}
