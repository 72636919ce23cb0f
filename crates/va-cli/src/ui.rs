use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{ColorMode, GlobalFlags, OutputFormat, ProgressMode};

#[derive(Clone, Copy, Debug)]
pub struct UiPrefs {
    pub table_color: bool,
    pub progress: bool,
    pub term_width: Option<usize>,
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let _ = UI_PREFS.set(resolve(
        flags,
        std::io::stdout().is_terminal(),
        std::io::stderr().is_terminal(),
        std::env::var_os("NO_COLOR").is_some(),
        std::env::var("COLUMNS").ok().as_deref(),
    ));
}

fn resolve(
    flags: &GlobalFlags,
    stdout_tty: bool,
    stderr_tty: bool,
    no_color: bool,
    columns: Option<&str>,
) -> UiPrefs {
    let table = flags.format == OutputFormat::Table;
    let table_color = match flags.color {
        ColorMode::Always => table,
        ColorMode::Never => false,
        ColorMode::Auto => stdout_tty && table && !flags.quiet && !no_color,
    };

    // Spinners draw on stderr, so JSON on stdout can still be piped.
    let progress = match flags.progress {
        ProgressMode::On => !flags.quiet,
        ProgressMode::Off => false,
        ProgressMode::Auto => stderr_tty && !flags.quiet,
    };

    let term_width = columns
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= 40);

    UiPrefs {
        table_color,
        progress,
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
