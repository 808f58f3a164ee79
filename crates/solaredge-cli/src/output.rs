//! JSON output for the solaredge CLI

use std::io::{self, Write};

use anyhow::{Context, Result};
use serde::Serialize;

/// Render a value as compact or indented JSON
pub fn render_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.context("Failed to serialize output")
}

/// Print a value to stdout as JSON followed by a newline
pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let rendered = render_json(value, pretty)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}").context("Failed to write output")
}
