//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, Write};

use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use wifiscope_core::ClientView;

use crate::cli::OutputFormat;
use crate::error::CliError;

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
    R: Tabled,
{
    Ok(match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Table::new(rows).with(Style::rounded()).to_string()
        }
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
        OutputFormat::Plain => data.iter().map(id_fn).collect::<Vec<_>>().join("\n"),
    })
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Row types ────────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct ClientRow {
    #[tabled(rename = "MAC")]
    pub mac: String,
    #[tabled(rename = "Address")]
    pub address: String,
    #[tabled(rename = "Host")]
    pub host: String,
    #[tabled(rename = "RSSI")]
    pub rssi: String,
    #[tabled(rename = "SSID")]
    pub ssid: String,
    #[tabled(rename = "Cap")]
    pub cap: String,
    #[tabled(rename = "Band")]
    pub band: String,
    #[tabled(rename = "Comment")]
    pub comment: String,
}

impl From<&ClientView> for ClientRow {
    fn from(c: &ClientView) -> Self {
        Self {
            mac: c.mac_address.clone(),
            address: c.active_address.clone(),
            host: c.host_name.clone(),
            rssi: c.rssi.clone(),
            ssid: c.ssid.clone(),
            cap: c.cap.clone(),
            band: c.band.clone(),
            comment: c.comment.clone(),
        }
    }
}
