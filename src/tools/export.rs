/// Connection export
///
/// Writes connection lists back out as CSV or JSON, in the formats
/// `import` reads.

use super::{ToolError, ToolResult};
use crate::protocol::ConnectionList;
use crate::types::Edge;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Export format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(ToolError::InvalidFormat(format!(
                "Unknown export format: {}",
                other
            ))),
        }
    }
}

/// Export options
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Pretty-print JSON output
    pub pretty_json: bool,
    /// Wrap JSON output as `{"connections": [...]}`
    pub wrap_json: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            pretty_json: true,
            wrap_json: true,
        }
    }
}

/// Export connections to a CSV file with a `from,to,dist` header
pub fn export_to_csv<P: AsRef<Path>>(edges: &[Edge], path: P) -> ToolResult<usize> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));

    for edge in edges {
        writer.serialize(edge)?;
    }
    writer.flush()?;

    info!(connections = edges.len(), "exported connections to CSV");
    Ok(edges.len())
}

/// Export connections to a JSON file
pub fn export_to_json<P: AsRef<Path>>(
    edges: &[Edge],
    path: P,
    options: &ExportOptions,
) -> ToolResult<usize> {
    let writer = BufWriter::new(File::create(path)?);

    if options.wrap_json {
        let list = ConnectionList::from(edges.to_vec());
        write_json(writer, &list, options.pretty_json)?;
    } else {
        write_json(writer, &edges, options.pretty_json)?;
    }

    info!(connections = edges.len(), "exported connections to JSON");
    Ok(edges.len())
}

fn write_json<W, T>(writer: W, value: &T, pretty: bool) -> ToolResult<()>
where
    W: std::io::Write,
    T: serde::Serialize + ?Sized,
{
    if pretty {
        serde_json::to_writer_pretty(writer, value)?;
    } else {
        serde_json::to_writer(writer, value)?;
    }
    Ok(())
}
