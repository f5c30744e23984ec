/// Connection data tools
///
/// Helpers for getting connection lists in and out of files and for
/// replaying them as chunk streams.

pub mod chunking;
pub mod export;
pub mod import;

pub use chunking::{split_into_chunks, DEFAULT_CHUNK_SIZE};
pub use export::{export_to_csv, export_to_json, ExportFormat, ExportOptions};
pub use import::{import_from_csv, import_from_json, import_map_from_json, City, MapData};

use thiserror::Error;

/// Import/export errors
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

pub type ToolResult<T> = Result<T, ToolError>;
