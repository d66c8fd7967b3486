// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Content is not valid UTF-8 text: {0}")]
    Decode(#[from] std::str::Utf8Error),

    #[error("Malformed JSON in {identifier}: {source}")]
    Parse {
        identifier: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not read file: {0}")]
    Read(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("File already exists: {0}")]
    FileExists(String),

    #[error("No rows to export")]
    NothingToExport,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Nothing to export: none of the {0} documents could be processed")]
    NothingToExport(usize),
}
