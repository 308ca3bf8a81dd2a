use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Configuration failed: {0}")]
    Config(#[from] ConfigError),

    #[error("Collection failed: {0}")]
    Collection(#[from] CollectionError),

    #[error("Processing failed: {0}")]
    Processing(#[from] ProcessingError),

    #[error("Storage failed: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid status URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Status page returned HTTP {0}")]
    Status(u16),

    #[error("No fixture file configured for test run")]
    MissingFixture,
}

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Value {value:?} of {key} is not a number")]
    InvalidNumber { key: String, value: String },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to encode payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write metric: {0}")]
    Write(#[from] io::Error),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Metrics endpoint rejected payload with HTTP {0}")]
    Rejected(u16),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed settings: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid settings: {0}")]
    Validation(String),
}
