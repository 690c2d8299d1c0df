use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid {field} {value:?}: commas and line breaks cannot be stored")]
    InvalidField { field: &'static str, value: String },

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, RosterError>;
