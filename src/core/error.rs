use thiserror::Error;

use crate::core::types::EntityId;

#[derive(Error, Debug)]
pub enum SkirmishError {
    #[error("{kind} has no attribute named {name}")]
    UnknownAttribute { kind: &'static str, name: String },

    #[error("{kind} attribute {name} is read-only")]
    ReadOnlyAttribute { kind: &'static str, name: String },

    #[error("Attribute {name} expects {expected}, got {found}")]
    AttributeType {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SkirmishError>;
