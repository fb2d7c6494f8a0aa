use thiserror::Error;

/// Validation and contract errors exposed by `kennel-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("record must be a JSON object, got {found}")]
    RecordNotObject { found: &'static str },
    #[error("field 'breed' is required")]
    MissingBreed,
    #[error("field 'breed' must be a string, got {found}")]
    BreedNotString { found: &'static str },
    #[error("breed name cannot be empty")]
    EmptyBreed,

    #[error("field 'image' must be a string or null, got {found}")]
    ImageNotString { found: &'static str },
    #[error("image '{value}' is not a valid URL: {reason}")]
    InvalidImageUrl { value: String, reason: String },
    #[error("image URL scheme must be http or https: '{scheme}'")]
    UnsupportedImageScheme { scheme: String },
    #[error("image URL must have a host: '{value}'")]
    ImageMissingHost { value: String },
    #[error("image URL length {len} exceeds max {max}")]
    ImageTooLong { len: usize, max: usize },

    #[error("upstream base URL is invalid: {reason}")]
    InvalidBaseUrl { reason: String },
    #[error("field '{field}' must be greater than zero")]
    ZeroValue { field: &'static str },
}

/// Short JSON type name used in validation messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
