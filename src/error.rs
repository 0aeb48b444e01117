use thiserror::Error;

/// Problems with the static practice data: rows, word pools and sentence templates.
///
/// These point at a bug in the shipped data (or in a caller passing an id that
/// was never registered), never at something the user typed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown row: {0}")]
    UnknownRow(String),

    #[error("row {0} is not defined")]
    MissingRow(String),

    #[error("row {0} is defined more than once")]
    DuplicateRow(String),

    #[error("row {0} has no characters")]
    EmptyRow(String),

    #[error("unknown slot {slot:?} in template {template:?}")]
    UnknownSlot { slot: String, template: String },

    #[error("missing pool for slot {0:?}")]
    EmptyPool(String),

    #[error("no sentence templates defined")]
    NoTemplates,

    #[error("embedded data file not found: {0}")]
    MissingData(&'static str),

    #[error("unable to deserialize {file}: {source}")]
    Malformed {
        file: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
