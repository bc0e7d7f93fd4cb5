use thiserror::Error;

#[derive(Debug, Error)]
pub enum CallsError {
    #[error("malformed response: no element with class '{marker}' in fetched page")]
    MalformedResponse { marker: String },

    #[error("invalid sync transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("no bound element matches '{0}'")]
    NoSuchBinding(String),

    #[error("element {element} belongs to region generation {bound}, current is {current}")]
    StaleBinding {
        element: usize,
        bound: u64,
        current: u64,
    },

    #[error("element {0} is hidden and cannot be clicked")]
    Hidden(String),

    #[error("invalid selector '{0}': expected '.class' or '#id'")]
    InvalidSelector(String),

    #[error("unknown office '{0}': expected senate, house or governor")]
    UnknownOffice(String),

    #[error("unknown party '{0}': expected dem, gop or none")]
    UnknownParty(String),

    #[error("config file not found: {0}")]
    ConfigNotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CallsError>;
