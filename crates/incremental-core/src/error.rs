//! Unified Error Model
use std::any::Any;
use thiserror::Error;

/// Errors returned to the caller through `Result`.
#[derive(Error, Debug)]
pub enum IncrementalError {
    #[error("CONFIG/{0}")]
    Config(String),
}

/// A failure contained at a `bind` or `sink` boundary.
///
/// Never escapes to the caller; it only lives long enough to be rendered into
/// the message of a synthetic diagnostic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    #[error("{0}")]
    Failed(String),

    #[error("panicked: {0}")]
    Panicked(String),
}

impl Fault {
    pub(crate) fn failed(error: impl std::fmt::Display) -> Self {
        Self::Failed(error.to_string())
    }

    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Self::Panicked(message)
    }
}
