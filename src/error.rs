use reqwest::StatusCode;
use thiserror::Error;

/// Which REST call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn describe(&self) -> &'static str {
        match self {
            Operation::List => "fetching events",
            Operation::Create => "creating event",
            Operation::Update => "updating event",
            Operation::Delete => "deleting event",
        }
    }
}

/// Any failure of a REST call against the events API.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("error {}: {source}", .op.describe())]
    Request {
        op: Operation,
        #[source]
        source: reqwest::Error,
    },

    #[error("error {}: server returned {status}: {body}", .op.describe())]
    Status {
        op: Operation,
        status: StatusCode,
        body: String,
    },
}

impl TransportError {
    pub fn operation(&self) -> Operation {
        match self {
            TransportError::Request { op, .. } | TransportError::Status { op, .. } => *op,
        }
    }
}
