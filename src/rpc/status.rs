//! Query outcomes as seen by handlers and by the transport.

use core::fmt;

/// Why a single query failed. Local to that query; never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryError {
    /// The request payload is truncated or malformed.
    RequestTooSmall,
    /// A declared length exceeds the destination capacity.
    RequestTooLarge,
    /// The response buffer cannot hold the reply.
    ResponseTooLarge,
    /// The caller lacks the standing this query requires.
    NoAccess,
    /// No handler recognises the query id.
    InvalidQueryId,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestTooSmall => write!(f, "request too small"),
            Self::RequestTooLarge => write!(f, "request too large"),
            Self::ResponseTooLarge => write!(f, "response too large"),
            Self::NoAccess => write!(f, "no access"),
            Self::InvalidQueryId => write!(f, "invalid query id"),
        }
    }
}

/// What every handler returns. `Ok(())` means the response is populated.
pub type QueryResult = Result<(), QueryError>;

/// Status code handed back to the transport for each dispatched query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum QueryStatus {
    ResponseReady = 0,
    NoAccess = 3,
    RequestTooSmall = 5,
    RequestTooLarge = 6,
    InvalidQueryId = 7,
    ResponseTooLarge = 8,
}

impl QueryStatus {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn is_ready(self) -> bool {
        matches!(self, Self::ResponseReady)
    }
}

impl From<QueryError> for QueryStatus {
    fn from(e: QueryError) -> Self {
        match e {
            QueryError::RequestTooSmall => Self::RequestTooSmall,
            QueryError::RequestTooLarge => Self::RequestTooLarge,
            QueryError::ResponseTooLarge => Self::ResponseTooLarge,
            QueryError::NoAccess => Self::NoAccess,
            QueryError::InvalidQueryId => Self::InvalidQueryId,
        }
    }
}

impl From<QueryResult> for QueryStatus {
    fn from(r: QueryResult) -> Self {
        r.map_or_else(Self::from, |()| Self::ResponseReady)
    }
}

/// Outcome of offering a query to the built-in administrative set.
///
/// `NotRecognized` is the fallback signal; it is never reported to a client
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    Handled(QueryResult),
    NotRecognized,
}
