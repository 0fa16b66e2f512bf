//! Unified error types for the gateway.
//!
//! Only startup and setup paths produce an [`Error`]. Per-query failures are
//! [`QueryError`](crate::rpc::status::QueryError) values reported back to the
//! remote client and never surface here. All variants are `Copy` so they can
//! be handed across the embedding boundary without allocation.

use core::fmt;

use crate::app::ports::{DriverError, StorageError};
use crate::rpc::request::QueryId;

// ---------------------------------------------------------------------------
// Top-level gateway error
// ---------------------------------------------------------------------------

/// Every fallible setup operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration is invalid and the device must not start.
    Config(ConfigError),
    /// The access-control storage could not be initialised.
    Storage(StorageError),
    /// The session driver refused to start.
    Driver(DriverError),
    /// A handler could not be registered.
    Registry(RegistryError),
}

impl Error {
    /// Negative status code reported to the embedding application.
    ///
    /// Keeps the historical numbering so existing bootstrap scripts can
    /// tell a bad key from a broken ACL file without parsing text.
    pub const fn status_code(&self) -> i32 {
        match self {
            Self::Config(ConfigError::InvalidPresharedKey) => -1,
            Self::Storage(_) => -2,
            Self::Driver(_) => -3,
            Self::Config(_) => -4,
            Self::Registry(e) => e.code(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Storage(e) => write!(f, "acl storage: {e}"),
            Self::Driver(e) => write!(f, "session driver: {e}"),
            Self::Registry(e) => write!(f, "registry: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The pre-shared key is not 32 hex digits (16 bytes).
    InvalidPresharedKey,
    /// A mandatory field is empty.
    MissingField(&'static str),
    /// A field exceeds the capacity of its fixed-size slot.
    FieldTooLong(&'static str),
    /// The configuration document could not be parsed.
    Malformed,
    /// Administrative mode was requested without an access authority.
    AuthorityRequired,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPresharedKey => write!(f, "pre-shared key must be 32 hex digits"),
            Self::MissingField(name) => write!(f, "missing field `{name}`"),
            Self::FieldTooLong(name) => write!(f, "field `{name}` is too long"),
            Self::Malformed => write!(f, "malformed configuration document"),
            Self::AuthorityRequired => {
                write!(f, "device block present but no access authority supplied")
            }
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<DriverError> for Error {
    fn from(e: DriverError) -> Self {
        Self::Driver(e)
    }
}

// ---------------------------------------------------------------------------
// Registry errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// A handler for this query id is already present.
    AlreadyRegistered(QueryId),
    /// Every handler slot is taken.
    Full,
}

impl RegistryError {
    pub const fn code(&self) -> i32 {
        match self {
            Self::Full => -1,
            Self::AlreadyRegistered(_) => -2,
        }
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRegistered(id) => write!(f, "handler for query {id} already registered"),
            Self::Full => write!(f, "no free handler slots"),
        }
    }
}

impl From<RegistryError> for Error {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Gateway-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
