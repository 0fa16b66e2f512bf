//! Port traits: the boundary between the gateway core and its collaborators.
//!
//! ```text
//!   SessionDriver ──▶ QueryDispatcher (Gateway) ──▶ AccessAuthority
//! ```
//!
//! Both collaborators are black boxes: the driver owns the secure channel
//! and calls back into the gateway once per delivered query, the authority
//! owns user records and fingerprint verification.
//!
//! ## Security notes
//!
//! - **AccessAuthority** answers every privilege question. The gateway
//!   never inspects fingerprints itself.
//! - The forwarding operations receive the raw request cursor and must read
//!   payload fields through [`marshal`](crate::rpc::marshal) or the cursor
//!   API, never by trusting declared sizes.

use crate::config::SessionSetup;
use crate::rpc::auth::{AclSettings, Permissions};
use crate::rpc::buffer::{QueryRequest, QueryResponse};
use crate::rpc::request::Request;
use crate::rpc::status::{QueryResult, QueryStatus};

// ───────────────────────────────────────────────────────────────
// Access authority (driven adapter: gateway ↔ ACL engine)
// ───────────────────────────────────────────────────────────────

/// Opaque access-control engine.
///
/// Predicates are read-only. The forwarding operations carry their own
/// privilege checks; the gateway adds its own gate in front of the ones
/// that need owner standing.
pub trait AccessAuthority {
    /// Open (or create) the backing store at `path`.
    fn init_storage(&mut self, path: &str, settings: &AclSettings) -> Result<(), StorageError>;

    /// Does the caller hold every bit in `required`?
    fn is_request_allowed(&self, request: &Request, required: Permissions) -> bool;

    fn is_pair_allowed(&self, request: &Request) -> bool;

    fn is_user_paired(&self, request: &Request) -> bool;

    fn is_user_owner(&self, request: &Request) -> bool;

    fn users_get(
        &mut self,
        request: &Request,
        query: &mut QueryRequest<'_>,
        response: &mut QueryResponse<'_>,
    ) -> QueryResult;

    fn pair_with_device(
        &mut self,
        request: &Request,
        query: &mut QueryRequest<'_>,
        response: &mut QueryResponse<'_>,
    ) -> QueryResult;

    fn user_me(
        &mut self,
        request: &Request,
        query: &mut QueryRequest<'_>,
        response: &mut QueryResponse<'_>,
    ) -> QueryResult;

    fn system_get_settings(
        &mut self,
        request: &Request,
        query: &mut QueryRequest<'_>,
        response: &mut QueryResponse<'_>,
    ) -> QueryResult;

    fn system_set_settings(
        &mut self,
        request: &Request,
        query: &mut QueryRequest<'_>,
        response: &mut QueryResponse<'_>,
    ) -> QueryResult;

    fn user_set_permissions(
        &mut self,
        request: &Request,
        query: &mut QueryRequest<'_>,
        response: &mut QueryResponse<'_>,
    ) -> QueryResult;

    fn user_set_name(
        &mut self,
        request: &Request,
        query: &mut QueryRequest<'_>,
        response: &mut QueryResponse<'_>,
    ) -> QueryResult;

    fn user_remove(
        &mut self,
        request: &Request,
        query: &mut QueryRequest<'_>,
        response: &mut QueryResponse<'_>,
    ) -> QueryResult;
}

// ───────────────────────────────────────────────────────────────
// Session driver (driving adapter: secure transport → gateway)
// ───────────────────────────────────────────────────────────────

/// The gateway side of a query delivery.
///
/// Not reentrant: a driver must not deliver another query before the
/// previous `dispatch` call returns. `&mut self` makes that structural.
pub trait QueryDispatcher {
    fn dispatch(
        &mut self,
        request: &Request,
        query: &mut QueryRequest<'_>,
        response: &mut QueryResponse<'_>,
    ) -> QueryStatus;
}

/// Secure peer-to-peer transport.
///
/// # Liveness
///
/// [`tick`](Self::tick) must be called at least every 10 ms or the remote
/// session times out. That obligation sits with the embedding loop.
pub trait SessionDriver {
    fn start(&mut self, setup: &SessionSetup) -> Result<(), DriverError>;

    /// Process pending transport events, delivering any complete queries
    /// to `dispatcher` in arrival order.
    fn tick(&mut self, dispatcher: &mut dyn QueryDispatcher);

    fn close(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`AccessAuthority::init_storage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Path is empty or not usable.
    InvalidPath,
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors from [`SessionDriver::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// The transport could not be brought up.
    StartFailed,
    /// Local port is already in use.
    AddressInUse,
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidPath => write!(f, "invalid path"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for DriverError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::StartFailed => write!(f, "start failed"),
            Self::AddressInUse => write!(f, "address in use"),
        }
    }
}
