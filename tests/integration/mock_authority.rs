//! Recording access authority for integration tests.
//!
//! Answers the predicates from fixed flags and logs every forwarded call,
//! so tests can assert that a gated query never reached the authority.

use std::cell::RefCell;
use std::rc::Rc;

use p2pgate::app::ports::{AccessAuthority, StorageError};
use p2pgate::rpc::auth::{AclSettings, Permissions};
use p2pgate::{QueryRequest, QueryResponse, QueryResult, Request};

/// Shared log of forwarded operation names.
pub type CallLog = Rc<RefCell<Vec<&'static str>>>;

pub struct MockAuthority {
    pub pair_allowed: bool,
    pub paired: bool,
    pub owner: bool,
    pub fail_storage: bool,
    calls: CallLog,
}

#[allow(dead_code)]
impl MockAuthority {
    pub fn new() -> Self {
        Self {
            pair_allowed: false,
            paired: false,
            owner: false,
            fail_storage: false,
            calls: Rc::default(),
        }
    }

    pub fn owner() -> Self {
        Self {
            paired: true,
            owner: true,
            ..Self::new()
        }
    }

    pub fn pairing() -> Self {
        Self {
            pair_allowed: true,
            ..Self::new()
        }
    }

    /// Handle on the call log that stays valid after the mock is boxed.
    pub fn calls(&self) -> CallLog {
        Rc::clone(&self.calls)
    }

    fn forward(&self, name: &'static str, response: &mut QueryResponse<'_>) -> QueryResult {
        self.calls.borrow_mut().push(name);
        response.write_u8(0)
    }
}

impl AccessAuthority for MockAuthority {
    fn init_storage(&mut self, _path: &str, _settings: &AclSettings) -> Result<(), StorageError> {
        if self.fail_storage {
            Err(StorageError::IoError)
        } else {
            Ok(())
        }
    }

    fn is_request_allowed(&self, _request: &Request, required: Permissions) -> bool {
        !required.contains(Permissions::ADMIN) || self.owner
    }

    fn is_pair_allowed(&self, _request: &Request) -> bool {
        self.pair_allowed
    }

    fn is_user_paired(&self, _request: &Request) -> bool {
        self.paired
    }

    fn is_user_owner(&self, _request: &Request) -> bool {
        self.owner
    }

    fn users_get(
        &mut self,
        _: &Request,
        _: &mut QueryRequest<'_>,
        r: &mut QueryResponse<'_>,
    ) -> QueryResult {
        self.forward("users_get", r)
    }

    fn pair_with_device(
        &mut self,
        _: &Request,
        _: &mut QueryRequest<'_>,
        r: &mut QueryResponse<'_>,
    ) -> QueryResult {
        self.forward("pair_with_device", r)
    }

    fn user_me(
        &mut self,
        _: &Request,
        _: &mut QueryRequest<'_>,
        r: &mut QueryResponse<'_>,
    ) -> QueryResult {
        self.forward("user_me", r)
    }

    fn system_get_settings(
        &mut self,
        _: &Request,
        _: &mut QueryRequest<'_>,
        r: &mut QueryResponse<'_>,
    ) -> QueryResult {
        self.forward("system_get_settings", r)
    }

    fn system_set_settings(
        &mut self,
        _: &Request,
        _: &mut QueryRequest<'_>,
        r: &mut QueryResponse<'_>,
    ) -> QueryResult {
        self.forward("system_set_settings", r)
    }

    fn user_set_permissions(
        &mut self,
        _: &Request,
        _: &mut QueryRequest<'_>,
        r: &mut QueryResponse<'_>,
    ) -> QueryResult {
        self.forward("user_set_permissions", r)
    }

    fn user_set_name(
        &mut self,
        _: &Request,
        _: &mut QueryRequest<'_>,
        r: &mut QueryResponse<'_>,
    ) -> QueryResult {
        self.forward("user_set_name", r)
    }

    fn user_remove(
        &mut self,
        _: &Request,
        _: &mut QueryRequest<'_>,
        r: &mut QueryResponse<'_>,
    ) -> QueryResult {
        self.forward("user_remove", r)
    }
}
