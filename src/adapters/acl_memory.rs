//! In-memory access authority.
//!
//! Implements [`AccessAuthority`] with a fixed-size user table. Nothing is
//! persisted; `init_storage` only validates the path and adopts the initial
//! policy. Used for host simulation and by the test suites.
//!
//! # Wire contracts of the forwarded queries
//!
//! | Id    | Request                        | Response                                   |
//! |-------|--------------------------------|--------------------------------------------|
//! | 11000 | count u32, start u32           | n u16, n × user, next u32 (0 = end)        |
//! | 11010 | name list                      | status u8                                  |
//! | 11020 | none                           | status u8 [, user]                         |
//! | 11030 | none                           | status u8, system u32, default_user u32    |
//! | 11040 | system u32, default_user u32   | as 11030                                   |
//! | 11050 | fingerprint list, perms u32    | status u8 [, user]                         |
//! | 11060 | fingerprint list, name list    | status u8 [, user]                         |
//! | 11070 | fingerprint list               | status u8                                  |
//!
//! A *user* record is `fingerprint list, name list, permissions u32`.

use heapless::{String, Vec};
use log::{info, warn};

use crate::app::ports::{AccessAuthority, StorageError};
use crate::rpc::auth::{AclSettings, Permissions, SystemPermissions};
use crate::rpc::buffer::{QueryRequest, QueryResponse};
use crate::rpc::marshal::{copy_bounded, copy_bounded_string, write_length_prefixed, write_str};
use crate::rpc::request::{FINGERPRINT_LEN, Fingerprint, Request};
use crate::rpc::status::{QueryError, QueryResult};

/// Maximum number of paired users.
pub const MAX_USERS: usize = 32;

/// Capacity of a user name slot.
pub const USER_NAME_CAPACITY: usize = 64;

/// Status byte leading every forwarded response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AclStatus {
    Ok = 0,
    NoSuchUser = 1,
    UsersFull = 2,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclUser {
    pub fingerprint: Fingerprint,
    pub name: String<USER_NAME_CAPACITY>,
    pub permissions: Permissions,
}

pub struct MemoryAcl {
    users: Vec<AclUser, MAX_USERS>,
    settings: AclSettings,
    path: Option<std::string::String>,
}

impl MemoryAcl {
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            settings: AclSettings::default(),
            path: None,
        }
    }

    /// Insert a user directly, bypassing pairing.
    pub fn add_user(
        &mut self,
        fingerprint: Fingerprint,
        name: &str,
        permissions: Permissions,
    ) -> Result<(), AclStatus> {
        let mut slot = String::new();
        // Over-long names are cut, keeping the last slot free.
        for c in name.chars() {
            if slot.len() + c.len_utf8() >= USER_NAME_CAPACITY || slot.push(c).is_err() {
                break;
            }
        }
        self.users
            .push(AclUser {
                fingerprint,
                name: slot,
                permissions,
            })
            .map_err(|_| AclStatus::UsersFull)
    }

    pub fn user(&self, fingerprint: &Fingerprint) -> Option<&AclUser> {
        self.users.iter().find(|u| u.fingerprint == *fingerprint)
    }

    pub fn users(&self) -> &[AclUser] {
        &self.users
    }

    pub fn settings(&self) -> AclSettings {
        self.settings
    }

    /// Path handed to `init_storage`, if it ran.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    fn caller(&self, request: &Request) -> Option<&AclUser> {
        request.fingerprint.as_ref().and_then(|fp| self.user(fp))
    }

    fn user_mut(&mut self, fingerprint: &Fingerprint) -> Option<&mut AclUser> {
        self.users.iter_mut().find(|u| u.fingerprint == *fingerprint)
    }

    /// Answer with `staged` and store it only once the reply is written.
    fn commit_user(
        &mut self,
        staged: Option<AclUser>,
        response: &mut QueryResponse<'_>,
    ) -> QueryResult {
        write_user_result(response, staged.as_ref())?;
        if let Some(user) = staged {
            if let Some(slot) = self.user_mut(&user.fingerprint) {
                *slot = user;
            }
        }
        Ok(())
    }

    /// Is the caller's connection kind (local or remote) enabled for both
    /// the system and the user?
    fn scope_allowed(&self, request: &Request, user: &AclUser) -> bool {
        if request.is_local {
            self.settings.system.contains(SystemPermissions::LOCAL_ACCESS)
                && user.permissions.contains(Permissions::LOCAL_ACCESS)
        } else {
            self.settings.system.contains(SystemPermissions::REMOTE_ACCESS)
                && user.permissions.contains(Permissions::REMOTE_ACCESS)
        }
    }

    fn require_admin(&self, request: &Request) -> QueryResult {
        if self.is_request_allowed(request, Permissions::ADMIN) {
            Ok(())
        } else {
            Err(QueryError::NoAccess)
        }
    }
}

impl Default for MemoryAcl {
    fn default() -> Self {
        Self::new()
    }
}

fn read_fingerprint(query: &mut QueryRequest<'_>) -> Result<Fingerprint, QueryError> {
    let mut raw: Vec<u8, FINGERPRINT_LEN> = Vec::new();
    copy_bounded(query, &mut raw)?;
    Fingerprint::from_slice(&raw).ok_or(QueryError::RequestTooSmall)
}

fn write_user(response: &mut QueryResponse<'_>, user: &AclUser) -> QueryResult {
    write_length_prefixed(response, user.fingerprint.as_bytes())?;
    write_str(response, &user.name)?;
    response.write_u32(user.permissions.bits())
}

fn write_settings(response: &mut QueryResponse<'_>, settings: &AclSettings) -> QueryResult {
    write_status(response, AclStatus::Ok)?;
    response.write_u32(settings.system.bits())?;
    response.write_u32(settings.default_user.bits())
}

fn write_status(response: &mut QueryResponse<'_>, status: AclStatus) -> QueryResult {
    response.write_u8(status as u8)
}

/// Status, then the user record when there is one.
fn write_user_result(response: &mut QueryResponse<'_>, user: Option<&AclUser>) -> QueryResult {
    match user {
        Some(u) => {
            write_status(response, AclStatus::Ok)?;
            write_user(response, u)
        }
        None => write_status(response, AclStatus::NoSuchUser),
    }
}

impl AccessAuthority for MemoryAcl {
    fn init_storage(&mut self, path: &str, settings: &AclSettings) -> Result<(), StorageError> {
        if path.trim().is_empty() {
            warn!("acl: empty storage path");
            return Err(StorageError::InvalidPath);
        }
        self.settings = *settings;
        self.path = Some(path.into());
        info!("acl: in-memory store for '{}' ({} users)", path, self.users.len());
        Ok(())
    }

    fn is_request_allowed(&self, request: &Request, required: Permissions) -> bool {
        self.caller(request)
            .is_some_and(|u| self.scope_allowed(request, u) && u.permissions.contains(required))
    }

    fn is_pair_allowed(&self, request: &Request) -> bool {
        self.settings.system.contains(SystemPermissions::PAIRING)
            && request.is_local
            && request.fingerprint.is_some()
            && self.caller(request).is_none()
    }

    fn is_user_paired(&self, request: &Request) -> bool {
        self.caller(request).is_some()
    }

    fn is_user_owner(&self, request: &Request) -> bool {
        self.caller(request)
            .is_some_and(|u| u.permissions.contains(Permissions::ADMIN))
    }

    fn users_get(
        &mut self,
        request: &Request,
        query: &mut QueryRequest<'_>,
        response: &mut QueryResponse<'_>,
    ) -> QueryResult {
        self.require_admin(request)?;
        let count = query.read_u32()? as usize;
        let start = query.read_u32()? as usize;

        let total = self.users.len();
        let start = start.min(total);
        let end = start.saturating_add(count).min(total);

        response.write_u16((end - start) as u16)?;
        for user in &self.users[start..end] {
            write_user(response, user)?;
        }
        response.write_u32(if end < total { end as u32 } else { 0 })
    }

    fn pair_with_device(
        &mut self,
        request: &Request,
        query: &mut QueryRequest<'_>,
        response: &mut QueryResponse<'_>,
    ) -> QueryResult {
        let Some(fingerprint) = request.fingerprint else {
            return Err(QueryError::NoAccess);
        };
        let mut name: String<USER_NAME_CAPACITY> = String::new();
        copy_bounded_string(query, &mut name)?;

        let permissions = if self.users.is_empty() {
            self.settings.first_user
        } else {
            self.settings.default_user
        };
        if self.users.is_full() {
            warn!("acl: pairing '{}' failed: {:?}", name, AclStatus::UsersFull);
            return write_status(response, AclStatus::UsersFull);
        }
        write_status(response, AclStatus::Ok)?;
        match self.add_user(fingerprint, &name, permissions) {
            Ok(()) => info!("acl: paired '{}' ({:?})", name, fingerprint),
            Err(status) => warn!("acl: pairing '{}' failed: {:?}", name, status),
        }
        Ok(())
    }

    fn user_me(
        &mut self,
        request: &Request,
        _query: &mut QueryRequest<'_>,
        response: &mut QueryResponse<'_>,
    ) -> QueryResult {
        write_user_result(response, self.caller(request))
    }

    fn system_get_settings(
        &mut self,
        request: &Request,
        _query: &mut QueryRequest<'_>,
        response: &mut QueryResponse<'_>,
    ) -> QueryResult {
        self.require_admin(request)?;
        write_settings(response, &self.settings)
    }

    fn system_set_settings(
        &mut self,
        request: &Request,
        query: &mut QueryRequest<'_>,
        response: &mut QueryResponse<'_>,
    ) -> QueryResult {
        self.require_admin(request)?;
        let staged = AclSettings {
            system: SystemPermissions::from_bits_retain(query.read_u32()?),
            default_user: Permissions::from_bits_retain(query.read_u32()?),
            ..self.settings
        };
        write_settings(response, &staged)?;
        info!(
            "acl: system={:#010x} default_user={:#010x}",
            staged.system.bits(),
            staged.default_user.bits()
        );
        self.settings = staged;
        Ok(())
    }

    fn user_set_permissions(
        &mut self,
        request: &Request,
        query: &mut QueryRequest<'_>,
        response: &mut QueryResponse<'_>,
    ) -> QueryResult {
        self.require_admin(request)?;
        let fingerprint = read_fingerprint(query)?;
        let permissions = Permissions::from_bits_retain(query.read_u32()?);
        let staged = self.user(&fingerprint).map(|u| AclUser {
            permissions,
            ..u.clone()
        });
        self.commit_user(staged, response)
    }

    fn user_set_name(
        &mut self,
        request: &Request,
        query: &mut QueryRequest<'_>,
        response: &mut QueryResponse<'_>,
    ) -> QueryResult {
        self.require_admin(request)?;
        let fingerprint = read_fingerprint(query)?;
        let mut name: String<USER_NAME_CAPACITY> = String::new();
        copy_bounded_string(query, &mut name)?;
        let staged = self.user(&fingerprint).map(|u| AclUser {
            name,
            ..u.clone()
        });
        self.commit_user(staged, response)
    }

    fn user_remove(
        &mut self,
        request: &Request,
        query: &mut QueryRequest<'_>,
        response: &mut QueryResponse<'_>,
    ) -> QueryResult {
        self.require_admin(request)?;
        let fingerprint = read_fingerprint(query)?;
        match self.users.iter().position(|u| u.fingerprint == fingerprint) {
            Some(idx) => {
                write_status(response, AclStatus::Ok)?;
                self.users.remove(idx);
                info!("acl: removed {:?}", fingerprint);
                Ok(())
            }
            None => write_status(response, AclStatus::NoSuchUser),
        }
    }
}
