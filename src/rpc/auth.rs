//! Permission gate: two-tier access model in front of the access authority.
//!
//! Callers are either **Guest** (anyone the secure channel let through) or
//! **Owner** (administrative standing confirmed by the authority). The gate
//! holds no state of its own; every answer comes from the
//! [`AccessAuthority`] it wraps.

use bitflags::bitflags;

use crate::app::ports::AccessAuthority;

use super::request::Request;

// ── Permission bits ──────────────────────────────────────────

bitflags! {
    /// Per-user permission bits as stored by the access authority.
    ///
    /// The empty set is the "no permission required" sentinel; `ADMIN` is
    /// the "administrative permission required" sentinel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Permissions: u32 {
        const LOCAL_ACCESS = 0x8000_0000;
        const REMOTE_ACCESS = 0x4000_0000;
        const ADMIN = 0x2000_0000;
    }
}

bitflags! {
    /// Device-wide switches.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SystemPermissions: u32 {
        const LOCAL_ACCESS = 0x8000_0000;
        const REMOTE_ACCESS = 0x4000_0000;
        const PAIRING = 0x2000_0000;
    }
}

/// Initial policy handed to the authority when its store is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AclSettings {
    pub system: SystemPermissions,
    /// Bits granted to users paired after the first.
    pub default_user: Permissions,
    /// Bits granted to the very first paired user.
    pub first_user: Permissions,
}

impl Default for AclSettings {
    fn default() -> Self {
        Self {
            system: SystemPermissions::all(),
            default_user: Permissions::LOCAL_ACCESS,
            first_user: Permissions::all(),
        }
    }
}

// ── Permission levels ────────────────────────────────────────

/// Standing a query requires. `Guest < Owner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Permission {
    Guest,
    Owner,
}

impl Permission {
    /// Bit pattern the authority is asked about for this level.
    pub const fn required_bits(self) -> Permissions {
        match self {
            Self::Guest => Permissions::empty(),
            Self::Owner => Permissions::ADMIN,
        }
    }
}

// ── Gate ─────────────────────────────────────────────────────

/// Read-only view over an authority for privilege decisions.
pub struct PermissionGate<'a> {
    authority: &'a dyn AccessAuthority,
}

impl<'a> PermissionGate<'a> {
    pub fn new(authority: &'a dyn AccessAuthority) -> Self {
        Self { authority }
    }

    /// Does `request` meet `level`?
    ///
    /// Guest is satisfied without consulting the authority; this is the
    /// single place to tighten it.
    pub fn authorized(&self, request: &Request, level: Permission) -> bool {
        match level {
            Permission::Guest => true,
            Permission::Owner => self
                .authority
                .is_request_allowed(request, level.required_bits()),
        }
    }

    pub fn pairing_allowed(&self, request: &Request) -> bool {
        self.authority.is_pair_allowed(request)
    }

    pub fn is_paired(&self, request: &Request) -> bool {
        self.authority.is_user_paired(request)
    }

    pub fn is_owner(&self, request: &Request) -> bool {
        self.authority.is_user_owner(request)
    }
}

// ── Tests ────────────────────────────────────────────────────
