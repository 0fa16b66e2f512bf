//! Built-in administrative queries.
//!
//! A fixed table of device-info, pairing and user-management queries served
//! ahead of application handlers when the gateway runs in administrative
//! mode. Each entry declares the standing it needs:
//!
//! | Id    | Query                   | Gate                     |
//! |-------|-------------------------|--------------------------|
//! | 0     | interface info          | guest                    |
//! | 10000 | public device info      | guest                    |
//! | 10010 | set device info         | owner                    |
//! | 11000 | list users              | authority decides        |
//! | 11010 | pair with device        | pairing allowed          |
//! | 11020 | current user            | guest                    |
//! | 11030 | get security settings   | owner                    |
//! | 11040 | set security settings   | owner                    |
//! | 11050 | set user permissions    | owner                    |
//! | 11060 | set user name           | owner                    |
//! | 11070 | remove user             | owner                    |
//!
//! Ids outside the table come back as [`Routed::NotRecognized`] so the
//! dispatcher can fall through to the registry.

use log::{debug, info, warn};

use crate::app::descriptor::{DeviceDescriptor, DeviceName};
use crate::app::ports::AccessAuthority;

use super::auth::{Permission, PermissionGate};
use super::buffer::{QueryRequest, QueryResponse};
use super::marshal::{copy_bounded_string, write_str};
use super::request::{QueryId, Request};
use super::status::{QueryError, QueryResult, Routed};

/// Every query id the built-in set answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum AdminQuery {
    InterfaceInfo = 0,
    PublicDeviceInfo = 10_000,
    SetDeviceInfo = 10_010,
    ListUsers = 11_000,
    PairWithDevice = 11_010,
    CurrentUser = 11_020,
    GetSecuritySettings = 11_030,
    SetSecuritySettings = 11_040,
    SetUserPermissions = 11_050,
    SetUserName = 11_060,
    RemoveUser = 11_070,
}

/// Gate applied before an administrative query runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Level(Permission),
    /// Caller must be allowed to pair right now.
    Pairing,
    /// The authority enforces its own check inside the forwarded call.
    Delegated,
}

impl AdminQuery {
    pub const ALL: [Self; 11] = [
        Self::InterfaceInfo,
        Self::PublicDeviceInfo,
        Self::SetDeviceInfo,
        Self::ListUsers,
        Self::PairWithDevice,
        Self::CurrentUser,
        Self::GetSecuritySettings,
        Self::SetSecuritySettings,
        Self::SetUserPermissions,
        Self::SetUserName,
        Self::RemoveUser,
    ];

    pub fn from_id(id: QueryId) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.id() == id)
    }

    pub const fn id(self) -> QueryId {
        self as QueryId
    }

    pub const fn requirement(self) -> Requirement {
        match self {
            Self::InterfaceInfo | Self::PublicDeviceInfo | Self::CurrentUser => {
                Requirement::Level(Permission::Guest)
            }
            Self::PairWithDevice => Requirement::Pairing,
            Self::ListUsers => Requirement::Delegated,
            Self::SetDeviceInfo
            | Self::GetSecuritySettings
            | Self::SetSecuritySettings
            | Self::SetUserPermissions
            | Self::SetUserName
            | Self::RemoveUser => Requirement::Level(Permission::Owner),
        }
    }
}

/// State the built-in queries operate on.
pub struct AdminContext {
    pub descriptor: DeviceDescriptor,
    pub authority: Box<dyn AccessAuthority>,
}

impl AdminContext {
    pub fn new(descriptor: DeviceDescriptor, authority: Box<dyn AccessAuthority>) -> Self {
        Self {
            descriptor,
            authority,
        }
    }

    pub fn gate(&self) -> PermissionGate<'_> {
        PermissionGate::new(&*self.authority)
    }

    /// Offer a query to the built-in set.
    pub fn handle(
        &mut self,
        request: &Request,
        query: &mut QueryRequest<'_>,
        response: &mut QueryResponse<'_>,
    ) -> Routed {
        let Some(admin_query) = AdminQuery::from_id(request.query_id) else {
            return Routed::NotRecognized;
        };
        debug!("QUERY[{}]: built-in {:?}", request.query_id, admin_query);

        if !self.permitted(admin_query.requirement(), request) {
            warn!(
                "QUERY[{}]: {:?} denied for client '{}'",
                request.query_id, admin_query, request.client_id
            );
            return Routed::Handled(Err(QueryError::NoAccess));
        }

        Routed::Handled(self.serve(admin_query, request, query, response))
    }

    fn permitted(&self, requirement: Requirement, request: &Request) -> bool {
        let gate = self.gate();
        match requirement {
            Requirement::Level(level) => gate.authorized(request, level),
            Requirement::Pairing => gate.pairing_allowed(request),
            Requirement::Delegated => true,
        }
    }

    fn serve(
        &mut self,
        admin_query: AdminQuery,
        request: &Request,
        query: &mut QueryRequest<'_>,
        response: &mut QueryResponse<'_>,
    ) -> QueryResult {
        match admin_query {
            AdminQuery::InterfaceInfo => self.interface_info(response),
            AdminQuery::PublicDeviceInfo => self.public_device_info(request, response),
            AdminQuery::SetDeviceInfo => self.set_device_info(query, response),
            AdminQuery::ListUsers => self.authority.users_get(request, query, response),
            AdminQuery::PairWithDevice => {
                let result = self.authority.pair_with_device(request, query, response);
                if result.is_ok() {
                    info!("QUERY[{}]: client '{}' paired", request.query_id, request.client_id);
                }
                result
            }
            AdminQuery::CurrentUser => self.authority.user_me(request, query, response),
            AdminQuery::GetSecuritySettings => {
                self.authority.system_get_settings(request, query, response)
            }
            AdminQuery::SetSecuritySettings => {
                self.authority.system_set_settings(request, query, response)
            }
            AdminQuery::SetUserPermissions => {
                self.authority.user_set_permissions(request, query, response)
            }
            AdminQuery::SetUserName => self.authority.user_set_name(request, query, response),
            AdminQuery::RemoveUser => self.authority.user_remove(request, query, response),
        }
    }

    fn interface_info(&self, response: &mut QueryResponse<'_>) -> QueryResult {
        let iface = &self.descriptor.interface;
        write_str(response, &iface.id)?;
        response.write_u16(iface.version_major)?;
        response.write_u16(iface.version_minor)
    }

    fn public_device_info(
        &self,
        request: &Request,
        response: &mut QueryResponse<'_>,
    ) -> QueryResult {
        let d = &self.descriptor;
        let gate = self.gate();
        write_str(response, d.name())?;
        write_str(response, &d.product_name)?;
        write_str(response, &d.icon_url)?;
        response.write_bool(gate.pairing_allowed(request))?;
        response.write_bool(gate.is_paired(request))?;
        response.write_bool(gate.is_owner(request))
    }

    /// Rename the device and echo the new name.
    ///
    /// The name is staged and only committed once the echo fits, so a failed
    /// query leaves the stored name untouched.
    fn set_device_info(
        &mut self,
        query: &mut QueryRequest<'_>,
        response: &mut QueryResponse<'_>,
    ) -> QueryResult {
        let mut staged = DeviceName::new();
        copy_bounded_string(query, &mut staged)?;
        write_str(response, &staged)?;
        info!(
            "QUERY[{}]: device renamed '{}' -> '{}'",
            AdminQuery::SetDeviceInfo.id(),
            self.descriptor.name(),
            staged
        );
        self.descriptor.set_name(staged);
        Ok(())
    }
}
