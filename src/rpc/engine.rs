//! Query gateway: routes every incoming query to exactly one responder.
//!
//! **Transport-decoupled**: the gateway does not own a session driver. The
//! driver calls [`QueryDispatcher::dispatch`] once per complete query and
//! sends back whatever ends up in the response buffer.
//!
//! Routing is a fixed pipeline:
//!
//! 1. **Built-in set** (administrative mode only): device info, pairing and
//!    user management. Shadows any application handler with the same id.
//! 2. **Guest gate** (administrative mode only) in front of the registry.
//! 3. **Registry lookup**: the application handler for the id, or
//!    `InvalidQueryId` when there is none.

use log::{debug, info, warn};

use crate::app::descriptor::DeviceDescriptor;
use crate::app::ports::{AccessAuthority, QueryDispatcher};
use crate::config::{GatewayConfig, GatewayMode, SessionSetup};
use crate::error::{ConfigError, RegistryError, Result};

use super::admin::AdminContext;
use super::auth::Permission;
use super::buffer::{QueryRequest, QueryResponse};
use super::registry::{HandlerRegistry, QueryHandler};
use super::request::{QueryId, Request};
use super::status::{QueryError, QueryResult, QueryStatus, Routed};

/// Single dispatch point between the session driver and query handlers.
pub struct Gateway {
    registry: HandlerRegistry,
    admin: Option<AdminContext>,
    session: SessionSetup,
}

impl Gateway {
    /// Validate `config` and bring up the gateway.
    ///
    /// With a `device` block the gateway runs in administrative mode and
    /// `authority` is mandatory; its storage is initialised here. Without
    /// one, any authority passed in is unused.
    pub fn init(
        config: &GatewayConfig,
        authority: Option<Box<dyn AccessAuthority>>,
    ) -> Result<Self> {
        config.validate().inspect_err(|e| warn!("gateway: invalid config: {}", e))?;
        let session = config.session_setup()?;

        let admin = match (&config.device, authority) {
            (Some(device), Some(mut authority)) => {
                let descriptor = DeviceDescriptor::from_config(&config.id, device)?;
                authority
                    .init_storage(&descriptor.acl_path, &descriptor.acl)
                    .inspect_err(|e| {
                        warn!("gateway: acl storage '{}' failed: {}", descriptor.acl_path, e);
                    })?;
                Some(AdminContext::new(descriptor, authority))
            }
            (Some(_), None) => return Err(ConfigError::AuthorityRequired.into()),
            (None, Some(_)) => {
                warn!("gateway: no device block, access authority ignored");
                None
            }
            (None, None) => None,
        };

        let gateway = Self {
            registry: HandlerRegistry::new(),
            admin,
            session,
        };
        info!("gateway: '{}' initialised ({:?} mode)", config.id, gateway.mode());
        Ok(gateway)
    }

    /// Gateway without built-in queries.
    pub fn basic(config: &GatewayConfig) -> Result<Self> {
        Self::init(config, None)
    }

    /// Gateway serving the built-in queries, backed by `authority`.
    pub fn administered(
        config: &GatewayConfig,
        authority: impl AccessAuthority + 'static,
    ) -> Result<Self> {
        Self::init(config, Some(Box::new(authority)))
    }

    pub fn mode(&self) -> GatewayMode {
        if self.admin.is_some() {
            GatewayMode::Administered
        } else {
            GatewayMode::Basic
        }
    }

    pub fn register(
        &mut self,
        id: QueryId,
        handler: Box<dyn QueryHandler>,
    ) -> core::result::Result<(), RegistryError> {
        self.registry.register(id, handler)
    }

    /// Register a closure as the handler for `id`.
    pub fn register_fn<F>(&mut self, id: QueryId, f: F) -> core::result::Result<(), RegistryError>
    where
        F: FnMut(&Request, &mut QueryRequest<'_>, &mut QueryResponse<'_>) -> QueryResult + 'static,
    {
        self.registry.register_fn(id, f)
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Device metadata, present in administrative mode.
    pub fn descriptor(&self) -> Option<&DeviceDescriptor> {
        self.admin.as_ref().map(|a| &a.descriptor)
    }

    pub fn authority(&self) -> Option<&dyn AccessAuthority> {
        self.admin.as_ref().map(|a| &*a.authority)
    }

    pub fn session_setup(&self) -> &SessionSetup {
        &self.session
    }

    /// Route one query and return the handler outcome.
    pub fn route(
        &mut self,
        request: &Request,
        query: &mut QueryRequest<'_>,
        response: &mut QueryResponse<'_>,
    ) -> QueryResult {
        let id = request.query_id;

        if let Some(admin) = self.admin.as_mut() {
            if let Routed::Handled(result) = admin.handle(request, query, response) {
                return result;
            }
            if !admin.gate().authorized(request, Permission::Guest) {
                warn!("QUERY[{}]: guest access denied for '{}'", id, request.client_id);
                return Err(QueryError::NoAccess);
            }
        }

        match self.registry.lookup(id) {
            Some(handler) => handler.handle(request, query, response),
            None => {
                debug!("QUERY[{}]: no handler", id);
                Err(QueryError::InvalidQueryId)
            }
        }
    }
}

impl QueryDispatcher for Gateway {
    fn dispatch(
        &mut self,
        request: &Request,
        query: &mut QueryRequest<'_>,
        response: &mut QueryResponse<'_>,
    ) -> QueryStatus {
        let status = QueryStatus::from(self.route(request, query, response));
        match status {
            QueryStatus::ResponseReady | QueryStatus::InvalidQueryId => debug!(
                "QUERY[{}]: {:?}, {} response bytes",
                request.query_id,
                status,
                response.len()
            ),
            _ => warn!("QUERY[{}]: rejected with {:?}", request.query_id, status),
        }
        status
    }
}
