//! Application query handlers, keyed by query id.
//!
//! Append-only for the life of the process: entries are added during setup
//! and never removed. Capacity is fixed at [`MAX_HANDLERS`].

use heapless::FnvIndexMap;
use log::{debug, warn};

use crate::error::RegistryError;

use super::buffer::{QueryRequest, QueryResponse};
use super::request::{QueryId, Request};
use super::status::QueryResult;

/// Maximum number of application handlers.
pub const MAX_HANDLERS: usize = 1024;

/// One application-defined query.
pub trait QueryHandler {
    fn handle(
        &mut self,
        request: &Request,
        query: &mut QueryRequest<'_>,
        response: &mut QueryResponse<'_>,
    ) -> QueryResult;
}

/// Adapter that lets a closure serve as a handler.
struct FnHandler<F>(F);

impl<F> QueryHandler for FnHandler<F>
where
    F: FnMut(&Request, &mut QueryRequest<'_>, &mut QueryResponse<'_>) -> QueryResult,
{
    fn handle(
        &mut self,
        request: &Request,
        query: &mut QueryRequest<'_>,
        response: &mut QueryResponse<'_>,
    ) -> QueryResult {
        (self.0)(request, query, response)
    }
}

/// Fixed-capacity map from query id to handler.
pub struct HandlerRegistry {
    handlers: FnvIndexMap<QueryId, Box<dyn QueryHandler>, MAX_HANDLERS>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: FnvIndexMap::new(),
        }
    }

    /// Add a handler. Fails without side effects on a duplicate id or when
    /// every slot is taken.
    pub fn register(
        &mut self,
        id: QueryId,
        handler: Box<dyn QueryHandler>,
    ) -> Result<(), RegistryError> {
        if self.handlers.contains_key(&id) {
            warn!("QUERY[{}]: handler already registered", id);
            return Err(RegistryError::AlreadyRegistered(id));
        }
        if self.handlers.len() >= MAX_HANDLERS {
            warn!("QUERY[{}]: handler table full ({} entries)", id, MAX_HANDLERS);
            return Err(RegistryError::Full);
        }
        self.handlers
            .insert(id, handler)
            .map_err(|_| RegistryError::Full)?;
        debug!("QUERY[{}]: handler registered", id);
        Ok(())
    }

    /// Register a closure as the handler for `id`.
    pub fn register_fn<F>(&mut self, id: QueryId, f: F) -> Result<(), RegistryError>
    where
        F: FnMut(&Request, &mut QueryRequest<'_>, &mut QueryResponse<'_>) -> QueryResult + 'static,
    {
        self.register(id, Box::new(FnHandler(f)))
    }

    pub fn contains(&self, id: QueryId) -> bool {
        self.handlers.contains_key(&id)
    }

    /// Handler for `id`, if one was registered.
    pub fn lookup(&mut self, id: QueryId) -> Option<&mut (dyn QueryHandler + 'static)> {
        self.handlers.get_mut(&id).map(|h| &mut **h)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered ids, in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = QueryId> + '_ {
        self.handlers.keys().copied()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
