//! In-process session driver.
//!
//! Stands in for the secure peer-to-peer transport on the host: queries are
//! queued with [`LoopbackDriver::submit`] and delivered to the dispatcher
//! on the next [`tick`](SessionDriver::tick), one at a time and in order.
//! Completed exchanges are collected for inspection.

use std::collections::VecDeque;

use log::{debug, info, warn};

use crate::app::ports::{DriverError, QueryDispatcher, SessionDriver};
use crate::config::SessionSetup;
use crate::rpc::buffer::{QueryRequest, QueryResponse};
use crate::rpc::request::Request;
use crate::rpc::status::QueryStatus;

/// Response buffer size offered to each query.
pub const DEFAULT_RESPONSE_CAPACITY: usize = 1024;

/// One finished query as the remote client would see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub request: Request,
    pub status: QueryStatus,
    /// Response bytes; empty unless `status` is `ResponseReady`.
    pub response: Vec<u8>,
}

pub struct LoopbackDriver {
    inbox: VecDeque<(Request, Vec<u8>)>,
    completed: Vec<Exchange>,
    response_capacity: usize,
    setup: Option<SessionSetup>,
    fail_start: Option<DriverError>,
    ticks: u64,
}

impl LoopbackDriver {
    pub fn new() -> Self {
        Self::with_response_capacity(DEFAULT_RESPONSE_CAPACITY)
    }

    pub fn with_response_capacity(response_capacity: usize) -> Self {
        Self {
            inbox: VecDeque::new(),
            completed: Vec::new(),
            response_capacity,
            setup: None,
            fail_start: None,
            ticks: 0,
        }
    }

    /// Driver whose `start` always fails with `error`.
    pub fn failing(error: DriverError) -> Self {
        Self {
            fail_start: Some(error),
            ..Self::new()
        }
    }

    /// Queue a query for the next tick.
    pub fn submit(&mut self, request: Request, payload: &[u8]) {
        self.inbox.push_back((request, payload.to_vec()));
    }

    pub fn pending(&self) -> usize {
        self.inbox.len()
    }

    /// Drain everything completed so far.
    pub fn take_completed(&mut self) -> Vec<Exchange> {
        core::mem::take(&mut self.completed)
    }

    /// Setup received by the last successful `start`, while open.
    pub fn setup(&self) -> Option<&SessionSetup> {
        self.setup.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.setup.is_some()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Default for LoopbackDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionDriver for LoopbackDriver {
    fn start(&mut self, setup: &SessionSetup) -> Result<(), DriverError> {
        if let Some(e) = self.fail_start {
            warn!("loopback: refusing to start '{}': {}", setup.device_id, e);
            return Err(e);
        }
        info!("loopback: session up for '{}' (port {:?})", setup.device_id, setup.local_port);
        self.setup = Some(setup.clone());
        Ok(())
    }

    fn tick(&mut self, dispatcher: &mut dyn QueryDispatcher) {
        self.ticks += 1;
        if !self.is_open() {
            return;
        }
        while let Some((request, payload)) = self.inbox.pop_front() {
            let mut buf = vec![0u8; self.response_capacity];
            let mut query = QueryRequest::new(&payload);
            let mut response = QueryResponse::new(&mut buf);
            let status = dispatcher.dispatch(&request, &mut query, &mut response);
            let len = if status.is_ready() { response.len() } else { 0 };
            buf.truncate(len);
            debug!("loopback: query {} -> {:?}", request.query_id, status);
            self.completed.push(Exchange {
                request,
                status,
                response: buf,
            });
        }
    }

    fn close(&mut self) {
        if self.setup.take().is_some() {
            info!("loopback: session closed, {} queries dropped", self.inbox.len());
        }
        self.inbox.clear();
    }
}
