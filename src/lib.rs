//! p2pgate: application-layer query gateway for embedded devices.
//!
//! Sits between a secure peer-to-peer session driver and the device's own
//! query handlers. Every incoming query is routed to exactly one responder:
//! a built-in administrative query, an application handler, or an error
//! status. Payloads are read and written through bounded big-endian cursors.
//!
//! ```no_run
//! use p2pgate::{Device, Gateway, GatewayConfig};
//! use p2pgate::adapters::loopback::LoopbackDriver;
//!
//! # fn main() -> p2pgate::Result<()> {
//! let config = GatewayConfig::from_json(
//!     r#"{ "id": "pump.demo.net", "presharedKey": "00112233445566778899aabbccddeeff" }"#,
//! )?;
//! let mut gateway = Gateway::basic(&config)?;
//! gateway.register_fn(20_000, |_, query, response| {
//!     let level = query.read_u8()?;
//!     response.write_u8(level)
//! })?;
//! let mut device = Device::start(gateway, LoopbackDriver::new())?;
//! loop {
//!     device.tick();
//!     # break;
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod error;
pub mod rpc;

pub use app::ports::{AccessAuthority, QueryDispatcher, SessionDriver};
pub use app::service::Device;
pub use config::{GatewayConfig, GatewayMode, SessionSetup};
pub use error::{Error, Result};
pub use rpc::buffer::{QueryRequest, QueryResponse};
pub use rpc::engine::Gateway;
pub use rpc::registry::QueryHandler;
pub use rpc::request::{Fingerprint, QueryId, Request};
pub use rpc::status::{QueryError, QueryResult, QueryStatus};

/// Library version string.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
