//! Device service: a configured [`Gateway`] attached to a running session.
//!
//! ```text
//!  SessionDriver ──tick──▶ ┌──────────────┐
//!                          │    Device     │
//!                          │   Gateway     │──▶ handlers / AccessAuthority
//!                          └──────────────┘
//! ```
//!
//! The embedding loop owns the cadence: [`Device::tick`] must run at least
//! every 10 ms while the device is up.

use log::{info, warn};

use crate::error::Result;
use crate::rpc::engine::Gateway;

use super::ports::SessionDriver;

/// A gateway serving queries over a started session driver.
pub struct Device<D: SessionDriver> {
    gateway: Gateway,
    driver: D,
    tick_count: u64,
    open: bool,
}

impl<D: SessionDriver> Device<D> {
    /// Start `driver` with the gateway's session parameters.
    ///
    /// Handlers must be registered on `gateway` beforehand; the registry is
    /// not reachable for mutation once the device owns it.
    pub fn start(gateway: Gateway, mut driver: D) -> Result<Self> {
        let setup = gateway.session_setup();
        driver.start(setup).inspect_err(|e| {
            warn!("device: session start failed for '{}': {}", setup.device_id, e);
        })?;
        info!(
            "device: '{}' online ({:?} mode, {} handlers)",
            setup.device_id,
            gateway.mode(),
            gateway.registry().len()
        );
        Ok(Self {
            gateway,
            driver,
            tick_count: 0,
            open: true,
        })
    }

    /// Let the driver process pending events and deliver queries.
    pub fn tick(&mut self) {
        if !self.open {
            return;
        }
        self.tick_count += 1;
        self.driver.tick(&mut self.gateway);
    }

    /// Shut the session down. Idempotent.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.driver.close();
        self.open = false;
        info!(
            "device: '{}' closed after {} ticks",
            self.gateway.session_setup().device_id,
            self.tick_count
        );
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}

impl<D: SessionDriver> Drop for Device<D> {
    fn drop(&mut self) {
        self.close();
    }
}
