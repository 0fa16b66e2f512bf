//! Application core: device metadata, port traits and the running device.
//!
//! Everything that touches a real transport or persistent store goes
//! through the traits in [`ports`], so the whole gateway can be exercised
//! with the in-memory adapters.

pub mod descriptor;
pub mod ports;
pub mod service;
