//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises one part of the gateway
//! against the in-memory adapters or the recording authority in
//! `mock_authority`. Everything runs on the host.

mod fixtures;
mod mock_authority;
mod pairing_flow_tests;
