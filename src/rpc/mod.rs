//! Transport-agnostic query layer.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Query Stack                           │
//! │                                                              │
//! │  ┌───────────────┐   ┌──────────────────────────────────┐    │
//! │  │ SessionDriver │──▶│  Gateway (dispatcher)            │    │
//! │  │ (port)        │   │   1. admin   built-in queries    │    │
//! │  └───────────────┘   │   2. auth    guest gate          │    │
//! │         ▲            │   3. registry application ids    │    │
//! │         │            └──────────────────────────────────┘    │
//! │         │                          │                         │
//! │         │   QueryStatus + response │  buffer / marshal       │
//! │         └──────────────────────────┘  (bounded cursors)      │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod admin;
pub mod auth;
pub mod buffer;
pub mod engine;
pub mod marshal;
pub mod registry;
pub mod request;
pub mod status;
