//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter      | Implements       | Connects to                     |
//! |--------------|------------------|---------------------------------|
//! | `acl_memory` | AccessAuthority  | In-memory user table            |
//! | `loopback`   | SessionDriver    | In-process query queue          |

pub mod acl_memory;
pub mod loopback;
