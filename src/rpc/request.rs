//! Per-call caller identity delivered by the transport.
//!
//! The gateway never interprets the fingerprint bytes; they are handed to the
//! access authority as-is.

use core::fmt;

/// Wire-assigned query identifier.
pub type QueryId = u32;

/// Length of a client certificate fingerprint.
pub const FINGERPRINT_LEN: usize = 16;

/// Opaque client fingerprint resolved by the secure transport.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(pub [u8; FINGERPRINT_LEN]);

impl Fingerprint {
    pub const fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok().map(Self)
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ":")?;
            }
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

/// Metadata accompanying one incoming query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub query_id: QueryId,
    pub client_id: String,
    pub fingerprint: Option<Fingerprint>,
    /// Connection arrived over the local network rather than via relay.
    pub is_local: bool,
    pub is_legacy: bool,
}

impl Request {
    pub fn new(query_id: QueryId) -> Self {
        Self {
            query_id,
            client_id: String::new(),
            fingerprint: None,
            is_local: false,
            is_legacy: false,
        }
    }

    #[must_use]
    pub fn with_client_id(mut self, client_id: &str) -> Self {
        self.client_id = client_id.into();
        self
    }

    #[must_use]
    pub fn with_fingerprint(mut self, fingerprint: Fingerprint) -> Self {
        self.fingerprint = Some(fingerprint);
        self
    }

    #[must_use]
    pub fn local(mut self, is_local: bool) -> Self {
        self.is_local = is_local;
        self
    }
}
