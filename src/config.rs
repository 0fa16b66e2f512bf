//! Gateway configuration.
//!
//! Handed over by the embedding application, usually as the same JSON
//! document the device's companion tooling produces. Presence of the
//! `device` block switches on administrative mode (built-in queries and the
//! access-control layer).

use core::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::app::descriptor::{DEVICE_ID_CAPACITY, DeviceDescriptor};
use crate::error::ConfigError;
use crate::rpc::auth::{AclSettings, Permissions, SystemPermissions};

/// Length of the decoded pre-shared key.
pub const PSK_LEN: usize = 16;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Globally unique device id.
    pub id: String,
    /// Pre-shared key as 32 hex digits.
    pub preshared_key: String,
    /// Local UDP port; absent or 0 uses the transport default.
    #[serde(default)]
    pub local_port: Option<u16>,
    /// Device metadata and access-control policy (administrative mode).
    #[serde(default)]
    pub device: Option<DeviceConfig>,
}

/// Whether the built-in administrative queries are served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayMode {
    /// Application handlers only.
    Basic,
    /// Built-in queries first, application handlers behind the guest gate.
    Administered,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceConfig {
    pub name: String,
    pub product_name: String,
    pub icon_url: String,
    pub iface: InterfaceConfig,
    #[serde(default)]
    pub permission: PermissionConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceConfig {
    pub id: String,
    pub version: InterfaceVersion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceVersion {
    pub major: u16,
    pub minor: u16,
}

/// Access-control store location and initial policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionConfig {
    #[serde(default)]
    pub db_file: String,
    #[serde(default)]
    pub system: SystemFlags,
    #[serde(default = "UserFlags::first_user")]
    pub first_user: UserFlags,
    #[serde(default = "UserFlags::default_user")]
    pub default_user: UserFlags,
}

impl Default for PermissionConfig {
    fn default() -> Self {
        Self {
            db_file: String::new(),
            system: SystemFlags::default(),
            first_user: UserFlags::first_user(),
            default_user: UserFlags::default_user(),
        }
    }
}

impl PermissionConfig {
    pub fn settings(&self) -> AclSettings {
        AclSettings {
            system: self.system.bits(),
            default_user: self.default_user.bits(),
            first_user: self.first_user.bits(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemFlags {
    pub pairing: bool,
    pub local: bool,
    pub remote: bool,
}

impl Default for SystemFlags {
    fn default() -> Self {
        Self {
            pairing: true,
            local: true,
            remote: true,
        }
    }
}

impl SystemFlags {
    pub fn bits(self) -> SystemPermissions {
        let mut bits = SystemPermissions::empty();
        bits.set(SystemPermissions::PAIRING, self.pairing);
        bits.set(SystemPermissions::LOCAL_ACCESS, self.local);
        bits.set(SystemPermissions::REMOTE_ACCESS, self.remote);
        bits
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFlags {
    pub admin: bool,
    pub local: bool,
    pub remote: bool,
}

impl UserFlags {
    pub fn first_user() -> Self {
        Self {
            admin: true,
            local: true,
            remote: true,
        }
    }

    pub fn default_user() -> Self {
        Self {
            admin: false,
            local: true,
            remote: false,
        }
    }

    pub fn bits(self) -> Permissions {
        let mut bits = Permissions::empty();
        bits.set(Permissions::ADMIN, self.admin);
        bits.set(Permissions::LOCAL_ACCESS, self.local);
        bits.set(Permissions::REMOTE_ACCESS, self.remote);
        bits
    }
}

impl GatewayConfig {
    /// Parse a JSON configuration document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| {
            warn!("config: parse error: {}", e);
            ConfigError::Malformed
        })
    }

    pub fn mode(&self) -> GatewayMode {
        if self.device.is_some() {
            GatewayMode::Administered
        } else {
            GatewayMode::Basic
        }
    }

    /// Check everything that must hold before the device may serve.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id.is_empty() {
            return Err(ConfigError::MissingField("id"));
        }
        if self.id.len() > DEVICE_ID_CAPACITY {
            return Err(ConfigError::FieldTooLong("id"));
        }
        self.decode_psk()?;
        if let Some(device) = &self.device {
            if device.permission.db_file.is_empty() {
                return Err(ConfigError::MissingField("device.permission.dbFile"));
            }
            DeviceDescriptor::from_config(&self.id, device)?;
        }
        Ok(())
    }

    /// Decode the hex pre-shared key. Must be exactly 16 bytes.
    pub fn decode_psk(&self) -> Result<[u8; PSK_LEN], ConfigError> {
        let mut key = [0u8; PSK_LEN];
        hex::decode_to_slice(&self.preshared_key, &mut key)
            .map_err(|_| ConfigError::InvalidPresharedKey)?;
        Ok(key)
    }

    /// Port override, with 0 folded into "use the default".
    pub fn local_port(&self) -> Option<u16> {
        self.local_port.filter(|&p| p != 0)
    }

    /// Parameters for the session driver.
    pub fn session_setup(&self) -> Result<SessionSetup, ConfigError> {
        Ok(SessionSetup {
            device_id: self.id.clone(),
            preshared_key: self.decode_psk()?,
            local_port: self.local_port(),
            secure_attach: true,
            secure_data: true,
            crypto_suite: CryptoSuite::AesCbcHmacSha256,
        })
    }
}

// ---------------------------------------------------------------------------
// Session setup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptoSuite {
    AesCbcHmacSha256,
}

/// What the session driver needs to bring the secure channel up.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionSetup {
    pub device_id: String,
    pub preshared_key: [u8; PSK_LEN],
    pub local_port: Option<u16>,
    pub secure_attach: bool,
    pub secure_data: bool,
    pub crypto_suite: CryptoSuite,
}

impl fmt::Debug for SessionSetup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSetup")
            .field("device_id", &self.device_id)
            .field("preshared_key", &"<redacted>")
            .field("local_port", &self.local_port)
            .field("secure_attach", &self.secure_attach)
            .field("secure_data", &self.secure_data)
            .field("crypto_suite", &self.crypto_suite)
            .finish()
    }
}
