//! Static device metadata served by the built-in queries.
//!
//! Every field is fixed after initialisation except the display name, which
//! an owner may change at runtime.

use heapless::String;

use crate::config::DeviceConfig;
use crate::error::ConfigError;
use crate::rpc::auth::AclSettings;

pub const DEVICE_ID_CAPACITY: usize = 64;
pub const DEVICE_NAME_CAPACITY: usize = 64;
pub const PRODUCT_NAME_CAPACITY: usize = 64;
pub const ICON_URL_CAPACITY: usize = 128;
pub const INTERFACE_ID_CAPACITY: usize = 64;
pub const ACL_PATH_CAPACITY: usize = 256;

pub type DeviceName = String<DEVICE_NAME_CAPACITY>;

/// Interface identity advertised to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceInfo {
    pub id: String<INTERFACE_ID_CAPACITY>,
    pub version_major: u16,
    pub version_minor: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub device_id: String<DEVICE_ID_CAPACITY>,
    name: DeviceName,
    pub product_name: String<PRODUCT_NAME_CAPACITY>,
    pub icon_url: String<ICON_URL_CAPACITY>,
    pub interface: InterfaceInfo,
    pub acl: AclSettings,
    pub acl_path: String<ACL_PATH_CAPACITY>,
}

impl DeviceDescriptor {
    /// Build from validated configuration.
    ///
    /// The display name gets one slot less than its container, matching what
    /// a client may later set through the rename query.
    pub fn from_config(device_id: &str, cfg: &DeviceConfig) -> Result<Self, ConfigError> {
        if cfg.name.len() >= DEVICE_NAME_CAPACITY {
            return Err(ConfigError::FieldTooLong("device.name"));
        }
        Ok(Self {
            device_id: bounded(device_id, "id")?,
            name: bounded(&cfg.name, "device.name")?,
            product_name: bounded(&cfg.product_name, "device.productName")?,
            icon_url: bounded(&cfg.icon_url, "device.iconUrl")?,
            interface: InterfaceInfo {
                id: bounded(&cfg.iface.id, "device.iface.id")?,
                version_major: cfg.iface.version.major,
                version_minor: cfg.iface.version.minor,
            },
            acl: cfg.permission.settings(),
            acl_path: bounded(&cfg.permission.db_file, "device.permission.dbFile")?,
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Replace the display name. Only the rename query calls this, after the
    /// new value has been fully copied and confirmed.
    pub(crate) fn set_name(&mut self, name: DeviceName) {
        self.name = name;
    }
}

fn bounded<const N: usize>(value: &str, field: &'static str) -> Result<String<N>, ConfigError> {
    let mut out = String::new();
    out.push_str(value)
        .map_err(|()| ConfigError::FieldTooLong(field))?;
    Ok(out)
}
