//! Wi-Fi failure counters for network devices, with a shim for builds
//! that leave the Wi-Fi plugin out.
//!
//! 设备在 [`registry`] 中登记并（可选地）绑定插件实现；[`shim`] 对未绑定的设备
//! 返回 0 / 空操作，并通过 [`throttle`] 每种能力只告警一次。

pub mod traits;
pub mod backends;
pub mod config;
pub mod factory;
pub mod registry;
pub mod shim;
pub mod throttle;

#[cfg(test)]
mod test_support;

use thiserror::Error;
use traits::DeviceHandle;

/// Setup-time errors. Dispatching a capability never fails.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Device {0} is already registered")]
    AlreadyRegistered(DeviceHandle),

    #[error("Device {0} already has a capability implementation bound")]
    AlreadyBound(DeviceHandle),

    #[error("Unknown device: {0}")]
    UnknownDevice(DeviceHandle),
}

/// `Result` alias used by config loading and registry setup.
pub type Result<T> = std::result::Result<T, Error>;
