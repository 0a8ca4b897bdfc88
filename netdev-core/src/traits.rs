use crate::Error;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

// 在这里定义设备句柄、设备描述，以及插件需要实现的能力 trait。

/// Opaque identifier of a managed network device.
///
/// 句柄只是一个索引，不拥有任何能力实现。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DeviceHandle(pub u32);

impl fmt::Display for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 设备类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Wifi,
    Ethernet,
    Other,
}

impl FromStr for DeviceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wifi" => Ok(DeviceKind::Wifi),
            "ethernet" => Ok(DeviceKind::Ethernet),
            "other" => Ok(DeviceKind::Other),
            _ => Err(Error::Config(format!(
                "unknown device kind '{}' (expected wifi, ethernet or other)",
                s
            ))),
        }
    }
}

/// A managed network device as known to the registry.
#[derive(Debug, Clone, Serialize)]
pub struct Device {
    pub handle: DeviceHandle,
    pub interface: String,
    pub kind: DeviceKind,
}

impl Device {
    pub fn new(handle: DeviceHandle, interface: impl Into<String>, kind: DeviceKind) -> Self {
        Self {
            handle,
            interface: interface.into(),
            kind,
        }
    }
}

/// The capability kinds the shim can stand in for.
/// Each kind owns exactly one diagnostic flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
    RecentFailureCount,
    TotalFailureCount,
    ClearFailureCount,
}

impl CapabilityKind {
    pub const ALL: [CapabilityKind; 3] = [
        CapabilityKind::RecentFailureCount,
        CapabilityKind::TotalFailureCount,
        CapabilityKind::ClearFailureCount,
    ];

    /// Name of the device-management function backed by this capability.
    pub fn function_name(self) -> &'static str {
        match self {
            CapabilityKind::RecentFailureCount => "get_recent_failure_count",
            CapabilityKind::TotalFailureCount => "get_total_failure_count",
            CapabilityKind::ClearFailureCount => "clear_failure_count",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            CapabilityKind::RecentFailureCount => 0,
            CapabilityKind::TotalFailureCount => 1,
            CapabilityKind::ClearFailureCount => 2,
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.function_name())
    }
}

/// Wi-Fi 连接失败计数能力：由 Wi-Fi 插件实现。
///
/// Implementations are shared between threads and must answer without
/// blocking; the shim calls them directly on the caller's thread.
pub trait WifiFailureCounters: Send + Sync {
    /// Failures since the last successful activation of `device`.
    fn recent_failure_count(&self, device: DeviceHandle) -> u32;

    /// Failures since the counters of `device` were last cleared.
    fn total_failure_count(&self, device: DeviceHandle) -> u32;

    /// 清空 `device` 的所有失败计数
    fn clear_failure_count(&self, device: DeviceHandle);
}
