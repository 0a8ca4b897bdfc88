use netdev_core::registry::CapabilityRegistry;
use netdev_core::shim::FallbackDispatcher;
use netdev_core::traits::{DeviceHandle, DeviceKind};
use serde::Serialize;

/// 启动时每个设备的失败计数快照；非 Wi-Fi 设备没有失败计数
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DeviceReport {
    pub handle: DeviceHandle,
    pub interface: String,
    pub kind: DeviceKind,
    pub plugin_bound: bool,
    pub recent_failures: Option<u32>,
    pub total_failures: Option<u32>,
}

/// Startup pass of the device manager: read each Wi-Fi device's failure
/// counters, then clear them so the device starts with a fresh autoconnect
/// budget. Other device kinds are reported without touching the counters.
pub fn activate_devices(dispatcher: &FallbackDispatcher<'_>) -> Vec<DeviceReport> {
    let registry: &CapabilityRegistry = dispatcher.registry();
    let mut reports = Vec::with_capacity(registry.len());

    for device in registry.devices() {
        let mut report = DeviceReport {
            handle: device.handle,
            interface: device.interface.clone(),
            kind: device.kind,
            plugin_bound: registry.is_bound(device.handle),
            recent_failures: None,
            total_failures: None,
        };

        if device.kind == DeviceKind::Wifi {
            report.recent_failures = Some(dispatcher.get_recent_failure_count(device.handle));
            report.total_failures = Some(dispatcher.get_total_failure_count(device.handle));
            dispatcher.clear_failure_count(device.handle);

            tracing::info!(
                device = %device.handle,
                interface = %device.interface,
                recent = report.recent_failures,
                total = report.total_failures,
                "Device activated, failure counters reset"
            );
        } else {
            tracing::info!(
                device = %device.handle,
                interface = %device.interface,
                kind = ?device.kind,
                "Device activated"
            );
        }
        reports.push(report);
    }

    reports
}
