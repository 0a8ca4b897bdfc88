use crate::traits::{DeviceHandle, WifiFailureCounters};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, RwLock};

/// 单个设备的失败计数
#[derive(Debug, Default)]
struct DeviceCounters {
    recent: AtomicU32,
    total: AtomicU32,
}

/// The real Wi-Fi failure-counter implementation.
///
/// Counters live in memory only. [`WifiPlugin::record_failure`] and
/// [`WifiPlugin::record_success`] are the write side; callers that only hold
/// the registry read and clear through [`WifiFailureCounters`].
#[derive(Debug, Default)]
pub struct WifiPlugin {
    devices: RwLock<HashMap<DeviceHandle, Arc<DeviceCounters>>>,
}

impl WifiPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    fn counters(&self, device: DeviceHandle) -> Option<Arc<DeviceCounters>> {
        let devices = self.devices.read().unwrap_or_else(|e| e.into_inner());
        devices.get(&device).cloned()
    }

    fn counters_or_insert(&self, device: DeviceHandle) -> Arc<DeviceCounters> {
        if let Some(c) = self.counters(device) {
            return c;
        }
        let mut devices = self.devices.write().unwrap_or_else(|e| e.into_inner());
        devices.entry(device).or_default().clone()
    }

    /// A connection attempt on `device` failed.
    pub fn record_failure(&self, device: DeviceHandle) {
        let c = self.counters_or_insert(device);
        let recent = c.recent.fetch_add(1, Ordering::AcqRel).saturating_add(1);
        let total = c.total.fetch_add(1, Ordering::AcqRel).saturating_add(1);
        tracing::debug!(%device, recent, total, "Wi-Fi connection failure recorded");
    }

    /// A connection on `device` activated; the recent streak ends.
    pub fn record_success(&self, device: DeviceHandle) {
        if let Some(c) = self.counters(device) {
            c.recent.store(0, Ordering::Release);
        }
    }
}

impl WifiFailureCounters for WifiPlugin {
    fn recent_failure_count(&self, device: DeviceHandle) -> u32 {
        self.counters(device)
            .map_or(0, |c| c.recent.load(Ordering::Acquire))
    }

    fn total_failure_count(&self, device: DeviceHandle) -> u32 {
        self.counters(device)
            .map_or(0, |c| c.total.load(Ordering::Acquire))
    }

    fn clear_failure_count(&self, device: DeviceHandle) {
        if let Some(c) = self.counters(device) {
            c.recent.store(0, Ordering::Release);
            c.total.store(0, Ordering::Release);
            tracing::debug!(%device, "Wi-Fi failure counters cleared");
        }
    }
}
