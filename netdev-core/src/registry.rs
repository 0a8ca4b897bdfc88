//! Capability registry: which devices have a real Wi-Fi failure-counter
//! implementation bound, and which must fall back to the shim.
//!
//! 绑定只在插件初始化阶段通过 [`RegistryBuilder`] 完成；`build()` 之后注册表只读，
//! 因此一个设备不可能在生命周期内从 "已绑定" 变成 "缺失"，反之亦然。

use crate::traits::{Device, DeviceHandle, DeviceKind, WifiFailureCounters};
use crate::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

struct Entry {
    device: Device,
    counters: Option<Arc<dyn WifiFailureCounters>>,
}

#[derive(Default)]
pub struct RegistryBuilder {
    entries: HashMap<DeviceHandle, Entry>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a device with no capability bound.
    pub fn add_device(&mut self, device: Device) -> Result<()> {
        let handle = device.handle;
        if self.entries.contains_key(&handle) {
            return Err(Error::AlreadyRegistered(handle));
        }
        self.entries.insert(
            handle,
            Entry {
                device,
                counters: None,
            },
        );
        Ok(())
    }

    /// Bind a real implementation to an already registered device.
    pub fn bind(&mut self, handle: DeviceHandle, counters: Arc<dyn WifiFailureCounters>) -> Result<()> {
        let entry = self
            .entries
            .get_mut(&handle)
            .ok_or(Error::UnknownDevice(handle))?;
        if entry.counters.is_some() {
            return Err(Error::AlreadyBound(handle));
        }
        entry.counters = Some(counters);
        Ok(())
    }

    /// Bind `plugin` to every Wi-Fi device that has nothing bound yet.
    /// Returns how many devices were bound.
    pub fn install_plugin(&mut self, plugin: Arc<dyn WifiFailureCounters>) -> usize {
        let mut bound = 0;
        for entry in self.entries.values_mut() {
            if entry.device.kind == DeviceKind::Wifi && entry.counters.is_none() {
                entry.counters = Some(plugin.clone());
                bound += 1;
            }
        }
        tracing::debug!(bound, "Wi-Fi plugin installed");
        bound
    }

    pub fn build(self) -> CapabilityRegistry {
        CapabilityRegistry {
            entries: self.entries,
        }
    }
}

/// Frozen device → capability table. Lookups take no locks.
pub struct CapabilityRegistry {
    entries: HashMap<DeviceHandle, Entry>,
}

impl CapabilityRegistry {
    /// The bound implementation, or `None` when the capability is absent
    /// (including for handles the registry has never seen).
    pub fn resolve(&self, handle: DeviceHandle) -> Option<&Arc<dyn WifiFailureCounters>> {
        self.entries.get(&handle)?.counters.as_ref()
    }

    pub fn device(&self, handle: DeviceHandle) -> Option<&Device> {
        self.entries.get(&handle).map(|e| &e.device)
    }

    /// Registered devices, ordered by handle.
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        let mut devices: Vec<&Device> = self.entries.values().map(|e| &e.device).collect();
        devices.sort_by_key(|d| d.handle);
        devices.into_iter()
    }

    pub fn is_bound(&self, handle: DeviceHandle) -> bool {
        self.resolve(handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.devices().map(|d| (d.handle, (&d.interface, self.is_bound(d.handle)))))
            .finish()
    }
}
