//! Fallback dispatch for Wi-Fi failure counters.
//!
//! Device-management code calls these functions for every device, whether or
//! not the Wi-Fi plugin is compiled in. With the plugin absent (or for a
//! device it does not serve) the shim answers with a safe default:
//! zero for the counters and a no-op for clearing. Absence is never an error.

use crate::registry::CapabilityRegistry;
use crate::throttle::DiagnosticThrottle;
use crate::traits::{CapabilityKind, DeviceHandle};

#[derive(Debug, Clone, Copy)]
pub struct FallbackDispatcher<'a> {
    registry: &'a CapabilityRegistry,
    throttle: &'a DiagnosticThrottle,
}

impl<'a> FallbackDispatcher<'a> {
    /// Dispatcher reporting fallbacks through the process-wide throttle.
    pub fn new(registry: &'a CapabilityRegistry) -> Self {
        Self::with_throttle(registry, DiagnosticThrottle::global())
    }

    pub fn with_throttle(registry: &'a CapabilityRegistry, throttle: &'a DiagnosticThrottle) -> Self {
        Self { registry, throttle }
    }

    pub fn registry(&self) -> &'a CapabilityRegistry {
        self.registry
    }

    /// Failures since the last successful activation; 0 without a plugin.
    pub fn get_recent_failure_count(&self, device: DeviceHandle) -> u32 {
        match self.registry.resolve(device) {
            Some(counters) => counters.recent_failure_count(device),
            None => {
                self.throttle.note_fallback(CapabilityKind::RecentFailureCount);
                0
            }
        }
    }

    /// Failures since the last clear; 0 without a plugin.
    pub fn get_total_failure_count(&self, device: DeviceHandle) -> u32 {
        match self.registry.resolve(device) {
            Some(counters) => counters.total_failure_count(device),
            None => {
                self.throttle.note_fallback(CapabilityKind::TotalFailureCount);
                0
            }
        }
    }

    /// Reset the device's failure counters; no-op without a plugin.
    pub fn clear_failure_count(&self, device: DeviceHandle) {
        match self.registry.resolve(device) {
            Some(counters) => counters.clear_failure_count(device),
            None => self.throttle.note_fallback(CapabilityKind::ClearFailureCount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryBuilder;
    use crate::test_support::capture_warnings;
    use crate::throttle::DiagnosticMode;
    use crate::traits::{Device, DeviceKind, WifiFailureCounters};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Barrier};

    /// Counts calls so tests can tell the real path from the fallback.
    #[derive(Default)]
    struct Recording {
        clears: AtomicU32,
    }

    impl WifiFailureCounters for Recording {
        fn recent_failure_count(&self, _device: DeviceHandle) -> u32 {
            4
        }
        fn total_failure_count(&self, _device: DeviceHandle) -> u32 {
            11
        }
        fn clear_failure_count(&self, _device: DeviceHandle) {
            self.clears.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn unbound_registry() -> CapabilityRegistry {
        let mut builder = RegistryBuilder::new();
        builder
            .add_device(Device::new(DeviceHandle(0), "wlan0", DeviceKind::Wifi))
            .unwrap();
        builder.build()
    }

    #[test]
    fn absent_capability_returns_zero_and_clear_is_noop() {
        let registry = unbound_registry();
        let throttle = DiagnosticThrottle::default();
        let shim = FallbackDispatcher::with_throttle(&registry, &throttle);

        for handle in [DeviceHandle(0), DeviceHandle(u32::MAX)] {
            assert_eq!(shim.get_recent_failure_count(handle), 0);
            assert_eq!(shim.get_total_failure_count(handle), 0);
            shim.clear_failure_count(handle);
            shim.clear_failure_count(handle);
            assert_eq!(shim.get_recent_failure_count(handle), 0);
            assert_eq!(shim.get_total_failure_count(handle), 0);
        }
        assert!(!registry.is_bound(DeviceHandle(0)));
    }

    #[test]
    fn each_capability_warns_exactly_once() {
        let registry = unbound_registry();
        let throttle = DiagnosticThrottle::default();
        let shim = FallbackDispatcher::with_throttle(&registry, &throttle);
        let (dispatch, captured) = capture_warnings();

        tracing::dispatcher::with_default(&dispatch, || {
            for _ in 0..1000 {
                shim.get_recent_failure_count(DeviceHandle(0));
            }
        });
        assert_eq!(captured.count(), 1);

        tracing::dispatcher::with_default(&dispatch, || {
            for _ in 0..1000 {
                shim.get_total_failure_count(DeviceHandle(0));
                shim.clear_failure_count(DeviceHandle(0));
            }
        });

        let mut functions: Vec<String> = captured
            .warnings()
            .into_iter()
            .filter_map(|w| w.function)
            .collect();
        functions.sort();
        assert_eq!(
            functions,
            vec![
                "clear_failure_count",
                "get_recent_failure_count",
                "get_total_failure_count",
            ]
        );
    }

    #[test]
    fn once_per_process_mode_warns_once_overall() {
        let registry = unbound_registry();
        let throttle = DiagnosticThrottle::new(DiagnosticMode::OncePerProcess);
        let shim = FallbackDispatcher::with_throttle(&registry, &throttle);
        let (dispatch, captured) = capture_warnings();

        tracing::dispatcher::with_default(&dispatch, || {
            shim.clear_failure_count(DeviceHandle(0));
            shim.get_recent_failure_count(DeviceHandle(0));
            shim.get_total_failure_count(DeviceHandle(0));
        });

        let warnings = captured.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].function.as_deref(), Some("clear_failure_count"));
    }

    #[test]
    fn concurrent_first_use_warns_once() {
        let registry = unbound_registry();
        let throttle = DiagnosticThrottle::default();
        let shim = FallbackDispatcher::with_throttle(&registry, &throttle);
        let (dispatch, captured) = capture_warnings();
        let barrier = Barrier::new(50);

        std::thread::scope(|s| {
            for _ in 0..50 {
                s.spawn(|| {
                    tracing::dispatcher::with_default(&dispatch, || {
                        barrier.wait();
                        assert_eq!(shim.get_total_failure_count(DeviceHandle(0)), 0);
                    });
                });
            }
        });

        assert_eq!(captured.count(), 1);
        assert!(throttle.is_warned(CapabilityKind::TotalFailureCount));
        assert!(!throttle.is_warned(CapabilityKind::RecentFailureCount));
    }

    #[test]
    fn bound_implementation_bypasses_the_fallback() {
        let recording = Arc::new(Recording::default());
        let mut builder = RegistryBuilder::new();
        builder
            .add_device(Device::new(DeviceHandle(0), "wlan0", DeviceKind::Wifi))
            .unwrap();
        builder.bind(DeviceHandle(0), recording.clone()).unwrap();
        let registry = builder.build();

        let throttle = DiagnosticThrottle::default();
        let shim = FallbackDispatcher::with_throttle(&registry, &throttle);
        let (dispatch, captured) = capture_warnings();

        tracing::dispatcher::with_default(&dispatch, || {
            for _ in 0..100 {
                assert_eq!(shim.get_recent_failure_count(DeviceHandle(0)), 4);
                assert_eq!(shim.get_total_failure_count(DeviceHandle(0)), 11);
                shim.clear_failure_count(DeviceHandle(0));
            }
        });

        assert_eq!(captured.count(), 0);
        assert_eq!(recording.clears.load(Ordering::SeqCst), 100);
        for kind in CapabilityKind::ALL {
            assert!(!throttle.is_warned(kind));
        }
    }

    #[test]
    fn global_throttle_records_fallbacks() {
        let registry = unbound_registry();
        let shim = FallbackDispatcher::new(&registry);

        for _ in 0..1000 {
            assert_eq!(shim.get_recent_failure_count(DeviceHandle(0)), 0);
        }
        assert!(DiagnosticThrottle::global().is_warned(CapabilityKind::RecentFailureCount));
    }
}
