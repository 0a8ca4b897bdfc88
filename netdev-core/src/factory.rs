use crate::traits::WifiFailureCounters;
use std::sync::Arc;

/// Create the Wi-Fi plugin if it was compiled in.
///
/// 插件是否存在在编译期由 `wifi_plugin` feature 决定；返回 `None` 时
/// 所有 Wi-Fi 设备都会走 shim 的回退路径。
pub fn create_wifi_plugin() -> Option<Arc<dyn WifiFailureCounters>> {
    #[cfg(feature = "wifi_plugin")]
    {
        tracing::info!("📶 Wi-Fi plugin: built in");
        Some(Arc::new(crate::backends::wifi::WifiPlugin::new()))
    }
    #[cfg(not(feature = "wifi_plugin"))]
    {
        tracing::warn!("📶 Wi-Fi plugin: not built, failure counters fall back to the shim");
        None
    }
}
