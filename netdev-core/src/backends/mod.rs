#[cfg(feature = "wifi_plugin")]
pub mod wifi;
