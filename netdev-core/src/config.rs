use crate::registry::RegistryBuilder;
use crate::throttle::DiagnosticMode;
use crate::traits::{Device, DeviceHandle, DeviceKind};
use crate::{Error, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// 顶层应用配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub diagnostics: DiagnosticsConfig,
    /// 受管设备，句柄按文件中的顺序从 0 开始分配
    pub devices: Vec<Device>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DiagnosticsConfig {
    pub mode: DiagnosticMode,
}

/// 用于解析 TOML 的临时结构；枚举值先按字符串读入，在 `TryFrom` 中校验
#[derive(Deserialize)]
struct AppConfigFile {
    #[serde(default)]
    diagnostics: DiagnosticsToml,
    #[serde(default)]
    devices: Vec<DeviceToml>,
}

#[derive(Deserialize, Default)]
struct DiagnosticsToml {
    mode: Option<String>,
}

#[derive(Deserialize)]
struct DeviceToml {
    interface: String,
    kind: String,
}

impl TryFrom<AppConfigFile> for AppConfig {
    type Error = Error;

    fn try_from(t: AppConfigFile) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut devices = Vec::with_capacity(t.devices.len());
        for (index, d) in t.devices.into_iter().enumerate() {
            if d.interface.trim().is_empty() {
                return Err(Error::Config(format!("device {} has an empty interface name", index)));
            }
            if !seen.insert(d.interface.clone()) {
                return Err(Error::Config(format!("duplicate interface '{}'", d.interface)));
            }
            let handle = u32::try_from(index)
                .map_err(|_| Error::Config("too many devices".to_string()))?;
            let kind: DeviceKind = d.kind.parse()?;
            devices.push(Device::new(DeviceHandle(handle), d.interface, kind));
        }
        let mode = match t.diagnostics.mode {
            Some(mode) => mode.parse()?,
            None => DiagnosticMode::default(),
        };
        Ok(AppConfig {
            diagnostics: DiagnosticsConfig { mode },
            devices,
        })
    }
}

impl AppConfig {
    /// A registry builder with every configured device registered, nothing bound.
    pub fn registry_builder(&self) -> Result<RegistryBuilder> {
        let mut builder = RegistryBuilder::new();
        for device in &self.devices {
            builder.add_device(device.clone())?;
        }
        Ok(builder)
    }
}

// ============= 配置加载函数 =============

/// 从 TOML 字符串加载应用配置
pub fn load_config_from_toml_str(s: &str) -> Result<AppConfig> {
    let parsed: AppConfigFile =
        toml::from_str(s).map_err(|e| Error::Config(format!("invalid TOML: {}", e)))?;
    AppConfig::try_from(parsed)
}

/// 从文件加载应用配置
pub fn load_config_from_path(path: &Path) -> Result<AppConfig> {
    let s = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), "Loaded config file");
    load_config_from_toml_str(&s)
}
