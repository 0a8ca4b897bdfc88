//! One-shot diagnostics for the fallback shim.
//!
//! 每种能力各有一个 "是否已告警" 标志，首次走回退路径时原子地置位并打印一条 WARN，
//! 之后不再打印。标志在进程生命周期内不会复位。

use crate::traits::CapabilityKind;
use crate::Error;
use once_cell::sync::OnceCell;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

/// Log target of every fallback diagnostic.
pub const SHIM_TARGET: &str = concat!(env!("CARGO_CRATE_NAME"), "::shim");

/// Domain tag attached to fallback diagnostics.
pub const LOG_DOMAIN: &str = "WIFI";

static PROCESS_THROTTLE: OnceCell<DiagnosticThrottle> = OnceCell::new();

/// How many fallback warnings a throttle lets through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagnosticMode {
    /// One warning per capability kind.
    #[default]
    PerCapability,
    /// A single warning for the first fallback of any kind.
    OncePerProcess,
}

impl FromStr for DiagnosticMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "per_capability" => Ok(DiagnosticMode::PerCapability),
            "once_per_process" => Ok(DiagnosticMode::OncePerProcess),
            _ => Err(Error::Config(format!(
                "unknown diagnostic mode '{}' (expected per_capability or once_per_process)",
                s
            ))),
        }
    }
}

#[derive(Debug)]
pub struct DiagnosticThrottle {
    mode: DiagnosticMode,
    warned: [AtomicBool; 3],
}

impl DiagnosticThrottle {
    pub const fn new(mode: DiagnosticMode) -> Self {
        Self {
            mode,
            warned: [
                AtomicBool::new(false),
                AtomicBool::new(false),
                AtomicBool::new(false),
            ],
        }
    }

    /// The process-wide throttle. Defaults to [`DiagnosticMode::PerCapability`]
    /// unless [`DiagnosticThrottle::init_global`] ran first.
    pub fn global() -> &'static DiagnosticThrottle {
        PROCESS_THROTTLE.get_or_init(|| DiagnosticThrottle::new(DiagnosticMode::default()))
    }

    /// Fix the mode of the process-wide throttle.
    ///
    /// Returns `false` when the global throttle already exists (someone called
    /// [`DiagnosticThrottle::global`] or `init_global` earlier); its mode is
    /// left untouched in that case.
    pub fn init_global(mode: DiagnosticMode) -> bool {
        PROCESS_THROTTLE.set(DiagnosticThrottle::new(mode)).is_ok()
    }

    pub fn mode(&self) -> DiagnosticMode {
        self.mode
    }

    fn flag(&self, kind: CapabilityKind) -> &AtomicBool {
        match self.mode {
            DiagnosticMode::PerCapability => &self.warned[kind.index()],
            DiagnosticMode::OncePerProcess => &self.warned[0],
        }
    }

    /// Atomic test-and-set of the flag covering `kind`.
    ///
    /// Returns `true` for exactly one caller: the one that moved the flag from
    /// unwarned to warned.
    pub fn check(&self, kind: CapabilityKind) -> bool {
        let flag = self.flag(kind);
        // 已告警时只读不写，避免热路径上的缓存行争用
        if flag.load(Ordering::Acquire) {
            return false;
        }
        !flag.swap(true, Ordering::AcqRel)
    }

    pub fn is_warned(&self, kind: CapabilityKind) -> bool {
        self.flag(kind).load(Ordering::Acquire)
    }

    /// Record a fallback use of `kind`, logging the first one.
    pub fn note_fallback(&self, kind: CapabilityKind) {
        if self.check(kind) {
            tracing::warn!(
                target: SHIM_TARGET,
                domain = LOG_DOMAIN,
                function = kind.function_name(),
                "wifi shim used: {} is a no-op fallback (wifi plugin not available)",
                kind.function_name()
            );
        }
    }
}

impl Default for DiagnosticThrottle {
    fn default() -> Self {
        Self::new(DiagnosticMode::default())
    }
}
