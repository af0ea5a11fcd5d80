use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEOUT_WARNING_MS: u64 = 10_000; // 10 seconds
pub const TIMEOUT_WARNING_ENV: &str = "QUANTUM_LIFECYCLE_TIMEOUT_MS";

/// Phase of a workspace transition a handler is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LifecycleEventType {
    BeforeActivate,
    AfterActivate,
    BeforeDeactivate,
    AfterDeactivate,
}

impl LifecycleEventType {
    /// Every event type, in the order a full transition fires them.
    pub const ALL: [LifecycleEventType; 4] = [
        LifecycleEventType::BeforeDeactivate,
        LifecycleEventType::AfterDeactivate,
        LifecycleEventType::BeforeActivate,
        LifecycleEventType::AfterActivate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleEventType::BeforeActivate => "beforeActivate",
            LifecycleEventType::AfterActivate => "afterActivate",
            LifecycleEventType::BeforeDeactivate => "beforeDeactivate",
            LifecycleEventType::AfterDeactivate => "afterDeactivate",
        }
    }

    pub fn is_activation(&self) -> bool {
        matches!(
            self,
            LifecycleEventType::BeforeActivate | LifecycleEventType::AfterActivate
        )
    }
}

impl fmt::Display for LifecycleEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifecycleEventType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "beforeActivate" => Ok(LifecycleEventType::BeforeActivate),
            "afterActivate" => Ok(LifecycleEventType::AfterActivate),
            "beforeDeactivate" => Ok(LifecycleEventType::BeforeDeactivate),
            "afterDeactivate" => Ok(LifecycleEventType::AfterDeactivate),
            other => Err(format!("unknown lifecycle event '{}'", other)),
        }
    }
}

/// How a workspace change was initiated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationTrigger {
    /// User clicked a link or used browser history.
    #[default]
    Navigation,
    /// Code asked for a workspace switch.
    Programmatic,
}

impl NavigationTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationTrigger::Navigation => "navigation",
            NavigationTrigger::Programmatic => "programmatic",
        }
    }
}

impl fmt::Display for NavigationTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Elapsed time after which a still-running handler is reported. The
    /// handler itself keeps running.
    #[serde(default = "default_timeout_warning_ms")]
    pub timeout_warning_ms: u64,
    /// Whether the busy overlay should be shown while handlers run.
    #[serde(default = "default_show_loader")]
    pub show_loader: bool,
    /// Trace every dispatched handler at debug level.
    #[serde(default = "default_enable_logging")]
    pub enable_logging: bool,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            timeout_warning_ms: DEFAULT_TIMEOUT_WARNING_MS,
            show_loader: default_show_loader(),
            enable_logging: default_enable_logging(),
        }
    }
}

impl LifecycleConfig {
    /// Defaults with the `QUANTUM_LIFECYCLE_TIMEOUT_MS` override applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(TIMEOUT_WARNING_ENV) {
            config.timeout_warning_ms = parse_timeout_ms(&raw);
        }
        config
    }

    pub fn timeout_warning(&self) -> Duration {
        Duration::from_millis(self.timeout_warning_ms)
    }
}

/// Unparseable values fall back to the default threshold.
pub fn parse_timeout_ms(raw: &str) -> u64 {
    raw.trim()
        .parse::<u64>()
        .unwrap_or(DEFAULT_TIMEOUT_WARNING_MS)
}

pub fn default_timeout_warning_ms() -> u64 {
    DEFAULT_TIMEOUT_WARNING_MS
}

pub fn default_show_loader() -> bool {
    true
}

pub fn default_enable_logging() -> bool {
    cfg!(debug_assertions)
}
