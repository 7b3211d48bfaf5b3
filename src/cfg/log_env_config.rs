//! 日志通道的环境配置
//!
//! - `RUN_MODE` 不为 development 时，不输出开发日志和追踪日志；为 development 时默认输出所有级别
//! - 审计日志写在文件里，使用 `AUDIT_LOG_PATH` 控制路径前缀，默认为 `logs/audit`
//! - `DEV_LOG_LEVEL` / `TRACE_LOG_LEVEL` / `AUDIT_LOG_LEVEL` 分别控制三个通道的级别
//! - 系统日志始终输出所有级别，不可配置
//! - `*_LOG_PATTERN` 可以覆盖通道的默认布局
//! - 环境变化后需要重新调用 `configure()` 才会生效

use crate::cfg::source::ConfigSource;
use crate::log::channel::ChannelKind;
use crate::log::level::LogLevel;
use serde::Deserialize;
use serde_json::{Map, Value};
use smart_default::SmartDefault;

pub const RUN_MODE: &str = "RUN_MODE";
pub const NODE_ENV: &str = "NODE_ENV";
pub const DEV_LOG_LEVEL: &str = "DEV_LOG_LEVEL";
pub const TRACE_LOG_LEVEL: &str = "TRACE_LOG_LEVEL";
pub const AUDIT_LOG_LEVEL: &str = "AUDIT_LOG_LEVEL";
pub const AUDIT_LOG_PATH: &str = "AUDIT_LOG_PATH";
pub const DEV_LOG_PATTERN: &str = "DEV_LOG_PATTERN";
pub const TRACE_LOG_PATTERN: &str = "TRACE_LOG_PATTERN";
pub const AUDIT_LOG_PATTERN: &str = "AUDIT_LOG_PATTERN";
pub const SYSTEM_LOG_PATTERN: &str = "SYSTEM_LOG_PATTERN";
pub const LOG_COLORED: &str = "LOG_COLORED";
pub const HOSTNAME: &str = "HOSTNAME";
pub const COMPUTERNAME: &str = "COMPUTERNAME";

/// 开发模式的取值
pub const DEVELOPMENT_MODE: &str = "development";

/// 审计日志默认路径前缀
pub const DEFAULT_AUDIT_LOG_PATH: &str = "logs/audit";

/// 日志环境配置
///
/// 字段名即环境变量名，空字符串与未设置等价
#[derive(Debug, Clone, Deserialize, SmartDefault, PartialEq, Eq)]
#[serde(default)]
pub struct LogEnvConfig {
    /// 运行模式
    #[serde(rename = "RUN_MODE")]
    pub run_mode: Option<String>,

    /// 开发日志级别
    #[serde(rename = "DEV_LOG_LEVEL")]
    pub dev_log_level: Option<String>,

    /// 追踪日志级别
    #[serde(rename = "TRACE_LOG_LEVEL")]
    pub trace_log_level: Option<String>,

    /// 审计日志级别
    #[serde(rename = "AUDIT_LOG_LEVEL")]
    pub audit_log_level: Option<String>,

    /// 审计日志路径前缀
    #[serde(rename = "AUDIT_LOG_PATH")]
    pub audit_log_path: Option<String>,

    /// 开发日志布局
    #[serde(rename = "DEV_LOG_PATTERN")]
    pub dev_log_pattern: Option<String>,

    /// 追踪日志布局
    #[serde(rename = "TRACE_LOG_PATTERN")]
    pub trace_log_pattern: Option<String>,

    /// 审计日志布局
    #[serde(rename = "AUDIT_LOG_PATTERN")]
    pub audit_log_pattern: Option<String>,

    /// 系统日志布局
    #[serde(rename = "SYSTEM_LOG_PATTERN")]
    pub system_log_pattern: Option<String>,

    /// 终端输出是否着色
    #[serde(rename = "LOG_COLORED")]
    pub log_colored: Option<String>,

    /// 主机标识
    #[serde(rename = "HOSTNAME")]
    pub hostname: Option<String>,
}

impl LogEnvConfig {
    /// 从配置源读取
    pub fn from_source(source: &dyn ConfigSource) -> Self {
        let mut map = Map::new();
        let mut put = |field: &str, keys: &[&str]| {
            let value = keys
                .iter()
                .filter_map(|k| source.get(k))
                .find(|v| !v.is_empty());
            if let Some(v) = value {
                map.insert(field.to_string(), Value::String(v));
            }
        };

        put(RUN_MODE, &[RUN_MODE, NODE_ENV]);
        put(DEV_LOG_LEVEL, &[DEV_LOG_LEVEL]);
        put(TRACE_LOG_LEVEL, &[TRACE_LOG_LEVEL]);
        put(AUDIT_LOG_LEVEL, &[AUDIT_LOG_LEVEL]);
        put(AUDIT_LOG_PATH, &[AUDIT_LOG_PATH]);
        put(DEV_LOG_PATTERN, &[DEV_LOG_PATTERN]);
        put(TRACE_LOG_PATTERN, &[TRACE_LOG_PATTERN]);
        put(AUDIT_LOG_PATTERN, &[AUDIT_LOG_PATTERN]);
        put(SYSTEM_LOG_PATTERN, &[SYSTEM_LOG_PATTERN]);
        put(LOG_COLORED, &[LOG_COLORED]);
        put(HOSTNAME, &[HOSTNAME, COMPUTERNAME]);

        serde_json::from_value(Value::Object(map)).unwrap_or_else(|e| {
            tracing::warn!("failed to parse log environment: {}, using defaults", e);
            Self::default()
        })
    }

    /// 是否为开发模式
    pub fn is_development(&self) -> bool {
        self.run_mode
            .as_deref()
            .map_or(false, |m| m.trim().eq_ignore_ascii_case(DEVELOPMENT_MODE))
    }

    /// 计算通道阈值
    pub fn level_for(&self, kind: ChannelKind) -> LogLevel {
        match kind {
            ChannelKind::Develop => self.mode_gated_level(&self.dev_log_level),
            ChannelKind::Trace => self.mode_gated_level(&self.trace_log_level),
            ChannelKind::Audit => override_or_all(&self.audit_log_level),
            ChannelKind::System => LogLevel::ALL,
        }
    }

    fn mode_gated_level(&self, level: &Option<String>) -> LogLevel {
        if self.is_development() {
            override_or_all(level)
        } else {
            LogLevel::Off
        }
    }

    /// 通道布局覆盖，未配置时使用通道默认布局
    pub fn pattern_for(&self, kind: ChannelKind) -> Option<&str> {
        match kind {
            ChannelKind::Develop => self.dev_log_pattern.as_deref(),
            ChannelKind::Trace => self.trace_log_pattern.as_deref(),
            ChannelKind::Audit => self.audit_log_pattern.as_deref(),
            ChannelKind::System => self.system_log_pattern.as_deref(),
        }
    }

    /// 审计日志路径前缀，缺失或非法时使用默认值
    pub fn audit_path(&self) -> String {
        match self.audit_log_path.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_AUDIT_LOG_PATH.to_string(),
            Some(p) if p.ends_with('/') || p.ends_with('\\') || p.contains('\0') => {
                tracing::warn!(
                    "invalid {} {:?}, falling back to {}",
                    AUDIT_LOG_PATH,
                    p,
                    DEFAULT_AUDIT_LOG_PATH
                );
                DEFAULT_AUDIT_LOG_PATH.to_string()
            }
            Some(p) => p.to_string(),
        }
    }

    /// 终端输出是否着色，默认开启
    pub fn colored(&self) -> bool {
        match self.log_colored.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) => !matches!(v.as_str(), "false" | "0" | "no" | "off"),
            None => true,
        }
    }

    /// 主机标识，未配置时使用进程号
    pub fn host(&self) -> String {
        match self.hostname.as_deref() {
            Some(h) if !h.trim().is_empty() => h.trim().to_string(),
            _ => format!("pid-{}", std::process::id()),
        }
    }
}

fn override_or_all(level: &Option<String>) -> LogLevel {
    match level.as_deref() {
        Some(s) if !s.trim().is_empty() => LogLevel::parse_or_all(s),
        _ => LogLevel::ALL,
    }
}
