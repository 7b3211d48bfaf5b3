use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 日志级别
///
/// 所有通道共享同一套有序级别，`Trace` 同时充当 `ALL`（最宽松），`Off` 关闭一切输出
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    /// 最详细的日志（等价于 ALL）
    Trace = 0,
    /// 调试信息
    Debug = 1,
    /// 一般信息
    Info = 2,
    /// 警告信息
    Warn = 3,
    /// 错误信息
    Error = 4,
    /// 致命错误
    Fatal = 5,
    /// 关闭
    Off = 6,
}

impl LogLevel {
    /// 最宽松的级别
    pub const ALL: LogLevel = LogLevel::Trace;

    /// 解析级别字符串，无法识别时退化为最宽松的级别
    ///
    /// 配置错误不能让日志系统启动失败，所以这里不返回错误
    pub fn parse_or_all(s: &str) -> LogLevel {
        match s.parse::<LogLevel>() {
            Ok(level) => level,
            Err(e) => {
                tracing::warn!("{}, falling back to ALL", e);
                LogLevel::ALL
            }
        }
    }

    /// 事件级别是否满足阈值
    pub fn permits(self, event: LogLevel) -> bool {
        self != LogLevel::Off && event != LogLevel::Off && event >= self
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "fatal" => Ok(LogLevel::Fatal),
            "off" => Ok(LogLevel::Off),
            _ => Err(format!("invalid log level: {}", s)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
            LogLevel::Off => "OFF",
        };
        // pad 让 `{:<5}` 这类宽度参数生效
        f.pad(name)
    }
}
