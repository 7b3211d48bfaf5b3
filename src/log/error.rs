use crate::log::channel::ChannelKind;
use thiserror::Error;

/// 日志模块统一错误类型
///
/// 只有配置期和句柄创建期的问题会以错误形式返回，写日志本身永远不会失败
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    #[error("{channel} logger requires a module name")]
    MissingModule { channel: ChannelKind },

    #[error("invalid layout pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("context field {field:?} is not available on the {channel} channel")]
    UnknownContextField { channel: ChannelKind, field: String },

    #[error("unknown channel: {0}")]
    UnknownChannel(String),
}
