use crate::log::log_record::LogRecord;
use anyhow::Result;

/// 日志输出器 trait
///
/// 负责将格式化后的一行日志输出到目标介质，每个实现自行保证整行写入不被交错
#[async_trait::async_trait]
pub trait LogAppender: Send + Sync {
    /// 输出日志
    ///
    /// `record` 用于需要事件时间的输出器（例如按天切分的文件）
    async fn append(&self, record: &LogRecord, formatted_message: &str) -> Result<()>;

    /// 刷新缓冲区（默认实现为空操作）
    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}
