use crate::log::appender::LogAppender;
use crate::log::log_record::LogRecord;
use anyhow::Result;
use std::sync::Mutex;

/// 内存输出器
///
/// 把日志行保存在内存里，主要用于测试或需要回放日志的宿主
#[derive(Debug, Default)]
pub struct MemoryAppender {
    lines: Mutex<Vec<String>>,
}

impl MemoryAppender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已写入的所有行
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

#[async_trait::async_trait]
impl LogAppender for MemoryAppender {
    async fn append(&self, _record: &LogRecord, formatted_message: &str) -> Result<()> {
        self.lines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(formatted_message.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::LogLevel;
    use chrono::Local;

    #[tokio::test]
    async fn test_memory_appender_collects_lines() -> Result<()> {
        let appender = MemoryAppender::new();
        let record = LogRecord::new(LogLevel::Info, "a".to_string(), Local::now());

        appender.append(&record, "line 1").await?;
        appender.append(&record, "line 2").await?;

        assert_eq!(appender.lines(), vec!["line 1", "line 2"]);
        assert_eq!(appender.len(), 2);

        appender.clear();
        assert!(appender.is_empty());
        Ok(())
    }
}
