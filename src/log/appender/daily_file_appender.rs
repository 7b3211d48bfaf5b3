use crate::log::appender::LogAppender;
use crate::log::log_record::LogRecord;
use anyhow::Result;
use serde::Deserialize;
use smart_default::SmartDefault;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// 日期后缀格式，文件名形如 `audit.2025-01-19.log`
const DATE_PATTERN: &str = "%Y-%m-%d";

/// DailyFileAppender 配置
#[derive(Debug, Clone, Deserialize, SmartDefault)]
#[serde(default)]
pub struct DailyFileAppenderConfig {
    /// 文件路径前缀，实际文件为 `<file_path>.<yyyy-MM-dd>.log`
    #[default("logs/audit".to_string())]
    pub file_path: String,
}

/// 当前文件信息
struct CurrentFile {
    file: tokio::fs::File,
    path: PathBuf,
    period: String,
}

/// 按天切分的文件输出器
///
/// 日期取自日志记录的时间戳。跨天时打开新文件继续追加，
/// 旧文件保持原样，不会被覆盖也不会被清理
pub struct DailyFileAppender {
    config: DailyFileAppenderConfig,
    current_file: Mutex<Option<CurrentFile>>,
}

impl DailyFileAppender {
    /// 文件在第一次写入时才打开，构造本身不会失败
    pub fn new(config: DailyFileAppenderConfig) -> Self {
        Self {
            config,
            current_file: Mutex::new(None),
        }
    }

    /// 文件路径前缀
    pub fn prefix(&self) -> &str {
        &self.config.file_path
    }

    /// 生成指定日期的文件路径
    pub fn path_for_period(&self, period: &str) -> PathBuf {
        PathBuf::from(format!("{}.{}.log", self.config.file_path, period))
    }

    /// 当前正在写入的文件
    pub async fn current_path(&self) -> Option<PathBuf> {
        self.current_file.lock().await.as_ref().map(|c| c.path.clone())
    }

    async fn open(&self, period: String) -> Result<CurrentFile> {
        let path = self.path_for_period(&period);

        // 确保父目录存在
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        Ok(CurrentFile { file, path, period })
    }
}

#[async_trait::async_trait]
impl LogAppender for DailyFileAppender {
    async fn append(&self, record: &LogRecord, formatted_message: &str) -> Result<()> {
        let period = record.timestamp.format(DATE_PATTERN).to_string();

        let mut current = self.current_file.lock().await;

        // 检查是否需要切分
        let rollover = match current.as_ref() {
            Some(c) => c.period != period,
            None => true,
        };
        if rollover {
            if let Some(old) = current.as_mut() {
                old.file.flush().await?;
            }
            // 打开失败时保留旧状态，下一次写入会重试
            *current = Some(self.open(period).await?);
        }

        if let Some(c) = current.as_mut() {
            let mut line = String::with_capacity(formatted_message.len() + 1);
            line.push_str(formatted_message);
            line.push('\n');
            c.file.write_all(line.as_bytes()).await?;
            c.file.flush().await?;
        }

        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        if let Some(c) = self.current_file.lock().await.as_mut() {
            c.file.flush().await?;
        }
        Ok(())
    }
}
