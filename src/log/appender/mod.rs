mod console_appender;
mod daily_file_appender;
mod factory;
mod memory_appender;
mod trait_;

pub use console_appender::{ConsoleAppender, ConsoleAppenderConfig, Target};
pub use daily_file_appender::{DailyFileAppender, DailyFileAppenderConfig};
pub use factory::{AppenderFactory, DefaultAppenderFactory};
pub use memory_appender::MemoryAppender;
pub use trait_::LogAppender;
