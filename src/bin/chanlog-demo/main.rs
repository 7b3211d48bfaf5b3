// chanlog demo - writes one line to every channel

use anyhow::Result;
use chanlog::cfg::MapSource;
use chanlog::log::{
    configure_from, flush, get_audit_logger, get_develop_logger, get_system_logger,
    get_trace_logger, TraceTriple,
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "chanlog-demo")]
#[command(author = "hatlonely <hatlonely@foxmail.com>")]
#[command(version = "0.1.0")]
#[command(about = "Emit a sample line on each log channel", long_about = None)]
struct Cli {
    /// Run mode (develop and trace channels are only enabled in "development")
    #[arg(long, default_value = "development")]
    mode: String,

    /// Audit log path prefix (files are named <prefix>.<yyyy-MM-dd>.log)
    #[arg(long)]
    audit_path: Option<String>,

    /// Threshold for the develop channel
    #[arg(long)]
    dev_level: Option<String>,

    /// Disable ANSI colors on console channels
    #[arg(long)]
    no_color: bool,
}

impl Cli {
    fn to_source(&self) -> MapSource {
        let mut source = MapSource::new();
        source.set("RUN_MODE", self.mode.as_str());
        if let Some(path) = &self.audit_path {
            source.set("AUDIT_LOG_PATH", path.as_str());
        }
        if let Some(level) = &self.dev_level {
            source.set("DEV_LOG_LEVEL", level.as_str());
        }
        if self.no_color {
            source.set("LOG_COLORED", "false");
        }
        source
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    configure_from(&cli.to_source());

    get_develop_logger(Some("user"))
        .info("这是用户模块的开发日志")
        .await;
    get_audit_logger(Some("pay"))
        .error("这是支付模块的审计日志")
        .await;
    get_trace_logger(Some("http"), Some(TraceTriple::generate()))
        .info("这是服务之间的http请求的追踪日志")
        .await;
    get_system_logger("db")
        .warn("这是系统的数据库操作的警告日志")
        .await;
    get_develop_logger(None).debug("这是常规开发日志").await;

    flush().await;
    Ok(())
}
