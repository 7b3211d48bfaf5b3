//! 日志句柄上下文
//!
//! 每种通道使用固定结构的上下文，渲染时与事件合并，不属于事件本身

use crate::log::channel::ChannelKind;
use crate::log::error::LogError;
use crate::log::trace_id::new_trace_id;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 未指定模块名时使用的默认值
pub const DEFAULT_MODULE: &str = "default-module";

/// 可被布局引用的上下文字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextField {
    Module,
    TraceId,
    SpanId,
    ParentSpanId,
}

impl ContextField {
    pub fn name(&self) -> &'static str {
        match self {
            ContextField::Module => "Module",
            ContextField::TraceId => "TraceId",
            ContextField::SpanId => "SpanId",
            ContextField::ParentSpanId => "ParentSpanId",
        }
    }
}

impl FromStr for ContextField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Module" => Ok(ContextField::Module),
            "TraceId" => Ok(ContextField::TraceId),
            "SpanId" => Ok(ContextField::SpanId),
            "ParentSpanId" => Ok(ContextField::ParentSpanId),
            _ => Err(format!("unknown context field: {}", s)),
        }
    }
}

/// 链路追踪三元组
///
/// 三个标识独立生成，彼此之间的关联由调用方决定
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TraceTriple {
    /// 整个行为的追踪 id
    pub trace_id: String,
    /// 当前服务的追踪 id
    pub span_id: String,
    /// 上一个服务的追踪 id
    pub parent_span_id: String,
}

impl TraceTriple {
    pub fn new(
        trace_id: impl Into<String>,
        span_id: impl Into<String>,
        parent_span_id: impl Into<String>,
    ) -> Self {
        Self {
            trace_id: trace_id.into(),
            span_id: span_id.into(),
            parent_span_id: parent_span_id.into(),
        }
    }

    /// 生成三个互相独立的随机标识
    pub fn generate() -> Self {
        Self::new(new_trace_id(), new_trace_id(), new_trace_id())
    }
}

/// develop / audit 通道的上下文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleContext {
    pub module: String,
}

impl ModuleContext {
    pub fn new(module: Option<&str>) -> Self {
        Self {
            module: module_or_default(module),
        }
    }
}

/// trace 通道的上下文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceContext {
    pub module: String,
    pub trace: TraceTriple,
}

impl TraceContext {
    pub fn new(module: Option<&str>, trace: Option<TraceTriple>) -> Self {
        Self {
            module: module_or_default(module),
            trace: trace.unwrap_or_default(),
        }
    }
}

/// system 通道的上下文，模块名统一大写
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemContext {
    pub module: String,
}

impl SystemContext {
    /// 模块名缺失属于调用方的编程错误，不做默认填充
    pub fn new(module: Option<&str>) -> Result<Self, LogError> {
        match module {
            Some(m) if !m.trim().is_empty() => Ok(Self {
                module: m.to_uppercase(),
            }),
            _ => Err(LogError::MissingModule {
                channel: ChannelKind::System,
            }),
        }
    }
}

/// 绑定在日志句柄上的上下文
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogContext {
    Module(ModuleContext),
    Trace(TraceContext),
    System(SystemContext),
}

impl LogContext {
    /// 读取上下文字段，当前上下文不包含该字段时返回 None
    pub fn get(&self, field: ContextField) -> Option<&str> {
        match (self, field) {
            (LogContext::Module(ctx), ContextField::Module) => Some(&ctx.module),
            (LogContext::System(ctx), ContextField::Module) => Some(&ctx.module),
            (LogContext::Trace(ctx), ContextField::Module) => Some(&ctx.module),
            (LogContext::Trace(ctx), ContextField::TraceId) => Some(&ctx.trace.trace_id),
            (LogContext::Trace(ctx), ContextField::SpanId) => Some(&ctx.trace.span_id),
            (LogContext::Trace(ctx), ContextField::ParentSpanId) => {
                Some(&ctx.trace.parent_span_id)
            }
            _ => None,
        }
    }

    pub fn module(&self) -> &str {
        match self {
            LogContext::Module(ctx) => &ctx.module,
            LogContext::Trace(ctx) => &ctx.module,
            LogContext::System(ctx) => &ctx.module,
        }
    }
}

fn module_or_default(module: Option<&str>) -> String {
    match module {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => DEFAULT_MODULE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_context_default() {
        assert_eq!(ModuleContext::new(None).module, DEFAULT_MODULE);
        assert_eq!(ModuleContext::new(Some("")).module, DEFAULT_MODULE);
        assert_eq!(ModuleContext::new(Some("user")).module, "user");
    }

    #[test]
    fn test_trace_context_defaults_to_empty_fields() {
        let ctx = LogContext::Trace(TraceContext::new(Some("http"), None));
        assert_eq!(ctx.get(ContextField::Module), Some("http"));
        assert_eq!(ctx.get(ContextField::TraceId), Some(""));
        assert_eq!(ctx.get(ContextField::SpanId), Some(""));
        assert_eq!(ctx.get(ContextField::ParentSpanId), Some(""));
    }

    #[test]
    fn test_trace_context_keeps_triple() {
        let ctx = TraceContext::new(None, Some(TraceTriple::new("a1", "b2", "")));
        assert_eq!(ctx.module, DEFAULT_MODULE);
        assert_eq!(ctx.trace.trace_id, "a1");
        assert_eq!(ctx.trace.span_id, "b2");
        assert_eq!(ctx.trace.parent_span_id, "");
    }

    #[test]
    fn test_system_context_uppercases() {
        let ctx = SystemContext::new(Some("db")).unwrap();
        assert_eq!(ctx.module, "DB");
    }

    #[test]
    fn test_system_context_requires_module() {
        let expected = LogError::MissingModule {
            channel: ChannelKind::System,
        };
        assert_eq!(SystemContext::new(None).unwrap_err(), expected);
        assert_eq!(SystemContext::new(Some("  ")).unwrap_err(), expected);
    }

    #[test]
    fn test_module_context_has_no_trace_fields() {
        let ctx = LogContext::Module(ModuleContext::new(Some("pay")));
        assert_eq!(ctx.get(ContextField::Module), Some("pay"));
        assert_eq!(ctx.get(ContextField::TraceId), None);
    }

    #[test]
    fn test_context_field_from_str() {
        assert_eq!("SpanId".parse::<ContextField>(), Ok(ContextField::SpanId));
        assert!("spanid".parse::<ContextField>().is_err());
        assert_eq!(ContextField::ParentSpanId.name(), "ParentSpanId");
    }

    #[test]
    fn test_trace_triple_deserialize_partial() {
        let triple: TraceTriple = serde_json::from_str(r#"{"traceId":"a1"}"#).unwrap();
        assert_eq!(triple, TraceTriple::new("a1", "", ""));
    }

    #[test]
    fn test_trace_triple_generate() {
        let triple = TraceTriple::generate();
        assert_eq!(triple.trace_id.len(), 16);
        assert_eq!(triple.span_id.len(), 16);
        assert_eq!(triple.parent_span_id.len(), 16);
    }
}
