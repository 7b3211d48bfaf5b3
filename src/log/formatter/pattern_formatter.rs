use crate::log::channel::ChannelKind;
use crate::log::context::{ContextField, LogContext};
use crate::log::error::LogError;
use crate::log::formatter::LogFormatter;
use crate::log::level::LogLevel;
use crate::log::log_record::LogRecord;
use serde::Deserialize;
use smart_default::SmartDefault;
use std::fmt::Write;
use std::iter::Peekable;
use std::str::Chars;

const ISO8601: &str = "%Y-%m-%dT%H:%M:%S%.3f";
const ISO8601_WITH_TZ_OFFSET: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";
const ABSOLUTE: &str = "%H:%M:%S%.3f";
const RESET: &str = "\x1b[0m";

/// PatternFormatter 配置
#[derive(Debug, Clone, Deserialize, SmartDefault)]
#[serde(default)]
pub struct PatternFormatterConfig {
    /// 布局模式
    ///
    /// - `%d` / `%d{ISO8601}` / `%d{ISO8601_WITH_TZ_OFFSET}` / `%d{ABSOLUTE}` / `%d{yyyy-MM-dd hh:mm:ss.SSS}`
    /// - `%p` 级别，`%h` 主机，`%m` 消息，`%X{Module}` 上下文字段
    /// - `%f:%l:%o` 调用位置，`%[ ... %]` 按级别着色，`%n` 换行，`%%` 百分号
    #[default("[%d] [%p] [%X{Module}] %m".to_string())]
    pub pattern: String,

    /// 是否启用颜色输出
    #[default = false]
    pub colored: bool,

    /// `%h` 渲染的主机标识
    #[default("localhost".to_string())]
    pub host: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Date(String),
    Level,
    Host,
    Message,
    Field(ContextField),
    File,
    Line,
    Column,
    ColorStart,
    ColorEnd,
}

/// 模式格式化器
///
/// 模式在构造时编译为 token 序列，`%X{...}` 引用的字段必须属于通道的上下文结构
pub struct PatternFormatter {
    tokens: Vec<Token>,
    colored: bool,
    host: String,
}

impl PatternFormatter {
    pub fn new(config: PatternFormatterConfig, kind: ChannelKind) -> Result<Self, LogError> {
        let tokens = compile(&config.pattern, kind)?;
        Ok(Self {
            tokens,
            colored: config.colored,
            host: config.host,
        })
    }

    /// 使用通道的默认模式
    pub fn for_channel(kind: ChannelKind, colored: bool, host: String) -> Result<Self, LogError> {
        Self::new(
            PatternFormatterConfig {
                pattern: kind.default_pattern().to_string(),
                colored,
                host,
            },
            kind,
        )
    }

    /// 最简布局 `[%d] [%p] %m`，不经过编译，用于所有模式都不可用时
    pub fn fallback(host: String) -> Self {
        Self {
            tokens: vec![
                Token::Literal("[".to_string()),
                Token::Date(ISO8601.to_string()),
                Token::Literal("] [".to_string()),
                Token::Level,
                Token::Literal("] ".to_string()),
                Token::Message,
            ],
            colored: false,
            host,
        }
    }
}

impl LogFormatter for PatternFormatter {
    fn format(&self, record: &LogRecord, context: &LogContext) -> String {
        let mut result = String::with_capacity(64 + record.message.len());

        for token in &self.tokens {
            match token {
                Token::Literal(s) => result.push_str(s),
                Token::Date(fmt) => {
                    let _ = write!(result, "{}", record.timestamp.format(fmt));
                }
                Token::Level => {
                    let _ = write!(result, "{}", record.level);
                }
                Token::Host => result.push_str(&self.host),
                Token::Message => result.push_str(&record.message),
                Token::Field(field) => result.push_str(context.get(*field).unwrap_or("")),
                Token::File => result.push_str(record.file().unwrap_or("")),
                Token::Line => {
                    if let Some(line) = record.line() {
                        let _ = write!(result, "{}", line);
                    }
                }
                Token::Column => {
                    if let Some(column) = record.column() {
                        let _ = write!(result, "{}", column);
                    }
                }
                Token::ColorStart => {
                    if self.colored {
                        result.push_str(level_color(record.level));
                    }
                }
                Token::ColorEnd => {
                    if self.colored {
                        result.push_str(RESET);
                    }
                }
            }
        }

        result
    }
}

fn level_color(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "\x1b[34m", // 蓝色
        LogLevel::Debug => "\x1b[36m", // 青色
        LogLevel::Info => "\x1b[32m",  // 绿色
        LogLevel::Warn => "\x1b[33m",  // 黄色
        LogLevel::Error => "\x1b[31m", // 红色
        LogLevel::Fatal | LogLevel::Off => "\x1b[35m",
    }
}

fn compile(pattern: &str, kind: ChannelKind) -> Result<Vec<Token>, LogError> {
    let invalid = |reason: String| LogError::InvalidPattern {
        pattern: pattern.to_string(),
        reason,
    };

    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }

        let conv = chars
            .next()
            .ok_or_else(|| invalid("dangling '%' at end of pattern".to_string()))?;
        let token = match conv {
            '%' => {
                literal.push('%');
                continue;
            }
            'n' => {
                literal.push('\n');
                continue;
            }
            'd' => match read_braced(&mut chars).map_err(&invalid)? {
                None => Token::Date(ISO8601.to_string()),
                Some(format) => Token::Date(translate_date(&format).map_err(&invalid)?),
            },
            'p' => Token::Level,
            'h' => Token::Host,
            'm' => Token::Message,
            'f' => Token::File,
            'l' => Token::Line,
            'o' => Token::Column,
            '[' => Token::ColorStart,
            ']' => Token::ColorEnd,
            'X' => {
                let name = read_braced(&mut chars)
                    .map_err(&invalid)?
                    .ok_or_else(|| invalid("%X requires a {field}".to_string()))?;
                let field = name
                    .parse::<ContextField>()
                    .map_err(|_| LogError::UnknownContextField {
                        channel: kind,
                        field: name.clone(),
                    })?;
                if !kind.schema().contains(&field) {
                    return Err(LogError::UnknownContextField {
                        channel: kind,
                        field: name,
                    });
                }
                Token::Field(field)
            }
            other => return Err(invalid(format!("unknown specifier %{}", other))),
        };

        if !literal.is_empty() {
            tokens.push(Token::Literal(std::mem::take(&mut literal)));
        }
        tokens.push(token);
    }

    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }

    Ok(tokens)
}

/// 读取紧跟的 `{...}`，没有花括号时返回 None
fn read_braced(chars: &mut Peekable<Chars<'_>>) -> Result<Option<String>, String> {
    if chars.peek() != Some(&'{') {
        return Ok(None);
    }
    chars.next();

    let mut content = String::new();
    for c in chars.by_ref() {
        if c == '}' {
            return Ok(Some(content));
        }
        content.push(c);
    }
    Err("unclosed '{'".to_string())
}

/// 把 `yyyy-MM-dd hh:mm:ss.SSS` 风格的日期模式翻译为 chrono 格式
fn translate_date(format: &str) -> Result<String, String> {
    match format {
        "ISO8601" => return Ok(ISO8601.to_string()),
        "ISO8601_WITH_TZ_OFFSET" => return Ok(ISO8601_WITH_TZ_OFFSET.to_string()),
        "ABSOLUTE" => return Ok(ABSOLUTE.to_string()),
        "" => return Err("empty date format".to_string()),
        _ => {}
    }

    const TOKENS: [(&str, &str); 8] = [
        ("yyyy", "%Y"),
        ("SSS", "%3f"),
        ("yy", "%y"),
        ("MM", "%m"),
        ("dd", "%d"),
        ("hh", "%H"),
        ("mm", "%M"),
        ("ss", "%S"),
    ];

    let mut result = String::with_capacity(format.len() * 2);
    let mut rest = format;
    'outer: while !rest.is_empty() {
        for (from, to) in TOKENS {
            if let Some(tail) = rest.strip_prefix(from) {
                result.push_str(to);
                rest = tail;
                continue 'outer;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            if c == '%' {
                result.push_str("%%");
            } else {
                result.push(c);
            }
        }
        rest = chars.as_str();
    }

    Ok(result)
}
