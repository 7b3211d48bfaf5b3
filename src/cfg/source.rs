//! 配置源抽象
//!
//! 日志配置只需要键值形式的读取能力，进程环境变量和内存映射都可以作为来源

use std::collections::HashMap;

/// 键值配置来源
///
/// 在每次 `configure` 时被读取一次，不需要监听变化
pub trait ConfigSource: Send + Sync {
    /// 读取配置项，不存在时返回 None
    fn get(&self, key: &str) -> Option<String>;
}

/// 进程环境变量
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl ConfigSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// 内存中的键值配置
///
/// # 示例
/// ```
/// use chanlog::cfg::{ConfigSource, MapSource};
///
/// let source = MapSource::from_pairs([("RUN_MODE", "development")]);
/// assert_eq!(source.get("RUN_MODE").as_deref(), Some("development"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct MapSource {
    values: HashMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }
}

impl ConfigSource for MapSource {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}
