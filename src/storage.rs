//! 键值存储模块
//!
//! 会话与主题逻辑只依赖 `KeyValueStore` 接口，
//! 便于在没有真实文件的情况下做单元测试
//!
//! 持久化的内容只有两项：API key 和主题历史

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::error::{QuizError, QuizResult};

/// API key 的存储键
pub const CREDENTIAL_KEY: &str = "api_key";

/// 主题历史的存储键（值为 JSON 数组字符串）
pub const TOPIC_HISTORY_KEY: &str = "topic_history";

/// 字符串键值存储接口
///
/// 每次写入立即落盘，没有批量提交，也没有事务
pub trait KeyValueStore {
    /// 读取指定键的值；键不存在属于正常情况（首次运行）
    fn get(&self, key: &str) -> Option<String>;

    /// 写入并立即持久化
    fn set(&mut self, key: &str, value: &str) -> QuizResult<()>;

    /// 删除并立即持久化
    fn remove(&mut self, key: &str) -> QuizResult<()>;
}

/// 基于 TOML 文件的存储实现
///
/// 文件内容是一张字符串表，打开时整体读入，每次变更整体重写
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// 打开（或初始化）状态文件
    ///
    /// # 参数
    /// - `path`: 状态文件路径，文件不存在视为首次运行
    pub fn open(path: impl AsRef<Path>) -> QuizResult<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("无法读取状态文件: {}", path.display()))
                .map_err(QuizError::storage)?;

            toml::from_str(&content)
                .with_context(|| format!("无法解析状态文件: {}", path.display()))
                .map_err(QuizError::storage)?
        } else {
            debug!("状态文件 {} 不存在，视为首次运行", path.display());
            BTreeMap::new()
        };

        Ok(Self { path, entries })
    }

    /// 将全部条目重写到文件
    fn flush(&self) -> QuizResult<()> {
        let content = toml::to_string(&self.entries)
            .context("无法序列化状态")
            .map_err(QuizError::storage)?;

        std::fs::write(&self.path, content)
            .with_context(|| format!("无法写入状态文件: {}", self.path.display()))
            .map_err(QuizError::storage)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> QuizResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> QuizResult<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// 纯内存存储，用于测试
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> QuizResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> QuizResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}
