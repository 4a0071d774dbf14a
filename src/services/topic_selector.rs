//! 主题选择服务 - 业务能力层
//!
//! 只负责"选主题"能力：
//! - 从目录中随机挑一个最近没用过的主题
//! - 维护持久化的主题历史
//! - 历史覆盖整个目录时整体清空后重选

use rand::Rng;
use tracing::{debug, info};

use crate::error::{QuizError, QuizResult};
use crate::storage::{KeyValueStore, TOPIC_HISTORY_KEY};

/// 内置主题目录
pub const DEFAULT_TOPIC_CATALOG: &[&str] = &[
    "History",
    "Science",
    "Geography",
    "Movies",
    "Sports",
    "Technology",
    "Astronomy",
    "Music",
    "Literature",
    "Nature",
];

/// 主题选择器
pub struct TopicSelector {
    catalog: Vec<String>,
}

impl Default for TopicSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl TopicSelector {
    /// 使用内置目录创建选择器
    pub fn new() -> Self {
        Self::with_catalog(DEFAULT_TOPIC_CATALOG.iter().map(|s| s.to_string()).collect())
    }

    /// 使用自定义目录创建选择器
    pub fn with_catalog(catalog: Vec<String>) -> Self {
        assert!(!catalog.is_empty(), "主题目录不能为空");
        Self { catalog }
    }

    /// 主题目录
    pub fn catalog(&self) -> &[String] {
        &self.catalog
    }

    /// 挑选一个主题
    ///
    /// 候选集为「目录 − 历史」。候选集为空（历史已覆盖整个目录）时
    /// 先清空并持久化历史，再从完整目录中挑选。
    /// 挑选本身是均匀随机的，变化正是目的所在。
    pub fn pick_topic<S: KeyValueStore>(&self, store: &mut S) -> QuizResult<String> {
        let history = self.history(store)?;

        let available: Vec<&String> = self
            .catalog
            .iter()
            .filter(|topic| !history.contains(*topic))
            .collect();

        let available = if available.is_empty() {
            info!("📚 主题历史已覆盖全部 {} 个主题，清空重来", self.catalog.len());
            self.clear_history(store)?;
            self.catalog.iter().collect()
        } else {
            available
        };

        let picked = available[rand::thread_rng().gen_range(0..available.len())].clone();
        debug!("候选主题 {} 个，选中: {}", available.len(), picked);

        Ok(picked)
    }

    /// 记录主题已被使用并持久化
    ///
    /// 不做去重：重复只会通过"历史覆盖目录后整体清空"这一条规则消化
    pub fn record_topic_used<S: KeyValueStore>(
        &self,
        store: &mut S,
        topic: &str,
    ) -> QuizResult<()> {
        let mut history = self.history(store)?;
        history.push(topic.to_string());
        self.save_history(store, &history)
    }

    /// 清空主题历史并持久化
    pub fn clear_history<S: KeyValueStore>(&self, store: &mut S) -> QuizResult<()> {
        self.save_history(store, &[])
    }

    /// 读取主题历史
    ///
    /// 键不存在时返回空列表（首次运行）
    pub fn history<S: KeyValueStore>(&self, store: &S) -> QuizResult<Vec<String>> {
        match store.get(TOPIC_HISTORY_KEY) {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| QuizError::storage(format!("主题历史损坏: {}", e))),
            None => Ok(Vec::new()),
        }
    }

    fn save_history<S: KeyValueStore>(&self, store: &mut S, history: &[String]) -> QuizResult<()> {
        let raw = serde_json::to_string(history)
            .map_err(|e| QuizError::storage(format!("主题历史序列化失败: {}", e)))?;
        store.set(TOPIC_HISTORY_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn selector_ab() -> TopicSelector {
        TopicSelector::with_catalog(vec!["A".to_string(), "B".to_string()])
    }

    #[test]
    fn test_pick_returns_catalog_member() {
        let selector = TopicSelector::new();
        let mut store = MemoryStore::new();

        // 非确定性选择：只断言结果属于目录
        for _ in 0..20 {
            let topic = selector.pick_topic(&mut store).unwrap();
            assert!(selector.catalog().contains(&topic));
        }
    }

    #[test]
    fn test_pick_excludes_history() {
        // 目录 {A, B}，历史 {A}：只剩一个候选，结果确定
        let selector = selector_ab();
        let mut store = MemoryStore::new();
        selector.record_topic_used(&mut store, "A").unwrap();

        assert_eq!(selector.pick_topic(&mut store).unwrap(), "B");
    }

    #[test]
    fn test_exhausted_history_resets_before_pick() {
        let selector = selector_ab();
        let mut store = MemoryStore::new();
        selector.record_topic_used(&mut store, "A").unwrap();
        selector.record_topic_used(&mut store, "B").unwrap();

        let topic = selector.pick_topic(&mut store).unwrap();

        // 清空动作先于挑选发生，且已持久化
        assert!(selector.history(&store).unwrap().is_empty());
        assert!(topic == "A" || topic == "B");
    }

    #[test]
    fn test_record_round_trip() {
        let selector = TopicSelector::new();
        let mut store = MemoryStore::new();

        selector.record_topic_used(&mut store, "Astronomy").unwrap();
        let history = selector.history(&store).unwrap();
        assert!(history.contains(&"Astronomy".to_string()));
    }

    #[test]
    fn test_duplicates_are_not_filtered() {
        let selector = TopicSelector::new();
        let mut store = MemoryStore::new();

        selector.record_topic_used(&mut store, "Music").unwrap();
        selector.record_topic_used(&mut store, "Music").unwrap();

        assert_eq!(selector.history(&store).unwrap(), vec!["Music", "Music"]);
    }

    #[test]
    fn test_clear_history() {
        let selector = TopicSelector::new();
        let mut store = MemoryStore::new();

        selector.record_topic_used(&mut store, "Sports").unwrap();
        selector.clear_history(&mut store).unwrap();

        assert!(selector.history(&store).unwrap().is_empty());
    }
}
