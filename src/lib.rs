//! # AI Trivia Quiz
//!
//! 一个调用生成式 AI 接口出题的命令行问答程序
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础层（Storage / Models）
//! - `storage` - 键值存储接口与文件实现，持久化 API key 和主题历史
//! - `models/` - 题目与答题会话的数据模型
//!
//! ### ② 业务能力层（Services）
//! - `services/generator` - 调用生成式 AI 接口生成一套题目
//! - `services/topic_selector` - 选择未用过的主题，维护主题历史
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/session` - 答题会话状态机（提交凭证 → 出题 → 答题 → 结算）
//!
//! ### ④ 编排层（App）
//! - `app` - 终端交互循环，渲染题目并收集用户输入

pub mod app;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod services;
pub mod storage;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{QuizError, QuizResult};
pub use models::{Question, QuizSession, ResultCategory};
pub use services::{GeminiClient, QuizSource, TopicSelector};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use workflow::{AnswerOutcome, QuizController, SessionState};
