//! 答题会话状态机 - 流程层
//!
//! 核心职责：编排一次完整的答题流程
//!
//! 状态流转：
//! `AwaitingCredential → Loading → Presenting(i) → Answered(i) → … → Complete`
//!
//! - 不直接做网络调用（依赖 `QuizSource`）
//! - 不直接读写文件（依赖 `KeyValueStore`）
//! - 不关心渲染方式

use std::fmt;

use tracing::{info, warn};

use crate::error::{QuizError, QuizResult};
use crate::models::{Question, QuizSession, ResultCategory, OPTION_COUNT};
use crate::services::{QuizSource, TopicSelector};
use crate::storage::{KeyValueStore, CREDENTIAL_KEY};

/// 会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// 等待用户提供 API key
    AwaitingCredential,
    /// 生成请求进行中（同一时间至多一个）
    Loading,
    /// 正在展示第 i 题，等待作答
    Presenting(usize),
    /// 第 i 题已作答，等待进入下一题
    Answered(usize),
    /// 全部答完，可查看结算
    Complete,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::AwaitingCredential => write!(f, "等待凭证"),
            SessionState::Loading => write!(f, "生成中"),
            SessionState::Presenting(i) => write!(f, "答题中(第{}题)", i + 1),
            SessionState::Answered(i) => write!(f, "已作答(第{}题)", i + 1),
            SessionState::Complete => write!(f, "已完成"),
        }
    }
}

/// 一次作答的结果，供渲染层展示
#[derive(Debug, Clone)]
pub struct AnswerOutcome {
    /// 是否答对
    pub correct: bool,
    /// 正确选项的索引
    pub correct_index: usize,
    /// 答案解析
    pub explanation: String,
}

/// 答题会话控制器
///
/// 持有全部会话状态（当前题号、得分、题目），
/// 不使用任何全局可变状态，可以并发创建多个实例做测试
pub struct QuizController<S, G> {
    store: S,
    source: G,
    selector: TopicSelector,
    state: SessionState,
    session: Option<QuizSession>,
}

impl<S: KeyValueStore, G: QuizSource> QuizController<S, G> {
    /// 创建控制器，初始状态为等待凭证
    pub fn new(store: S, source: G, selector: TopicSelector) -> Self {
        Self {
            store,
            source,
            selector,
            state: SessionState::AwaitingCredential,
            session: None,
        }
    }

    /// 当前状态
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// 当前会话（生成成功后才存在）
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    /// 当前题目
    pub fn current_question(&self) -> Option<&Question> {
        self.session.as_ref().and_then(|s| s.current_question())
    }

    /// 启动时读回的已保存凭证，用于预填输入
    pub fn saved_credential(&self) -> Option<String> {
        self.store.get(CREDENTIAL_KEY)
    }

    /// 主题历史（供查看界面使用）
    pub fn topic_history(&self) -> QuizResult<Vec<String>> {
        self.selector.history(&self.store)
    }

    /// 清空主题历史，独立于答题流程，任何状态下可用
    pub fn clear_topic_history(&mut self) -> QuizResult<()> {
        self.selector.clear_history(&mut self.store)
    }

    /// 提交 API key
    ///
    /// 空或全空白输入被拒绝且不改变任何状态；
    /// 有效输入立即持久化
    pub fn submit_credential(&mut self, key: &str) -> QuizResult<()> {
        if self.state != SessionState::AwaitingCredential {
            return Err(QuizError::InvalidTransition {
                operation: "submit_credential",
                state: self.state.to_string(),
            });
        }

        let key = key.trim();
        if key.is_empty() {
            return Err(QuizError::CredentialMissing);
        }

        self.store.set(CREDENTIAL_KEY, key)?;
        Ok(())
    }

    /// 开始一套新题
    ///
    /// 仅在 `AwaitingCredential`（已有凭证）或 `Complete` 状态下有效。
    /// 成功时安装新会话并进入 `Presenting(0)`；
    /// 任何失败都完整丢弃本次尝试，回到 `AwaitingCredential`，
    /// 不保留部分会话。
    pub async fn begin_quiz(&mut self) -> QuizResult<()> {
        match self.state {
            SessionState::AwaitingCredential | SessionState::Complete => {}
            _ => {
                return Err(QuizError::InvalidTransition {
                    operation: "begin_quiz",
                    state: self.state.to_string(),
                });
            }
        }

        // 凭证缺失属于本地可恢复错误，不触发状态回退
        let api_key = self
            .store
            .get(CREDENTIAL_KEY)
            .ok_or(QuizError::CredentialMissing)?;

        self.state = SessionState::Loading;
        self.session = None;

        match self.generate_session(&api_key).await {
            Ok(session) => {
                info!("✓ 已生成主题为 {} 的 {} 道题", session.topic, session.total());
                self.session = Some(session);
                self.state = SessionState::Presenting(0);
                Ok(())
            }
            Err(e) => {
                warn!("⚠️ 题目生成失败: {}", e);
                self.state = SessionState::AwaitingCredential;
                Err(e)
            }
        }
    }

    /// 选主题 → 请求生成 → 校验 → 记录主题
    async fn generate_session(&mut self, api_key: &str) -> QuizResult<QuizSession> {
        let topic = self.selector.pick_topic(&mut self.store)?;
        info!("🎲 本轮主题: {}", topic);

        let payload = self.source.generate(api_key, &topic).await?;
        let session = QuizSession::from_payload(&topic, payload)?;

        self.selector.record_topic_used(&mut self.store, &topic)?;
        Ok(session)
    }

    /// 提交当前题目的答案
    ///
    /// 仅在 `Presenting(i)` 状态下有效；同一道题第二次提交会被拒绝，
    /// 得分不会变化
    pub fn submit_answer(&mut self, option_index: usize) -> QuizResult<AnswerOutcome> {
        let SessionState::Presenting(index) = self.state else {
            return Err(QuizError::InvalidTransition {
                operation: "submit_answer",
                state: self.state.to_string(),
            });
        };

        if option_index >= OPTION_COUNT {
            return Err(QuizError::InvalidAnswerIndex {
                index: option_index,
                max: OPTION_COUNT - 1,
            });
        }

        let session = self.session.as_mut().expect("Presenting 状态必有会话");
        let correct = session.record_answer(option_index);
        let question = session.current_question().expect("Presenting 状态必有当前题");

        let outcome = AnswerOutcome {
            correct,
            correct_index: question.correct_index,
            explanation: question.explanation.clone(),
        };

        self.state = SessionState::Answered(index);
        Ok(outcome)
    }

    /// 进入下一题；最后一题之后进入结算状态
    pub fn advance(&mut self) -> QuizResult<()> {
        let SessionState::Answered(index) = self.state else {
            return Err(QuizError::InvalidTransition {
                operation: "advance",
                state: self.state.to_string(),
            });
        };

        let session = self.session.as_mut().expect("Answered 状态必有会话");
        if session.step_forward() {
            self.state = SessionState::Complete;
        } else {
            self.state = SessionState::Presenting(index + 1);
        }
        Ok(())
    }

    /// 重新开始一套新题，仅在结算状态下有效
    pub async fn restart(&mut self) -> QuizResult<()> {
        if self.state != SessionState::Complete {
            return Err(QuizError::InvalidTransition {
                operation: "restart",
                state: self.state.to_string(),
            });
        }
        self.begin_quiz().await
    }

    /// 最终得分，仅在结算状态下有值
    pub fn final_score(&self) -> Option<usize> {
        match self.state {
            SessionState::Complete => self.session.as_ref().map(|s| s.score()),
            _ => None,
        }
    }

    /// 结算档位，仅在结算状态下有值
    pub fn result_category(&self) -> Option<ResultCategory> {
        self.final_score().map(ResultCategory::from_score)
    }
}
