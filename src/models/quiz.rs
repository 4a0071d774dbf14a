//! 答题会话数据模型
//!
//! `Question` 的字段名与生成接口返回的 JSON 字段一一对应，
//! 反序列化后需经过 `validate` 校验才能进入会话

use serde::{Deserialize, Serialize};

use crate::error::{QuizError, QuizResult};

/// 每套题固定的题目数量
pub const QUESTION_COUNT: usize = 5;

/// 每道题固定的选项数量
pub const OPTION_COUNT: usize = 4;

/// 单道选择题
///
/// 一经校验即视为不可变
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// 题干
    #[serde(rename = "question")]
    pub prompt: String,
    /// 四个选项
    pub options: Vec<String>,
    /// 正确选项的索引（0-3）
    #[serde(rename = "correct")]
    pub correct_index: usize,
    /// 答案解析
    pub explanation: String,
}

impl Question {
    /// 校验单道题的形状
    fn validate(&self, index: usize) -> QuizResult<()> {
        if self.prompt.trim().is_empty() {
            return Err(QuizError::format(format!("第 {} 题题干为空", index + 1)));
        }
        if self.options.len() != OPTION_COUNT {
            return Err(QuizError::format(format!(
                "第 {} 题选项数量为 {}，应为 {}",
                index + 1,
                self.options.len(),
                OPTION_COUNT
            )));
        }
        if self.correct_index >= OPTION_COUNT {
            return Err(QuizError::format(format!(
                "第 {} 题正确答案索引 {} 超出范围 [0, {}]",
                index + 1,
                self.correct_index,
                OPTION_COUNT - 1
            )));
        }
        Ok(())
    }
}

/// 生成接口返回的整套题目
///
/// `topic` 为可选：生成服务不一定忠实回显请求的主题，
/// 会话安装时总是以请求的主题覆盖
#[derive(Debug, Clone, Deserialize)]
pub struct QuizPayload {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// 一次答题会话：一套 5 道题加当前进度
#[derive(Debug, Clone)]
pub struct QuizSession {
    /// 本套题的主题
    pub topic: String,
    /// 固定 5 道题
    questions: Vec<Question>,
    /// 当前题目索引，等于题目总数时表示已答完
    current_index: usize,
    /// 当前得分
    score: usize,
    /// 每道题提交过的答案（None 表示尚未作答），兼作防止重复作答的锁
    selections: Vec<Option<usize>>,
}

impl QuizSession {
    /// 由生成接口的返回内容构建会话
    ///
    /// # 参数
    /// - `topic`: 请求的主题，无条件覆盖返回内容中的 topic 字段
    /// - `payload`: 已提取并解析的 JSON 内容
    ///
    /// # 返回
    /// 形状校验失败时返回 `QuizError::Format`
    pub fn from_payload(topic: impl Into<String>, payload: QuizPayload) -> QuizResult<Self> {
        if payload.questions.len() != QUESTION_COUNT {
            return Err(QuizError::format(format!(
                "题目数量为 {}，应为 {}",
                payload.questions.len(),
                QUESTION_COUNT
            )));
        }
        for (i, question) in payload.questions.iter().enumerate() {
            question.validate(i)?;
        }

        Ok(Self {
            topic: topic.into(),
            selections: vec![None; payload.questions.len()],
            questions: payload.questions,
            current_index: 0,
            score: 0,
        })
    }

    /// 题目总数
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// 当前题目索引
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// 当前得分
    pub fn score(&self) -> usize {
        self.score
    }

    /// 当前题目；已答完时返回 None
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// 指定题目提交过的答案
    pub fn selection(&self, index: usize) -> Option<usize> {
        self.selections.get(index).copied().flatten()
    }

    /// 记录当前题目的答案，返回是否答对
    ///
    /// 每道题只允许记录一次，得分最多增加一次
    pub(crate) fn record_answer(&mut self, option_index: usize) -> bool {
        debug_assert!(self.selections[self.current_index].is_none());

        self.selections[self.current_index] = Some(option_index);
        let correct = self.questions[self.current_index].correct_index == option_index;
        if correct {
            self.score += 1;
        }
        correct
    }

    /// 前进到下一题，返回是否已答完全部题目
    pub(crate) fn step_forward(&mut self) -> bool {
        self.current_index += 1;
        self.current_index >= self.questions.len()
    }
}

/// 结算档位
///
/// 仅用于展示，无任何业务副作用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCategory {
    /// 满分
    Perfect,
    /// 3-4 分
    Good,
    /// 0-2 分
    NeedsPractice,
}

impl ResultCategory {
    /// 根据最终得分划分档位
    pub fn from_score(score: usize) -> Self {
        if score == QUESTION_COUNT {
            ResultCategory::Perfect
        } else if score >= 3 {
            ResultCategory::Good
        } else {
            ResultCategory::NeedsPractice
        }
    }

    /// 结算界面显示的消息
    pub fn message(self) -> &'static str {
        match self {
            ResultCategory::Perfect => "🏆 Perfect score! You're amazing!",
            ResultCategory::Good => "👍 Great job! You know your stuff!",
            ResultCategory::NeedsPractice => "💪 Keep practicing! You'll do better next time!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 创建测试用的题目
    fn sample_question(correct_index: usize) -> Question {
        Question {
            prompt: "What is the closest planet to the Sun?".to_string(),
            options: vec![
                "Venus".to_string(),
                "Mercury".to_string(),
                "Mars".to_string(),
                "Earth".to_string(),
            ],
            correct_index,
            explanation: "Mercury orbits closest to the Sun.".to_string(),
        }
    }

    fn sample_payload() -> QuizPayload {
        QuizPayload {
            topic: Some("Whatever the model echoed".to_string()),
            questions: (0..QUESTION_COUNT).map(|i| sample_question(i % OPTION_COUNT)).collect(),
        }
    }

    #[test]
    fn test_from_payload_forces_topic() {
        let session = QuizSession::from_payload("Astronomy", sample_payload()).unwrap();
        assert_eq!(session.topic, "Astronomy");
        assert_eq!(session.total(), QUESTION_COUNT);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_from_payload_rejects_wrong_question_count() {
        let mut payload = sample_payload();
        payload.questions.pop();
        let err = QuizSession::from_payload("Astronomy", payload).unwrap_err();
        assert!(matches!(err, QuizError::Format { .. }));
    }

    #[test]
    fn test_from_payload_rejects_wrong_option_count() {
        let mut payload = sample_payload();
        payload.questions[2].options.pop();
        let err = QuizSession::from_payload("Astronomy", payload).unwrap_err();
        assert!(matches!(err, QuizError::Format { .. }));
    }

    #[test]
    fn test_from_payload_rejects_out_of_range_correct_index() {
        let mut payload = sample_payload();
        payload.questions[0].correct_index = OPTION_COUNT;
        let err = QuizSession::from_payload("Astronomy", payload).unwrap_err();
        assert!(matches!(err, QuizError::Format { .. }));
    }

    #[test]
    fn test_record_answer_scores_once() {
        let mut session = QuizSession::from_payload("Astronomy", sample_payload()).unwrap();
        // 第一题的正确答案索引为 0
        assert!(session.record_answer(0));
        assert_eq!(session.score(), 1);
        assert_eq!(session.selection(0), Some(0));
    }

    #[test]
    fn test_wire_field_names() {
        let json = r#"{
            "question": "Which ocean is the largest?",
            "options": ["Atlantic", "Indian", "Pacific", "Arctic"],
            "correct": 2,
            "explanation": "The Pacific covers about a third of Earth's surface."
        }"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.prompt, "Which ocean is the largest?");
        assert_eq!(question.correct_index, 2);
    }

    #[test]
    fn test_result_category_thresholds() {
        assert_eq!(ResultCategory::from_score(5), ResultCategory::Perfect);
        assert_eq!(ResultCategory::from_score(4), ResultCategory::Good);
        assert_eq!(ResultCategory::from_score(3), ResultCategory::Good);
        assert_eq!(ResultCategory::from_score(2), ResultCategory::NeedsPractice);
        assert_eq!(ResultCategory::from_score(0), ResultCategory::NeedsPractice);
    }
}
