use thiserror::Error;

/// 应用程序错误类型
///
/// 分为四类：凭证错误、生成错误（传输层 / 内容层）、调用错误、存储错误
#[derive(Debug, Error)]
pub enum QuizError {
    /// 未提供 API key（空或全空白）
    #[error("API key 不能为空")]
    CredentialMissing,

    /// 生成请求在网络/HTTP 层失败
    #[error("生成请求失败: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// 生成服务返回的内容无法解析或不符合题目格式
    #[error("生成内容格式错误: {reason}")]
    Format { reason: String },

    /// 选项索引超出范围（调用方错误，正常 UI 操作不会触发）
    #[error("无效的选项索引: {index}，应在 [0, {max}] 范围内")]
    InvalidAnswerIndex { index: usize, max: usize },

    /// 在当前状态下不允许执行该操作
    #[error("当前状态 {state} 不允许执行操作: {operation}")]
    InvalidTransition {
        operation: &'static str,
        state: String,
    },

    /// 状态文件读写失败
    #[error("状态存储失败: {message}")]
    Storage { message: String },
}

impl QuizError {
    /// 创建传输层错误（非成功状态码等）
    pub fn transport(message: impl Into<String>) -> Self {
        QuizError::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// 创建内容格式错误
    pub fn format(reason: impl Into<String>) -> Self {
        QuizError::Format {
            reason: reason.into(),
        }
    }

    /// 创建存储错误
    pub fn storage(err: impl std::fmt::Display) -> Self {
        QuizError::Storage {
            message: err.to_string(),
        }
    }

    /// 是否属于生成阶段的失败（传输层或内容层）
    pub fn is_generation_failure(&self) -> bool {
        matches!(self, QuizError::Transport { .. } | QuizError::Format { .. })
    }
}

impl From<reqwest::Error> for QuizError {
    fn from(err: reqwest::Error) -> Self {
        QuizError::Transport {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

/// 应用程序结果类型
pub type QuizResult<T> = Result<T, QuizError>;
