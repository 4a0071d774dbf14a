/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 生成式 AI 接口的基础 URL
    pub api_base_url: String,
    /// 使用的模型名称
    pub model_name: String,
    /// 状态文件路径（保存 API key 和主题历史）
    pub state_file: String,
    /// 生成请求的超时时间（秒）
    pub request_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model_name: "gemini-1.5-flash-latest".to_string(),
            state_file: "quiz_state.toml".to_string(),
            request_timeout_secs: 30,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_base_url: std::env::var("QUIZ_API_BASE_URL").unwrap_or(default.api_base_url),
            model_name: std::env::var("QUIZ_MODEL_NAME").unwrap_or(default.model_name),
            state_file: std::env::var("QUIZ_STATE_FILE").unwrap_or(default.state_file),
            request_timeout_secs: std::env::var("QUIZ_REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }
}
