//! 题目生成服务 - 业务能力层
//!
//! 只负责"生成一套题"能力，不关心会话流程
//!
//! ## 技术栈
//! - 使用 `reqwest` 直接调用 generateContent REST 接口
//! - 返回的自由文本中用正则提取 JSON 片段
//!
//! 生成服务不受信任：返回内容必须经过提取、解析、形状校验，
//! topic 字段由调用方强制覆盖

use regex::Regex;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{QuizError, QuizResult};
use crate::models::{QuizPayload, QUESTION_COUNT};

/// 题目生成来源
///
/// 会话状态机只依赖这个接口，测试时用脚本化的实现替换真实网络调用
#[allow(async_fn_in_trait)]
pub trait QuizSource {
    /// 为指定主题生成一套题
    ///
    /// # 参数
    /// - `api_key`: 用户提供的 API key
    /// - `topic`: 请求的主题
    ///
    /// # 返回
    /// 返回解析后的整套题目（未经形状校验）
    async fn generate(&self, api_key: &str, topic: &str) -> QuizResult<QuizPayload>;
}

/// Gemini 生成接口客户端
pub struct GeminiClient {
    http: reqwest::Client,
    api_base_url: String,
    model_name: String,
}

impl GeminiClient {
    /// 创建新的生成客户端
    ///
    /// 请求超时取自配置；生成服务的延迟没有上限，超时视为传输层失败
    pub fn new(config: &Config) -> QuizResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_base_url: config.api_base_url.clone(),
            model_name: config.model_name.clone(),
        })
    }

    /// 构建出题提示词
    fn build_prompt(topic: &str) -> String {
        format!(
            r#"Generate a quiz about the topic "{topic}" with the following JSON format:
{{
  "topic": "{topic}",
  "questions": [
    {{
      "question": "question text here",
      "options": ["option A", "option B", "option C", "option D"],
      "correct": 0,
      "explanation": "a brief 2-3 sentence explanation about why this answer is correct and interesting facts"
    }}
  ]
}}

Requirements:
- Generate exactly {count} questions
- Make questions interesting and educational
- "correct" field should be the index (0-3) of the correct answer in the options array
- Make sure the JSON is valid
- Only respond with the JSON, nothing else"#,
            topic = topic,
            count = QUESTION_COUNT,
        )
    }

    /// 从自由文本中提取第一个 `{` 到最后一个 `}` 之间的 JSON 片段
    ///
    /// 生成服务经常在 JSON 前后加说明文字或代码块标记
    fn extract_json_object(text: &str) -> QuizResult<&str> {
        // 与原始行为一致的贪婪匹配，不做括号配平
        let re = Regex::new(r"(?s)\{.*\}").expect("JSON 提取正则非法");
        re.find(text)
            .map(|m| m.as_str())
            .ok_or_else(|| QuizError::format("响应文本中没有 JSON 对象".to_string()))
    }

    /// 从响应 JSON 中取出模型生成的文本
    fn extract_candidate_text(response: &Value) -> QuizResult<&str> {
        response
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(|v| v.as_str())
            .ok_or_else(|| QuizError::format("响应中没有生成文本".to_string()))
    }
}

impl QuizSource for GeminiClient {
    async fn generate(&self, api_key: &str, topic: &str) -> QuizResult<QuizPayload> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base_url, self.model_name, api_key
        );

        let body = json!({
            "contents": [
                {
                    "parts": [
                        { "text": Self::build_prompt(topic) }
                    ]
                }
            ]
        });

        debug!("调用生成接口，模型: {}，主题: {}", self.model_name, topic);

        let response = self.http.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("生成接口返回非成功状态: {}", status);
            return Err(QuizError::transport(format!(
                "生成接口返回 HTTP {}，请检查 API key",
                status
            )));
        }

        let envelope: Value = response.json().await?;
        let text = Self::extract_candidate_text(&envelope)?;

        debug!("生成文本长度: {} 字符", text.len());

        let json_span = Self::extract_json_object(text)?;
        let payload: QuizPayload = serde_json::from_str(json_span)
            .map_err(|e| QuizError::format(format!("JSON 解析失败: {}", e)))?;

        Ok(payload)
    }
}
