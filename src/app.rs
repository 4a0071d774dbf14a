//! 终端交互 - 编排层
//!
//! 负责把会话状态机渲染成命令行界面：
//! 凭证输入 → 逐题作答（展示解析）→ 结算界面 → 重开/历史/退出

use std::io::{self, Write};

use anyhow::Result;
use tracing::{error, info};

use crate::config::Config;
use crate::error::QuizError;
use crate::models::OPTION_COUNT;
use crate::services::{GeminiClient, TopicSelector};
use crate::storage::FileStore;
use crate::workflow::{QuizController, SessionState};

/// 选项标签
const OPTION_LABELS: [char; OPTION_COUNT] = ['A', 'B', 'C', 'D'];

/// 应用主结构
pub struct App {
    controller: QuizController<FileStore, GeminiClient>,
    verbose_logging: bool,
}

impl App {
    /// 初始化应用：打开状态文件、创建生成客户端
    pub fn new(config: Config) -> Result<Self> {
        info!("📂 状态文件: {}", config.state_file);

        let store = FileStore::open(&config.state_file)?;
        let client = GeminiClient::new(&config)?;
        let controller = QuizController::new(store, client, TopicSelector::new());

        Ok(Self {
            controller,
            verbose_logging: config.verbose_logging,
        })
    }

    /// 运行主循环
    pub async fn run(&mut self) -> Result<()> {
        print_banner();

        loop {
            // 凭证阶段
            if self.controller.state() == SessionState::AwaitingCredential {
                if !self.prompt_credential()? {
                    break;
                }

                println!("\n⏳ Generating your quiz, please wait...");
                if let Err(e) = self.controller.begin_quiz().await {
                    error!("题目生成失败: {}", e);
                    println!("\nError generating quiz: {}", e);
                    println!("Please check your API key and try again.\n");
                    continue;
                }
            }

            // 答题阶段
            while let SessionState::Presenting(_) = self.controller.state() {
                self.play_current_question()?;
            }

            // 结算阶段
            if self.controller.state() == SessionState::Complete {
                self.show_results();
                if !self.results_menu().await? {
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// 提示输入 API key；返回 false 表示用户选择退出
    fn prompt_credential(&mut self) -> Result<bool> {
        loop {
            match self.controller.saved_credential() {
                Some(_) => {
                    println!("Enter your API key (press Enter to reuse the saved one, 'q' to quit):")
                }
                None => println!("Enter your API key ('q' to quit):"),
            }

            let input = read_line()?;
            let trimmed = input.trim();

            if trimmed.eq_ignore_ascii_case("q") {
                return Ok(false);
            }

            // 已有保存的 key 时允许直接回车复用
            if trimmed.is_empty() && self.controller.saved_credential().is_some() {
                return Ok(true);
            }

            match self.controller.submit_credential(trimmed) {
                Ok(()) => return Ok(true),
                Err(QuizError::CredentialMissing) => {
                    println!("Please enter your API key!\n");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// 展示当前题目并处理一次作答
    fn play_current_question(&mut self) -> Result<()> {
        let session = self.controller.session().expect("答题阶段必有会话");
        let index = session.current_index();
        let total = session.total();
        let score = session.score();
        let topic = session.topic.clone();
        let question = self.controller.current_question().expect("答题阶段必有当前题");

        println!("\n{}", "─".repeat(60));
        println!("Topic: {}  |  Question {}/{}  |  Score: {}", topic, index + 1, total, score);
        println!("{}", "─".repeat(60));
        println!("{}\n", question.prompt);
        for (label, option) in OPTION_LABELS.iter().zip(&question.options) {
            println!("  {}. {}", label, option);
        }

        // 读取并提交答案，非法输入重新提示
        let outcome = loop {
            print!("\nYour answer (A-D): ");
            io::stdout().flush()?;
            let input = read_line()?;

            let Some(option_index) = parse_option(&input) else {
                println!("Please answer with A, B, C or D.");
                continue;
            };

            break self.controller.submit_answer(option_index)?;
        };

        if self.verbose_logging {
            info!(
                "第 {}/{} 题作答，{}",
                index + 1,
                total,
                if outcome.correct { "答对" } else { "答错" }
            );
        }

        if outcome.correct {
            println!("\n✅ Correct!");
        } else {
            println!(
                "\n❌ Wrong! The correct answer was {}.",
                OPTION_LABELS[outcome.correct_index]
            );
        }
        println!("💡 {}", outcome.explanation);

        print!("\nPress Enter to continue...");
        io::stdout().flush()?;
        read_line()?;

        self.controller.advance()?;
        Ok(())
    }

    /// 结算界面
    fn show_results(&self) {
        let score = self.controller.final_score().expect("结算阶段必有最终得分");
        let category = self.controller.result_category().expect("结算阶段必有档位");

        println!("\n{}", "=".repeat(60));
        println!("Quiz complete! Final score: {}/{}", score, self.controller.session().map(|s| s.total()).unwrap_or(0));
        println!("{}", category.message());
        println!("{}", "=".repeat(60));
    }

    /// 结算菜单；返回 false 表示退出程序
    async fn results_menu(&mut self) -> Result<bool> {
        loop {
            println!("\n[n] new topic  [h] topic history  [c] clear history  [q] quit");
            print!("> ");
            io::stdout().flush()?;

            let input = read_line()?;
            match input.trim().to_lowercase().as_str() {
                "n" | "" => {
                    println!("\n⏳ Generating your quiz, please wait...");
                    if let Err(e) = self.controller.restart().await {
                        error!("题目生成失败: {}", e);
                        println!("\nError generating quiz: {}", e);
                        println!("Please check your API key and try again.");
                        // 生成失败已回到凭证阶段，交给主循环处理
                    }
                    return Ok(true);
                }
                "h" => {
                    let history = self.controller.topic_history()?;
                    if history.is_empty() {
                        println!("No topics yet.");
                    } else {
                        println!("Topics so far:");
                        for topic in &history {
                            println!("  - {}", topic);
                        }
                    }
                }
                "c" => {
                    self.controller.clear_topic_history()?;
                    println!("Topic history cleared.");
                }
                "q" => return Ok(false),
                other => println!("Unknown command: '{}'", other),
            }
        }
    }
}

// ========== 输入辅助函数 ==========

fn print_banner() {
    println!("{}", "=".repeat(60));
    println!("🧠 AI Trivia Quiz — 5 questions, 4 options, one topic at a time");
    println!("{}", "=".repeat(60));
}

/// 读取一行标准输入
fn read_line() -> Result<String> {
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input)
}

/// 将用户输入解析为选项索引
///
/// 接受 A-D（不区分大小写）和 1-4 两种写法
fn parse_option(input: &str) -> Option<usize> {
    let trimmed = input.trim();
    if trimmed.len() != 1 {
        return None;
    }

    match trimmed.chars().next()? {
        c @ 'a'..='d' => Some(c as usize - 'a' as usize),
        c @ 'A'..='D' => Some(c as usize - 'A' as usize),
        c @ '1'..='4' => Some(c as usize - '1' as usize),
        _ => None,
    }
}
