use anyhow::Result;
use ai_trivia_quiz::app::App;
use ai_trivia_quiz::config::Config;
use ai_trivia_quiz::logger;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logger::init();

    // 加载配置
    let config = Config::from_env();

    // 初始化并运行应用
    App::new(config)?.run().await?;

    Ok(())
}
