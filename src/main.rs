// 命令行入口：加载配置、打开本地数据库、加载当前用户的知识树并输出 JSON。
//
// 用法：study-clips [config.toml]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use study_clips_lib::logging::init_tracing;
use study_clips_lib::{SqliteGateway, StudyConfig, StudyStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = match config_path.as_deref() {
        Some(path) => {
            dotenvy::dotenv().ok();
            StudyConfig::load(Some(path))
        }
        None => StudyConfig::from_env_and_file(),
    }
    .context("加载配置失败")?;

    init_tracing(&config.logging);

    let user_id = config
        .user_id
        .clone()
        .context("未配置 user_id（STUDY_CLIPS_USER 或配置文件 user_id）")?;

    let gateway = SqliteGateway::open(&config.database.path)
        .with_context(|| format!("打开数据库失败: {}", config.database.path.display()))?;
    tracing::info!("[Main] 数据库: {}", config.database.path.display());

    let store = StudyStore::new(Arc::new(gateway));
    store.init(user_id);
    let summary = store.fetch_all_data().await.context("加载数据失败")?;
    tracing::info!("[Main] 加载完成: {:?}", summary);

    let tree = store.tree();
    if !tree.orphans.is_empty() {
        tracing::warn!("[Main] 跳过 {} 条孤立记录", tree.orphans.len());
    }
    println!("{}", serde_json::to_string_pretty(&tree.exams)?);

    store.teardown();
    Ok(())
}
