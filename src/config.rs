//! 应用配置
//!
//! 加载顺序：`.env`（dotenvy）→ `config/study_clips.toml`（可选）→ `STUDY_CLIPS__*` 环境变量，
//! 最后对少数常用变量做直接回退（`SUPABASE_URL` 等）。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::StudyResult;

/// 默认配置文件（不含扩展名，交给 config crate 推断）
const DEFAULT_CONFIG_FILE: &str = "config/study_clips";

/// Edge Functions（AI 聊天 / 播放列表）访问配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionsConfig {
    /// 函数根地址，如 `https://xyz.supabase.co/functions/v1`
    pub base_url: String,
    /// Bearer token
    pub api_key: String,
    /// 单次请求超时（毫秒）
    pub request_timeout_ms: u64,
    /// 建连超时（毫秒）
    pub connect_timeout_ms: u64,
}

impl Default for FunctionsConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            request_timeout_ms: 30_000,
            connect_timeout_ms: 10_000,
        }
    }
}

impl FunctionsConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

/// 本地数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("study_clips.db"),
        }
    }
}

/// 页面翻译调度参数
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// 翻页后的防抖时长
    pub debounce_ms: u64,
    /// 成功后向后预取的页数
    pub prefetch_ahead: u32,
    /// 预取请求之间的间隔
    pub prefetch_spacing_ms: u64,
    /// 合成进度条的刷新周期
    pub progress_tick_ms: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 800,
            prefetch_ahead: 3,
            prefetch_spacing_ms: 500,
            progress_tick_ms: 300,
        }
    }
}

impl TranslationConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn prefetch_spacing(&self) -> Duration {
        Duration::from_millis(self.prefetch_spacing_ms)
    }

    pub fn progress_tick(&self) -> Duration {
        Duration::from_millis(self.progress_tick_ms.max(1))
    }
}

/// 测验生成限制
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    pub max_pages: u32,
    pub max_questions: u32,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            max_pages: 30,
            max_questions: 20,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// EnvFilter 语法，`RUST_LOG` 优先
    pub level: String,
    /// 是否输出 target
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_target: false,
        }
    }
}

/// 顶层配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    /// 当前登录用户（由外部认证提供）
    pub user_id: Option<String>,
    pub functions: FunctionsConfig,
    pub database: DatabaseConfig,
    pub translation: TranslationConfig,
    pub quiz: QuizConfig,
    pub logging: LoggingConfig,
}

impl StudyConfig {
    /// 从 `.env`、默认配置文件与环境变量加载
    pub fn from_env_and_file() -> StudyResult<Self> {
        dotenvy::dotenv().ok();
        let file = Path::new(DEFAULT_CONFIG_FILE).with_extension("toml");
        let file = if file.exists() { Some(file) } else { None };
        Self::load(file.as_deref())
    }

    /// 从指定配置文件（可选）与环境变量加载
    pub fn load(file: Option<&Path>) -> StudyResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("STUDY_CLIPS")
                .separator("__")
                .try_parsing(true),
        );

        let loaded = builder.build()?;
        let mut cfg: StudyConfig = loaded.try_deserialize()?;

        // direct env fallbacks
        if cfg.functions.base_url.is_empty() {
            if let Ok(url) = std::env::var("SUPABASE_URL") {
                cfg.functions.base_url = format!("{}/functions/v1", url.trim_end_matches('/'));
            }
        }
        if cfg.functions.api_key.is_empty() {
            if let Ok(key) = std::env::var("SUPABASE_PUBLISHABLE_KEY") {
                cfg.functions.api_key = key;
            }
        }
        if cfg.user_id.is_none() {
            cfg.user_id = std::env::var("STUDY_CLIPS_USER").ok();
        }

        Ok(cfg)
    }
}
