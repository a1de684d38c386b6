//! 日志初始化
//!
//! 使用 `tracing_subscriber::fmt` + `EnvFilter`；`RUST_LOG` 存在时优先于配置。
//! `log` 宏经 tracing 的 `log` 特性统一输出。

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// 安装全局订阅者；重复调用是安全的（第二次起静默忽略）
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("[Logging] tracing subscriber installed (level={})", config.level);
    }
    installed
}
