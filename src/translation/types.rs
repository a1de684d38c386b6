/// 页面翻译相关类型
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ai::types::Language;

/// 缓存键：`"{page}-{language}"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TranslationKey {
    pub page: u32,
    pub language: Language,
}

impl TranslationKey {
    pub fn new(page: u32, language: Language) -> Self {
        Self { page, language }
    }
}

impl fmt::Display for TranslationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.page, self.language.code())
    }
}

/// 一次前台翻译请求的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    /// 命中缓存，未发请求
    Cached(String),
    /// 请求成功并写入缓存
    Translated(String),
    /// 同一 key 已有在途请求，本次不做任何事
    AlreadyPending,
    /// 被更新的请求或手动取消
    Cancelled,
}

impl TranslationOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            TranslationOutcome::Cached(t) | TranslationOutcome::Translated(t) => Some(t),
            _ => None,
        }
    }
}

/// 翻译事件（前台与预取）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TranslationEvent {
    Started { key: String },
    Completed { key: String, from_cache: bool },
    Failed { key: String, message: String },
    Cancelled { key: String },
    Prefetched { key: String },
}
