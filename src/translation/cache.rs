/// 翻译结果缓存（按 `"{page}-{language}"` 存放）
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::types::TranslationKey;

#[derive(Debug, Default)]
pub struct TranslationCache {
    entries: Mutex<HashMap<String, String>>,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn get(&self, key: &TranslationKey) -> Option<String> {
        self.lock().get(&key.to_string()).cloned()
    }

    pub fn contains(&self, key: &TranslationKey) -> bool {
        self.lock().contains_key(&key.to_string())
    }

    pub fn insert(&self, key: &TranslationKey, text: String) {
        self.lock().insert(key.to_string(), text);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
