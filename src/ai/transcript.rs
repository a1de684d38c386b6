//! 对话记录与助手消息累积
//!
//! 每一轮只累积出一条助手消息：最后一条是助手消息时原地替换内容，否则追加。

use super::types::{ChatMessage, Role};

/// 把助手回复的全文写入消息列表
pub fn upsert_assistant(messages: &mut Vec<ChatMessage>, content: &str) {
    match messages.last_mut() {
        Some(last) if last.role == Role::Assistant => {
            last.content.clear();
            last.content.push_str(content);
        }
        _ => messages.push(ChatMessage::assistant(content)),
    }
}

/// 单轮助手回复累积器
#[derive(Debug, Default)]
pub struct AssistantAccumulator {
    so_far: String,
}

impl AssistantAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加片段并同步到消息列表
    pub fn push(&mut self, fragment: &str, messages: &mut Vec<ChatMessage>) {
        self.so_far.push_str(fragment);
        upsert_assistant(messages, &self.so_far);
    }

    pub fn text(&self) -> &str {
        &self.so_far
    }
}
