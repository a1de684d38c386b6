//! PDF 页面 / 视频的对话会话
//!
//! 每轮：追加用户消息 → 流式接收助手回复（只累积一条助手消息）→ 清除 loading。
//! loading 标志在所有退出路径（成功、错误、取消）上都会被清除。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

use super::client::{AiClient, ChatEndpoint};
use super::stream::StreamOutcome;
use super::transcript::AssistantAccumulator;
use super::types::{ChatMessage, ChatRequest, VideoContext};
use crate::error::{StudyError, StudyResult};
use crate::tasks::TaskSlot;
use crate::utils::time::{format_duration, parse_simple_time};

/// 对话对象
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatTarget {
    Pdf {
        page_text: String,
    },
    Video {
        video_id: String,
        video_title: String,
        /// 当前播放位置（秒）
        current_time: u32,
    },
}

/// 快捷提问
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    Summarize,
    Explain,
    KeyPoints,
    ExplainCurrentMoment,
    SummarizeSoFar,
    QuizMe,
}

impl QuickAction {
    pub fn prompt(&self, current_time: u32) -> String {
        match self {
            QuickAction::Summarize => "Summarize this page in bullet points".to_string(),
            QuickAction::Explain => "Explain this page in simple terms".to_string(),
            QuickAction::KeyPoints => "List the key points from this page".to_string(),
            QuickAction::ExplainCurrentMoment => format!(
                "What is the instructor explaining at {}? Explain it in detail.",
                format_duration(current_time)
            ),
            QuickAction::SummarizeSoFar => {
                "Summarize what has been taught so far in bullet points".to_string()
            }
            QuickAction::QuizMe => "Quiz me on what was just explained. Give me 3 MCQs.".to_string(),
        }
    }
}

struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct ChatSession {
    client: Arc<AiClient>,
    target: Mutex<ChatTarget>,
    messages: Mutex<Vec<ChatMessage>>,
    loading: AtomicBool,
    turn: TaskSlot,
}

impl ChatSession {
    pub fn new(client: Arc<AiClient>, target: ChatTarget) -> Self {
        Self {
            client,
            target: Mutex::new(target),
            messages: Mutex::new(Vec::new()),
            loading: AtomicBool::new(false),
            turn: TaskSlot::new("chat-turn"),
        }
    }

    pub fn for_page(client: Arc<AiClient>, page_text: impl Into<String>) -> Self {
        Self::new(
            client,
            ChatTarget::Pdf {
                page_text: page_text.into(),
            },
        )
    }

    pub fn for_video(
        client: Arc<AiClient>,
        video_id: impl Into<String>,
        video_title: impl Into<String>,
    ) -> Self {
        Self::new(
            client,
            ChatTarget::Video {
                video_id: video_id.into(),
                video_title: video_title.into(),
                current_time: 0,
            },
        )
    }

    fn lock_messages(&self) -> MutexGuard<'_, Vec<ChatMessage>> {
        self.messages.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn lock_target(&self) -> MutexGuard<'_, ChatTarget> {
        self.target.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.lock_messages().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// 翻页后更新页面文本
    pub fn set_page_text(&self, text: impl Into<String>) {
        if let ChatTarget::Pdf { page_text } = &mut *self.lock_target() {
            *page_text = text.into();
        }
    }

    /// 播放器位置更新
    pub fn set_current_time(&self, seconds: u32) {
        if let ChatTarget::Video { current_time, .. } = &mut *self.lock_target() {
            *current_time = seconds;
        }
    }

    /// 取消进行中的回复
    pub fn cancel(&self) -> bool {
        self.turn.cancel()
    }

    pub async fn send_message(&self, content: &str) -> StudyResult<StreamOutcome> {
        self.run_turn(content, None).await
    }

    pub async fn quick_action(&self, action: QuickAction) -> StudyResult<StreamOutcome> {
        let current_time = match &*self.lock_target() {
            ChatTarget::Video { current_time, .. } => *current_time,
            ChatTarget::Pdf { .. } => 0,
        };
        self.run_turn(&action.prompt(current_time), None).await
    }

    /// 讲解视频的一段区间（`m:ss` 或 `h:mm:ss`）
    pub async fn explain_range(&self, start: &str, end: &str) -> StudyResult<StreamOutcome> {
        if !matches!(&*self.lock_target(), ChatTarget::Video { .. }) {
            return Err(StudyError::validation("Range explanations need a video"));
        }
        let range = match (parse_simple_time(start), parse_simple_time(end)) {
            (Some(s), Some(e)) if s < e => (s, e),
            _ => return Err(StudyError::validation("Please enter valid start and end times")),
        };
        let prompt = format!(
            "Explain in detail what the instructor is teaching from {} to {}",
            start.trim(),
            end.trim()
        );
        self.run_turn(&prompt, Some(range)).await
    }

    fn build_request(&self, range: Option<(u32, u32)>) -> (ChatEndpoint, ChatRequest) {
        let messages = self.messages();
        match self.lock_target().clone() {
            ChatTarget::Pdf { page_text } => (
                ChatEndpoint::PdfChat,
                ChatRequest {
                    messages,
                    page_text: Some(page_text),
                    ..Default::default()
                },
            ),
            ChatTarget::Video {
                video_id,
                video_title,
                current_time,
            } => (
                ChatEndpoint::VideoChat,
                ChatRequest {
                    messages,
                    video: Some(VideoContext {
                        video_id,
                        video_title,
                        current_time,
                        start_time: range.map(|(s, _)| s),
                        end_time: range.map(|(_, e)| e),
                    }),
                    ..Default::default()
                },
            ),
        }
    }

    async fn run_turn(&self, content: &str, range: Option<(u32, u32)>) -> StudyResult<StreamOutcome> {
        let content = content.trim();
        if content.is_empty() {
            return Err(StudyError::validation("Message is empty"));
        }
        if self.loading.swap(true, Ordering::SeqCst) {
            return Err(StudyError::validation("A response is already in progress"));
        }
        let _loading = LoadingGuard(&self.loading);

        self.lock_messages().push(ChatMessage::user(content));
        let (endpoint, request) = self.build_request(range);

        let ticket = self.turn.replace();
        let mut acc = AssistantAccumulator::new();
        let result = self
            .client
            .stream_chat(endpoint, &request, &ticket.token, |fragment| {
                let mut messages = self.lock_messages();
                acc.push(fragment, &mut messages);
            })
            .await;
        self.turn.finish(ticket.generation);

        match &result {
            Ok(outcome) => info!(
                "[ChatSession] {} turn finished: {:?} ({} chars)",
                endpoint.path(),
                outcome,
                acc.text().chars().count()
            ),
            Err(e) => warn!("[ChatSession] {} turn failed: {}", endpoint.path(), e),
        }
        result
    }
}
