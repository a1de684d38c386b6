//! AI 助手：函数端点客户端、SSE 流消费、对话会话

pub mod chat;
pub mod client;
pub mod stream;
pub mod transcript;
pub mod types;

pub use chat::{ChatSession, ChatTarget, QuickAction};
pub use client::{AiClient, ChatEndpoint};
pub use stream::{decode_sse_stream, StreamOutcome};
pub use transcript::{upsert_assistant, AssistantAccumulator};
pub use types::{ChatMessage, Language, QuestionType, QuizQuestion, Role};
