//! AI 聊天端点与播放列表端点的请求/响应类型

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StudyError;

/// 消息角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// 对话消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// 目标语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Hindi,
    Hinglish,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Hindi => "hindi",
            Language::Hinglish => "hinglish",
        }
    }

    pub fn is_english(&self) -> bool {
        matches!(self, Language::English)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = StudyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            "hindi" | "hi" => Ok(Language::Hindi),
            "hinglish" => Ok(Language::Hinglish),
            other => Err(StudyError::validation(format!("Unsupported language: {}", other))),
        }
    }
}

/// 非流式动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChatAction {
    Translate,
    Quiz,
    CheckAnswers,
}

/// 测验题型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    /// 单选
    #[serde(rename = "mcq")]
    MultipleChoice,
    #[serde(rename = "true_false")]
    TrueFalse,
    #[serde(rename = "fill_blank")]
    FillBlank,
    /// 多选
    #[serde(rename = "multiple_correct")]
    MultipleSelect,
    #[serde(rename = "short")]
    ShortAnswer,
}

/// 测验题目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: u32,
    pub question: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub correct_answer: String,
}

/// 提交评阅的一条作答
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSubmission {
    pub question_id: u32,
    pub question: String,
    pub correct_answer: String,
    pub user_answer: String,
}

/// `pdf-chat` / `video-chat` 请求体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ChatAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_questions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_types: Option<Vec<QuestionType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answers: Option<Vec<AnswerSubmission>>,
    #[serde(flatten)]
    pub video: Option<VideoContext>,
}

/// 视频聊天附带的上下文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoContext {
    pub video_id: String,
    pub video_title: String,
    /// 当前播放位置（秒，取整）
    pub current_time: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslateResponse {
    pub translation: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizResponse {
    #[serde(default)]
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackResponse {
    pub feedback: String,
}

/// 错误响应体 `{error}`
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// 播放列表中的视频
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistVideo {
    pub video_id: String,
    pub title: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// 秒
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub position: u32,
    #[serde(default)]
    pub channel_name: Option<String>,
}

/// `youtube-playlist` 响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistResponse {
    pub videos: Vec<PlaylistVideo>,
    #[serde(default)]
    pub playlist_title: Option<String>,
    #[serde(default)]
    pub total_results: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_omits_unset_fields() {
        let req = ChatRequest {
            messages: vec![ChatMessage::user("hi")],
            page_text: Some("page".to_string()),
            ..Default::default()
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v, json!({"messages": [{"role": "user", "content": "hi"}], "pageText": "page"}));
    }

    #[test]
    fn test_action_and_question_type_names() {
        let req = ChatRequest {
            action: Some(ChatAction::CheckAnswers),
            question_types: Some(vec![QuestionType::MultipleSelect, QuestionType::TrueFalse]),
            language: Some(Language::Hinglish),
            ..Default::default()
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["action"], "check-answers");
        assert_eq!(v["questionTypes"], json!(["multiple_correct", "true_false"]));
        assert_eq!(v["language"], "hinglish");
    }

    #[test]
    fn test_video_context_is_flattened() {
        let req = ChatRequest {
            messages: vec![],
            video: Some(VideoContext {
                video_id: "abc".to_string(),
                video_title: "Optics".to_string(),
                current_time: 42,
                start_time: Some(10),
                end_time: None,
            }),
            ..Default::default()
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["videoId"], "abc");
        assert_eq!(v["currentTime"], 42);
        assert_eq!(v["startTime"], 10);
        assert!(v.get("endTime").is_none());
    }

    #[test]
    fn test_quiz_question_parses() {
        let q: QuizQuestion = serde_json::from_value(json!({
            "id": 1, "question": "2+2?", "type": "mcq",
            "options": ["3", "4"], "correctAnswer": "4"
        }))
        .unwrap();
        assert_eq!(q.question_type, QuestionType::MultipleChoice);
        assert_eq!(q.correct_answer, "4");
    }

    #[test]
    fn test_language_from_str() {
        assert_eq!("Hindi".parse::<Language>().unwrap(), Language::Hindi);
        assert!("klingon".parse::<Language>().is_err());
    }
}
