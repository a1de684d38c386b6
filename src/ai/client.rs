//! AI 函数端点客户端
//!
//! - `pdf-chat` / `video-chat`：默认流式 SSE；`action` 为 translate / quiz / check-answers 时返回单个 JSON
//! - `youtube-playlist`：播放列表视频清单
//!
//! 非 2xx 响应按 `{error}` 体 + 状态码映射（429 限流、402 额度耗尽、其余通用失败）。
//! 每个请求都可以通过 CancellationToken 取消，并受请求超时约束；
//! 流式请求的超时只作用于拿到响应头之前。

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use super::stream::{decode_sse_stream, StreamOutcome};
use super::types::{
    AnswerSubmission, ChatAction, ChatMessage, ChatRequest, ErrorBody, FeedbackResponse, Language,
    PlaylistResponse, QuestionType, QuizQuestion, QuizResponse, TranslateResponse,
};
use crate::config::FunctionsConfig;
use crate::error::{StudyError, StudyResult};

/// 聊天端点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatEndpoint {
    PdfChat,
    VideoChat,
}

impl ChatEndpoint {
    pub fn path(&self) -> &'static str {
        match self {
            ChatEndpoint::PdfChat => "pdf-chat",
            ChatEndpoint::VideoChat => "video-chat",
        }
    }
}

pub struct AiClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
    request_timeout: Duration,
}

impl AiClient {
    pub fn new(config: &FunctionsConfig) -> StudyResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(StudyError::Config(
                "functions.base_url is not configured".to_string(),
            ));
        }
        let mut base_url = Url::parse(config.base_url.trim())
            .map_err(|e| StudyError::Config(format!("Invalid functions.base_url: {}", e)))?;
        // 以 `/` 结尾，join 时追加而不是替换最后一段
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| StudyError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
            request_timeout: config.request_timeout(),
        })
    }

    fn url(&self, path: &str) -> StudyResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| StudyError::Config(format!("Invalid endpoint path {}: {}", path, e)))
    }

    /// 在取消与超时约束下执行
    async fn guarded<T>(
        &self,
        cancel: &CancellationToken,
        fut: impl Future<Output = StudyResult<T>>,
    ) -> StudyResult<T> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(StudyError::Cancelled),
            result = tokio::time::timeout(self.request_timeout, fut) => match result {
                Ok(inner) => inner,
                Err(_) => Err(StudyError::Timeout(format!(
                    "No response within {}s",
                    self.request_timeout.as_secs()
                ))),
            },
        }
    }

    async fn send(&self, builder: RequestBuilder) -> StudyResult<Response> {
        let response = builder
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        check_status(response).await
    }

    /// 流式聊天，片段按到达顺序交给 `on_delta`
    pub async fn stream_chat<F>(
        &self,
        endpoint: ChatEndpoint,
        request: &ChatRequest,
        cancel: &CancellationToken,
        on_delta: F,
    ) -> StudyResult<StreamOutcome>
    where
        F: FnMut(&str),
    {
        debug!(
            "[AiClient] POST {} (stream, {} messages)",
            endpoint.path(),
            request.messages.len()
        );
        let builder = self.http.post(self.url(endpoint.path())?).json(request);
        let response = self.guarded(cancel, self.send(builder)).await?;
        decode_sse_stream(response.bytes_stream(), cancel, on_delta).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        endpoint: ChatEndpoint,
        request: &ChatRequest,
        cancel: &CancellationToken,
    ) -> StudyResult<T> {
        debug!("[AiClient] POST {} action={:?}", endpoint.path(), request.action);
        let builder = self.http.post(self.url(endpoint.path())?).json(request);
        self.guarded(cancel, async move {
            let response = self.send(builder).await?;
            Ok(response.json::<T>().await?)
        })
        .await
    }

    /// 翻译页面文本
    pub async fn translate(
        &self,
        page_text: &str,
        language: Language,
        cancel: &CancellationToken,
    ) -> StudyResult<String> {
        let request = ChatRequest {
            messages: Vec::new(),
            page_text: Some(page_text.to_string()),
            action: Some(ChatAction::Translate),
            language: Some(language),
            ..Default::default()
        };
        let body: TranslateResponse = self.post_json(ChatEndpoint::PdfChat, &request, cancel).await?;
        Ok(body.translation)
    }

    /// 生成测验题
    pub async fn generate_quiz(
        &self,
        page_text: &str,
        language: Language,
        num_questions: u32,
        question_types: &[QuestionType],
        cancel: &CancellationToken,
    ) -> StudyResult<Vec<QuizQuestion>> {
        let request = ChatRequest {
            messages: Vec::new(),
            page_text: Some(page_text.to_string()),
            action: Some(ChatAction::Quiz),
            language: Some(language),
            num_questions: Some(num_questions),
            question_types: Some(question_types.to_vec()),
            ..Default::default()
        };
        let body: QuizResponse = self.post_json(ChatEndpoint::PdfChat, &request, cancel).await?;
        Ok(body.questions)
    }

    /// 评阅作答，返回文字反馈
    pub async fn check_answers(
        &self,
        page_text: &str,
        language: Language,
        answers: Vec<AnswerSubmission>,
        cancel: &CancellationToken,
    ) -> StudyResult<String> {
        let request = ChatRequest {
            messages: Vec::<ChatMessage>::new(),
            page_text: Some(page_text.to_string()),
            action: Some(ChatAction::CheckAnswers),
            language: Some(language),
            answers: Some(answers),
            ..Default::default()
        };
        let body: FeedbackResponse = self.post_json(ChatEndpoint::PdfChat, &request, cancel).await?;
        Ok(body.feedback)
    }

    /// 拉取播放列表全部视频
    pub async fn fetch_playlist(
        &self,
        playlist_id: &str,
        cancel: &CancellationToken,
    ) -> StudyResult<PlaylistResponse> {
        if playlist_id.trim().is_empty() {
            return Err(StudyError::validation("Playlist id is required"));
        }
        debug!("[AiClient] GET youtube-playlist {}", playlist_id);
        let builder = self
            .http
            .get(self.url("youtube-playlist")?)
            .query(&[("playlistId", playlist_id), ("fetchAll", "true")]);
        self.guarded(cancel, async move {
            let response = self.send(builder).await?;
            Ok(response.json::<PlaylistResponse>().await?)
        })
        .await
    }
}

/// 非 2xx 响应转为错误；消息尽量取自 `{error}` 体
async fn check_status(response: Response) -> StudyResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_default();
    warn!("[AiClient] HTTP {}: {}", status.as_u16(), message);
    Err(StudyError::from_status(status.as_u16(), message))
}
