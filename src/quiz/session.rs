//! 测验会话：生成题目、记录作答、一次性提交评阅
//!
//! 会话只属于当前视图，不写入任何持久化存储。

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::ai::client::AiClient;
use crate::ai::types::{AnswerSubmission, Language, QuestionType, QuizQuestion};
use crate::config::QuizConfig;
use crate::document::{range_text, PageTextSource};
use crate::error::{StudyError, StudyResult};
use crate::tasks::TaskSlot;

use super::types::QuizRequest;

/// 测验后端（生成与评阅）
#[async_trait]
pub trait QuizBackend: Send + Sync {
    async fn generate(
        &self,
        page_text: &str,
        language: Language,
        num_questions: u32,
        question_types: &[QuestionType],
        cancel: &CancellationToken,
    ) -> StudyResult<Vec<QuizQuestion>>;

    async fn evaluate(
        &self,
        page_text: &str,
        language: Language,
        answers: Vec<AnswerSubmission>,
        cancel: &CancellationToken,
    ) -> StudyResult<String>;
}

#[async_trait]
impl QuizBackend for AiClient {
    async fn generate(
        &self,
        page_text: &str,
        language: Language,
        num_questions: u32,
        question_types: &[QuestionType],
        cancel: &CancellationToken,
    ) -> StudyResult<Vec<QuizQuestion>> {
        self.generate_quiz(page_text, language, num_questions, question_types, cancel)
            .await
    }

    async fn evaluate(
        &self,
        page_text: &str,
        language: Language,
        answers: Vec<AnswerSubmission>,
        cancel: &CancellationToken,
    ) -> StudyResult<String> {
        self.check_answers(page_text, language, answers, cancel).await
    }
}

#[derive(Debug, Default)]
struct AnswerSheet {
    answers: HashMap<u32, String>,
    /// 多选题：保持勾选顺序
    multi_answers: HashMap<u32, Vec<String>>,
    feedback: Option<String>,
}

impl AnswerSheet {
    fn answer_for(&self, question: &QuizQuestion) -> String {
        if question.question_type == QuestionType::MultipleSelect {
            return self
                .multi_answers
                .get(&question.id)
                .map(|s| s.join(", "))
                .unwrap_or_default();
        }
        self.answers.get(&question.id).cloned().unwrap_or_default()
    }
}

pub struct QuizSession {
    backend: Arc<dyn QuizBackend>,
    request: QuizRequest,
    page_text: String,
    questions: Vec<QuizQuestion>,
    sheet: Mutex<AnswerSheet>,
    slot: TaskSlot,
}

impl QuizSession {
    /// 校验请求、拼接页面文本并生成题目；`cancel` 触发后返回 `StudyError::Cancelled`
    pub async fn generate(
        backend: Arc<dyn QuizBackend>,
        document: &dyn PageTextSource,
        request: QuizRequest,
        limits: &QuizConfig,
        cancel: &CancellationToken,
    ) -> StudyResult<Self> {
        request.validate(limits, document.page_count())?;
        let page_text = range_text(document, request.from_page, request.to_page).await?;

        let questions = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("[Quiz] 生成已取消（第 {}-{} 页）", request.from_page, request.to_page);
                return Err(StudyError::Cancelled);
            }
            result = backend.generate(
                &page_text,
                request.language,
                request.num_questions,
                &request.question_types,
                cancel,
            ) => result?,
        };

        if questions.is_empty() {
            return Err(StudyError::Other("No questions were generated".to_string()));
        }
        info!(
            "[Quiz] 生成 {} 道题（第 {}-{} 页）",
            questions.len(),
            request.from_page,
            request.to_page
        );

        Ok(Self {
            backend,
            request,
            page_text,
            questions,
            sheet: Mutex::new(AnswerSheet::default()),
            slot: TaskSlot::new("quiz"),
        })
    }

    pub fn request(&self) -> &QuizRequest {
        &self.request
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn feedback(&self) -> Option<String> {
        self.sheet().feedback.clone()
    }

    fn sheet(&self) -> MutexGuard<'_, AnswerSheet> {
        self.sheet.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn question(&self, question_id: u32) -> StudyResult<&QuizQuestion> {
        self.questions
            .iter()
            .find(|q| q.id == question_id)
            .ok_or_else(|| StudyError::not_found("Question", question_id.to_string()))
    }

    /// 单选 / 判断 / 填空 / 简答
    pub fn set_answer(&self, question_id: u32, value: impl Into<String>) -> StudyResult<()> {
        self.question(question_id)?;
        self.sheet().answers.insert(question_id, value.into());
        Ok(())
    }

    /// 多选题：已选则取消，未选则追加
    pub fn toggle_multi(&self, question_id: u32, option: &str) -> StudyResult<()> {
        self.question(question_id)?;
        let mut sheet = self.sheet();
        let selected = sheet.multi_answers.entry(question_id).or_default();
        match selected.iter().position(|o| o == option) {
            Some(idx) => {
                selected.remove(idx);
            }
            None => selected.push(option.to_string()),
        }
        Ok(())
    }

    pub fn answer_for(&self, question: &QuizQuestion) -> String {
        self.sheet().answer_for(question)
    }

    pub fn all_answered(&self) -> bool {
        let sheet = self.sheet();
        self.questions
            .iter()
            .all(|q| !sheet.answer_for(q).trim().is_empty())
    }

    /// 提交全部答案并取回评阅意见；失败时不保留旧的意见，可直接重试
    pub async fn submit(&self) -> StudyResult<String> {
        let answers: Vec<AnswerSubmission> = {
            let mut sheet = self.sheet();
            if self
                .questions
                .iter()
                .any(|q| sheet.answer_for(q).trim().is_empty())
            {
                return Err(StudyError::validation("Please answer all questions"));
            }
            sheet.feedback = None;
            self.questions
                .iter()
                .map(|q| AnswerSubmission {
                    question_id: q.id,
                    question: q.question.clone(),
                    correct_answer: q.correct_answer.clone(),
                    user_answer: sheet.answer_for(q),
                })
                .collect()
        };

        let ticket = self.slot.replace();
        let result = self
            .backend
            .evaluate(&self.page_text, self.request.language, answers, &ticket.token)
            .await;
        self.slot.finish(ticket.generation);

        match result {
            Ok(feedback) => {
                info!("[Quiz] 评阅完成（{} 字符）", feedback.chars().count());
                self.sheet().feedback = Some(feedback.clone());
                Ok(feedback)
            }
            Err(e) => {
                warn!("[Quiz] 评阅失败: {}", e);
                Err(e)
            }
        }
    }

    /// 取消进行中的评阅
    pub fn cancel(&self) -> bool {
        self.slot.cancel()
    }
}
