//! 测验请求与校验

use serde::{Deserialize, Serialize};

use crate::ai::types::{Language, QuestionType};
use crate::config::QuizConfig;
use crate::error::{StudyError, StudyResult};

/// 测验生成请求（页码从 1 开始，闭区间）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRequest {
    pub from_page: u32,
    pub to_page: u32,
    pub num_questions: u32,
    pub question_types: Vec<QuestionType>,
    #[serde(default)]
    pub language: Language,
}

impl QuizRequest {
    pub fn single_page(page: u32, num_questions: u32, question_types: Vec<QuestionType>) -> Self {
        Self {
            from_page: page,
            to_page: page,
            num_questions,
            question_types,
            language: Language::default(),
        }
    }

    pub fn page_span(&self) -> u32 {
        self.to_page.saturating_sub(self.from_page) + 1
    }

    /// 在发请求之前校验；`page_count` 为文档总页数
    pub fn validate(&self, limits: &QuizConfig, page_count: u32) -> StudyResult<()> {
        if self.from_page == 0 || self.from_page > self.to_page {
            return Err(StudyError::validation("Start page must not be after end page"));
        }
        if self.to_page > page_count {
            return Err(StudyError::validation(format!(
                "Page {} is outside the document (1-{})",
                self.to_page, page_count
            )));
        }
        if self.page_span() > limits.max_pages {
            return Err(StudyError::validation(format!(
                "Select at most {} pages",
                limits.max_pages
            )));
        }
        if self.num_questions == 0 || self.num_questions > limits.max_questions {
            return Err(StudyError::validation(format!(
                "Number of questions must be between 1 and {}",
                limits.max_questions
            )));
        }
        if self.question_types.is_empty() {
            return Err(StudyError::validation("Select at least one question type"));
        }
        Ok(())
    }
}
