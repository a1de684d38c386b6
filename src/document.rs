//! 文档页面文本来源
//!
//! 栅格化与文本抽取不在本库范围内；阅读器把每页文本交给实现了
//! [`PageTextSource`] 的对象即可。页码从 1 开始。

use async_trait::async_trait;

use crate::error::{StudyError, StudyResult};

#[async_trait]
pub trait PageTextSource: Send + Sync {
    fn page_count(&self) -> u32;

    async fn page_text(&self, page: u32) -> StudyResult<String>;
}

/// 把页码区间内的文本拼接起来（测验使用）
pub async fn range_text(source: &dyn PageTextSource, from: u32, to: u32) -> StudyResult<String> {
    let mut parts = Vec::with_capacity((to.saturating_sub(from) + 1) as usize);
    for page in from..=to {
        let text = source.page_text(page).await?;
        parts.push(format!("--- Page {} ---\n{}", page, text));
    }
    Ok(parts.join("\n\n"))
}

/// 内存中的文档
#[derive(Debug, Clone, Default)]
pub struct StaticDocument {
    pages: Vec<String>,
}

impl StaticDocument {
    pub fn new(pages: Vec<String>) -> Self {
        Self { pages }
    }
}

#[async_trait]
impl PageTextSource for StaticDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    async fn page_text(&self, page: u32) -> StudyResult<String> {
        page.checked_sub(1)
            .and_then(|idx| self.pages.get(idx as usize))
            .cloned()
            .ok_or_else(|| StudyError::not_found("Page", page.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_document_pages() {
        let doc = StaticDocument::new(vec!["one".into(), "two".into(), "three".into()]);
        assert_eq!(doc.page_count(), 3);
        assert_eq!(doc.page_text(1).await.unwrap(), "one");
        assert!(doc.page_text(0).await.is_err());
        assert!(doc.page_text(4).await.is_err());

        let text = range_text(&doc, 2, 3).await.unwrap();
        assert!(text.contains("--- Page 2 ---\ntwo"));
        assert!(text.contains("--- Page 3 ---\nthree"));
    }
}
