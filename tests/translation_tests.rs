//! 页面翻译控制器测试（暂停时钟下验证防抖、预取、去重与取消）

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use study_clips_lib::ai::types::Language;
use study_clips_lib::config::TranslationConfig;
use study_clips_lib::document::StaticDocument;
use study_clips_lib::translation::{
    PageTranslationController, PageTranslator, TranslationEvent, TranslationOutcome,
};
use study_clips_lib::{StudyError, StudyResult};

/// 记录每页调用次数的假翻译后端
#[derive(Default)]
struct CountingTranslator {
    delay: Duration,
    failing: HashSet<String>,
    calls: Mutex<HashMap<String, usize>>,
}

impl CountingTranslator {
    fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    fn calls_for(&self, page_text: &str) -> usize {
        self.calls.lock().unwrap().get(page_text).copied().unwrap_or(0)
    }

    fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl PageTranslator for CountingTranslator {
    async fn translate_page(
        &self,
        page_text: &str,
        language: Language,
        cancel: &CancellationToken,
    ) -> StudyResult<String> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(page_text.to_string())
            .or_default() += 1;
        tokio::select! {
            _ = cancel.cancelled() => return Err(StudyError::Cancelled),
            _ = tokio::time::sleep(self.delay) => {}
        }
        if self.failing.contains(page_text) {
            return Err(StudyError::Http {
                status: 500,
                message: "translation failed".into(),
            });
        }
        Ok(format!("{} ({})", page_text, language.code()))
    }
}

fn document(pages: u32) -> Arc<StaticDocument> {
    Arc::new(StaticDocument::new(
        (1..=pages).map(|p| format!("page {}", p)).collect(),
    ))
}

fn controller(
    translator: Arc<CountingTranslator>,
    pages: u32,
    prefetch_ahead: u32,
) -> PageTranslationController {
    PageTranslationController::new(
        translator,
        document(pages),
        TranslationConfig {
            prefetch_ahead,
            ..Default::default()
        },
    )
}

#[tokio::test(start_paused = true)]
async fn test_cache_hit_issues_exactly_one_request() {
    let translator = Arc::new(CountingTranslator::default());
    let controller = controller(translator.clone(), 3, 0);

    let first = controller.translate(2, Language::Hindi).await.unwrap();
    assert_eq!(first, TranslationOutcome::Translated("page 2 (hindi)".into()));
    for _ in 0..3 {
        let again = controller.translate(2, Language::Hindi).await.unwrap();
        assert_eq!(again, TranslationOutcome::Cached("page 2 (hindi)".into()));
    }
    assert_eq!(translator.calls_for("page 2"), 1);

    // 另一种语言是另一个 key
    controller.translate(2, Language::Hinglish).await.unwrap();
    assert_eq!(translator.calls_for("page 2"), 2);
    assert_eq!(controller.cache_len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_pending_key_is_not_requested_twice() {
    let translator = Arc::new(CountingTranslator::with_delay(Duration::from_secs(2)));
    let controller = controller(translator.clone(), 3, 0);

    let background = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.translate(1, Language::Hindi).await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(controller.is_pending(1, Language::Hindi));

    let second = controller.translate(1, Language::Hindi).await.unwrap();
    assert_eq!(second, TranslationOutcome::AlreadyPending);

    let first = background.await.unwrap().unwrap();
    assert_eq!(first, TranslationOutcome::Translated("page 1 (hindi)".into()));
    assert_eq!(translator.calls_for("page 1"), 1);
    assert!(!controller.is_pending(1, Language::Hindi));
}

#[tokio::test(start_paused = true)]
async fn test_new_foreground_request_cancels_previous() {
    let translator = Arc::new(CountingTranslator::with_delay(Duration::from_secs(2)));
    let controller = controller(translator.clone(), 3, 0);
    let mut events = controller.subscribe();

    let background = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.translate(1, Language::Hindi).await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;

    let second = controller.translate(2, Language::Hindi).await.unwrap();
    assert_eq!(second, TranslationOutcome::Translated("page 2 (hindi)".into()));
    assert_eq!(background.await.unwrap().unwrap(), TranslationOutcome::Cancelled);
    assert_eq!(controller.cached(1, Language::Hindi), None);

    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    assert!(seen.contains(&TranslationEvent::Cancelled {
        key: "1-hindi".into()
    }));
    assert!(seen.contains(&TranslationEvent::Completed {
        key: "2-hindi".into(),
        from_cache: false
    }));
}

#[tokio::test(start_paused = true)]
async fn test_page_changes_are_debounced() {
    let translator = Arc::new(CountingTranslator::default());
    let controller = controller(translator.clone(), 5, 0);

    controller.on_page_change(1, Language::Hindi);
    tokio::time::sleep(Duration::from_millis(500)).await;
    controller.on_page_change(2, Language::Hindi);
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(translator.total_calls(), 0);

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(translator.calls_for("page 1"), 0);
    assert_eq!(translator.calls_for("page 2"), 1);
    assert_eq!(controller.cached(2, Language::Hindi).as_deref(), Some("page 2 (hindi)"));

    // 回到已缓存的页不会再请求
    controller.on_page_change(2, Language::Hindi);
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(translator.calls_for("page 2"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_english_navigation_never_translates() {
    let translator = Arc::new(CountingTranslator::default());
    let controller = controller(translator.clone(), 5, 3);

    controller.on_page_change(1, Language::Hindi);
    controller.on_page_change(1, Language::English);
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(translator.total_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_prefetch_is_serialized_and_bounded() {
    let translator = Arc::new(CountingTranslator::default());
    let controller = controller(translator.clone(), 5, 3);
    let mut events = controller.subscribe();

    controller.translate(3, Language::Hindi).await.unwrap();
    assert_eq!(translator.total_calls(), 1);

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(translator.calls_for("page 4"), 1);
    assert_eq!(translator.calls_for("page 5"), 0);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(translator.calls_for("page 5"), 1);
    assert_eq!(translator.total_calls(), 3);
    assert!(controller.cached(4, Language::Hindi).is_some());
    assert!(controller.cached(5, Language::Hindi).is_some());

    let mut prefetched = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let TranslationEvent::Prefetched { key } = event {
            prefetched.push(key);
        }
    }
    assert_eq!(prefetched, vec!["4-hindi", "5-hindi"]);
}

#[tokio::test(start_paused = true)]
async fn test_prefetch_skips_cached_and_swallows_failures() {
    let translator = Arc::new(CountingTranslator {
        failing: HashSet::from(["page 3".to_string()]),
        ..Default::default()
    });
    let controller = controller(translator.clone(), 10, 3);

    controller.translate(2, Language::Hinglish).await.unwrap();
    controller.cancel_prefetch();
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(translator.total_calls(), 1);

    controller.translate(1, Language::Hinglish).await.unwrap();
    tokio::time::sleep(Duration::from_secs(3)).await;

    assert_eq!(translator.calls_for("page 2"), 1);
    assert_eq!(translator.calls_for("page 3"), 1);
    assert_eq!(translator.calls_for("page 4"), 1);
    assert_eq!(controller.cached(3, Language::Hinglish), None);
    assert!(controller.cached(4, Language::Hinglish).is_some());
}

#[tokio::test(start_paused = true)]
async fn test_cancel_all_stops_debounce_and_prefetch() {
    let translator = Arc::new(CountingTranslator::default());
    let controller = controller(translator.clone(), 10, 3);

    controller.translate(1, Language::Hindi).await.unwrap();
    controller.on_page_change(7, Language::Hindi);
    controller.cancel_all();

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(translator.total_calls(), 1);
    assert!(controller.shutdown(Duration::from_secs(1)).await);
}

#[tokio::test(start_paused = true)]
async fn test_progress_tracks_request_lifecycle() {
    let translator = Arc::new(CountingTranslator {
        delay: Duration::from_secs(3),
        failing: HashSet::from(["page 2".to_string()]),
        ..Default::default()
    });
    let controller = controller(translator.clone(), 3, 0);

    let background = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.translate(1, Language::Hindi).await })
    };
    tokio::time::sleep(Duration::from_millis(1000)).await;
    let midway = controller.progress_value();
    assert!(midway > 0 && midway <= 90, "progress was {}", midway);

    background.await.unwrap().unwrap();
    assert_eq!(controller.progress_value(), 100);

    let failed = controller.translate(2, Language::Hindi).await;
    assert!(failed.is_err());
    assert_eq!(controller.progress_value(), 0);
}

#[tokio::test]
async fn test_out_of_range_pages_are_rejected() {
    let translator = Arc::new(CountingTranslator::default());
    let controller = controller(translator.clone(), 2, 0);
    assert!(matches!(
        controller.translate(3, Language::Hindi).await,
        Err(StudyError::Validation(_))
    ));
    assert_eq!(translator.total_calls(), 0);
}
