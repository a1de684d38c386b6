/// 翻译管线 - 页面翻译的调度、缓存与预取
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::ai::client::AiClient;
use crate::ai::types::Language;
use crate::config::TranslationConfig;
use crate::document::PageTextSource;
use crate::error::{StudyError, StudyResult};
use crate::tasks::{TaskRegistry, TaskSlot};

use super::cache::TranslationCache;
use super::events::TranslationEventEmitter;
use super::types::{TranslationEvent, TranslationKey, TranslationOutcome};

/// 页面翻译后端
#[async_trait]
pub trait PageTranslator: Send + Sync {
    async fn translate_page(
        &self,
        page_text: &str,
        language: Language,
        cancel: &CancellationToken,
    ) -> StudyResult<String>;
}

#[async_trait]
impl PageTranslator for AiClient {
    async fn translate_page(
        &self,
        page_text: &str,
        language: Language,
        cancel: &CancellationToken,
    ) -> StudyResult<String> {
        self.translate(page_text, language, cancel).await
    }
}

/// 翻译管线依赖
struct Inner {
    translator: Arc<dyn PageTranslator>,
    document: Arc<dyn PageTextSource>,
    config: TranslationConfig,
    cache: TranslationCache,
    emitter: TranslationEventEmitter,
    foreground: TaskSlot,
    debounce: TaskSlot,
    prefetch: TaskSlot,
    in_flight: TaskRegistry,
}

/// 在途登记的清理守卫；future 被丢弃时同样会移除 key
struct InFlightGuard<'a> {
    registry: &'a TaskRegistry,
    key: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.registry.remove(&self.key);
    }
}

/// 一个文档的页面翻译控制器
///
/// - 前台翻译：新的请求取消上一个前台请求；同一 key 至多一个在途请求
/// - 翻页：非英语时防抖后检查缓存，未命中才发请求
/// - 成功后按顺序预取后续几页，失败静默
#[derive(Clone)]
pub struct PageTranslationController {
    inner: Arc<Inner>,
}

impl PageTranslationController {
    pub fn new(
        translator: Arc<dyn PageTranslator>,
        document: Arc<dyn PageTextSource>,
        config: TranslationConfig,
    ) -> Self {
        let emitter = TranslationEventEmitter::new(config.progress_tick());
        Self {
            inner: Arc::new(Inner {
                translator,
                document,
                config,
                cache: TranslationCache::new(),
                emitter,
                foreground: TaskSlot::new("translation"),
                debounce: TaskSlot::new("translation-debounce"),
                prefetch: TaskSlot::new("translation-prefetch"),
                in_flight: TaskRegistry::new("translation"),
            }),
        }
    }

    /// 前台翻译一页
    pub async fn translate(&self, page: u32, language: Language) -> StudyResult<TranslationOutcome> {
        self.inner.translate(page, language).await
    }

    /// 翻页通知：英语直接忽略，否则防抖后再检查
    pub fn on_page_change(&self, page: u32, language: Language) {
        let inner = &self.inner;
        if language.is_english() {
            inner.debounce.cancel();
            return;
        }

        let ticket = inner.debounce.replace();
        let task_inner = Arc::clone(inner);
        let delay = inner.config.debounce();
        inner.in_flight.spawn_tracked(async move {
            tokio::select! {
                biased;
                _ = ticket.token.cancelled() => {
                    debug!("[Translation] 页面 {} 的防抖被新的翻页取消", page);
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }
            task_inner.debounce.finish(ticket.generation);
            if let Err(e) = task_inner.translate(page, language).await {
                warn!("[Translation] 页面 {} 翻译失败: {}", page, e);
            }
        });
    }

    pub fn cached(&self, page: u32, language: Language) -> Option<String> {
        self.inner.cache.get(&TranslationKey::new(page, language))
    }

    pub fn is_pending(&self, page: u32, language: Language) -> bool {
        self.inner
            .in_flight
            .contains(&TranslationKey::new(page, language).to_string())
    }

    pub fn cache_len(&self) -> usize {
        self.inner.cache.len()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TranslationEvent> {
        self.inner.emitter.subscribe()
    }

    pub fn progress(&self) -> watch::Receiver<u8> {
        self.inner.emitter.progress().subscribe()
    }

    pub fn progress_value(&self) -> u8 {
        self.inner.emitter.progress().value()
    }

    /// 取消前台请求
    pub fn cancel(&self) -> bool {
        self.inner.foreground.cancel()
    }

    pub fn cancel_prefetch(&self) -> bool {
        self.inner.prefetch.cancel()
    }

    /// 取消防抖、前台与预取
    pub fn cancel_all(&self) {
        let inner = &self.inner;
        let cancelled = [
            inner.debounce.cancel(),
            inner.foreground.cancel(),
            inner.prefetch.cancel(),
        ];
        info!(
            "[Translation] cancel_all: debounce={}, foreground={}, prefetch={}",
            cancelled[0], cancelled[1], cancelled[2]
        );
    }

    /// 取消全部并等待后台任务退出
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        self.cancel_all();
        self.inner.in_flight.shutdown(timeout).await
    }
}

impl Inner {
    fn check_page(&self, page: u32) -> StudyResult<()> {
        let count = self.document.page_count();
        if page == 0 || page > count {
            return Err(StudyError::validation(format!(
                "Page {} is outside the document (1-{})",
                page, count
            )));
        }
        Ok(())
    }

    async fn translate(self: &Arc<Self>, page: u32, language: Language) -> StudyResult<TranslationOutcome> {
        self.check_page(page)?;
        let key = TranslationKey::new(page, language);
        let key_str = key.to_string();

        if let Some(text) = self.cache.get(&key) {
            debug!("[Translation] 缓存命中 {}", key_str);
            self.emitter.progress().set_done();
            self.emitter.emit_completed(&key_str, true);
            return Ok(TranslationOutcome::Cached(text));
        }

        // 已在途（前台或预取）时不做任何事，也不取消上一个前台请求
        if self.in_flight.contains(&key_str) {
            debug!("[Translation] {} 已在请求中，忽略", key_str);
            return Ok(TranslationOutcome::AlreadyPending);
        }

        let ticket = self.foreground.replace();
        let Some(token) = self.in_flight.try_register_child(&key_str, &ticket.token) else {
            self.foreground.finish(ticket.generation);
            return Ok(TranslationOutcome::AlreadyPending);
        };
        let _guard = InFlightGuard {
            registry: &self.in_flight,
            key: key_str.clone(),
        };

        info!("[Translation] 开始翻译 {}", key_str);
        self.emitter.emit_started(&key_str);
        let progress = self.emitter.progress().begin();

        let result = self.request(page, language, &token).await;
        self.foreground.finish(ticket.generation);

        match result {
            Ok(text) => {
                self.cache.insert(&key, text.clone());
                self.emitter.progress().complete(progress);
                self.emitter.emit_completed(&key_str, false);
                info!("[Translation] {} 完成（{} 字符）", key_str, text.chars().count());
                self.schedule_prefetch(page, language);
                Ok(TranslationOutcome::Translated(text))
            }
            Err(e) if e.is_cancelled() => {
                self.emitter.progress().reset(progress);
                self.emitter.emit_cancelled(&key_str);
                info!("[Translation] {} 已取消", key_str);
                Ok(TranslationOutcome::Cancelled)
            }
            Err(e) => {
                self.emitter.progress().reset(progress);
                self.emitter.emit_error(&key_str, e.user_message());
                warn!("[Translation] {} 失败: {}", key_str, e);
                Err(e)
            }
        }
    }

    /// 读取页面文本并调用翻译后端；令牌取消时立即返回 `Cancelled`
    async fn request(&self, page: u32, language: Language, token: &CancellationToken) -> StudyResult<String> {
        let work = async {
            let text = self.document.page_text(page).await?;
            self.translator.translate_page(&text, language, token).await
        };
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(StudyError::Cancelled),
            result = work => result,
        }
    }

    /// 预取 N+1..N+ahead：串行、间隔固定、跳过已缓存与在途的页
    fn schedule_prefetch(self: &Arc<Self>, page: u32, language: Language) {
        let last = page
            .saturating_add(self.config.prefetch_ahead)
            .min(self.document.page_count());
        if last <= page {
            return;
        }

        let ticket = self.prefetch.replace();
        let inner = Arc::clone(self);
        let spacing = self.config.prefetch_spacing();
        self.in_flight.spawn_tracked(async move {
            for next in (page + 1)..=last {
                tokio::select! {
                    biased;
                    _ = ticket.token.cancelled() => {
                        debug!("[Translation] 预取在第 {} 页前被取消", next);
                        return;
                    }
                    _ = tokio::time::sleep(spacing) => {}
                }

                let key = TranslationKey::new(next, language);
                let key_str = key.to_string();
                if inner.cache.contains(&key) {
                    continue;
                }
                let Some(token) = inner.in_flight.try_register_child(&key_str, &ticket.token) else {
                    continue;
                };
                let _guard = InFlightGuard {
                    registry: &inner.in_flight,
                    key: key_str.clone(),
                };

                match inner.request(next, language, &token).await {
                    Ok(text) => {
                        inner.cache.insert(&key, text);
                        inner.emitter.emit_prefetched(&key_str);
                        debug!("[Translation] 预取完成 {}", key_str);
                    }
                    Err(e) if e.is_cancelled() => return,
                    Err(e) => debug!("[Translation] 预取 {} 失败（忽略）: {}", key_str, e),
                }
            }
            inner.prefetch.finish(ticket.generation);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::StaticDocument;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct EchoTranslator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PageTranslator for EchoTranslator {
        async fn translate_page(
            &self,
            page_text: &str,
            language: Language,
            _cancel: &CancellationToken,
        ) -> StudyResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("[{}] {}", language.code(), page_text))
        }
    }

    fn controller(pages: usize) -> (PageTranslationController, Arc<EchoTranslator>) {
        let translator = Arc::new(EchoTranslator {
            calls: AtomicUsize::new(0),
        });
        let document = StaticDocument::new((1..=pages).map(|p| format!("page {}", p)).collect());
        let controller = PageTranslationController::new(
            translator.clone(),
            Arc::new(document),
            TranslationConfig {
                prefetch_ahead: 0,
                ..Default::default()
            },
        );
        (controller, translator)
    }

    #[tokio::test]
    async fn test_out_of_range_page_is_rejected() {
        let (controller, translator) = controller(2);
        assert!(controller.translate(0, Language::Hindi).await.is_err());
        assert!(controller.translate(3, Language::Hindi).await.is_err());
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_second_translate_hits_cache() {
        let (controller, translator) = controller(2);
        let first = controller.translate(1, Language::Hindi).await.unwrap();
        assert_eq!(first, TranslationOutcome::Translated("[hindi] page 1".into()));
        let second = controller.translate(1, Language::Hindi).await.unwrap();
        assert_eq!(second, TranslationOutcome::Cached("[hindi] page 1".into()));
        assert_eq!(translator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(controller.progress_value(), 100);
    }
}
