/// 翻译事件发射器 - 广播翻译状态与合成进度
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tracing::debug;

use super::types::TranslationEvent;

/// 进度上限（请求未完成时不会超过）
pub const PROGRESS_CEILING: u8 = 90;
const PROGRESS_STEP: u8 = 10;

/// 翻译事件发射器
///
/// 没有订阅者时发送失败是正常情况，直接忽略。
#[derive(Clone)]
pub struct TranslationEventEmitter {
    events: broadcast::Sender<TranslationEvent>,
    progress: Arc<ProgressMeter>,
}

impl TranslationEventEmitter {
    pub fn new(progress_tick: Duration) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            events,
            progress: Arc::new(ProgressMeter::new(progress_tick)),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TranslationEvent> {
        self.events.subscribe()
    }

    pub fn progress(&self) -> &Arc<ProgressMeter> {
        &self.progress
    }

    fn emit(&self, event: TranslationEvent) {
        if self.events.send(event).is_err() {
            debug!("[Translation] 无订阅者，事件被丢弃");
        }
    }

    pub fn emit_started(&self, key: &str) {
        self.emit(TranslationEvent::Started { key: key.to_string() });
    }

    pub fn emit_completed(&self, key: &str, from_cache: bool) {
        self.emit(TranslationEvent::Completed {
            key: key.to_string(),
            from_cache,
        });
    }

    pub fn emit_error(&self, key: &str, message: String) {
        self.emit(TranslationEvent::Failed {
            key: key.to_string(),
            message,
        });
    }

    pub fn emit_cancelled(&self, key: &str) {
        self.emit(TranslationEvent::Cancelled { key: key.to_string() });
    }

    pub fn emit_prefetched(&self, key: &str) {
        self.emit(TranslationEvent::Prefetched { key: key.to_string() });
    }
}

/// 合成进度：请求进行中每个 tick 前进一步，最高到 90；
/// 成功置 100，失败或取消归 0。
///
/// 每次 `begin` 都会换一个 generation，旧的 ticker 看到 generation 变化后自行退出。
pub struct ProgressMeter {
    tx: watch::Sender<u8>,
    generation: AtomicU64,
    tick: Duration,
}

impl ProgressMeter {
    pub fn new(tick: Duration) -> Self {
        let (tx, _) = watch::channel(0);
        Self {
            tx,
            generation: AtomicU64::new(0),
            tick,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<u8> {
        self.tx.subscribe()
    }

    pub fn value(&self) -> u8 {
        *self.tx.borrow()
    }

    /// 开始一段新的进度；返回的 generation 用于结束时匹配
    pub fn begin(self: &Arc<Self>) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.tx.send_replace(0);

        let meter = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(meter.tick);
            interval.tick().await;
            loop {
                interval.tick().await;
                if meter.generation.load(Ordering::SeqCst) != generation {
                    break;
                }
                let advanced = meter.tx.send_if_modified(|v| {
                    if *v >= PROGRESS_CEILING {
                        return false;
                    }
                    *v = v.saturating_add(PROGRESS_STEP).min(PROGRESS_CEILING);
                    true
                });
                if !advanced {
                    break;
                }
            }
        });
        generation
    }

    pub fn complete(&self, generation: u64) {
        self.settle(generation, 100);
    }

    pub fn reset(&self, generation: u64) {
        self.settle(generation, 0);
    }

    /// 缓存命中时直接显示完成
    pub fn set_done(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.tx.send_replace(100);
    }

    fn settle(&self, generation: u64, value: u8) {
        // 只有当前这一段进度才能结束它
        if self
            .generation
            .compare_exchange(generation, generation + 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            self.tx.send_replace(value);
        }
    }
}
