/// 翻译模块 - 按页翻译的缓存与调度
///
/// 职责：
/// - 以 `"{page}-{language}"` 为键缓存译文
/// - 翻页防抖、同 key 去重、成功后预取后续页
/// - 广播翻译事件与合成进度
pub mod cache;
pub mod events;
pub mod pipeline;
pub mod types;

pub use cache::TranslationCache;
pub use events::{ProgressMeter, TranslationEventEmitter, PROGRESS_CEILING};
pub use pipeline::{PageTranslationController, PageTranslator};
pub use types::{TranslationEvent, TranslationKey, TranslationOutcome};
