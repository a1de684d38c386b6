// Study Clips library entry
// 考试知识树存储、YouTube 片段、PDF/视频 AI 助手（流式聊天、按页翻译、测验）的核心逻辑。
// bin 目标与宿主 UI 都只通过这里导出的类型访问。

pub mod ai;
pub mod config;
pub mod document;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod models;
pub mod quiz;
pub mod store;
pub mod tasks; // 可取消任务原语（TaskSlot / TaskRegistry）
pub mod translation;
pub mod tree;
pub mod utils;

pub use config::StudyConfig;
pub use error::{StudyError, StudyResult};
pub use gateway::{SqliteGateway, StudyGateway, Table};
pub use store::{LoadSummary, StudyStore};
pub use tree::{build_tree, flatten_tree, ExamNode, FlatRows, TreeBuild};
