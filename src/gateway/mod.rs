//! 关系型数据网关
//!
//! store 只依赖 [`StudyGateway`] trait：对七张表做按 `user_id` 隔离的行级 CRUD，
//! 行以 JSON 对象传递（列名即字段名）。插入/更新返回服务端最终行（含服务端分配的
//! id 与时间戳），store 以返回行为准合并到内存状态。
//!
//! 内置实现：[`sqlite::SqliteGateway`]。

pub mod sqlite;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{StudyError, StudyResult};

pub use sqlite::SqliteGateway;

/// 网关中的表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Exams,
    Subjects,
    Topics,
    SubTopics,
    Clips,
    Videos,
    YouTubeSources,
}

impl Table {
    pub const ALL: [Table; 7] = [
        Table::Exams,
        Table::Subjects,
        Table::Topics,
        Table::SubTopics,
        Table::Clips,
        Table::Videos,
        Table::YouTubeSources,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Table::Exams => "exams",
            Table::Subjects => "subjects",
            Table::Topics => "topics",
            Table::SubTopics => "sub_topics",
            Table::Clips => "clips",
            Table::Videos => "videos",
            Table::YouTubeSources => "youtube_sources",
        }
    }

    /// 资源名（用于 NotFound 错误）
    pub fn resource(&self) -> &'static str {
        match self {
            Table::Exams => "Exam",
            Table::Subjects => "Subject",
            Table::Topics => "Topic",
            Table::SubTopics => "SubTopic",
            Table::Clips => "Clip",
            Table::Videos => "Video",
            Table::YouTubeSources => "YouTubeSource",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 行级 CRUD 网关
///
/// 所有操作都限定在 `user_id` 之内；删除父行时由网关负责级联删除子孙行。
#[async_trait]
pub trait StudyGateway: Send + Sync {
    /// 读取该用户在表中的全部行
    async fn select(&self, table: Table, user_id: &str) -> StudyResult<Vec<Value>>;

    /// 插入一行，返回服务端最终行
    async fn insert(&self, table: Table, user_id: &str, row: Value) -> StudyResult<Value>;

    /// 部分更新，返回服务端最终行
    async fn update(&self, table: Table, user_id: &str, id: &str, patch: Value)
        -> StudyResult<Value>;

    /// 删除一行
    async fn delete(&self, table: Table, user_id: &str, id: &str) -> StudyResult<()>;
}

// ============================================================================
// 类型化辅助函数
// ============================================================================

pub async fn select_typed<T: DeserializeOwned>(
    gateway: &dyn StudyGateway,
    table: Table,
    user_id: &str,
) -> StudyResult<Vec<T>> {
    gateway
        .select(table, user_id)
        .await?
        .into_iter()
        .map(|row| serde_json::from_value(row).map_err(StudyError::from))
        .collect()
}

pub async fn insert_typed<N: Serialize, T: DeserializeOwned>(
    gateway: &dyn StudyGateway,
    table: Table,
    user_id: &str,
    row: &N,
) -> StudyResult<T> {
    let row = serde_json::to_value(row)?;
    let stored = gateway.insert(table, user_id, row).await?;
    Ok(serde_json::from_value(stored)?)
}

pub async fn update_typed<P: Serialize, T: DeserializeOwned>(
    gateway: &dyn StudyGateway,
    table: Table,
    user_id: &str,
    id: &str,
    patch: &P,
) -> StudyResult<T> {
    let patch = serde_json::to_value(patch)?;
    let stored = gateway.update(table, user_id, id, patch).await?;
    Ok(serde_json::from_value(stored)?)
}
