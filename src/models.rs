//! 实体模型
//!
//! 字段名与网关表列名一致（snake_case），因此同一套类型既用于内存状态，
//! 也直接与网关行做 serde 互转。父子关系只通过外键字段表达，不做嵌入。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// 实体
// ============================================================================

/// 考试（层级根节点）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exam {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 科目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    pub order: u32,
    pub exam_id: String,
}

/// 主题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub order: u32,
    pub subject_id: String,
}

/// 子主题（片段挂载的叶子单元）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTopic {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub order: u32,
    pub topic_id: String,
}

/// 视频片段：`[start_time, end_time)`，单位秒
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clip {
    pub id: String,
    pub video_id: String,
    pub start_time: u32,
    pub end_time: u32,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// 最佳讲解 / 补充材料，仅作描述用
    #[serde(default)]
    pub is_primary: bool,
    pub order: u32,
    pub sub_topic_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Clip {
    pub fn duration(&self) -> u32 {
        self.end_time.saturating_sub(self.start_time)
    }

    pub fn kind(&self) -> ClipKind {
        if self.is_primary {
            ClipKind::Primary
        } else {
            ClipKind::Supplementary
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipKind {
    Primary,
    Supplementary,
}

/// YouTube 视频（按 youtube_id 去重）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub youtube_id: String,
    pub title: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    /// 秒
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub channel_name: Option<String>,
    #[serde(default)]
    pub source_id: Option<String>,
    /// 仅用于展示
    #[serde(default)]
    pub playlist_position: Option<u32>,
}

/// 来源类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Playlist,
    Channel,
}

/// 收藏的 YouTube 播放列表/频道（独立于考试树）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YouTubeSource {
    pub id: String,
    #[serde(rename = "type")]
    pub source_type: SourceType,
    pub youtube_id: String,
    pub title: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub video_count: Option<u32>,
    pub created_at: DateTime<Utc>,
}

/// 播放器当前选中的视频
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedVideo {
    pub video_id: String,
    pub title: String,
}

// ============================================================================
// 新建参数（id / order / 时间戳由 store 与网关分配）
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewExam {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSubject {
    pub exam_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTopic {
    pub subject_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSubTopic {
    pub topic_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewClip {
    pub sub_topic_id: String,
    pub video_id: String,
    pub start_time: u32,
    pub end_time: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub is_primary: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewVideo {
    pub youtube_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub duration: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlist_position: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSource {
    #[serde(rename = "type")]
    pub source_type: SourceType,
    pub youtube_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_count: Option<u32>,
}

// ============================================================================
// 部分更新（未设置的字段保持不变）
//
// 可清空的可选字段使用 `Option<Option<_>>`：
// `None` 不修改，`Some(None)` 写入 null，`Some(Some(v))` 写入新值
// ============================================================================

/// 区分"字段缺失"与"字段为 null"
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExamPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub description: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub icon: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub description: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub color: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub description: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubTopicPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub description: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClipPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<u32>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub label: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub notes: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,
    /// 把片段移动到另一个子主题
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_topic_id: Option<String>,
}

/// 判断补丁是否为空（序列化后没有任何字段）
pub fn patch_is_empty<T: Serialize>(patch: &T) -> bool {
    match serde_json::to_value(patch) {
        Ok(serde_json::Value::Object(map)) => map.is_empty(),
        _ => false,
    }
}

/// 校验片段时间区间：`0 <= start < end`
pub fn validate_time_range(start_time: u32, end_time: u32) -> Result<(), String> {
    if start_time >= end_time {
        return Err(format!(
            "Invalid time range: start ({}) must be before end ({})",
            start_time, end_time
        ));
    }
    Ok(())
}
