//! Study Store
//!
//! 显式构造的状态容器（无全局单例），生命周期为 `init → fetch_all_data → … → teardown`。
//!
//! ## 写入规则
//! - 所有变更先写网关，网关失败时内存状态不变并返回错误
//! - 成功后以网关返回的行为准合并（服务端 id 与时间戳）
//! - 每次变更先算出完整新状态再在写锁内一次性替换，锁不跨 `.await`
//! - 新建时 `order` = 当前同级数量

pub mod state;

use serde::Serialize;
use serde_json::{json, Value};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

use crate::ai::types::PlaylistResponse;
use crate::error::{StudyError, StudyResult};
use crate::gateway::{self, StudyGateway, Table};
use crate::models::{
    patch_is_empty, validate_time_range, Clip, ClipPatch, Exam, ExamPatch, NewClip, NewExam,
    NewSource, NewSubTopic, NewSubject, NewTopic, NewVideo, SelectedVideo, SubTopic,
    SubTopicPatch, Subject, SubjectPatch, Topic, TopicPatch, Video, YouTubeSource,
};
use crate::tree::{build_tree, flatten_tree, TreeBuild};
use crate::utils::youtube::thumbnail_url;

pub use state::{Selection, StudyState};

/// 全量加载结果统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub exams: usize,
    pub subjects: usize,
    pub topics: usize,
    pub sub_topics: usize,
    pub clips: usize,
    pub videos: usize,
    pub sources: usize,
    pub orphans: usize,
}

pub struct StudyStore {
    gateway: Arc<dyn StudyGateway>,
    user_id: RwLock<Option<String>>,
    state: RwLock<StudyState>,
}

fn require_name(kind: &str, name: &str) -> StudyResult<()> {
    if name.trim().is_empty() {
        return Err(StudyError::validation(format!("{} name is required", kind)));
    }
    Ok(())
}

/// 序列化新建参数并附加 `order`
fn with_order<N: Serialize>(row: &N, order: usize) -> StudyResult<Value> {
    let mut value = serde_json::to_value(row)?;
    if let Value::Object(map) = &mut value {
        map.insert("order".to_string(), json!(order));
    }
    Ok(value)
}

impl StudyStore {
    pub fn new(gateway: Arc<dyn StudyGateway>) -> Self {
        Self {
            gateway,
            user_id: RwLock::new(None),
            state: RwLock::new(StudyState::default()),
        }
    }

    // ========================================================================
    // 生命周期
    // ========================================================================

    /// 绑定已认证的用户
    pub fn init(&self, user_id: impl Into<String>) {
        let user_id = user_id.into();
        info!("[StudyStore] Initialized for user {}", user_id);
        *self.user_id.write().unwrap_or_else(|p| p.into_inner()) = Some(user_id);
    }

    /// 解绑用户并清空全部状态
    pub fn teardown(&self) {
        *self.user_id.write().unwrap_or_else(|p| p.into_inner()) = None;
        *self.write_state() = StudyState::default();
        info!("[StudyStore] Torn down");
    }

    pub fn user_id(&self) -> Option<String> {
        self.user_id.read().unwrap_or_else(|p| p.into_inner()).clone()
    }

    fn require_user(&self) -> StudyResult<String> {
        self.user_id().ok_or(StudyError::NotAuthenticated)
    }

    fn read_state(&self) -> RwLockReadGuard<'_, StudyState> {
        self.state.read().unwrap_or_else(|poisoned| {
            warn!("[StudyStore] State lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, StudyState> {
        self.state.write().unwrap_or_else(|poisoned| {
            warn!("[StudyStore] State lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// 全量加载：七张表并发读取，构建树，一次性替换状态
    ///
    /// 任一读取失败时保留原状态并返回错误。
    pub async fn fetch_all_data(&self) -> StudyResult<LoadSummary> {
        let user_id = self.require_user()?;
        let gw = self.gateway.as_ref();

        let (exams, subjects, topics, sub_topics, clips, videos, sources) = tokio::try_join!(
            gateway::select_typed::<Exam>(gw, Table::Exams, &user_id),
            gateway::select_typed::<Subject>(gw, Table::Subjects, &user_id),
            gateway::select_typed::<Topic>(gw, Table::Topics, &user_id),
            gateway::select_typed::<SubTopic>(gw, Table::SubTopics, &user_id),
            gateway::select_typed::<Clip>(gw, Table::Clips, &user_id),
            gateway::select_typed::<Video>(gw, Table::Videos, &user_id),
            gateway::select_typed::<YouTubeSource>(gw, Table::YouTubeSources, &user_id),
        )
        .map_err(|e| {
            warn!("[StudyStore] fetch_all_data failed: {}", e);
            e
        })?;

        let built = build_tree(&crate::tree::FlatRows {
            exams,
            subjects,
            topics,
            sub_topics,
            clips,
        });
        let rows = flatten_tree(&built.exams);

        let summary = LoadSummary {
            exams: rows.exams.len(),
            subjects: rows.subjects.len(),
            topics: rows.topics.len(),
            sub_topics: rows.sub_topics.len(),
            clips: rows.clips.len(),
            videos: videos.len(),
            sources: sources.len(),
            orphans: built.orphans.len(),
        };

        {
            let mut state = self.write_state();
            let selection = state.selection.clone();
            let mut next = StudyState {
                exams: rows.exams,
                subjects: rows.subjects,
                topics: rows.topics,
                sub_topics: rows.sub_topics,
                clips: rows.clips,
                videos,
                sources,
                selection,
                loaded: true,
            };
            next.prune_selection();
            *state = next;
        }

        info!("[StudyStore] Loaded data: {:?}", summary);
        Ok(summary)
    }

    // ========================================================================
    // Exam
    // ========================================================================

    pub async fn add_exam(&self, new: NewExam) -> StudyResult<Exam> {
        require_name("Exam", &new.name)?;
        let user_id = self.require_user()?;
        let exam: Exam =
            gateway::insert_typed(self.gateway.as_ref(), Table::Exams, &user_id, &new).await?;

        self.write_state().exams.push(exam.clone());
        debug!("[StudyStore] Added exam {}", exam.id);
        Ok(exam)
    }

    pub async fn update_exam(&self, id: &str, patch: ExamPatch) -> StudyResult<Exam> {
        if let Some(name) = &patch.name {
            require_name("Exam", name)?;
        }
        let current = self
            .read_state()
            .exam(id)
            .cloned()
            .ok_or_else(|| StudyError::not_found("Exam", id))?;
        if patch_is_empty(&patch) {
            return Ok(current);
        }

        let user_id = self.require_user()?;
        let exam: Exam =
            gateway::update_typed(self.gateway.as_ref(), Table::Exams, &user_id, id, &patch).await?;

        let mut state = self.write_state();
        if let Some(slot) = state.exams.iter_mut().find(|e| e.id == id) {
            *slot = exam.clone();
        }
        Ok(exam)
    }

    /// 删除考试，级联删除其下全部科目/主题/子主题/片段
    pub async fn delete_exam(&self, id: &str) -> StudyResult<()> {
        if self.read_state().exam(id).is_none() {
            return Err(StudyError::not_found("Exam", id));
        }
        let user_id = self.require_user()?;
        self.gateway.delete(Table::Exams, &user_id, id).await?;

        let mut state = self.write_state();
        let mut next = state.clone();
        next.remove_exam_cascade(id);
        next.prune_selection();
        *state = next;
        info!("[StudyStore] Deleted exam {} (cascade)", id);
        Ok(())
    }

    // ========================================================================
    // Subject
    // ========================================================================

    pub async fn add_subject(&self, new: NewSubject) -> StudyResult<Subject> {
        require_name("Subject", &new.name)?;
        let order = {
            let state = self.read_state();
            if state.exam(&new.exam_id).is_none() {
                return Err(StudyError::not_found("Exam", new.exam_id.clone()));
            }
            state.subject_count(&new.exam_id)
        };
        let user_id = self.require_user()?;

        let row = self
            .gateway
            .insert(Table::Subjects, &user_id, with_order(&new, order)?)
            .await?;
        let subject: Subject = serde_json::from_value(row)?;

        self.write_state().subjects.push(subject.clone());
        debug!("[StudyStore] Added subject {} (order {})", subject.id, subject.order);
        Ok(subject)
    }

    pub async fn update_subject(&self, id: &str, patch: SubjectPatch) -> StudyResult<Subject> {
        if let Some(name) = &patch.name {
            require_name("Subject", name)?;
        }
        let current = self
            .read_state()
            .subject(id)
            .cloned()
            .ok_or_else(|| StudyError::not_found("Subject", id))?;
        if patch_is_empty(&patch) {
            return Ok(current);
        }

        let user_id = self.require_user()?;
        let subject: Subject =
            gateway::update_typed(self.gateway.as_ref(), Table::Subjects, &user_id, id, &patch)
                .await?;

        let mut state = self.write_state();
        if let Some(slot) = state.subjects.iter_mut().find(|s| s.id == id) {
            *slot = subject.clone();
        }
        Ok(subject)
    }

    pub async fn delete_subject(&self, id: &str) -> StudyResult<()> {
        if self.read_state().subject(id).is_none() {
            return Err(StudyError::not_found("Subject", id));
        }
        let user_id = self.require_user()?;
        self.gateway.delete(Table::Subjects, &user_id, id).await?;

        let mut state = self.write_state();
        let mut next = state.clone();
        next.remove_subject_cascade(id);
        next.prune_selection();
        *state = next;
        info!("[StudyStore] Deleted subject {} (cascade)", id);
        Ok(())
    }

    // ========================================================================
    // Topic
    // ========================================================================

    pub async fn add_topic(&self, new: NewTopic) -> StudyResult<Topic> {
        require_name("Topic", &new.name)?;
        let order = {
            let state = self.read_state();
            if state.subject(&new.subject_id).is_none() {
                return Err(StudyError::not_found("Subject", new.subject_id.clone()));
            }
            state.topic_count(&new.subject_id)
        };
        let user_id = self.require_user()?;

        let row = self
            .gateway
            .insert(Table::Topics, &user_id, with_order(&new, order)?)
            .await?;
        let topic: Topic = serde_json::from_value(row)?;

        self.write_state().topics.push(topic.clone());
        debug!("[StudyStore] Added topic {} (order {})", topic.id, topic.order);
        Ok(topic)
    }

    pub async fn update_topic(&self, id: &str, patch: TopicPatch) -> StudyResult<Topic> {
        if let Some(name) = &patch.name {
            require_name("Topic", name)?;
        }
        let current = self
            .read_state()
            .topic(id)
            .cloned()
            .ok_or_else(|| StudyError::not_found("Topic", id))?;
        if patch_is_empty(&patch) {
            return Ok(current);
        }

        let user_id = self.require_user()?;
        let topic: Topic =
            gateway::update_typed(self.gateway.as_ref(), Table::Topics, &user_id, id, &patch)
                .await?;

        let mut state = self.write_state();
        if let Some(slot) = state.topics.iter_mut().find(|t| t.id == id) {
            *slot = topic.clone();
        }
        Ok(topic)
    }

    pub async fn delete_topic(&self, id: &str) -> StudyResult<()> {
        if self.read_state().topic(id).is_none() {
            return Err(StudyError::not_found("Topic", id));
        }
        let user_id = self.require_user()?;
        self.gateway.delete(Table::Topics, &user_id, id).await?;

        let mut state = self.write_state();
        let mut next = state.clone();
        next.remove_topic_cascade(id);
        next.prune_selection();
        *state = next;
        info!("[StudyStore] Deleted topic {} (cascade)", id);
        Ok(())
    }

    // ========================================================================
    // SubTopic
    // ========================================================================

    pub async fn add_sub_topic(&self, new: NewSubTopic) -> StudyResult<SubTopic> {
        require_name("SubTopic", &new.name)?;
        let order = {
            let state = self.read_state();
            if state.topic(&new.topic_id).is_none() {
                return Err(StudyError::not_found("Topic", new.topic_id.clone()));
            }
            state.sub_topic_count(&new.topic_id)
        };
        let user_id = self.require_user()?;

        let row = self
            .gateway
            .insert(Table::SubTopics, &user_id, with_order(&new, order)?)
            .await?;
        let sub_topic: SubTopic = serde_json::from_value(row)?;

        self.write_state().sub_topics.push(sub_topic.clone());
        debug!("[StudyStore] Added sub-topic {} (order {})", sub_topic.id, sub_topic.order);
        Ok(sub_topic)
    }

    pub async fn update_sub_topic(&self, id: &str, patch: SubTopicPatch) -> StudyResult<SubTopic> {
        if let Some(name) = &patch.name {
            require_name("SubTopic", name)?;
        }
        let current = self
            .read_state()
            .sub_topic(id)
            .cloned()
            .ok_or_else(|| StudyError::not_found("SubTopic", id))?;
        if patch_is_empty(&patch) {
            return Ok(current);
        }

        let user_id = self.require_user()?;
        let sub_topic: SubTopic =
            gateway::update_typed(self.gateway.as_ref(), Table::SubTopics, &user_id, id, &patch)
                .await?;

        let mut state = self.write_state();
        if let Some(slot) = state.sub_topics.iter_mut().find(|st| st.id == id) {
            *slot = sub_topic.clone();
        }
        Ok(sub_topic)
    }

    /// 删除子主题并移除其全部片段
    pub async fn delete_sub_topic(&self, id: &str) -> StudyResult<()> {
        if self.read_state().sub_topic(id).is_none() {
            return Err(StudyError::not_found("SubTopic", id));
        }
        let user_id = self.require_user()?;
        self.gateway.delete(Table::SubTopics, &user_id, id).await?;

        let mut state = self.write_state();
        let mut next = state.clone();
        next.remove_sub_topic_cascade(id);
        next.prune_selection();
        *state = next;
        info!("[StudyStore] Deleted sub-topic {} (cascade)", id);
        Ok(())
    }

    /// 按给定 id 顺序重写 `order`；未列出的保持不变，不属于该主题的 id 忽略
    ///
    /// 某一行写入失败时，已成功的行仍会合并（与网关保持一致），并返回该错误。
    pub async fn reorder_sub_topics(&self, topic_id: &str, ordered_ids: &[String]) -> StudyResult<()> {
        let targets: Vec<(String, usize)> = {
            let state = self.read_state();
            if state.topic(topic_id).is_none() {
                return Err(StudyError::not_found("Topic", topic_id));
            }
            ordered_ids
                .iter()
                .enumerate()
                .filter_map(|(idx, id)| {
                    state
                        .sub_topic(id)
                        .filter(|st| st.topic_id == topic_id && st.order as usize != idx)
                        .map(|st| (st.id.clone(), idx))
                })
                .collect()
        };
        let user_id = self.require_user()?;

        let mut updated: Vec<SubTopic> = Vec::with_capacity(targets.len());
        let mut failure = None;
        for (id, order) in targets {
            match self
                .gateway
                .update(Table::SubTopics, &user_id, &id, json!({ "order": order }))
                .await
                .and_then(|row| serde_json::from_value::<SubTopic>(row).map_err(StudyError::from))
            {
                Ok(row) => updated.push(row),
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        {
            let mut state = self.write_state();
            for row in updated {
                if let Some(slot) = state.sub_topics.iter_mut().find(|st| st.id == row.id) {
                    *slot = row;
                }
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    // ========================================================================
    // Clip
    // ========================================================================

    pub async fn add_clip(&self, new: NewClip) -> StudyResult<Clip> {
        validate_time_range(new.start_time, new.end_time).map_err(StudyError::Validation)?;
        if new.video_id.trim().is_empty() {
            return Err(StudyError::validation("Clip video is required"));
        }
        let order = {
            let state = self.read_state();
            if state.sub_topic(&new.sub_topic_id).is_none() {
                return Err(StudyError::not_found("SubTopic", new.sub_topic_id.clone()));
            }
            state.clip_count(&new.sub_topic_id)
        };
        let user_id = self.require_user()?;

        let row = self
            .gateway
            .insert(Table::Clips, &user_id, with_order(&new, order)?)
            .await?;
        let clip: Clip = serde_json::from_value(row)?;

        self.write_state().clips.push(clip.clone());
        debug!("[StudyStore] Added clip {} to {}", clip.id, clip.sub_topic_id);
        Ok(clip)
    }

    pub async fn update_clip(&self, id: &str, patch: ClipPatch) -> StudyResult<Clip> {
        let current = {
            let state = self.read_state();
            let current = state
                .clip(id)
                .cloned()
                .ok_or_else(|| StudyError::not_found("Clip", id))?;
            if let Some(target) = &patch.sub_topic_id {
                if state.sub_topic(target).is_none() {
                    return Err(StudyError::not_found("SubTopic", target.clone()));
                }
            }
            current
        };
        validate_time_range(
            patch.start_time.unwrap_or(current.start_time),
            patch.end_time.unwrap_or(current.end_time),
        )
        .map_err(StudyError::Validation)?;
        if patch_is_empty(&patch) {
            return Ok(current);
        }

        let user_id = self.require_user()?;
        let clip: Clip =
            gateway::update_typed(self.gateway.as_ref(), Table::Clips, &user_id, id, &patch).await?;

        let mut state = self.write_state();
        if let Some(slot) = state.clips.iter_mut().find(|c| c.id == id) {
            *slot = clip.clone();
        }
        Ok(clip)
    }

    pub async fn delete_clip(&self, id: &str) -> StudyResult<()> {
        if self.read_state().clip(id).is_none() {
            return Err(StudyError::not_found("Clip", id));
        }
        let user_id = self.require_user()?;
        self.gateway.delete(Table::Clips, &user_id, id).await?;

        self.write_state().clips.retain(|c| c.id != id);
        debug!("[StudyStore] Deleted clip {}", id);
        Ok(())
    }

    /// 按给定 id 顺序重写子主题内片段的 `order`（规则同 [`Self::reorder_sub_topics`]）
    pub async fn reorder_clips(&self, sub_topic_id: &str, ordered_ids: &[String]) -> StudyResult<()> {
        let targets: Vec<(String, usize)> = {
            let state = self.read_state();
            if state.sub_topic(sub_topic_id).is_none() {
                return Err(StudyError::not_found("SubTopic", sub_topic_id));
            }
            ordered_ids
                .iter()
                .enumerate()
                .filter_map(|(idx, id)| {
                    state
                        .clip(id)
                        .filter(|c| c.sub_topic_id == sub_topic_id && c.order as usize != idx)
                        .map(|c| (c.id.clone(), idx))
                })
                .collect()
        };
        let user_id = self.require_user()?;

        let mut updated: Vec<Clip> = Vec::with_capacity(targets.len());
        let mut failure = None;
        for (id, order) in targets {
            match self
                .gateway
                .update(Table::Clips, &user_id, &id, json!({ "order": order }))
                .await
                .and_then(|row| serde_json::from_value::<Clip>(row).map_err(StudyError::from))
            {
                Ok(row) => updated.push(row),
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        {
            let mut state = self.write_state();
            for row in updated {
                if let Some(slot) = state.clips.iter_mut().find(|c| c.id == row.id) {
                    *slot = row;
                }
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    // ========================================================================
    // Video / Source
    // ========================================================================

    /// 添加视频；已有相同 `youtube_id` 时直接返回已有 id，不访问网关
    pub async fn add_video(&self, new: NewVideo) -> StudyResult<String> {
        if new.youtube_id.trim().is_empty() {
            return Err(StudyError::validation("YouTube id is required"));
        }
        if let Some(existing) = self.read_state().video_by_youtube_id(&new.youtube_id) {
            debug!(
                "[StudyStore] Video {} already exists as {}",
                new.youtube_id, existing.id
            );
            return Ok(existing.id.clone());
        }
        let user_id = self.require_user()?;

        let video: Video =
            gateway::insert_typed(self.gateway.as_ref(), Table::Videos, &user_id, &new).await?;

        let mut state = self.write_state();
        // 并发插入同一视频时以先到者为准
        if let Some(existing) = state.video_by_youtube_id(&video.youtube_id) {
            return Ok(existing.id.clone());
        }
        let id = video.id.clone();
        state.videos.push(video);
        Ok(id)
    }

    pub async fn add_source(&self, new: NewSource) -> StudyResult<YouTubeSource> {
        if new.youtube_id.trim().is_empty() {
            return Err(StudyError::validation("YouTube id is required"));
        }
        require_name("Source", &new.title)?;
        let user_id = self.require_user()?;

        let source: YouTubeSource =
            gateway::insert_typed(self.gateway.as_ref(), Table::YouTubeSources, &user_id, &new)
                .await?;

        self.write_state().sources.push(source.clone());
        info!("[StudyStore] Added {:?} source {}", source.source_type, source.id);
        Ok(source)
    }

    /// 删除来源；其下视频保留，仅解除关联
    pub async fn delete_source(&self, id: &str) -> StudyResult<()> {
        if self.read_state().source(id).is_none() {
            return Err(StudyError::not_found("YouTubeSource", id));
        }
        let user_id = self.require_user()?;
        self.gateway.delete(Table::YouTubeSources, &user_id, id).await?;

        let mut state = self.write_state();
        let mut next = state.clone();
        next.sources.retain(|s| s.id != id);
        for video in next.videos.iter_mut() {
            if video.source_id.as_deref() == Some(id) {
                video.source_id = None;
            }
        }
        next.prune_selection();
        *state = next;
        info!("[StudyStore] Deleted source {}", id);
        Ok(())
    }

    /// 把播放列表中的视频逐个加入（按 youtube_id 去重），返回对应视频 id
    pub async fn import_playlist(
        &self,
        source_id: &str,
        playlist: &PlaylistResponse,
    ) -> StudyResult<Vec<String>> {
        if self.read_state().source(source_id).is_none() {
            return Err(StudyError::not_found("YouTubeSource", source_id));
        }

        let mut ids = Vec::with_capacity(playlist.videos.len());
        for item in &playlist.videos {
            let id = self
                .add_video(NewVideo {
                    youtube_id: item.video_id.clone(),
                    title: item.title.clone(),
                    thumbnail_url: item
                        .thumbnail
                        .clone()
                        .or_else(|| Some(thumbnail_url(&item.video_id))),
                    duration: item.duration,
                    channel_name: item.channel_name.clone(),
                    source_id: Some(source_id.to_string()),
                    playlist_position: Some(item.position),
                })
                .await?;
            ids.push(id);
        }
        info!(
            "[StudyStore] Imported {} videos into source {}",
            ids.len(),
            source_id
        );
        Ok(ids)
    }

    // ========================================================================
    // 选中状态
    // ========================================================================

    pub fn set_selected_exam(&self, id: Option<String>) {
        let mut state = self.write_state();
        let sel = &mut state.selection;
        sel.exam_id = id;
        sel.subject_id = None;
        sel.topic_id = None;
        sel.sub_topic_id = None;
    }

    pub fn set_selected_subject(&self, id: Option<String>) {
        let mut state = self.write_state();
        let sel = &mut state.selection;
        sel.subject_id = id;
        sel.topic_id = None;
        sel.sub_topic_id = None;
    }

    pub fn set_selected_topic(&self, id: Option<String>) {
        let mut state = self.write_state();
        let sel = &mut state.selection;
        sel.topic_id = id;
        sel.sub_topic_id = None;
    }

    pub fn set_selected_sub_topic(&self, id: Option<String>) {
        self.write_state().selection.sub_topic_id = id;
    }

    pub fn set_selected_source(&self, id: Option<String>) {
        self.write_state().selection.source_id = id;
    }

    pub fn set_selected_video_for_player(&self, video: Option<SelectedVideo>) {
        self.write_state().selection.video_for_player = video;
    }

    pub fn selection(&self) -> Selection {
        self.read_state().selection.clone()
    }

    // ========================================================================
    // 只读查询
    // ========================================================================

    pub fn is_loaded(&self) -> bool {
        self.read_state().loaded
    }

    /// 当前状态快照
    pub fn snapshot(&self) -> StudyState {
        self.read_state().clone()
    }

    pub fn exams(&self) -> Vec<Exam> {
        self.read_state().exams.clone()
    }

    pub fn sources(&self) -> Vec<YouTubeSource> {
        self.read_state().sources.clone()
    }

    pub fn videos(&self) -> Vec<Video> {
        self.read_state().videos.clone()
    }

    pub fn get_subjects_by_exam(&self, exam_id: &str) -> Vec<Subject> {
        self.read_state().subjects_by_exam(exam_id)
    }

    pub fn get_topics_by_subject(&self, subject_id: &str) -> Vec<Topic> {
        self.read_state().topics_by_subject(subject_id)
    }

    pub fn get_sub_topics_by_topic(&self, topic_id: &str) -> Vec<SubTopic> {
        self.read_state().sub_topics_by_topic(topic_id)
    }

    pub fn get_clips_by_sub_topic(&self, sub_topic_id: &str) -> Vec<Clip> {
        self.read_state().clips_by_sub_topic(sub_topic_id)
    }

    pub fn get_video_by_youtube_id(&self, youtube_id: &str) -> Option<Video> {
        self.read_state().video_by_youtube_id(youtube_id).cloned()
    }

    pub fn get_videos_by_source(&self, source_id: &str) -> Vec<Video> {
        self.read_state().videos_by_source(source_id)
    }

    pub fn recent_clips(&self, limit: usize) -> Vec<Clip> {
        self.read_state().recent_clips(limit)
    }

    /// 嵌套知识树
    pub fn tree(&self) -> TreeBuild {
        self.read_state().tree()
    }
}
