//! 规范化的内存状态与派生视图
//!
//! 所有实体都是扁平集合，父子关系只靠外键字段；嵌套树与"某父节点的子节点"
//! 都是纯函数视图，不单独维护第二份数据。

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::{Clip, Exam, SelectedVideo, SubTopic, Subject, Topic, Video, YouTubeSource};
use crate::tree::{build_tree, FlatRows, TreeBuild};

/// 选中状态
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub exam_id: Option<String>,
    pub subject_id: Option<String>,
    pub topic_id: Option<String>,
    pub sub_topic_id: Option<String>,
    pub source_id: Option<String>,
    pub video_for_player: Option<SelectedVideo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyState {
    pub exams: Vec<Exam>,
    pub subjects: Vec<Subject>,
    pub topics: Vec<Topic>,
    pub sub_topics: Vec<SubTopic>,
    pub clips: Vec<Clip>,
    pub videos: Vec<Video>,
    pub sources: Vec<YouTubeSource>,
    pub selection: Selection,
    /// 是否完成过一次全量加载
    pub loaded: bool,
}

/// 稳定排序（同 order 保持插入顺序）
fn sorted_by_order<T: Clone>(items: impl Iterator<Item = T>, order: impl Fn(&T) -> u32) -> Vec<T> {
    let mut v: Vec<T> = items.collect();
    v.sort_by_key(|item| order(item));
    v
}

impl StudyState {
    pub fn exam(&self, id: &str) -> Option<&Exam> {
        self.exams.iter().find(|e| e.id == id)
    }

    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    pub fn topic(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }

    pub fn sub_topic(&self, id: &str) -> Option<&SubTopic> {
        self.sub_topics.iter().find(|st| st.id == id)
    }

    pub fn clip(&self, id: &str) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == id)
    }

    pub fn source(&self, id: &str) -> Option<&YouTubeSource> {
        self.sources.iter().find(|s| s.id == id)
    }

    pub fn video_by_youtube_id(&self, youtube_id: &str) -> Option<&Video> {
        self.videos.iter().find(|v| v.youtube_id == youtube_id)
    }

    pub fn subjects_by_exam(&self, exam_id: &str) -> Vec<Subject> {
        sorted_by_order(
            self.subjects.iter().filter(|s| s.exam_id == exam_id).cloned(),
            |s| s.order,
        )
    }

    pub fn topics_by_subject(&self, subject_id: &str) -> Vec<Topic> {
        sorted_by_order(
            self.topics.iter().filter(|t| t.subject_id == subject_id).cloned(),
            |t| t.order,
        )
    }

    pub fn sub_topics_by_topic(&self, topic_id: &str) -> Vec<SubTopic> {
        sorted_by_order(
            self.sub_topics.iter().filter(|st| st.topic_id == topic_id).cloned(),
            |st| st.order,
        )
    }

    pub fn clips_by_sub_topic(&self, sub_topic_id: &str) -> Vec<Clip> {
        sorted_by_order(
            self.clips.iter().filter(|c| c.sub_topic_id == sub_topic_id).cloned(),
            |c| c.order,
        )
    }

    pub fn videos_by_source(&self, source_id: &str) -> Vec<Video> {
        let mut videos: Vec<Video> = self
            .videos
            .iter()
            .filter(|v| v.source_id.as_deref() == Some(source_id))
            .cloned()
            .collect();
        videos.sort_by_key(|v| v.playlist_position.unwrap_or(u32::MAX));
        videos
    }

    pub fn subject_count(&self, exam_id: &str) -> usize {
        self.subjects.iter().filter(|s| s.exam_id == exam_id).count()
    }

    pub fn topic_count(&self, subject_id: &str) -> usize {
        self.topics.iter().filter(|t| t.subject_id == subject_id).count()
    }

    pub fn sub_topic_count(&self, topic_id: &str) -> usize {
        self.sub_topics.iter().filter(|st| st.topic_id == topic_id).count()
    }

    pub fn clip_count(&self, sub_topic_id: &str) -> usize {
        self.clips.iter().filter(|c| c.sub_topic_id == sub_topic_id).count()
    }

    /// 最近添加的片段（按创建时间倒序）
    pub fn recent_clips(&self, limit: usize) -> Vec<Clip> {
        let mut clips = self.clips.clone();
        clips.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        clips.truncate(limit);
        clips
    }

    pub fn flat_rows(&self) -> FlatRows {
        FlatRows {
            exams: self.exams.clone(),
            subjects: self.subjects.clone(),
            topics: self.topics.clone(),
            sub_topics: self.sub_topics.clone(),
            clips: self.clips.clone(),
        }
    }

    /// 嵌套知识树视图
    pub fn tree(&self) -> TreeBuild {
        build_tree(&self.flat_rows())
    }

    /// 删除考试及其全部子孙
    pub(crate) fn remove_exam_cascade(&mut self, exam_id: &str) {
        self.exams.retain(|e| e.id != exam_id);
        let subject_ids: Vec<String> = self
            .subjects
            .iter()
            .filter(|s| s.exam_id == exam_id)
            .map(|s| s.id.clone())
            .collect();
        for id in &subject_ids {
            self.remove_subject_cascade(id);
        }
    }

    pub(crate) fn remove_subject_cascade(&mut self, subject_id: &str) {
        self.subjects.retain(|s| s.id != subject_id);
        let topic_ids: Vec<String> = self
            .topics
            .iter()
            .filter(|t| t.subject_id == subject_id)
            .map(|t| t.id.clone())
            .collect();
        for id in &topic_ids {
            self.remove_topic_cascade(id);
        }
    }

    pub(crate) fn remove_topic_cascade(&mut self, topic_id: &str) {
        self.topics.retain(|t| t.id != topic_id);
        let sub_topic_ids: HashSet<String> = self
            .sub_topics
            .iter()
            .filter(|st| st.topic_id == topic_id)
            .map(|st| st.id.clone())
            .collect();
        self.sub_topics.retain(|st| !sub_topic_ids.contains(&st.id));
        self.clips.retain(|c| !sub_topic_ids.contains(&c.sub_topic_id));
    }

    pub(crate) fn remove_sub_topic_cascade(&mut self, sub_topic_id: &str) {
        self.sub_topics.retain(|st| st.id != sub_topic_id);
        self.clips.retain(|c| c.sub_topic_id != sub_topic_id);
    }

    /// 清除指向已不存在实体的选中指针
    pub(crate) fn prune_selection(&mut self) {
        let sel = &mut self.selection;
        if sel.exam_id.as_deref().is_some_and(|id| !self.exams.iter().any(|e| e.id == id)) {
            sel.exam_id = None;
        }
        if sel.subject_id.as_deref().is_some_and(|id| !self.subjects.iter().any(|s| s.id == id)) {
            sel.subject_id = None;
        }
        if sel.topic_id.as_deref().is_some_and(|id| !self.topics.iter().any(|t| t.id == id)) {
            sel.topic_id = None;
        }
        if sel
            .sub_topic_id
            .as_deref()
            .is_some_and(|id| !self.sub_topics.iter().any(|st| st.id == id))
        {
            sel.sub_topic_id = None;
        }
        if sel.source_id.as_deref().is_some_and(|id| !self.sources.iter().any(|s| s.id == id)) {
            sel.source_id = None;
        }
    }
}
