//! 知识树构建
//!
//! 把五张扁平表（exams / subjects / topics / sub_topics / clips）组装为
//! `exam → subject → topic → sub_topic → clip` 嵌套结构：
//! - 每层子节点按 `order` 升序稳定排序（同 order 保持输入顺序）
//! - 缺失的子集合默认为空
//! - 外键悬空的行（父节点不存在）不会出现在树中，但会记录到 `orphans` 并打印 warn

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use crate::models::{Clip, Exam, SubTopic, Subject, Topic};

/// 扁平行集合（网关读取结果）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRows {
    pub exams: Vec<Exam>,
    pub subjects: Vec<Subject>,
    pub topics: Vec<Topic>,
    pub sub_topics: Vec<SubTopic>,
    pub clips: Vec<Clip>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamNode {
    #[serde(flatten)]
    pub exam: Exam,
    pub subjects: Vec<SubjectNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectNode {
    #[serde(flatten)]
    pub subject: Subject,
    pub topics: Vec<TopicNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicNode {
    #[serde(flatten)]
    pub topic: Topic,
    pub sub_topics: Vec<SubTopicNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTopicNode {
    #[serde(flatten)]
    pub sub_topic: SubTopic,
    pub clips: Vec<Clip>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanKind {
    Subject,
    Topic,
    SubTopic,
    Clip,
}

/// 外键悬空的行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orphan {
    pub kind: OrphanKind,
    pub id: String,
    pub parent_id: String,
}

/// 构建结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeBuild {
    pub exams: Vec<ExamNode>,
    pub orphans: Vec<Orphan>,
}

/// 按父 id 分组并稳定排序
fn group_by_parent<'a, T>(
    rows: &'a [T],
    parent_of: impl Fn(&T) -> &str,
    order_of: impl Fn(&T) -> u32,
) -> HashMap<&'a str, Vec<&'a T>> {
    let mut map: HashMap<&str, Vec<&T>> = HashMap::new();
    for row in rows {
        map.entry(parent_of(row)).or_default().push(row);
    }
    for children in map.values_mut() {
        children.sort_by_key(|r| order_of(r));
    }
    map
}

fn collect_orphans<T>(
    rows: &[T],
    kind: OrphanKind,
    parents: &HashSet<&str>,
    id_of: impl Fn(&T) -> &str,
    parent_of: impl Fn(&T) -> &str,
) -> Vec<Orphan> {
    rows.iter()
        .filter(|r| !parents.contains(parent_of(r)))
        .map(|r| Orphan {
            kind,
            id: id_of(r).to_string(),
            parent_id: parent_of(r).to_string(),
        })
        .collect()
}

/// 从扁平行构建嵌套知识树
pub fn build_tree(rows: &FlatRows) -> TreeBuild {
    let subjects_by_exam = group_by_parent(&rows.subjects, |s| &s.exam_id, |s| s.order);
    let topics_by_subject = group_by_parent(&rows.topics, |t| &t.subject_id, |t| t.order);
    let sub_topics_by_topic = group_by_parent(&rows.sub_topics, |st| &st.topic_id, |st| st.order);
    let clips_by_sub_topic = group_by_parent(&rows.clips, |c| &c.sub_topic_id, |c| c.order);

    let exam_ids: HashSet<&str> = rows.exams.iter().map(|e| e.id.as_str()).collect();
    let subject_ids: HashSet<&str> = rows.subjects.iter().map(|s| s.id.as_str()).collect();
    let topic_ids: HashSet<&str> = rows.topics.iter().map(|t| t.id.as_str()).collect();
    let sub_topic_ids: HashSet<&str> = rows.sub_topics.iter().map(|st| st.id.as_str()).collect();

    let mut orphans = Vec::new();
    orphans.extend(collect_orphans(
        &rows.subjects,
        OrphanKind::Subject,
        &exam_ids,
        |s| &s.id,
        |s| &s.exam_id,
    ));
    orphans.extend(collect_orphans(
        &rows.topics,
        OrphanKind::Topic,
        &subject_ids,
        |t| &t.id,
        |t| &t.subject_id,
    ));
    orphans.extend(collect_orphans(
        &rows.sub_topics,
        OrphanKind::SubTopic,
        &topic_ids,
        |st| &st.id,
        |st| &st.topic_id,
    ));
    orphans.extend(collect_orphans(
        &rows.clips,
        OrphanKind::Clip,
        &sub_topic_ids,
        |c| &c.id,
        |c| &c.sub_topic_id,
    ));

    for orphan in &orphans {
        warn!(
            "[TreeBuilder] Dropping orphan {:?} {} (missing parent {})",
            orphan.kind, orphan.id, orphan.parent_id
        );
    }

    let sub_topic_node = |st: &SubTopic| SubTopicNode {
        sub_topic: st.clone(),
        clips: clips_by_sub_topic
            .get(st.id.as_str())
            .map(|cs| cs.iter().map(|c| (*c).clone()).collect())
            .unwrap_or_default(),
    };

    let topic_node = |t: &Topic| TopicNode {
        topic: t.clone(),
        sub_topics: sub_topics_by_topic
            .get(t.id.as_str())
            .map(|sts| sts.iter().map(|st| sub_topic_node(st)).collect())
            .unwrap_or_default(),
    };

    let subject_node = |s: &Subject| SubjectNode {
        subject: s.clone(),
        topics: topics_by_subject
            .get(s.id.as_str())
            .map(|ts| ts.iter().map(|t| topic_node(t)).collect())
            .unwrap_or_default(),
    };

    let exams: Vec<ExamNode> = rows
        .exams
        .iter()
        .map(|e| ExamNode {
            exam: e.clone(),
            subjects: subjects_by_exam
                .get(e.id.as_str())
                .map(|ss| ss.iter().map(|s| subject_node(s)).collect())
                .unwrap_or_default(),
        })
        .collect();

    debug!(
        "[TreeBuilder] Built {} exams ({} subjects, {} topics, {} sub-topics, {} clips, {} orphans)",
        exams.len(),
        rows.subjects.len(),
        rows.topics.len(),
        rows.sub_topics.len(),
        rows.clips.len(),
        orphans.len()
    );

    TreeBuild { exams, orphans }
}

/// 把嵌套树展开回扁平行（深度优先，父在前）
pub fn flatten_tree(exams: &[ExamNode]) -> FlatRows {
    let mut rows = FlatRows::default();
    for exam in exams {
        rows.exams.push(exam.exam.clone());
        for subject in &exam.subjects {
            rows.subjects.push(subject.subject.clone());
            for topic in &subject.topics {
                rows.topics.push(topic.topic.clone());
                for sub_topic in &topic.sub_topics {
                    rows.sub_topics.push(sub_topic.sub_topic.clone());
                    rows.clips.extend(sub_topic.clips.iter().cloned());
                }
            }
        }
    }
    rows
}
