//! StudyStore 集成测试（SQLite 网关 + 临时目录）

use assert_matches::assert_matches;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use study_clips_lib::ai::types::{PlaylistResponse, PlaylistVideo};
use study_clips_lib::models::{
    ClipPatch, ExamPatch, NewClip, NewExam, NewSource, NewSubTopic, NewSubject, NewTopic,
    NewVideo, SourceType, SubTopicPatch, SubjectPatch, TopicPatch,
};
use study_clips_lib::tree::flatten_tree;
use study_clips_lib::{SqliteGateway, StudyError, StudyGateway, StudyResult, StudyStore, Table};

const USER: &str = "user-1";

/// 包装真实网关：统计写入次数，并可模拟写入失败
struct FlakyGateway {
    inner: SqliteGateway,
    fail_writes: AtomicBool,
    inserts: Mutex<HashMap<Table, usize>>,
    updates: Mutex<usize>,
}

impl FlakyGateway {
    fn new(inner: SqliteGateway) -> Self {
        Self {
            inner,
            fail_writes: AtomicBool::new(false),
            inserts: Mutex::new(HashMap::new()),
            updates: Mutex::new(0),
        }
    }

    fn inserts(&self, table: Table) -> usize {
        self.inserts.lock().unwrap().get(&table).copied().unwrap_or(0)
    }

    fn updates(&self) -> usize {
        *self.updates.lock().unwrap()
    }

    fn check(&self) -> StudyResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StudyError::Network("connection reset".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl StudyGateway for FlakyGateway {
    async fn select(&self, table: Table, user_id: &str) -> StudyResult<Vec<Value>> {
        self.inner.select(table, user_id).await
    }

    async fn insert(&self, table: Table, user_id: &str, row: Value) -> StudyResult<Value> {
        self.check()?;
        *self.inserts.lock().unwrap().entry(table).or_default() += 1;
        self.inner.insert(table, user_id, row).await
    }

    async fn update(&self, table: Table, user_id: &str, id: &str, patch: Value) -> StudyResult<Value> {
        self.check()?;
        *self.updates.lock().unwrap() += 1;
        self.inner.update(table, user_id, id, patch).await
    }

    async fn delete(&self, table: Table, user_id: &str, id: &str) -> StudyResult<()> {
        self.check()?;
        self.inner.delete(table, user_id, id).await
    }
}

struct Fixture {
    _dir: TempDir,
    db_path: std::path::PathBuf,
    gateway: Arc<FlakyGateway>,
    store: StudyStore,
}

async fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("study.db");
    let gateway = Arc::new(FlakyGateway::new(SqliteGateway::open(&db_path).unwrap()));
    let store = StudyStore::new(gateway.clone());
    store.init(USER);
    store.fetch_all_data().await.unwrap();
    Fixture {
        _dir: dir,
        db_path,
        gateway,
        store,
    }
}

/// 在同一数据库上新建一个 store 并重新加载
async fn reload(fx: &Fixture) -> StudyStore {
    let store = StudyStore::new(Arc::new(SqliteGateway::open(&fx.db_path).unwrap()));
    store.init(USER);
    store.fetch_all_data().await.unwrap();
    store
}

/// exam → subject → topic → sub_topic，返回 sub_topic id
async fn seed_chain(store: &StudyStore) -> (String, String, String, String) {
    let exam = store
        .add_exam(NewExam {
            name: "UPSC".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    let subject = store
        .add_subject(NewSubject {
            exam_id: exam.id.clone(),
            name: "History".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    let topic = store
        .add_topic(NewTopic {
            subject_id: subject.id.clone(),
            name: "Mughals".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    let sub_topic = store
        .add_sub_topic(NewSubTopic {
            topic_id: topic.id.clone(),
            name: "Akbar".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    (exam.id, subject.id, topic.id, sub_topic.id)
}

fn clip(sub_topic_id: &str, start: u32, end: u32) -> NewClip {
    NewClip {
        sub_topic_id: sub_topic_id.to_string(),
        video_id: "dQw4w9WgXcQ".into(),
        start_time: start,
        end_time: end,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_fetch_requires_authenticated_user() {
    let store = StudyStore::new(Arc::new(SqliteGateway::open_in_memory().unwrap()));
    assert_matches!(store.fetch_all_data().await, Err(StudyError::NotAuthenticated));
    assert!(!store.is_loaded());
}

#[tokio::test]
async fn test_sequential_subjects_get_increasing_order() {
    let fx = fixture().await;
    let exam = fx
        .store
        .add_exam(NewExam {
            name: "JEE".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    for name in ["Physics", "Chemistry", "Maths", "Biology"] {
        fx.store
            .add_subject(NewSubject {
                exam_id: exam.id.clone(),
                name: name.into(),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    let orders: Vec<u32> = fx
        .store
        .get_subjects_by_exam(&exam.id)
        .iter()
        .map(|s| s.order)
        .collect();
    assert_eq!(orders, vec![0, 1, 2, 3]);

    let reloaded = reload(&fx).await;
    let names: Vec<String> = reloaded
        .get_subjects_by_exam(&exam.id)
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["Physics", "Chemistry", "Maths", "Biology"]);
}

#[tokio::test]
async fn test_add_subject_to_unknown_exam_is_rejected() {
    let fx = fixture().await;
    let result = fx
        .store
        .add_subject(NewSubject {
            exam_id: "missing".into(),
            name: "Physics".into(),
            ..Default::default()
        })
        .await;
    assert_matches!(result, Err(StudyError::NotFound { .. }));
    assert_eq!(fx.gateway.inserts(Table::Subjects), 0);
}

#[tokio::test]
async fn test_blank_names_never_reach_gateway() {
    let fx = fixture().await;
    let result = fx
        .store
        .add_exam(NewExam {
            name: "   ".into(),
            ..Default::default()
        })
        .await;
    assert_matches!(result, Err(StudyError::Validation(_)));
    assert_eq!(fx.gateway.inserts(Table::Exams), 0);
}

#[tokio::test]
async fn test_add_video_dedups_by_youtube_id() {
    let fx = fixture().await;
    let new = NewVideo {
        youtube_id: "abcdefghijk".into(),
        title: "Lecture 1".into(),
        duration: 600,
        ..Default::default()
    };

    let first = fx.store.add_video(new.clone()).await.unwrap();
    let second = fx.store.add_video(new).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(fx.gateway.inserts(Table::Videos), 1);
    assert_eq!(fx.store.videos().len(), 1);

    let reloaded = reload(&fx).await;
    assert_eq!(reloaded.videos().len(), 1);
    assert_eq!(
        reloaded.get_video_by_youtube_id("abcdefghijk").map(|v| v.id),
        Some(first)
    );
}

#[tokio::test]
async fn test_delete_sub_topic_removes_clips_and_clears_selection() {
    let fx = fixture().await;
    let (exam_id, subject_id, topic_id, sub_topic_id) = seed_chain(&fx.store).await;
    fx.store.add_clip(clip(&sub_topic_id, 0, 30)).await.unwrap();
    fx.store.add_clip(clip(&sub_topic_id, 30, 90)).await.unwrap();

    fx.store.set_selected_exam(Some(exam_id.clone()));
    fx.store.set_selected_subject(Some(subject_id));
    fx.store.set_selected_topic(Some(topic_id.clone()));
    fx.store.set_selected_sub_topic(Some(sub_topic_id.clone()));

    fx.store.delete_sub_topic(&sub_topic_id).await.unwrap();

    assert!(fx.store.get_clips_by_sub_topic(&sub_topic_id).is_empty());
    assert!(fx.store.snapshot().clips.is_empty());
    let selection = fx.store.selection();
    assert_eq!(selection.sub_topic_id, None);
    assert_eq!(selection.topic_id, Some(topic_id));
    assert_eq!(selection.exam_id, Some(exam_id));

    let reloaded = reload(&fx).await;
    assert!(reloaded.snapshot().clips.is_empty());
    assert!(reloaded.snapshot().sub_topics.is_empty());
}

#[tokio::test]
async fn test_delete_exam_cascades_whole_branch() {
    let fx = fixture().await;
    let (exam_id, _, _, sub_topic_id) = seed_chain(&fx.store).await;
    fx.store.add_clip(clip(&sub_topic_id, 5, 10)).await.unwrap();

    fx.store.delete_exam(&exam_id).await.unwrap();
    let state = fx.store.snapshot();
    assert!(state.exams.is_empty());
    assert!(state.subjects.is_empty());
    assert!(state.topics.is_empty());
    assert!(state.sub_topics.is_empty());
    assert!(state.clips.is_empty());

    let reloaded = reload(&fx).await;
    assert_eq!(reloaded.snapshot().clips.len(), 0);
}

#[tokio::test]
async fn test_gateway_failure_leaves_state_untouched() {
    let fx = fixture().await;
    let (exam_id, subject_id, _, _) = seed_chain(&fx.store).await;
    let before = fx.store.snapshot();

    fx.gateway.fail_writes.store(true, Ordering::SeqCst);

    let added = fx
        .store
        .add_subject(NewSubject {
            exam_id: exam_id.clone(),
            name: "Geography".into(),
            ..Default::default()
        })
        .await;
    assert_matches!(added, Err(StudyError::Network(_)));

    let updated = fx
        .store
        .update_subject(
            &subject_id,
            SubjectPatch {
                name: Some("Modern History".into()),
                ..Default::default()
            },
        )
        .await;
    assert!(updated.is_err());

    assert!(fx.store.delete_exam(&exam_id).await.is_err());
    assert_eq!(fx.store.snapshot(), before);
}

#[tokio::test]
async fn test_clip_time_validation() {
    let fx = fixture().await;
    let (_, _, _, sub_topic_id) = seed_chain(&fx.store).await;

    assert_matches!(
        fx.store.add_clip(clip(&sub_topic_id, 40, 40)).await,
        Err(StudyError::Validation(_))
    );
    assert_eq!(fx.gateway.inserts(Table::Clips), 0);

    let saved = fx.store.add_clip(clip(&sub_topic_id, 10, 40)).await.unwrap();
    let before = fx.gateway.updates();
    let bad_patch = ClipPatch {
        start_time: Some(50),
        ..Default::default()
    };
    assert_matches!(
        fx.store.update_clip(&saved.id, bad_patch).await,
        Err(StudyError::Validation(_))
    );
    assert_eq!(fx.gateway.updates(), before);

    let moved = fx
        .store
        .update_clip(
            &saved.id,
            ClipPatch {
                end_time: Some(75),
                label: Some(Some("intro".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.end_time, 75);
    assert_eq!(moved.label.as_deref(), Some("intro"));
    assert!(moved.updated_at >= saved.updated_at);
}

#[tokio::test]
async fn test_reorder_clips() {
    let fx = fixture().await;
    let (_, _, _, sub_topic_id) = seed_chain(&fx.store).await;
    let a = fx.store.add_clip(clip(&sub_topic_id, 0, 10)).await.unwrap();
    let b = fx.store.add_clip(clip(&sub_topic_id, 10, 20)).await.unwrap();
    let c = fx.store.add_clip(clip(&sub_topic_id, 20, 30)).await.unwrap();

    fx.store
        .reorder_clips(&sub_topic_id, &[c.id.clone(), a.id.clone(), b.id.clone()])
        .await
        .unwrap();

    let ids: Vec<String> = fx
        .store
        .get_clips_by_sub_topic(&sub_topic_id)
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec![c.id.clone(), a.id.clone(), b.id.clone()]);

    let reloaded = reload(&fx).await;
    let ids: Vec<String> = reloaded
        .get_clips_by_sub_topic(&sub_topic_id)
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec![c.id, a.id, b.id]);
}

#[tokio::test]
async fn test_tree_flattens_back_to_state_rows() {
    let fx = fixture().await;
    let (exam_id, _, topic_id, sub_topic_id) = seed_chain(&fx.store).await;
    fx.store
        .add_sub_topic(NewSubTopic {
            topic_id,
            name: "Aurangzeb".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    fx.store.add_clip(clip(&sub_topic_id, 0, 5)).await.unwrap();

    let tree = fx.store.tree();
    assert!(tree.orphans.is_empty());
    assert_eq!(tree.exams.len(), 1);
    assert_eq!(tree.exams[0].exam.id, exam_id);

    let mut flat = flatten_tree(&tree.exams);
    let mut state = fx.store.snapshot().flat_rows();
    for rows in [&mut flat, &mut state] {
        rows.sub_topics.sort_by(|a, b| a.id.cmp(&b.id));
        rows.clips.sort_by(|a, b| a.id.cmp(&b.id));
    }
    assert_eq!(flat, state);
}

#[tokio::test]
async fn test_sources_and_playlist_import() {
    let fx = fixture().await;
    let source = fx
        .store
        .add_source(NewSource {
            source_type: SourceType::Playlist,
            youtube_id: "PL1234567890".into(),
            title: "Polity".into(),
            thumbnail_url: None,
            video_count: Some(2),
        })
        .await
        .unwrap();

    let existing = fx
        .store
        .add_video(NewVideo {
            youtube_id: "vid00000001".into(),
            title: "Already saved".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    let playlist = PlaylistResponse {
        videos: vec![
            PlaylistVideo {
                video_id: "vid00000001".into(),
                title: "Lecture 1".into(),
                thumbnail: None,
                duration: 1200,
                position: 0,
                channel_name: None,
            },
            PlaylistVideo {
                video_id: "vid00000002".into(),
                title: "Lecture 2".into(),
                thumbnail: None,
                duration: 900,
                position: 1,
                channel_name: Some("Polity Guru".into()),
            },
        ],
        playlist_title: Some("Polity".into()),
        total_results: 2,
    };
    let ids = fx.store.import_playlist(&source.id, &playlist).await.unwrap();
    assert_eq!(ids.len(), 2);
    assert_eq!(ids[0], existing);
    assert_eq!(fx.gateway.inserts(Table::Videos), 2);
    assert_eq!(fx.store.get_videos_by_source(&source.id).len(), 1);
    // 播放列表没有缩略图时使用默认缩略图
    assert_eq!(
        fx.store
            .get_video_by_youtube_id("vid00000002")
            .and_then(|v| v.thumbnail_url)
            .as_deref(),
        Some("https://img.youtube.com/vi/vid00000002/mqdefault.jpg")
    );

    fx.store.set_selected_source(Some(source.id.clone()));
    fx.store.delete_source(&source.id).await.unwrap();
    assert!(fx.store.sources().is_empty());
    assert_eq!(fx.store.videos().len(), 2);
    assert!(fx.store.videos().iter().all(|v| v.source_id.is_none()));
    assert_eq!(fx.store.selection().source_id, None);

    let reloaded = reload(&fx).await;
    assert!(reloaded.videos().iter().all(|v| v.source_id.is_none()));
}

#[tokio::test]
async fn test_selection_clears_descendants_and_teardown_resets() {
    let fx = fixture().await;
    let (exam_id, subject_id, topic_id, sub_topic_id) = seed_chain(&fx.store).await;
    fx.store.set_selected_exam(Some(exam_id.clone()));
    fx.store.set_selected_subject(Some(subject_id));
    fx.store.set_selected_topic(Some(topic_id));
    fx.store.set_selected_sub_topic(Some(sub_topic_id));

    fx.store.set_selected_exam(Some(exam_id.clone()));
    let selection = fx.store.selection();
    assert_eq!(selection.exam_id, Some(exam_id));
    assert_eq!(selection.subject_id, None);
    assert_eq!(selection.topic_id, None);
    assert_eq!(selection.sub_topic_id, None);

    fx.store.teardown();
    assert_eq!(fx.store.user_id(), None);
    assert!(!fx.store.is_loaded());
    assert!(fx.store.exams().is_empty());
}

#[tokio::test]
async fn test_rows_are_scoped_per_user() {
    let fx = fixture().await;
    seed_chain(&fx.store).await;

    let other = StudyStore::new(Arc::new(SqliteGateway::open(&fx.db_path).unwrap()));
    other.init("user-2");
    let summary = other.fetch_all_data().await.unwrap();
    assert_eq!(summary.exams, 0);
    assert_eq!(summary.sub_topics, 0);
}

#[tokio::test]
async fn test_partial_updates_merge_and_can_clear_fields() {
    let fx = fixture().await;
    let (exam_id, _, topic_id, sub_topic_id) = seed_chain(&fx.store).await;

    fx.store
        .update_exam(
            &exam_id,
            ExamPatch {
                description: Some(Some("Civil services".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let exam = fx
        .store
        .update_exam(
            &exam_id,
            ExamPatch {
                icon: Some(Some("book".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(exam.name, "UPSC");
    assert_eq!(exam.description.as_deref(), Some("Civil services"));
    assert_eq!(exam.icon.as_deref(), Some("book"));

    let exam = fx
        .store
        .update_exam(
            &exam_id,
            ExamPatch {
                description: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(exam.description, None);
    assert_eq!(exam.icon.as_deref(), Some("book"));

    fx.store
        .update_topic(
            &topic_id,
            TopicPatch {
                name: Some("Mughal Empire".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let topic = fx
        .store
        .update_topic(
            &topic_id,
            TopicPatch {
                description: Some(Some("1526-1857".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(topic.name, "Mughal Empire");
    assert_eq!(topic.description.as_deref(), Some("1526-1857"));

    fx.store
        .update_sub_topic(
            &sub_topic_id,
            SubTopicPatch {
                description: Some(Some("Din-i-Ilahi".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let sub_topic = fx
        .store
        .update_sub_topic(
            &sub_topic_id,
            SubTopicPatch {
                name: Some("Akbar the Great".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(sub_topic.name, "Akbar the Great");
    assert_eq!(sub_topic.description.as_deref(), Some("Din-i-Ilahi"));

    let reloaded = reload(&fx).await;
    let exam = reloaded.exams().into_iter().find(|e| e.id == exam_id).unwrap();
    assert_eq!(exam.description, None);
    assert_eq!(exam.icon.as_deref(), Some("book"));
}

#[tokio::test]
async fn test_delete_topic_then_subject_cascades_and_prunes_selection() {
    let fx = fixture().await;
    let (exam_id, subject_id, topic_id, sub_topic_id) = seed_chain(&fx.store).await;
    fx.store.add_clip(clip(&sub_topic_id, 0, 60)).await.unwrap();

    let sibling = fx
        .store
        .add_topic(NewTopic {
            subject_id: subject_id.clone(),
            name: "Marathas".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    let sibling_sub = fx
        .store
        .add_sub_topic(NewSubTopic {
            topic_id: sibling.id.clone(),
            name: "Shivaji".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    fx.store.add_clip(clip(&sibling_sub.id, 10, 20)).await.unwrap();

    fx.store.set_selected_exam(Some(exam_id.clone()));
    fx.store.set_selected_subject(Some(subject_id.clone()));
    fx.store.set_selected_topic(Some(topic_id.clone()));
    fx.store.set_selected_sub_topic(Some(sub_topic_id.clone()));

    fx.store.delete_topic(&topic_id).await.unwrap();
    let state = fx.store.snapshot();
    assert_eq!(state.topics.len(), 1);
    assert_eq!(state.sub_topics.len(), 1);
    assert_eq!(state.clips.len(), 1);
    assert!(fx.store.get_clips_by_sub_topic(&sub_topic_id).is_empty());
    let selection = fx.store.selection();
    assert_eq!(selection.topic_id, None);
    assert_eq!(selection.sub_topic_id, None);
    assert_eq!(selection.subject_id, Some(subject_id.clone()));
    assert_eq!(selection.exam_id, Some(exam_id.clone()));

    let reloaded = reload(&fx).await;
    assert_eq!(reloaded.snapshot().topics.len(), 1);
    assert_eq!(reloaded.snapshot().sub_topics.len(), 1);
    assert_eq!(reloaded.snapshot().clips.len(), 1);

    fx.store.delete_subject(&subject_id).await.unwrap();
    let state = fx.store.snapshot();
    assert_eq!(state.exams.len(), 1);
    assert!(state.subjects.is_empty());
    assert!(state.topics.is_empty());
    assert!(state.sub_topics.is_empty());
    assert!(state.clips.is_empty());
    let selection = fx.store.selection();
    assert_eq!(selection.subject_id, None);
    assert_eq!(selection.exam_id, Some(exam_id));

    let reloaded = reload(&fx).await;
    let state = reloaded.snapshot();
    assert!(state.subjects.is_empty());
    assert!(state.topics.is_empty());
    assert!(state.sub_topics.is_empty());
    assert!(state.clips.is_empty());
}

#[tokio::test]
async fn test_delete_clip() {
    let fx = fixture().await;
    let (_, _, _, sub_topic_id) = seed_chain(&fx.store).await;
    let first = fx.store.add_clip(clip(&sub_topic_id, 0, 30)).await.unwrap();
    let second = fx.store.add_clip(clip(&sub_topic_id, 30, 60)).await.unwrap();

    fx.store.delete_clip(&first.id).await.unwrap();
    let remaining = fx.store.get_clips_by_sub_topic(&sub_topic_id);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, second.id);

    assert_matches!(
        fx.store.delete_clip(&first.id).await,
        Err(StudyError::NotFound { .. })
    );

    let reloaded = reload(&fx).await;
    let ids: Vec<String> = reloaded
        .get_clips_by_sub_topic(&sub_topic_id)
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec![second.id]);
}

#[tokio::test]
async fn test_sibling_getters_sort_by_order() {
    let fx = fixture().await;
    let (_, subject_id, topic_id, _) = seed_chain(&fx.store).await;

    // 直接写入乱序的行，加载后由 getter 排序
    for (name, order) in [("Sikhs", 3), ("Delhi Sultanate", 1), ("Vijayanagara", 2)] {
        fx.gateway
            .insert(
                Table::Topics,
                USER,
                json!({ "name": name, "order": order, "subject_id": subject_id }),
            )
            .await
            .unwrap();
    }
    for (name, order) in [("Jahangir", 2), ("Babur", 1)] {
        fx.gateway
            .insert(
                Table::SubTopics,
                USER,
                json!({ "name": name, "order": order, "topic_id": topic_id }),
            )
            .await
            .unwrap();
    }

    let reloaded = reload(&fx).await;
    let topics: Vec<String> = reloaded
        .get_topics_by_subject(&subject_id)
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(
        topics,
        vec!["Mughals", "Delhi Sultanate", "Vijayanagara", "Sikhs"]
    );

    let sub_topics: Vec<String> = reloaded
        .get_sub_topics_by_topic(&topic_id)
        .into_iter()
        .map(|st| st.name)
        .collect();
    assert_eq!(sub_topics, vec!["Akbar", "Babur", "Jahangir"]);
}
