//! SQLite 网关实现
//!
//! - r2d2 连接池，每个连接初始化时开启 `foreign_keys`，文件库使用 WAL + busy_timeout
//! - 七张表都带 `user_id` 列，父子外键 `ON DELETE CASCADE`
//! - 行与 JSON 的互转按列白名单 + 列类型进行，未知列直接拒绝
//! - 服务端分配 UUID 与 RFC 3339 时间戳；阻塞操作在 `spawn_blocking` 中执行

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use super::{StudyGateway, Table};
use crate::error::{StudyError, StudyResult};

pub type GatewayPool = Pool<SqliteConnectionManager>;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS exams (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    name TEXT NOT NULL,
    description TEXT,
    icon TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS subjects (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    name TEXT NOT NULL,
    description TEXT,
    color TEXT,
    "order" INTEGER NOT NULL DEFAULT 0,
    exam_id TEXT NOT NULL REFERENCES exams(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS topics (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    name TEXT NOT NULL,
    description TEXT,
    "order" INTEGER NOT NULL DEFAULT 0,
    subject_id TEXT NOT NULL REFERENCES subjects(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS sub_topics (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    name TEXT NOT NULL,
    description TEXT,
    "order" INTEGER NOT NULL DEFAULT 0,
    topic_id TEXT NOT NULL REFERENCES topics(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS clips (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    video_id TEXT NOT NULL,
    start_time INTEGER NOT NULL,
    end_time INTEGER NOT NULL,
    label TEXT,
    notes TEXT,
    is_primary INTEGER NOT NULL DEFAULT 0,
    "order" INTEGER NOT NULL DEFAULT 0,
    sub_topic_id TEXT NOT NULL REFERENCES sub_topics(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    CHECK (start_time >= 0 AND start_time < end_time)
);

CREATE TABLE IF NOT EXISTS youtube_sources (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    type TEXT NOT NULL CHECK (type IN ('playlist', 'channel')),
    youtube_id TEXT NOT NULL,
    title TEXT NOT NULL,
    thumbnail_url TEXT,
    video_count INTEGER,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS videos (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    youtube_id TEXT NOT NULL,
    title TEXT NOT NULL,
    thumbnail_url TEXT,
    duration INTEGER NOT NULL DEFAULT 0,
    channel_name TEXT,
    source_id TEXT REFERENCES youtube_sources(id) ON DELETE SET NULL,
    playlist_position INTEGER,
    UNIQUE (user_id, youtube_id)
);

CREATE INDEX IF NOT EXISTS idx_exams_user ON exams(user_id);
CREATE INDEX IF NOT EXISTS idx_subjects_exam ON subjects(exam_id);
CREATE INDEX IF NOT EXISTS idx_topics_subject ON topics(subject_id);
CREATE INDEX IF NOT EXISTS idx_sub_topics_topic ON sub_topics(topic_id);
CREATE INDEX IF NOT EXISTS idx_clips_sub_topic ON clips(sub_topic_id);
CREATE INDEX IF NOT EXISTS idx_videos_user ON videos(user_id);
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Text,
    Integer,
    Bool,
    Timestamp,
}

type Columns = &'static [(&'static str, ColumnKind)];

const EXAM_COLUMNS: Columns = &[
    ("id", ColumnKind::Text),
    ("name", ColumnKind::Text),
    ("description", ColumnKind::Text),
    ("icon", ColumnKind::Text),
    ("created_at", ColumnKind::Timestamp),
];

const SUBJECT_COLUMNS: Columns = &[
    ("id", ColumnKind::Text),
    ("name", ColumnKind::Text),
    ("description", ColumnKind::Text),
    ("color", ColumnKind::Text),
    ("order", ColumnKind::Integer),
    ("exam_id", ColumnKind::Text),
    ("created_at", ColumnKind::Timestamp),
];

const TOPIC_COLUMNS: Columns = &[
    ("id", ColumnKind::Text),
    ("name", ColumnKind::Text),
    ("description", ColumnKind::Text),
    ("order", ColumnKind::Integer),
    ("subject_id", ColumnKind::Text),
];

const SUB_TOPIC_COLUMNS: Columns = &[
    ("id", ColumnKind::Text),
    ("name", ColumnKind::Text),
    ("description", ColumnKind::Text),
    ("order", ColumnKind::Integer),
    ("topic_id", ColumnKind::Text),
];

const CLIP_COLUMNS: Columns = &[
    ("id", ColumnKind::Text),
    ("video_id", ColumnKind::Text),
    ("start_time", ColumnKind::Integer),
    ("end_time", ColumnKind::Integer),
    ("label", ColumnKind::Text),
    ("notes", ColumnKind::Text),
    ("is_primary", ColumnKind::Bool),
    ("order", ColumnKind::Integer),
    ("sub_topic_id", ColumnKind::Text),
    ("created_at", ColumnKind::Timestamp),
    ("updated_at", ColumnKind::Timestamp),
];

const VIDEO_COLUMNS: Columns = &[
    ("id", ColumnKind::Text),
    ("youtube_id", ColumnKind::Text),
    ("title", ColumnKind::Text),
    ("thumbnail_url", ColumnKind::Text),
    ("duration", ColumnKind::Integer),
    ("channel_name", ColumnKind::Text),
    ("source_id", ColumnKind::Text),
    ("playlist_position", ColumnKind::Integer),
];

const SOURCE_COLUMNS: Columns = &[
    ("id", ColumnKind::Text),
    ("type", ColumnKind::Text),
    ("youtube_id", ColumnKind::Text),
    ("title", ColumnKind::Text),
    ("thumbnail_url", ColumnKind::Text),
    ("video_count", ColumnKind::Integer),
    ("created_at", ColumnKind::Timestamp),
];

fn columns(table: Table) -> Columns {
    match table {
        Table::Exams => EXAM_COLUMNS,
        Table::Subjects => SUBJECT_COLUMNS,
        Table::Topics => TOPIC_COLUMNS,
        Table::SubTopics => SUB_TOPIC_COLUMNS,
        Table::Clips => CLIP_COLUMNS,
        Table::Videos => VIDEO_COLUMNS,
        Table::YouTubeSources => SOURCE_COLUMNS,
    }
}

fn has_column(table: Table, name: &str) -> bool {
    columns(table).iter().any(|(c, _)| *c == name)
}

/// 服务端维护的列，调用方传入时忽略
fn is_server_managed(name: &str) -> bool {
    matches!(name, "id" | "user_id" | "created_at" | "updated_at")
}

fn quote(ident: &str) -> String {
    format!("\"{}\"", ident)
}

fn select_list(cols: Columns) -> String {
    cols.iter()
        .map(|(c, _)| quote(c))
        .collect::<Vec<_>>()
        .join(", ")
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn json_to_sql(table: Table, column: &str, kind: ColumnKind, value: &Value) -> StudyResult<SqlValue> {
    let invalid = || {
        StudyError::validation(format!(
            "Invalid value for {}.{}: {}",
            table.name(),
            column,
            value
        ))
    };

    if value.is_null() {
        return Ok(SqlValue::Null);
    }
    match kind {
        ColumnKind::Text => value
            .as_str()
            .map(|s| SqlValue::Text(s.to_string()))
            .ok_or_else(invalid),
        ColumnKind::Integer => value.as_i64().map(SqlValue::Integer).ok_or_else(invalid),
        ColumnKind::Bool => match value {
            Value::Bool(b) => Ok(SqlValue::Integer(i64::from(*b))),
            other => other.as_i64().map(|n| SqlValue::Integer(i64::from(n != 0))).ok_or_else(invalid),
        },
        ColumnKind::Timestamp => {
            let raw = value.as_str().ok_or_else(invalid)?;
            let parsed = DateTime::parse_from_rfc3339(raw).map_err(|_| invalid())?;
            Ok(SqlValue::Text(
                parsed
                    .with_timezone(&Utc)
                    .to_rfc3339_opts(SecondsFormat::Micros, true),
            ))
        }
    }
}

fn row_to_json(row: &Row<'_>, cols: Columns) -> rusqlite::Result<Value> {
    let mut map = Map::with_capacity(cols.len());
    for (idx, (name, kind)) in cols.iter().enumerate() {
        let value = match kind {
            ColumnKind::Text | ColumnKind::Timestamp => row
                .get::<_, Option<String>>(idx)?
                .map(Value::String)
                .unwrap_or(Value::Null),
            ColumnKind::Integer => row
                .get::<_, Option<i64>>(idx)?
                .map(Value::from)
                .unwrap_or(Value::Null),
            ColumnKind::Bool => row
                .get::<_, Option<i64>>(idx)?
                .map(|n| Value::Bool(n != 0))
                .unwrap_or(Value::Null),
        };
        map.insert((*name).to_string(), value);
    }
    Ok(Value::Object(map))
}

/// 把调用方传入的对象转为（列名, 参数）列表，拒绝未知列
fn collect_assignments(table: Table, row: &Value) -> StudyResult<Vec<(&'static str, SqlValue)>> {
    let obj = row.as_object().ok_or_else(|| {
        StudyError::validation(format!("Row for {} must be a JSON object", table.name()))
    })?;

    let mut assignments = Vec::with_capacity(obj.len());
    for (key, value) in obj {
        if is_server_managed(key) {
            continue;
        }
        let (name, kind) = columns(table)
            .iter()
            .find(|(c, _)| *c == key.as_str())
            .copied()
            .ok_or_else(|| {
                StudyError::validation(format!("Unknown column {} for table {}", key, table.name()))
            })?;
        assignments.push((name, json_to_sql(table, name, kind, value)?));
    }
    Ok(assignments)
}

fn fetch_row(conn: &Connection, table: Table, user_id: &str, id: &str) -> StudyResult<Option<Value>> {
    let cols = columns(table);
    let sql = format!(
        "SELECT {} FROM {} WHERE \"id\" = ?1 AND \"user_id\" = ?2",
        select_list(cols),
        quote(table.name())
    );
    let row = conn
        .query_row(&sql, [id, user_id], |row| row_to_json(row, cols))
        .optional()?;
    Ok(row)
}

/// SQLite 网关
pub struct SqliteGateway {
    pool: GatewayPool,
    db_path: Option<PathBuf>,
}

impl SqliteGateway {
    /// 打开（或创建）文件数据库并初始化表结构
    pub fn open(db_path: impl AsRef<Path>) -> StudyResult<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StudyError::Database(format!(
                        "Failed to create database directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let manager = SqliteConnectionManager::file(&db_path).with_init(|conn| {
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.pragma_update(None, "journal_mode", "WAL")?;
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.pragma_update(None, "busy_timeout", 5000i64)?;
            Ok(())
        });

        let pool = Pool::builder()
            .max_size(8)
            .connection_timeout(Duration::from_secs(5))
            .build(manager)
            .map_err(|e| StudyError::Pool(format!("Failed to create connection pool: {}", e)))?;

        let gateway = Self {
            pool,
            db_path: Some(db_path),
        };
        gateway.init_schema()?;
        info!(
            "[SqliteGateway] Database ready: {}",
            gateway
                .db_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        );
        Ok(gateway)
    }

    /// 内存数据库（单连接，连接关闭即丢弃数据）
    pub fn open_in_memory() -> StudyResult<Self> {
        let manager = SqliteConnectionManager::memory().with_init(|conn| {
            conn.pragma_update(None, "foreign_keys", "ON")?;
            Ok(())
        });
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| StudyError::Pool(format!("Failed to create connection pool: {}", e)))?;

        let gateway = Self {
            pool,
            db_path: None,
        };
        gateway.init_schema()?;
        debug!("[SqliteGateway] In-memory database ready");
        Ok(gateway)
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn init_schema(&self) -> StudyResult<()> {
        let conn = self.pool.get()?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    async fn run<T, F>(&self, f: F) -> StudyResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StudyResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            f(&*conn)
        })
        .await?
    }
}

#[async_trait]
impl StudyGateway for SqliteGateway {
    async fn select(&self, table: Table, user_id: &str) -> StudyResult<Vec<Value>> {
        let user_id = user_id.to_string();
        self.run(move |conn| {
            let cols = columns(table);
            let sql = format!(
                "SELECT {} FROM {} WHERE \"user_id\" = ?1 ORDER BY rowid",
                select_list(cols),
                quote(table.name())
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([user_id.as_str()], |row| row_to_json(row, cols))?
                .collect::<Result<Vec<_>, _>>()?;
            debug!("[SqliteGateway] select {} -> {} rows", table, rows.len());
            Ok(rows)
        })
        .await
    }

    async fn insert(&self, table: Table, user_id: &str, row: Value) -> StudyResult<Value> {
        let user_id = user_id.to_string();
        self.run(move |conn| {
            let assignments = collect_assignments(table, &row)?;
            let id = uuid::Uuid::new_v4().to_string();

            let mut names: Vec<&str> = vec!["id", "user_id"];
            let mut values: Vec<SqlValue> = vec![SqlValue::Text(id.clone()), SqlValue::Text(user_id.clone())];
            let now = now_timestamp();
            for stamp in ["created_at", "updated_at"] {
                if has_column(table, stamp) {
                    names.push(stamp);
                    values.push(SqlValue::Text(now.clone()));
                }
            }
            for (name, value) in assignments {
                names.push(name);
                values.push(value);
            }

            let placeholders = (1..=names.len())
                .map(|i| format!("?{}", i))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!(
                "INSERT INTO {} ({}) VALUES ({})",
                quote(table.name()),
                names.iter().map(|n| quote(n)).collect::<Vec<_>>().join(", "),
                placeholders
            );
            conn.execute(&sql, params_from_iter(values))?;
            debug!("[SqliteGateway] insert {} id={}", table, id);

            fetch_row(conn, table, &user_id, &id)?
                .ok_or_else(|| StudyError::not_found(table.resource(), id))
        })
        .await
    }

    async fn update(
        &self,
        table: Table,
        user_id: &str,
        id: &str,
        patch: Value,
    ) -> StudyResult<Value> {
        let user_id = user_id.to_string();
        let id = id.to_string();
        self.run(move |conn| {
            let mut assignments = collect_assignments(table, &patch)?;
            if has_column(table, "updated_at") {
                assignments.push(("updated_at", SqlValue::Text(now_timestamp())));
            }

            if assignments.is_empty() {
                return fetch_row(conn, table, &user_id, &id)?
                    .ok_or_else(|| StudyError::not_found(table.resource(), id.clone()));
            }

            let set_clause = assignments
                .iter()
                .enumerate()
                .map(|(i, (name, _))| format!("{} = ?{}", quote(name), i + 1))
                .collect::<Vec<_>>()
                .join(", ");
            let n = assignments.len();
            let sql = format!(
                "UPDATE {} SET {} WHERE \"id\" = ?{} AND \"user_id\" = ?{}",
                quote(table.name()),
                set_clause,
                n + 1,
                n + 2
            );
            let mut values: Vec<SqlValue> = assignments.into_iter().map(|(_, v)| v).collect();
            values.push(SqlValue::Text(id.clone()));
            values.push(SqlValue::Text(user_id.clone()));

            let changed = conn.execute(&sql, params_from_iter(values))?;
            if changed == 0 {
                return Err(StudyError::not_found(table.resource(), id));
            }
            debug!("[SqliteGateway] update {} id={}", table, id);

            fetch_row(conn, table, &user_id, &id)?
                .ok_or_else(|| StudyError::not_found(table.resource(), id))
        })
        .await
    }

    async fn delete(&self, table: Table, user_id: &str, id: &str) -> StudyResult<()> {
        let user_id = user_id.to_string();
        let id = id.to_string();
        self.run(move |conn| {
            let sql = format!(
                "DELETE FROM {} WHERE \"id\" = ?1 AND \"user_id\" = ?2",
                quote(table.name())
            );
            let changed = conn.execute(&sql, [id.as_str(), user_id.as_str()])?;
            if changed == 0 {
                return Err(StudyError::not_found(table.resource(), id));
            }
            debug!("[SqliteGateway] delete {} id={}", table, id);
            Ok(())
        })
        .await
    }
}
