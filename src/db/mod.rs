mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row};

use crate::models::*;
use crate::selection::CurriculumLookup;

/// Largest page size `list_feedback` will return.
pub const MAX_FEEDBACK_PER_PAGE: i64 = 100;

/// Environment variable overriding the default database location.
pub const DB_PATH_ENV: &str = "DICTATION_DB_PATH";

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> Result<Self> {
        if let Ok(path) = std::env::var(DB_PATH_ENV) {
            return Self::open(PathBuf::from(path));
        }
        let dirs = directories::ProjectDirs::from("", "", "dictation")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Self::open(dirs.data_dir().join("dictation.db"))
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn()?;
        schema::run_migrations(&conn)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("database lock poisoned"))
    }

    // ============================================================
    // Children
    // ============================================================

    pub fn create_child(&self, user_id: i64, input: CreateChildInput) -> Result<Child> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO children (user_id, name, grade, semester, textbook_version, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            (
                user_id,
                &input.name,
                input.grade,
                input.semester,
                &input.textbook_version,
                Utc::now().to_rfc3339(),
            ),
        )?;

        Ok(Child {
            id: conn.last_insert_rowid(),
            user_id,
            name: input.name,
            grade: input.grade,
            semester: input.semester,
            textbook_version: input.textbook_version,
        })
    }

    /// Look up a child only if it belongs to `user_id`.
    pub fn find_child(&self, child_id: i64, user_id: i64) -> Result<Option<Child>> {
        let conn = self.conn()?;
        let child = conn
            .query_row(
                "SELECT id, user_id, name, grade, semester, textbook_version
                 FROM children WHERE id = ? AND user_id = ?",
                (child_id, user_id),
                |row| {
                    Ok(Child {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        name: row.get(2)?,
                        grade: row.get(3)?,
                        semester: row.get(4)?,
                        textbook_version: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(child)
    }

    // ============================================================
    // Dictation config
    // ============================================================

    pub fn get_config(&self, child_id: i64) -> Result<Option<DictationConfig>> {
        let conn = self.conn()?;
        query_config(&conn, child_id)
    }

    /// Return the child's config, inserting the defaults on first access.
    pub fn get_or_create_config(&self, child: &Child) -> Result<DictationConfig> {
        let conn = self.conn()?;
        ensure_config(&conn, child.id)?;
        query_config(&conn, child.id)?
            .ok_or_else(|| anyhow::anyhow!("Config for child {} not found", child.id))
    }

    /// Copy the provided fields onto the child's config, creating it if needed.
    pub fn update_config(
        &self,
        child: &Child,
        input: UpdateDictationConfigInput,
    ) -> Result<DictationConfig> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        ensure_config(&tx, child.id)?;

        let mut updates = vec!["updated_at = ?"];
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        params.push(Box::new(Utc::now().to_rfc3339()));

        if let Some(v) = input.words_per_dictation {
            updates.push("words_per_dictation = ?");
            params.push(Box::new(v));
        }
        if let Some(v) = input.review_days {
            updates.push("review_days = ?");
            params.push(Box::new(v));
        }
        if let Some(v) = input.dictation_interval {
            updates.push("dictation_interval = ?");
            params.push(Box::new(v));
        }
        if let Some(v) = input.dictation_ratio {
            updates.push("dictation_ratio = ?");
            params.push(Box::new(v));
        }
        if let Some(v) = input.wrong_words_only {
            updates.push("wrong_words_only = ?");
            params.push(Box::new(v));
        }

        params.push(Box::new(child.id));

        let sql = format!(
            "UPDATE dictation_configs SET {} WHERE child_id = ?",
            updates.join(", ")
        );
        let params_ref: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        tx.execute(&sql, params_ref.as_slice())?;

        let config = query_config(&tx, child.id)?
            .ok_or_else(|| anyhow::anyhow!("Config for child {} not found", child.id))?;
        tx.commit()?;
        Ok(config)
    }

    // ============================================================
    // Curriculum
    // ============================================================

    pub fn find_curriculum_items(
        &self,
        grade: i64,
        semester: i64,
        textbook_version: &str,
        unit: i64,
    ) -> Result<Vec<CurriculumItem>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, grade, semester, textbook_version, unit, word
             FROM yuwen_items
             WHERE grade = ? AND semester = ? AND textbook_version = ? AND unit = ?
             ORDER BY id",
        )?;

        let items = stmt
            .query_map((grade, semester, textbook_version, unit), |row| {
                Ok(CurriculumItem {
                    id: row.get(0)?,
                    grade: row.get(1)?,
                    semester: row.get(2)?,
                    textbook_version: row.get(3)?,
                    unit: row.get(4)?,
                    word: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Insert catalog entries in one transaction. Returns the number inserted.
    pub fn import_curriculum_items(&self, items: &[CurriculumItemInput]) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO yuwen_items (grade, semester, textbook_version, unit, word)
                 VALUES (?, ?, ?, ?, ?)",
            )?;
            for item in items {
                stmt.execute((
                    item.grade,
                    item.semester,
                    &item.textbook_version,
                    item.unit,
                    &item.word,
                ))?;
            }
        }
        tx.commit()?;
        Ok(items.len())
    }

    // ============================================================
    // Dictation tasks
    // ============================================================

    /// Store a task and its items, in order, as one unit of work.
    pub fn save_task(
        &self,
        child: &Child,
        user_id: i64,
        unit: Option<i64>,
        words: &[String],
    ) -> Result<DictationTask> {
        let mut conn = self.conn()?;
        let now = Utc::now();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO dictation_tasks (child_id, user_id, unit, status, created_at)
             VALUES (?, ?, ?, ?, ?)",
            (
                child.id,
                user_id,
                unit,
                TaskStatus::Pending.as_str(),
                now.to_rfc3339(),
            ),
        )?;
        let task_id = tx.last_insert_rowid();

        let mut items = Vec::with_capacity(words.len());
        {
            let mut stmt = tx.prepare(
                "INSERT INTO dictation_task_items (task_id, position, word) VALUES (?, ?, ?)",
            )?;
            for (position, word) in (0_i64..).zip(words) {
                stmt.execute((task_id, position, word))?;
                items.push(DictationTaskItem {
                    id: tx.last_insert_rowid(),
                    position,
                    word: word.clone(),
                });
            }
        }
        tx.commit()?;

        Ok(DictationTask {
            id: task_id,
            child_id: child.id,
            user_id,
            unit,
            status: TaskStatus::Pending,
            items,
            created_at: now,
        })
    }

    pub fn get_task(&self, id: i64) -> Result<Option<DictationTask>> {
        let conn = self.conn()?;
        let task = conn
            .query_row(
                "SELECT id, child_id, user_id, unit, status, created_at
                 FROM dictation_tasks WHERE id = ?",
                [id],
                |row| {
                    Ok(DictationTask {
                        id: row.get(0)?,
                        child_id: row.get(1)?,
                        user_id: row.get(2)?,
                        unit: row.get(3)?,
                        status: TaskStatus::from_str(&row.get::<_, String>(4)?)
                            .unwrap_or(TaskStatus::Pending),
                        items: Vec::new(),
                        created_at: parse_datetime(row.get::<_, String>(5)?),
                    })
                },
            )
            .optional()?;

        let Some(mut task) = task else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            "SELECT id, position, word FROM dictation_task_items
             WHERE task_id = ? ORDER BY position",
        )?;
        task.items = stmt
            .query_map([id], |row| {
                Ok(DictationTaskItem {
                    id: row.get(0)?,
                    position: row.get(1)?,
                    word: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(task))
    }

    // ============================================================
    // Feedback
    // ============================================================

    pub fn create_feedback(&self, user_id: i64, input: NewFeedback) -> Result<Feedback> {
        let conn = self.conn()?;
        let now = Utc::now();

        conn.execute(
            "INSERT INTO feedbacks (user_id, title, content, type, status, contact, images, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            (
                user_id,
                &input.title,
                &input.content,
                &input.kind,
                FeedbackStatus::Pending.as_str(),
                &input.contact,
                serde_json::to_string(&input.images)?,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ),
        )?;

        Ok(Feedback {
            id: conn.last_insert_rowid(),
            user_id,
            title: input.title,
            content: input.content,
            kind: input.kind,
            status: FeedbackStatus::Pending,
            contact: input.contact,
            images: input.images,
            reply_count: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// One page of the user's feedback, newest first.
    ///
    /// `status` filters on the raw status text, so an unknown value matches
    /// nothing. `page` is clamped to at least 1 and `per_page` to
    /// `1..=MAX_FEEDBACK_PER_PAGE`.
    pub fn list_feedback(
        &self,
        user_id: i64,
        status: Option<&str>,
        page: i64,
        per_page: i64,
    ) -> Result<FeedbackPage> {
        let page = page.max(1);
        let per_page = per_page.clamp(1, MAX_FEEDBACK_PER_PAGE);
        let offset = (page - 1).saturating_mul(per_page);
        let conn = self.conn()?;

        let total: i64 = conn.query_row(
            "SELECT COUNT(*) FROM feedbacks
             WHERE user_id = ?1 AND (?2 IS NULL OR status = ?2)",
            (user_id, status),
            |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
            "{FEEDBACK_SELECT}
             WHERE f.user_id = ?1 AND (?2 IS NULL OR f.status = ?2)
             ORDER BY f.id DESC
             LIMIT ?3 OFFSET ?4"
        ))?;
        let feedbacks = stmt
            .query_map(
                (user_id, status, per_page, offset),
                feedback_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FeedbackPage {
            feedbacks,
            total,
            page,
            pages: total / per_page + i64::from(total % per_page != 0),
        })
    }

    /// A feedback entry with its replies, only if it belongs to `user_id`.
    pub fn get_feedback_detail(
        &self,
        id: i64,
        user_id: i64,
    ) -> Result<Option<FeedbackWithReplies>> {
        let conn = self.conn()?;
        let feedback = conn
            .query_row(
                &format!("{FEEDBACK_SELECT} WHERE f.id = ? AND f.user_id = ?"),
                (id, user_id),
                feedback_from_row,
            )
            .optional()?;

        let Some(feedback) = feedback else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            "SELECT id, feedback_id, content, is_admin, created_at
             FROM feedback_replies WHERE feedback_id = ? ORDER BY id",
        )?;
        let replies = stmt
            .query_map([id], |row| {
                Ok(FeedbackReply {
                    id: row.get(0)?,
                    feedback_id: row.get(1)?,
                    content: row.get(2)?,
                    is_admin: row.get(3)?,
                    created_at: parse_datetime(row.get::<_, String>(4)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(FeedbackWithReplies { feedback, replies }))
    }

    pub fn add_feedback_reply(
        &self,
        feedback_id: i64,
        input: CreateReplyInput,
    ) -> Result<FeedbackReply> {
        let mut conn = self.conn()?;
        let now = Utc::now();
        let tx = conn.transaction()?;

        let exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM feedbacks WHERE id = ?)",
            [feedback_id],
            |row| row.get(0),
        )?;
        if !exists {
            anyhow::bail!("Feedback {} not found", feedback_id);
        }

        tx.execute(
            "INSERT INTO feedback_replies (feedback_id, content, is_admin, created_at)
             VALUES (?, ?, ?, ?)",
            (feedback_id, &input.content, input.is_admin, now.to_rfc3339()),
        )?;
        let id = tx.last_insert_rowid();

        tx.execute(
            "UPDATE feedbacks SET updated_at = ? WHERE id = ?",
            (now.to_rfc3339(), feedback_id),
        )?;
        tx.commit()?;

        Ok(FeedbackReply {
            id,
            feedback_id,
            content: input.content,
            is_admin: input.is_admin,
            created_at: now,
        })
    }

    pub fn set_feedback_status(&self, id: i64, status: FeedbackStatus) -> Result<bool> {
        let conn = self.conn()?;
        let rows = conn.execute(
            "UPDATE feedbacks SET status = ?, updated_at = ? WHERE id = ?",
            (status.as_str(), Utc::now().to_rfc3339(), id),
        )?;
        Ok(rows > 0)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

impl CurriculumLookup for Database {
    fn unit_words(&self, position: &CurriculumPosition, unit: i64) -> Result<Vec<String>> {
        let items = self.find_curriculum_items(
            position.grade,
            position.semester,
            &position.textbook_version,
            unit,
        )?;
        Ok(items.into_iter().map(|item| item.word).collect())
    }
}

const FEEDBACK_SELECT: &str = "SELECT f.id, f.user_id, f.title, f.content, f.type, f.status,
        f.contact, f.images, f.created_at, f.updated_at,
        (SELECT COUNT(*) FROM feedback_replies r WHERE r.feedback_id = f.id)
     FROM feedbacks f";

fn feedback_from_row(row: &Row<'_>) -> rusqlite::Result<Feedback> {
    let images: String = row.get(7)?;
    Ok(Feedback {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        kind: row.get(4)?,
        status: FeedbackStatus::from_str(&row.get::<_, String>(5)?)
            .unwrap_or(FeedbackStatus::Pending),
        contact: row.get(6)?,
        images: serde_json::from_str(&images).unwrap_or_default(),
        created_at: parse_datetime(row.get::<_, String>(8)?),
        updated_at: parse_datetime(row.get::<_, String>(9)?),
        reply_count: row.get(10)?,
    })
}

fn ensure_config(conn: &Connection, child_id: i64) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO dictation_configs
            (child_id, words_per_dictation, review_days, dictation_interval,
             dictation_ratio, wrong_words_only, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, 0, ?, ?)",
        (
            child_id,
            DEFAULT_WORDS_PER_DICTATION,
            DEFAULT_REVIEW_DAYS,
            DEFAULT_DICTATION_INTERVAL,
            DEFAULT_DICTATION_RATIO,
            &now,
            &now,
        ),
    )?;
    if inserted > 0 {
        tracing::debug!("Created default dictation config for child {}", child_id);
    }
    Ok(())
}

fn query_config(conn: &Connection, child_id: i64) -> Result<Option<DictationConfig>> {
    let config = conn
        .query_row(
            "SELECT child_id, words_per_dictation, review_days, dictation_interval,
                    dictation_ratio, wrong_words_only, created_at, updated_at
             FROM dictation_configs WHERE child_id = ?",
            [child_id],
            |row| {
                Ok(DictationConfig {
                    child_id: row.get(0)?,
                    words_per_dictation: row.get(1)?,
                    review_days: row.get(2)?,
                    dictation_interval: row.get(3)?,
                    dictation_ratio: row.get(4)?,
                    wrong_words_only: row.get(5)?,
                    created_at: parse_datetime(row.get::<_, String>(6)?),
                    updated_at: parse_datetime(row.get::<_, String>(7)?),
                })
            },
        )
        .optional()?;
    Ok(config)
}

fn parse_datetime(s: String) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
