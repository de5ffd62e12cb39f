//! Memo repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and list/search queries over the `memos` table.
//! - Keep SQL details and row mapping inside the persistence boundary.
//!
//! # Invariants
//! - Every list query is ordered by `created_at DESC`, newest insert first on ties.
//! - Each of the seven `memos` columns maps to exactly one `Memo` field.
//! - Updates always move `updated_at` strictly forward.
//! - `delete_all` deletes unconditionally; it never relies on a sentinel filter.
//! - Text search needs the `memo_lower` function registered by `db::open_db*`.

use crate::db::DbError;
use crate::model::memo::{CategoryFilter, Memo, MemoCategory, MemoFormData, MemoId};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use uuid::Uuid;

const MEMO_COLUMNS: [&str; 7] = [
    "id",
    "title",
    "content",
    "category",
    "tags",
    "created_at",
    "updated_at",
];

const MEMO_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    category,
    tags,
    created_at,
    updated_at
FROM memos";

const MEMO_RETURNING_SQL: &str =
    "RETURNING id, title, content, category, tags, created_at, updated_at";

const NOW_MS_SQL: &str = "CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER)";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for memo persistence and query operations.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("{0}")]
    Db(#[from] DbError),
    #[error("memo not found: {0}")]
    NotFound(MemoId),
    #[error("invalid persisted memo data: {0}")]
    InvalidData(String),
    #[error("required table `{0}` is missing")]
    MissingRequiredTable(&'static str),
    #[error("required column `{table}.{column}` is missing")]
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing memos.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoListQuery {
    /// Exact category match unless `All`.
    pub category: CategoryFilter,
    /// Case-insensitive substring over title or content. Matched literally,
    /// with Unicode case folding through `memo_lower`.
    pub text: Option<String>,
}

impl MemoListQuery {
    /// Lists every memo.
    pub fn all() -> Self {
        Self::default()
    }

    /// Lists memos passing the category filter.
    pub fn by_category(category: CategoryFilter) -> Self {
        Self {
            category,
            text: None,
        }
    }

    /// Lists memos whose title or content contains `text`.
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            category: CategoryFilter::All,
            text: Some(text.into()),
        }
    }
}

/// Repository interface for memo CRUD operations.
pub trait MemoRepository {
    /// Lists memos matching `query`, newest first.
    fn list_memos(&self, query: &MemoListQuery) -> RepoResult<Vec<Memo>>;
    /// Gets one memo by id.
    fn get_memo(&self, id: MemoId) -> RepoResult<Option<Memo>>;
    /// Inserts one memo with a fresh id and default timestamps.
    fn insert_memo(&self, form: &MemoFormData) -> RepoResult<Memo>;
    /// Overwrites the writable fields of one memo.
    fn update_memo(&self, id: MemoId, form: &MemoFormData) -> RepoResult<Memo>;
    /// Deletes one memo and returns the number of removed rows (0 or 1).
    fn delete_memo(&self, id: MemoId) -> RepoResult<usize>;
    /// Deletes every memo and returns the number of removed rows.
    fn delete_all(&self) -> RepoResult<usize>;
}

/// SQLite-backed memo repository.
pub struct SqliteMemoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemoRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_memo_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl MemoRepository for SqliteMemoRepository<'_> {
    fn list_memos(&self, query: &MemoListQuery) -> RepoResult<Vec<Memo>> {
        let mut sql = format!("{MEMO_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let CategoryFilter::Only(category) = query.category {
            sql.push_str(" AND category = ?");
            bind_values.push(Value::Text(category.as_str().to_string()));
        }

        if let Some(text) = query.text.as_deref() {
            sql.push_str(
                " AND (memo_lower(title) LIKE ? ESCAPE '\\' OR memo_lower(content) LIKE ? ESCAPE '\\')",
            );
            let pattern = like_pattern(&text.to_lowercase());
            bind_values.push(Value::Text(pattern.clone()));
            bind_values.push(Value::Text(pattern));
        }

        sql.push_str(" ORDER BY created_at DESC, rowid DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut memos = Vec::new();
        while let Some(row) = rows.next()? {
            memos.push(parse_memo_row(row)?);
        }

        Ok(memos)
    }

    fn get_memo(&self, id: MemoId) -> RepoResult<Option<Memo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MEMO_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_memo_row(row)?));
        }

        Ok(None)
    }

    fn insert_memo(&self, form: &MemoFormData) -> RepoResult<Memo> {
        let tags = encode_tags(&form.tags)?;
        let mut stmt = self.conn.prepare(&format!(
            "INSERT INTO memos (id, title, content, category, tags)
             VALUES (?1, ?2, ?3, ?4, ?5)
             {MEMO_RETURNING_SQL};"
        ))?;
        let mut rows = stmt.query(params![
            Uuid::new_v4().to_string(),
            form.title.as_str(),
            form.content.as_str(),
            form.category.as_str(),
            tags,
        ])?;

        if let Some(row) = rows.next()? {
            return parse_memo_row(row);
        }

        Err(RepoError::InvalidData("insert returned no row".to_string()))
    }

    fn update_memo(&self, id: MemoId, form: &MemoFormData) -> RepoResult<Memo> {
        let tags = encode_tags(&form.tags)?;
        let mut stmt = self.conn.prepare(&format!(
            "UPDATE memos
             SET
                title = ?2,
                content = ?3,
                category = ?4,
                tags = ?5,
                updated_at = MAX({NOW_MS_SQL}, updated_at + 1)
             WHERE id = ?1
             {MEMO_RETURNING_SQL};"
        ))?;
        let mut rows = stmt.query(params![
            id.to_string(),
            form.title.as_str(),
            form.content.as_str(),
            form.category.as_str(),
            tags,
        ])?;

        if let Some(row) = rows.next()? {
            return parse_memo_row(row);
        }

        Err(RepoError::NotFound(id))
    }

    fn delete_memo(&self, id: MemoId) -> RepoResult<usize> {
        let changed = self
            .conn
            .execute("DELETE FROM memos WHERE id = ?1;", [id.to_string()])?;
        Ok(changed)
    }

    fn delete_all(&self) -> RepoResult<usize> {
        let changed = self.conn.execute("DELETE FROM memos;", [])?;
        Ok(changed)
    }
}

/// Maps one `memos` row to the domain entity.
///
/// Category text is mapped totally; an unparsable id or tag list is reported as
/// `InvalidData` instead of being dropped.
pub fn parse_memo_row(row: &Row<'_>) -> RepoResult<Memo> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{id_text}` in memos.id")))?;

    let category_text: String = row.get("category")?;
    let tags_text: String = row.get("tags")?;
    let tags = serde_json::from_str::<Vec<String>>(&tags_text).map_err(|err| {
        RepoError::InvalidData(format!("invalid tag list in memos.tags for {id}: {err}"))
    })?;

    Ok(Memo {
        id,
        title: row.get("title")?,
        content: row.get("content")?,
        category: MemoCategory::from_db_lossy(&category_text),
        tags,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Builds a `LIKE` pattern matching `text` literally anywhere in a column.
pub fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in text.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn encode_tags(tags: &[String]) -> RepoResult<String> {
    serde_json::to_string(tags)
        .map_err(|err| RepoError::InvalidData(format!("tag list cannot be encoded: {err}")))
}

fn ensure_memo_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "memos")? {
        return Err(RepoError::MissingRequiredTable("memos"));
    }

    for column in MEMO_COLUMNS {
        if !table_has_column(conn, "memos", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "memos",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM pragma_table_info(?1) WHERE name = ?2;",
            params![table, column],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(found.is_some())
}
