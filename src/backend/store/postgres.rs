/**
 * PostgreSQL Store
 *
 * sqlx implementation of the store traits. Queries are plain SQL bound at
 * runtime; rows are read into private `*Row` structs and converted into the
 * domain types, which is where stored values are checked against the model
 * (non-negative counters, known policy kinds).
 *
 * # Access Units
 *
 * `begin_access` opens a transaction and locks the snippet row with
 * `SELECT ... FOR UPDATE`. Concurrent views of the same snippet queue on that
 * lock. Dropping `PgAccess` without `commit` rolls the transaction back.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::backend::auth::users::{NewUser, User};
use crate::backend::store::{
    GroupStore, MessageStore, SnippetAccess, SnippetStore, StoreError, TagStore, UserStore,
};
use crate::shared::groups::{Group, GroupMember, GroupShare};
use crate::shared::messaging::{DirectMessage, NewMessage};
use crate::shared::snippet::{
    ExpirationKind, ExpirationLogEntry, ExpirationPolicy, ExpirationReason, Snippet,
    SnippetDraft, Tag, ViewLogEntry,
};

const UNIQUE_VIOLATION: &str = "23505";

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                return StoreError::conflict(db_err.constraint().unwrap_or("unique"));
            }
        }
        StoreError::Unavailable(err.to_string())
    }
}

fn to_db_count(value: u64, what: &str) -> Result<i64, StoreError> {
    i64::try_from(value).map_err(|_| StoreError::Corrupt(format!("{what} {value} out of range")))
}

fn from_db_count(value: i64, what: &str) -> Result<u64, StoreError> {
    u64::try_from(value).map_err(|_| StoreError::Corrupt(format!("negative {what}: {value}")))
}

#[derive(sqlx::FromRow)]
struct SnippetRow {
    id: i64,
    token: String,
    owner_id: i64,
    title: Option<String>,
    content: String,
    expiration_kind: Option<String>,
    expiration_value: i64,
    created_at: DateTime<Utc>,
    view_count: i64,
    is_deleted: bool,
}

impl TryFrom<SnippetRow> for Snippet {
    type Error = StoreError;

    fn try_from(row: SnippetRow) -> Result<Self, Self::Error> {
        let threshold = from_db_count(row.expiration_value, "expiration value")?;
        let policy = match row.expiration_kind.as_deref() {
            None => ExpirationPolicy::None,
            Some(kind) => {
                let kind = ExpirationKind::parse(kind).ok_or_else(|| {
                    StoreError::Corrupt(format!("snippet {} has expiration kind '{kind}'", row.id))
                })?;
                ExpirationPolicy::from_kind(kind, threshold)
            }
        };
        Ok(Snippet {
            id: row.id,
            token: row.token,
            owner_id: row.owner_id,
            title: row.title,
            content: row.content,
            policy,
            created_at: row.created_at,
            view_count: from_db_count(row.view_count, "view count")?,
            is_deleted: row.is_deleted,
        })
    }
}

fn snippets_from_rows(rows: Vec<SnippetRow>) -> Result<Vec<Snippet>, StoreError> {
    rows.into_iter().map(Snippet::try_from).collect()
}

const SNIPPET_COLUMNS: &str = "id, token, owner_id, title, content, expiration_kind, \
     expiration_value, created_at, view_count, is_deleted";

#[derive(sqlx::FromRow)]
struct ExpirationLogRow {
    id: i64,
    snippet_id: i64,
    reason: String,
    expired_at: DateTime<Utc>,
}

impl TryFrom<ExpirationLogRow> for ExpirationLogEntry {
    type Error = StoreError;

    fn try_from(row: ExpirationLogRow) -> Result<Self, Self::Error> {
        let reason = ExpirationReason::parse(&row.reason).ok_or_else(|| {
            StoreError::Corrupt(format!("expiration log {} has reason '{}'", row.id, row.reason))
        })?;
        Ok(ExpirationLogEntry {
            id: row.id,
            snippet_id: row.snippet_id,
            reason,
            expired_at: row.expired_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ViewLogRow {
    id: i64,
    snippet_id: i64,
    viewer_id: i64,
    viewed_at: DateTime<Utc>,
}

impl From<ViewLogRow> for ViewLogEntry {
    fn from(row: ViewLogRow) -> Self {
        ViewLogEntry {
            id: row.id,
            snippet_id: row.snippet_id,
            viewer_id: row.viewer_id,
            viewed_at: row.viewed_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TagRow {
    id: i64,
    name: String,
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Tag {
            id: row.id,
            name: row.name,
        }
    }
}

#[derive(sqlx::FromRow)]
struct GroupRow {
    id: i64,
    name: String,
    creator_id: i64,
    created_at: DateTime<Utc>,
}

impl From<GroupRow> for Group {
    fn from(row: GroupRow) -> Self {
        Group {
            id: row.id,
            name: row.name,
            creator_id: row.creator_id,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    group_id: i64,
    user_id: i64,
    joined_at: DateTime<Utc>,
}

impl From<MemberRow> for GroupMember {
    fn from(row: MemberRow) -> Self {
        GroupMember {
            group_id: row.group_id,
            user_id: row.user_id,
            joined_at: row.joined_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct JoinedGroupRow {
    id: i64,
    name: String,
    creator_id: i64,
    created_at: DateTime<Utc>,
    joined_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct ShareRow {
    group_id: i64,
    snippet_id: i64,
    shared_by_id: i64,
    shared_at: DateTime<Utc>,
}

impl From<ShareRow> for GroupShare {
    fn from(row: ShareRow) -> Self {
        GroupShare {
            group_id: row.group_id,
            snippet_id: row.snippet_id,
            shared_by_id: row.shared_by_id,
            shared_at: row.shared_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: i64,
    sender_id: i64,
    receiver_id: i64,
    snippet_id: Option<i64>,
    content: String,
    sent_at: DateTime<Utc>,
}

impl From<MessageRow> for DirectMessage {
    fn from(row: MessageRow) -> Self {
        DirectMessage {
            id: row.id,
            sender_id: row.sender_id,
            receiver_id: row.receiver_id,
            snippet_id: row.snippet_id,
            content: row.content,
            sent_at: row.sent_at,
        }
    }
}

const USER_COLUMNS: &str =
    "id, uuid, username, email, password_hash, personal, github, linkedin, created_at";

/// PostgreSQL implementation of `Store`
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and bring the schema up to date
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url).await?;
        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(|e| StoreError::Unavailable(format!("migration failed: {e}")))?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

struct PgAccess {
    tx: Option<Transaction<'static, Postgres>>,
    snippet: Snippet,
}

impl PgAccess {
    fn tx(&mut self) -> Result<&mut Transaction<'static, Postgres>, StoreError> {
        self.tx
            .as_mut()
            .ok_or_else(|| StoreError::Unavailable("access unit already committed".to_string()))
    }
}

#[async_trait]
impl SnippetAccess for PgAccess {
    fn snippet(&self) -> &Snippet {
        &self.snippet
    }

    async fn save_view_count(&mut self, view_count: u64) -> Result<(), StoreError> {
        let id = self.snippet.id;
        let count = to_db_count(view_count, "view count")?;
        let tx = self.tx()?;
        sqlx::query("UPDATE snippets SET view_count = $1 WHERE id = $2")
            .bind(count)
            .bind(id)
            .execute(&mut **tx)
            .await?;
        self.snippet.view_count = view_count;
        Ok(())
    }

    async fn append_view_log(
        &mut self,
        viewer_id: i64,
        viewed_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let id = self.snippet.id;
        let tx = self.tx()?;
        sqlx::query("INSERT INTO view_logs (snippet_id, viewer_id, viewed_at) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(viewer_id)
            .bind(viewed_at)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    async fn append_expiration_log(
        &mut self,
        reason: ExpirationReason,
        expired_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let id = self.snippet.id;
        let tx = self.tx()?;
        sqlx::query(
            "INSERT INTO expiration_logs (snippet_id, reason, expired_at) VALUES ($1, $2, $3)",
        )
        .bind(id)
        .bind(reason.as_str())
        .bind(expired_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| StoreError::Unavailable("access unit already committed".to_string()))?;
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl SnippetStore for PgStore {
    async fn insert_snippet(&self, draft: SnippetDraft) -> Result<Snippet, StoreError> {
        let value = to_db_count(draft.policy.threshold(), "expiration value")?;
        let row = sqlx::query_as::<_, SnippetRow>(&format!(
            r#"
            INSERT INTO snippets (token, owner_id, title, content, expiration_kind, expiration_value, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {SNIPPET_COLUMNS}
            "#
        ))
        .bind(&draft.token)
        .bind(draft.owner_id)
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(draft.policy.kind().map(|k| k.as_str()))
        .bind(value)
        .bind(draft.created_at)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn snippet_by_token(&self, token: &str) -> Result<Option<Snippet>, StoreError> {
        let row = sqlx::query_as::<_, SnippetRow>(&format!(
            "SELECT {SNIPPET_COLUMNS} FROM snippets WHERE token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Snippet::try_from).transpose()
    }

    async fn snippet_by_id(&self, id: i64) -> Result<Option<Snippet>, StoreError> {
        let row = sqlx::query_as::<_, SnippetRow>(&format!(
            "SELECT {SNIPPET_COLUMNS} FROM snippets WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Snippet::try_from).transpose()
    }

    async fn latest_snippets(&self, limit: usize) -> Result<Vec<Snippet>, StoreError> {
        let limit = to_db_count(limit as u64, "limit")?;
        let rows = sqlx::query_as::<_, SnippetRow>(&format!(
            r#"
            SELECT {SNIPPET_COLUMNS} FROM snippets
            WHERE NOT is_deleted
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        snippets_from_rows(rows)
    }

    async fn snippets_by_owner(&self, owner_id: i64) -> Result<Vec<Snippet>, StoreError> {
        let rows = sqlx::query_as::<_, SnippetRow>(&format!(
            r#"
            SELECT {SNIPPET_COLUMNS} FROM snippets
            WHERE owner_id = $1 AND NOT is_deleted
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        snippets_from_rows(rows)
    }

    async fn tags_for_snippet(&self, snippet_id: i64) -> Result<Vec<Tag>, StoreError> {
        let rows = sqlx::query_as::<_, TagRow>(
            r#"
            SELECT t.id, t.name
            FROM tags t
            JOIN snippet_tags st ON st.tag_id = t.id
            WHERE st.snippet_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(snippet_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Tag::from).collect())
    }

    async fn view_logs(&self, snippet_id: i64) -> Result<Vec<ViewLogEntry>, StoreError> {
        let rows = sqlx::query_as::<_, ViewLogRow>(
            r#"
            SELECT id, snippet_id, viewer_id, viewed_at
            FROM view_logs
            WHERE snippet_id = $1
            ORDER BY viewed_at, id
            "#,
        )
        .bind(snippet_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ViewLogEntry::from).collect())
    }

    async fn expiration_logs(
        &self,
        snippet_id: i64,
    ) -> Result<Vec<ExpirationLogEntry>, StoreError> {
        let rows = sqlx::query_as::<_, ExpirationLogRow>(
            r#"
            SELECT id, snippet_id, reason, expired_at
            FROM expiration_logs
            WHERE snippet_id = $1
            ORDER BY expired_at, id
            "#,
        )
        .bind(snippet_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(ExpirationLogEntry::try_from).collect()
    }

    async fn mark_deleted(&self, snippet_id: i64) -> Result<(), StoreError> {
        sqlx::query("UPDATE snippets SET is_deleted = TRUE WHERE id = $1")
            .bind(snippet_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn discard_snippet(&self, snippet_id: i64) -> Result<(), StoreError> {
        // snippet_tags rows go with it through ON DELETE CASCADE
        sqlx::query("DELETE FROM snippets WHERE id = $1")
            .bind(snippet_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn begin_access(
        &self,
        token: &str,
    ) -> Result<Option<Box<dyn SnippetAccess>>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, SnippetRow>(&format!(
            "SELECT {SNIPPET_COLUMNS} FROM snippets WHERE token = $1 FOR UPDATE"
        ))
        .bind(token)
        .fetch_optional(&mut *tx)
        .await?;

        match row {
            Some(row) => Ok(Some(Box::new(PgAccess {
                tx: Some(tx),
                snippet: row.try_into()?,
            }))),
            None => {
                tx.rollback().await?;
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl TagStore for PgStore {
    async fn find_tag(&self, name: &str) -> Result<Option<Tag>, StoreError> {
        let row = sqlx::query_as::<_, TagRow>("SELECT id, name FROM tags WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Tag::from))
    }

    async fn create_tag(&self, name: &str) -> Result<Tag, StoreError> {
        let row = sqlx::query_as::<_, TagRow>("INSERT INTO tags (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn link_tag(&self, snippet_id: i64, tag_id: i64) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO snippet_tags (snippet_id, tag_id) VALUES ($1, $2)
            ON CONFLICT (snippet_id, tag_id) DO NOTHING
            "#,
        )
        .bind(snippet_id)
        .bind(tag_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let stored = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (uuid, username, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.uuid)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(stored)
    }

    async fn user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn user_by_uuid(&self, uuid: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE uuid = $1"))
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn update_user(&self, user: &User) -> Result<User, StoreError> {
        let stored = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET username = $2, email = $3, personal = $4, github = $5, linkedin = $6
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.personal)
        .bind(&user.github)
        .bind(&user.linkedin)
        .fetch_optional(&self.pool)
        .await?;
        stored.ok_or_else(|| StoreError::Corrupt(format!("user {} does not exist", user.id)))
    }
}

#[async_trait]
impl GroupStore for PgStore {
    async fn create_group(
        &self,
        name: &str,
        creator_id: i64,
        created_at: DateTime<Utc>,
    ) -> Result<Group, StoreError> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, GroupRow>(
            r#"
            INSERT INTO snippet_groups (name, creator_id, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, name, creator_id, created_at
            "#,
        )
        .bind(name)
        .bind(creator_id)
        .bind(created_at)
        .fetch_one(&mut *tx)
        .await?;
        sqlx::query("INSERT INTO group_members (group_id, user_id, joined_at) VALUES ($1, $2, $3)")
            .bind(row.id)
            .bind(creator_id)
            .bind(created_at)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(row.into())
    }

    async fn group_by_id(&self, id: i64) -> Result<Option<Group>, StoreError> {
        let row = sqlx::query_as::<_, GroupRow>(
            "SELECT id, name, creator_id, created_at FROM snippet_groups WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Group::from))
    }

    async fn groups_created_by(&self, user_id: i64) -> Result<Vec<Group>, StoreError> {
        let rows = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT id, name, creator_id, created_at
            FROM snippet_groups
            WHERE creator_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Group::from).collect())
    }

    async fn groups_joined_by(
        &self,
        user_id: i64,
    ) -> Result<Vec<(Group, GroupMember)>, StoreError> {
        let rows = sqlx::query_as::<_, JoinedGroupRow>(
            r#"
            SELECT g.id, g.name, g.creator_id, g.created_at, m.joined_at
            FROM group_members m
            JOIN snippet_groups g ON g.id = m.group_id
            WHERE m.user_id = $1 AND g.creator_id <> $1
            ORDER BY m.joined_at, g.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let member = GroupMember {
                    group_id: row.id,
                    user_id,
                    joined_at: row.joined_at,
                };
                let group = Group {
                    id: row.id,
                    name: row.name,
                    creator_id: row.creator_id,
                    created_at: row.created_at,
                };
                (group, member)
            })
            .collect())
    }

    async fn membership(
        &self,
        group_id: i64,
        user_id: i64,
    ) -> Result<Option<GroupMember>, StoreError> {
        let row = sqlx::query_as::<_, MemberRow>(
            "SELECT group_id, user_id, joined_at FROM group_members WHERE group_id = $1 AND user_id = $2",
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(GroupMember::from))
    }

    async fn members(&self, group_id: i64) -> Result<Vec<GroupMember>, StoreError> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT group_id, user_id, joined_at
            FROM group_members
            WHERE group_id = $1
            ORDER BY joined_at, user_id
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(GroupMember::from).collect())
    }

    async fn member_count(&self, group_id: i64) -> Result<u64, StoreError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM group_members WHERE group_id = $1")
            .bind(group_id)
            .fetch_one(&self.pool)
            .await?;
        from_db_count(count, "member count")
    }

    async fn add_member(
        &self,
        group_id: i64,
        user_id: i64,
        joined_at: DateTime<Utc>,
    ) -> Result<GroupMember, StoreError> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            INSERT INTO group_members (group_id, user_id, joined_at)
            VALUES ($1, $2, $3)
            RETURNING group_id, user_id, joined_at
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .bind(joined_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn remove_member(&self, group_id: i64, user_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM group_members WHERE group_id = $1 AND user_id = $2")
            .bind(group_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn share_snippet(&self, share: GroupShare) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO group_snippets (group_id, snippet_id, shared_by_id, shared_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (group_id, snippet_id) DO NOTHING
            "#,
        )
        .bind(share.group_id)
        .bind(share.snippet_id)
        .bind(share.shared_by_id)
        .bind(share.shared_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn group_shares(&self, group_id: i64) -> Result<Vec<GroupShare>, StoreError> {
        let rows = sqlx::query_as::<_, ShareRow>(
            r#"
            SELECT group_id, snippet_id, shared_by_id, shared_at
            FROM group_snippets
            WHERE group_id = $1
            ORDER BY shared_at DESC
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(GroupShare::from).collect())
    }
}

const MESSAGE_COLUMNS: &str = "id, sender_id, receiver_id, snippet_id, content, sent_at";

#[async_trait]
impl MessageStore for PgStore {
    async fn insert_message(&self, message: NewMessage) -> Result<DirectMessage, StoreError> {
        let row = sqlx::query_as::<_, MessageRow>(&format!(
            r#"
            INSERT INTO messages (sender_id, receiver_id, snippet_id, content, sent_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {MESSAGE_COLUMNS}
            "#
        ))
        .bind(message.sender_id)
        .bind(message.receiver_id)
        .bind(message.snippet_id)
        .bind(&message.content)
        .bind(message.sent_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn inbox(&self, user_id: i64) -> Result<Vec<DirectMessage>, StoreError> {
        let rows = sqlx::query_as::<_, MessageRow>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE receiver_id = $1 ORDER BY sent_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(DirectMessage::from).collect())
    }

    async fn sent(&self, user_id: i64) -> Result<Vec<DirectMessage>, StoreError> {
        let rows = sqlx::query_as::<_, MessageRow>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE sender_id = $1 ORDER BY sent_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(DirectMessage::from).collect())
    }

    async fn conversation(
        &self,
        user_id: i64,
        other_id: i64,
    ) -> Result<Vec<DirectMessage>, StoreError> {
        let rows = sqlx::query_as::<_, MessageRow>(&format!(
            r#"
            SELECT {MESSAGE_COLUMNS} FROM messages
            WHERE (sender_id = $1 AND receiver_id = $2)
               OR (sender_id = $2 AND receiver_id = $1)
            ORDER BY sent_at, id
            "#
        ))
        .bind(user_id)
        .bind(other_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(DirectMessage::from).collect())
    }
}
