/**
 * In-Memory Store
 *
 * Process-local implementation of every store trait. All state sits behind
 * one `tokio::sync::Mutex`; an access unit holds the owned guard from load
 * to commit, which serialises concurrent views of any snippet.
 *
 * Writes made through an access unit are staged and only applied on
 * `commit`. Dropping the unit releases the lock and discards the stage.
 *
 * # Fault Injection
 *
 * `MemoryStore::fail_on` arms a `FaultPoint` so tests can make a specific
 * write inside an access unit fail and observe that nothing was persisted.
 */

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::backend::auth::users::{NewUser, User};
use crate::backend::store::{
    GroupStore, MessageStore, SnippetAccess, SnippetStore, StoreError, TagStore, UserStore,
};
use crate::shared::groups::{Group, GroupMember, GroupShare};
use crate::shared::messaging::{DirectMessage, NewMessage};
use crate::shared::snippet::{
    ExpirationLogEntry, ExpirationReason, Snippet, SnippetDraft, Tag, ViewLogEntry,
};

/// Write that can be forced to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultPoint {
    SaveViewCount,
    ViewLog,
    ExpirationLog,
    Commit,
    /// `TagStore::link_tag`, outside any access unit
    LinkTag,
}

#[derive(Debug, Default)]
struct MemoryState {
    next_id: i64,
    users: BTreeMap<i64, User>,
    snippets: BTreeMap<i64, Snippet>,
    tags: BTreeMap<i64, Tag>,
    snippet_tags: BTreeSet<(i64, i64)>,
    view_logs: Vec<ViewLogEntry>,
    expiration_logs: Vec<ExpirationLogEntry>,
    groups: BTreeMap<i64, Group>,
    members: Vec<GroupMember>,
    shares: Vec<GroupShare>,
    messages: Vec<DirectMessage>,
    faults: HashSet<FaultPoint>,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn fault(&self, point: FaultPoint) -> Result<(), StoreError> {
        if self.faults.contains(&point) {
            return Err(StoreError::Unavailable(format!("injected failure at {point:?}")));
        }
        Ok(())
    }

    fn check_user_unique(&self, id: Option<i64>, username: &str, email: &str) -> Result<(), StoreError> {
        for user in self.users.values().filter(|u| Some(u.id) != id) {
            if user.username == username {
                return Err(StoreError::conflict("users_username_key"));
            }
            if user.email == email {
                return Err(StoreError::conflict("users_email_key"));
            }
        }
        Ok(())
    }
}

/// In-memory implementation of `Store`
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future write at `point` fail until cleared
    pub async fn fail_on(&self, point: FaultPoint) {
        self.state.lock().await.faults.insert(point);
    }

    pub async fn clear_faults(&self) {
        self.state.lock().await.faults.clear();
    }
}

#[derive(Debug, Default)]
struct Staged {
    view_count: Option<u64>,
    view_logs: Vec<(i64, DateTime<Utc>)>,
    expiration_logs: Vec<(ExpirationReason, DateTime<Utc>)>,
}

struct MemoryAccess {
    guard: Option<OwnedMutexGuard<MemoryState>>,
    snippet: Snippet,
    staged: Staged,
}

impl MemoryAccess {
    fn state(&self) -> Result<&MemoryState, StoreError> {
        self.guard
            .as_deref()
            .ok_or_else(|| StoreError::Unavailable("access unit already committed".to_string()))
    }
}

#[async_trait]
impl SnippetAccess for MemoryAccess {
    fn snippet(&self) -> &Snippet {
        &self.snippet
    }

    async fn save_view_count(&mut self, view_count: u64) -> Result<(), StoreError> {
        self.state()?.fault(FaultPoint::SaveViewCount)?;
        self.staged.view_count = Some(view_count);
        self.snippet.view_count = view_count;
        Ok(())
    }

    async fn append_view_log(
        &mut self,
        viewer_id: i64,
        viewed_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.state()?.fault(FaultPoint::ViewLog)?;
        self.staged.view_logs.push((viewer_id, viewed_at));
        Ok(())
    }

    async fn append_expiration_log(
        &mut self,
        reason: ExpirationReason,
        expired_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let state = self.state()?;
        state.fault(FaultPoint::ExpirationLog)?;
        if reason == ExpirationReason::Views {
            let already_logged = state
                .expiration_logs
                .iter()
                .any(|e| e.snippet_id == self.snippet.id && e.reason == ExpirationReason::Views)
                || self
                    .staged
                    .expiration_logs
                    .iter()
                    .any(|(r, _)| *r == ExpirationReason::Views);
            if already_logged {
                return Err(StoreError::conflict("expiration_logs_views_once"));
            }
        }
        self.staged.expiration_logs.push((reason, expired_at));
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        self.state()?.fault(FaultPoint::Commit)?;
        let Some(mut state) = self.guard.take() else {
            return Err(StoreError::Unavailable("access unit already committed".to_string()));
        };
        let staged = std::mem::take(&mut self.staged);
        let snippet_id = self.snippet.id;

        if let Some(count) = staged.view_count {
            if let Some(stored) = state.snippets.get_mut(&snippet_id) {
                stored.view_count = count;
            }
        }
        for (viewer_id, viewed_at) in staged.view_logs {
            let id = state.next_id();
            state.view_logs.push(ViewLogEntry {
                id,
                snippet_id,
                viewer_id,
                viewed_at,
            });
        }
        for (reason, expired_at) in staged.expiration_logs {
            let id = state.next_id();
            state.expiration_logs.push(ExpirationLogEntry {
                id,
                snippet_id,
                reason,
                expired_at,
            });
        }
        Ok(())
    }
}

fn newest_first(mut snippets: Vec<Snippet>) -> Vec<Snippet> {
    snippets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    snippets
}

#[async_trait]
impl SnippetStore for MemoryStore {
    async fn insert_snippet(&self, draft: SnippetDraft) -> Result<Snippet, StoreError> {
        let mut state = self.state.lock().await;
        if state.snippets.values().any(|s| s.token == draft.token) {
            return Err(StoreError::conflict("snippets_token_key"));
        }
        let id = state.next_id();
        let snippet = Snippet {
            id,
            token: draft.token,
            owner_id: draft.owner_id,
            title: draft.title,
            content: draft.content,
            policy: draft.policy,
            created_at: draft.created_at,
            view_count: 0,
            is_deleted: false,
        };
        state.snippets.insert(id, snippet.clone());
        Ok(snippet)
    }

    async fn snippet_by_token(&self, token: &str) -> Result<Option<Snippet>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.snippets.values().find(|s| s.token == token).cloned())
    }

    async fn snippet_by_id(&self, id: i64) -> Result<Option<Snippet>, StoreError> {
        Ok(self.state.lock().await.snippets.get(&id).cloned())
    }

    async fn latest_snippets(&self, limit: usize) -> Result<Vec<Snippet>, StoreError> {
        let state = self.state.lock().await;
        let live = state.snippets.values().filter(|s| !s.is_deleted).cloned().collect();
        Ok(newest_first(live).into_iter().take(limit).collect())
    }

    async fn snippets_by_owner(&self, owner_id: i64) -> Result<Vec<Snippet>, StoreError> {
        let state = self.state.lock().await;
        let owned = state
            .snippets
            .values()
            .filter(|s| s.owner_id == owner_id && !s.is_deleted)
            .cloned()
            .collect();
        Ok(newest_first(owned))
    }

    async fn tags_for_snippet(&self, snippet_id: i64) -> Result<Vec<Tag>, StoreError> {
        let state = self.state.lock().await;
        let mut tags: Vec<Tag> = state
            .snippet_tags
            .iter()
            .filter(|(s, _)| *s == snippet_id)
            .filter_map(|(_, t)| state.tags.get(t).cloned())
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn view_logs(&self, snippet_id: i64) -> Result<Vec<ViewLogEntry>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .view_logs
            .iter()
            .filter(|e| e.snippet_id == snippet_id)
            .cloned()
            .collect())
    }

    async fn expiration_logs(
        &self,
        snippet_id: i64,
    ) -> Result<Vec<ExpirationLogEntry>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .expiration_logs
            .iter()
            .filter(|e| e.snippet_id == snippet_id)
            .cloned()
            .collect())
    }

    async fn mark_deleted(&self, snippet_id: i64) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if let Some(snippet) = state.snippets.get_mut(&snippet_id) {
            snippet.is_deleted = true;
        }
        Ok(())
    }

    async fn discard_snippet(&self, snippet_id: i64) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.snippets.remove(&snippet_id);
        state.snippet_tags.retain(|(s, _)| *s != snippet_id);
        Ok(())
    }

    async fn begin_access(
        &self,
        token: &str,
    ) -> Result<Option<Box<dyn SnippetAccess>>, StoreError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let Some(snippet) = guard.snippets.values().find(|s| s.token == token).cloned() else {
            return Ok(None);
        };
        Ok(Some(Box::new(MemoryAccess {
            guard: Some(guard),
            snippet,
            staged: Staged::default(),
        })))
    }
}

#[async_trait]
impl TagStore for MemoryStore {
    async fn find_tag(&self, name: &str) -> Result<Option<Tag>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.tags.values().find(|t| t.name == name).cloned())
    }

    async fn create_tag(&self, name: &str) -> Result<Tag, StoreError> {
        let mut state = self.state.lock().await;
        if state.tags.values().any(|t| t.name == name) {
            return Err(StoreError::conflict("tags_name_key"));
        }
        let id = state.next_id();
        let tag = Tag {
            id,
            name: name.to_string(),
        };
        state.tags.insert(id, tag.clone());
        Ok(tag)
    }

    async fn link_tag(&self, snippet_id: i64, tag_id: i64) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.fault(FaultPoint::LinkTag)?;
        state.snippet_tags.insert((snippet_id, tag_id));
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut state = self.state.lock().await;
        state.check_user_unique(None, &user.username, &user.email)?;
        let id = state.next_id();
        let stored = User {
            id,
            uuid: user.uuid,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            personal: None,
            github: None,
            linkedin: None,
            created_at: user.created_at,
        };
        state.users.insert(id, stored.clone());
        Ok(stored)
    }

    async fn user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn user_by_uuid(&self, uuid: Uuid) -> Result<Option<User>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.users.values().find(|u| u.uuid == uuid).cloned())
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn update_user(&self, user: &User) -> Result<User, StoreError> {
        let mut state = self.state.lock().await;
        state.check_user_unique(Some(user.id), &user.username, &user.email)?;
        let Some(stored) = state.users.get_mut(&user.id) else {
            return Err(StoreError::Corrupt(format!("user {} does not exist", user.id)));
        };
        stored.username = user.username.clone();
        stored.email = user.email.clone();
        stored.personal = user.personal.clone();
        stored.github = user.github.clone();
        stored.linkedin = user.linkedin.clone();
        Ok(stored.clone())
    }
}

#[async_trait]
impl GroupStore for MemoryStore {
    async fn create_group(
        &self,
        name: &str,
        creator_id: i64,
        created_at: DateTime<Utc>,
    ) -> Result<Group, StoreError> {
        let mut state = self.state.lock().await;
        let id = state.next_id();
        let group = Group {
            id,
            name: name.to_string(),
            creator_id,
            created_at,
        };
        state.groups.insert(id, group.clone());
        state.members.push(GroupMember {
            group_id: id,
            user_id: creator_id,
            joined_at: created_at,
        });
        Ok(group)
    }

    async fn group_by_id(&self, id: i64) -> Result<Option<Group>, StoreError> {
        Ok(self.state.lock().await.groups.get(&id).cloned())
    }

    async fn groups_created_by(&self, user_id: i64) -> Result<Vec<Group>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .groups
            .values()
            .filter(|g| g.creator_id == user_id)
            .cloned()
            .collect())
    }

    async fn groups_joined_by(
        &self,
        user_id: i64,
    ) -> Result<Vec<(Group, GroupMember)>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .members
            .iter()
            .filter(|m| m.user_id == user_id)
            .filter_map(|m| {
                state
                    .groups
                    .get(&m.group_id)
                    .filter(|g| g.creator_id != user_id)
                    .map(|g| (g.clone(), m.clone()))
            })
            .collect())
    }

    async fn membership(
        &self,
        group_id: i64,
        user_id: i64,
    ) -> Result<Option<GroupMember>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .members
            .iter()
            .find(|m| m.group_id == group_id && m.user_id == user_id)
            .cloned())
    }

    async fn members(&self, group_id: i64) -> Result<Vec<GroupMember>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .members
            .iter()
            .filter(|m| m.group_id == group_id)
            .cloned()
            .collect())
    }

    async fn member_count(&self, group_id: i64) -> Result<u64, StoreError> {
        let state = self.state.lock().await;
        Ok(state.members.iter().filter(|m| m.group_id == group_id).count() as u64)
    }

    async fn add_member(
        &self,
        group_id: i64,
        user_id: i64,
        joined_at: DateTime<Utc>,
    ) -> Result<GroupMember, StoreError> {
        let mut state = self.state.lock().await;
        if state
            .members
            .iter()
            .any(|m| m.group_id == group_id && m.user_id == user_id)
        {
            return Err(StoreError::conflict("group_members_group_id_user_id_key"));
        }
        let member = GroupMember {
            group_id,
            user_id,
            joined_at,
        };
        state.members.push(member.clone());
        Ok(member)
    }

    async fn remove_member(&self, group_id: i64, user_id: i64) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        let before = state.members.len();
        state
            .members
            .retain(|m| !(m.group_id == group_id && m.user_id == user_id));
        Ok(state.members.len() < before)
    }

    async fn share_snippet(&self, share: GroupShare) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        if state
            .shares
            .iter()
            .any(|s| s.group_id == share.group_id && s.snippet_id == share.snippet_id)
        {
            return Ok(false);
        }
        state.shares.push(share);
        Ok(true)
    }

    async fn group_shares(&self, group_id: i64) -> Result<Vec<GroupShare>, StoreError> {
        let state = self.state.lock().await;
        let mut shares: Vec<GroupShare> = state
            .shares
            .iter()
            .filter(|s| s.group_id == group_id)
            .cloned()
            .collect();
        shares.sort_by(|a, b| b.shared_at.cmp(&a.shared_at));
        Ok(shares)
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn insert_message(&self, message: NewMessage) -> Result<DirectMessage, StoreError> {
        let mut state = self.state.lock().await;
        let id = state.next_id();
        let stored = DirectMessage {
            id,
            sender_id: message.sender_id,
            receiver_id: message.receiver_id,
            snippet_id: message.snippet_id,
            content: message.content,
            sent_at: message.sent_at,
        };
        state.messages.push(stored.clone());
        Ok(stored)
    }

    async fn inbox(&self, user_id: i64) -> Result<Vec<DirectMessage>, StoreError> {
        let state = self.state.lock().await;
        let mut messages: Vec<DirectMessage> = state
            .messages
            .iter()
            .filter(|m| m.receiver_id == user_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| b.sent_at.cmp(&a.sent_at).then(b.id.cmp(&a.id)));
        Ok(messages)
    }

    async fn sent(&self, user_id: i64) -> Result<Vec<DirectMessage>, StoreError> {
        let state = self.state.lock().await;
        let mut messages: Vec<DirectMessage> = state
            .messages
            .iter()
            .filter(|m| m.sender_id == user_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| b.sent_at.cmp(&a.sent_at).then(b.id.cmp(&a.id)));
        Ok(messages)
    }

    async fn conversation(
        &self,
        user_id: i64,
        other_id: i64,
    ) -> Result<Vec<DirectMessage>, StoreError> {
        let state = self.state.lock().await;
        let mut messages: Vec<DirectMessage> = state
            .messages
            .iter()
            .filter(|m| {
                (m.sender_id == user_id && m.receiver_id == other_id)
                    || (m.sender_id == other_id && m.receiver_id == user_id)
            })
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.sent_at.cmp(&b.sent_at).then(a.id.cmp(&b.id)));
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::snippet::ExpirationPolicy;

    fn draft(token: &str) -> SnippetDraft {
        SnippetDraft {
            token: token.to_string(),
            owner_id: 1,
            title: None,
            content: "body".to_string(),
            policy: ExpirationPolicy::None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_dropped_access_discards_writes() {
        let store = MemoryStore::new();
        let snippet = store.insert_snippet(draft("t1")).await.unwrap();

        let mut access = store.begin_access("t1").await.unwrap().unwrap();
        access.save_view_count(5).await.unwrap();
        access.append_view_log(9, Utc::now()).await.unwrap();
        assert_eq!(access.snippet().view_count, 5);
        drop(access);

        let stored = store.snippet_by_id(snippet.id).await.unwrap().unwrap();
        assert_eq!(stored.view_count, 0);
        assert!(store.view_logs(snippet.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_commit_applies_writes_once() {
        let store = MemoryStore::new();
        let snippet = store.insert_snippet(draft("t2")).await.unwrap();

        let mut access = store.begin_access("t2").await.unwrap().unwrap();
        access.save_view_count(1).await.unwrap();
        access.append_view_log(3, Utc::now()).await.unwrap();
        access.commit().await.unwrap();
        assert!(access.commit().await.is_err());
        drop(access);

        let stored = store.snippet_by_id(snippet.id).await.unwrap().unwrap();
        assert_eq!(stored.view_count, 1);
        assert_eq!(store.view_logs(snippet.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_views_expiration_logged_at_most_once() {
        let store = MemoryStore::new();
        store.insert_snippet(draft("t3")).await.unwrap();

        let mut access = store.begin_access("t3").await.unwrap().unwrap();
        access
            .append_expiration_log(ExpirationReason::Views, Utc::now())
            .await
            .unwrap();
        let err = access
            .append_expiration_log(ExpirationReason::Views, Utc::now())
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_begin_access_unknown_token() {
        let store = MemoryStore::new();
        assert!(store.begin_access("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_tag_conflicts() {
        let store = MemoryStore::new();
        store.create_tag("rust").await.unwrap();
        assert!(store.create_tag("rust").await.unwrap_err().is_conflict());
        assert!(store.create_tag("Rust").await.is_ok());
    }
}
