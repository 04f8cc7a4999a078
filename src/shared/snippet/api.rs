/**
 * Snippet API Types
 *
 * Request and response payloads for the snippet endpoints. Field names are
 * camelCase on the wire; timestamps use the display format from
 * `shared::time`.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;
use crate::shared::snippet::{
    ExpirationKind, ExpirationLogEntry, ExpirationPolicy, NewSnippet, Quota, Snippet,
    ViewLogEntry,
};
use crate::shared::time::display_timestamp;

/// Create snippet request
///
/// `expirationType` is `"TIME"`, `"VIEWS"` or absent. `expirationValue` is
/// seconds for TIME and a view limit for VIEWS; zero means unrestricted.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateSnippetRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub expiration_type: Option<String>,
    #[serde(default)]
    pub expiration_value: Option<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreateSnippetRequest {
    /// Decode the wire expiration fields into a `NewSnippet`
    ///
    /// Content, title and tag rules are enforced when the snippet is created.
    ///
    /// # Errors
    ///
    /// * `ValidationError` - negative expiration value
    /// * `PolicyError` - unknown expiration type
    pub fn into_new_snippet(self) -> Result<NewSnippet, SharedError> {
        let value = match self.expiration_value {
            Some(v) if v < 0 => {
                return Err(SharedError::validation(
                    "expirationValue",
                    "Expiration value must not be negative",
                ))
            }
            Some(v) => Some(v as u64),
            None => None,
        };
        let policy = ExpirationPolicy::from_wire(self.expiration_type.as_deref(), value)?;

        Ok(NewSnippet {
            title: self.title,
            content: self.content,
            policy,
            tags: self.tags,
        })
    }
}

/// Query parameters for viewing a snippet
#[derive(Deserialize, Debug, Default, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct ViewParams {
    /// Evaluate and return without counting the view
    #[serde(default)]
    pub skip_increment: bool,
}

/// Public author information attached to snippets
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AuthorInfo {
    pub uuid: String,
    pub username: String,
}

/// Snippet as rendered to clients
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SnippetResponse {
    pub uuid: String,
    pub title: Option<String>,
    pub content: String,
    pub expiration_type: Option<ExpirationKind>,
    pub expiration_value: u64,
    pub created_at: String,
    pub expiry_date: String,
    pub view_count: u64,
    /// `None` when the author no longer exists
    pub author: Option<AuthorInfo>,
    pub tags: Vec<String>,
    #[serde(rename = "isAccessible")]
    pub is_accessible: bool,
    pub remaining_views: u64,
    pub remaining_seconds: u64,
}

impl SnippetResponse {
    /// Render a snippet with its computed accessibility and quota at `now`
    pub fn build(
        snippet: &Snippet,
        author: Option<AuthorInfo>,
        tags: Vec<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self::with_quota(
            snippet,
            author,
            tags,
            snippet.remaining(now),
            snippet.is_accessible(now),
        )
    }

    /// Render with an accessibility decision and quota already computed
    pub fn with_quota(
        snippet: &Snippet,
        author: Option<AuthorInfo>,
        tags: Vec<String>,
        quota: Quota,
        is_accessible: bool,
    ) -> Self {
        Self {
            uuid: snippet.token.clone(),
            title: snippet.title.clone(),
            content: snippet.content.clone(),
            expiration_type: snippet.policy.kind(),
            expiration_value: snippet.policy.threshold(),
            created_at: display_timestamp(&snippet.created_at),
            expiry_date: display_timestamp(&snippet.expiry_date()),
            view_count: snippet.view_count,
            author,
            tags,
            is_accessible,
            remaining_views: quota.remaining_views,
            remaining_seconds: quota.remaining_seconds,
        }
    }
}

/// Body of `GET /api/code/{token}`
///
/// `author` and `tags` repeat what `snippet` carries, at the top level.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SnippetViewResponse {
    pub snippet: SnippetResponse,
    pub author: Option<AuthorInfo>,
    pub tags: Vec<String>,
}

impl From<SnippetResponse> for SnippetViewResponse {
    fn from(snippet: SnippetResponse) -> Self {
        Self {
            author: snippet.author.clone(),
            tags: snippet.tags.clone(),
            snippet,
        }
    }
}

/// Body of `GET /api/code/latest`; `authors[i]` wrote `snippets[i]`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct LatestSnippetsResponse {
    pub snippets: Vec<SnippetResponse>,
    pub authors: Vec<Option<AuthorInfo>>,
}

impl From<Vec<SnippetResponse>> for LatestSnippetsResponse {
    fn from(snippets: Vec<SnippetResponse>) -> Self {
        Self {
            authors: snippets.iter().map(|s| s.author.clone()).collect(),
            snippets,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ViewLogResponse {
    /// Public uuid of the viewer, `None` if the account is gone
    pub viewer: Option<String>,
    pub viewed_at: String,
}

impl ViewLogResponse {
    pub fn build(entry: &ViewLogEntry, viewer: Option<String>) -> Self {
        Self {
            viewer,
            viewed_at: display_timestamp(&entry.viewed_at),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExpirationLogResponse {
    pub reason: String,
    pub expired_at: String,
}

impl From<&ExpirationLogEntry> for ExpirationLogResponse {
    fn from(entry: &ExpirationLogEntry) -> Self {
        Self {
            reason: entry.reason.as_str().to_string(),
            expired_at: display_timestamp(&entry.expired_at),
        }
    }
}

/// Owner-only access statistics for one snippet
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SnippetStatsResponse {
    pub uuid: String,
    pub view_count: u64,
    pub is_deleted: bool,
    #[serde(rename = "isAccessible")]
    pub is_accessible: bool,
    pub remaining_views: u64,
    pub remaining_seconds: u64,
    pub view_logs: Vec<ViewLogResponse>,
    pub expiration_logs: Vec<ExpirationLogResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request(kind: Option<&str>, value: Option<i64>) -> CreateSnippetRequest {
        CreateSnippetRequest {
            title: Some("  ".to_string()),
            content: "print('hi')".to_string(),
            expiration_type: kind.map(str::to_string),
            expiration_value: value,
            tags: vec![],
        }
    }

    #[test]
    fn test_request_parsing() {
        let json = r#"{"content":"x","expirationType":"VIEWS","expirationValue":3,"tags":["a"]}"#;
        let req: CreateSnippetRequest = serde_json::from_str(json).unwrap();
        let new = req.into_new_snippet().unwrap();
        assert_eq!(new.policy, ExpirationPolicy::Views(3));
        assert_eq!(new.tags, vec!["a".to_string()]);
        assert_eq!(new.title, None);
    }

    #[test]
    fn test_null_type_means_unrestricted() {
        let json = r#"{"content":"x","expirationType":null,"expirationValue":60}"#;
        let req: CreateSnippetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.into_new_snippet().unwrap().policy, ExpirationPolicy::None);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            request(Some("WEEKS"), Some(1)).into_new_snippet(),
            Err(SharedError::PolicyError { .. })
        ));
        assert!(matches!(
            request(Some("TIME"), Some(-5)).into_new_snippet(),
            Err(SharedError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_content_and_title_pass_through_untouched() {
        let mut req = request(None, None);
        req.content = " \n\t".to_string();
        let new = req.into_new_snippet().unwrap();
        assert_eq!(new.content, " \n\t");
        assert_eq!(new.title.as_deref(), Some("  "));
    }

    #[test]
    fn test_response_serializes_is_accessible() {
        let snippet = Snippet {
            id: 7,
            token: "abc".to_string(),
            owner_id: 1,
            title: None,
            content: "body".to_string(),
            policy: ExpirationPolicy::Time(60),
            created_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            view_count: 0,
            is_deleted: false,
        };
        let response = SnippetResponse::build(&snippet, None, vec![], snippet.created_at);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["isAccessible"], true);
        assert_eq!(value["expirationType"], "TIME");
        assert_eq!(value["remainingSeconds"], 60);
        assert_eq!(value["createdAt"], "2024/01/02 03:04:05");
        assert_eq!(value["expiryDate"], "2024/01/02 03:05:05");
        assert!(value["author"].is_null());
    }

    #[test]
    fn test_envelopes_lift_author_and_tags() {
        let author = AuthorInfo {
            uuid: "u-1".to_string(),
            username: "alice".to_string(),
        };
        let snippet = Snippet {
            id: 1,
            token: "tok".to_string(),
            owner_id: 1,
            title: None,
            content: "body".to_string(),
            policy: ExpirationPolicy::None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            view_count: 4,
            is_deleted: false,
        };
        let rendered = SnippetResponse::build(
            &snippet,
            Some(author.clone()),
            vec!["rust".to_string()],
            snippet.created_at,
        );

        let view = serde_json::to_value(SnippetViewResponse::from(rendered.clone())).unwrap();
        assert_eq!(view["snippet"]["viewCount"], 4);
        assert_eq!(view["author"]["username"], "alice");
        assert_eq!(view["tags"][0], "rust");

        let latest = LatestSnippetsResponse::from(vec![rendered]);
        assert_eq!(latest.authors, vec![Some(author)]);
        let latest = serde_json::to_value(latest).unwrap();
        assert_eq!(latest["snippets"][0]["uuid"], "tok");
    }
}
