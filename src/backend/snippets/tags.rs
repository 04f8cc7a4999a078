//! Tag association for snippets.

use std::collections::HashSet;

use crate::backend::store::{StoreError, TagStore};
use crate::shared::snippet::Tag;

async fn find_or_create<S>(store: &S, name: &str) -> Result<Tag, StoreError>
where
    S: TagStore + ?Sized,
{
    if let Some(tag) = store.find_tag(name).await? {
        return Ok(tag);
    }
    match store.create_tag(name).await {
        Ok(tag) => Ok(tag),
        // Lost a creation race for the same name; the winner's row is there now.
        Err(err) if err.is_conflict() => store
            .find_tag(name)
            .await?
            .ok_or_else(|| StoreError::Corrupt(format!("tag '{name}' conflicted but is missing"))),
        Err(err) => Err(err),
    }
}

/// Attach each named tag to the snippet, creating tags on first use
///
/// Names are trimmed; blank names are skipped and exact repeats collapse.
/// Matching is case-sensitive. Linking an already-linked tag is a no-op.
/// Returns the tags in first-seen order.
pub async fn attach_tags<S, I, N>(store: &S, snippet_id: i64, names: I) -> Result<Vec<Tag>, StoreError>
where
    S: TagStore + ?Sized,
    I: IntoIterator<Item = N>,
    N: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut attached = Vec::new();

    for name in names {
        let name = name.as_ref().trim();
        if name.is_empty() || !seen.insert(name.to_string()) {
            continue;
        }
        let tag = find_or_create(store, name).await?;
        store.link_tag(snippet_id, tag.id).await?;
        attached.push(tag);
    }

    tracing::debug!(snippet_id, count = attached.len(), "tags attached");
    Ok(attached)
}
