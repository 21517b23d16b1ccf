pub mod blocks;
pub mod sections;
pub mod tree;

use crate::store::{ContentStore, StoreError};
use sections::Markers;

/// Two-pass pipeline: block tree → flattened lines → topics text.
///
/// `None` means the page has no renderable body at all; an empty string means
/// there was a body but nothing to extract from it.
pub async fn planned_topics<S>(
    store: &S,
    root_id: &str,
    markers: &Markers,
) -> Result<Option<String>, StoreError>
where
    S: ContentStore + ?Sized,
{
    let lines = tree::flatten(store, root_id).await?;
    if lines.is_empty() {
        return Ok(None);
    }
    Ok(Some(sections::extract_topics(&lines, markers)))
}
