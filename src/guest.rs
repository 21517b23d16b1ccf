use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::content::{self, sections::Markers};
use crate::store::{Candidate, ContentStore, StoreError};

/// The page picked for a surname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestRecord {
    pub id: String,
    pub full_name: String,
    pub recording_date: Option<String>,
    /// Block whose children make up the page body. Same as `id` for Notion pages.
    pub root_node_id: String,
}

/// What callers of the lookup get back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestData {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recording_date: Option<String>,
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("guest query failed")]
    Query(#[source] StoreError),
    #[error("could not read page {page_id}")]
    Content {
        page_id: String,
        #[source]
        source: StoreError,
    },
}

/// Find the guest whose last name token is exactly `surname` (ignoring case).
///
/// `Ok(None)` covers both "no candidates" and "candidates, but none match".
pub async fn resolve<S>(store: &S, surname: &str) -> Result<Option<GuestRecord>, LookupError>
where
    S: ContentStore + ?Sized,
{
    let candidates = store
        .query_by_name(surname)
        .await
        .map_err(LookupError::Query)?;
    debug!("{} candidates for {:?}", candidates.len(), surname);

    Ok(candidates
        .into_iter()
        .find_map(|candidate| exact_match(candidate, surname)))
}

fn exact_match(candidate: Candidate, surname: &str) -> Option<GuestRecord> {
    let full_name = candidate.full_name?;
    if !last_token_matches(&full_name, surname) {
        return None;
    }
    Some(GuestRecord {
        root_node_id: candidate.id.clone(),
        id: candidate.id,
        full_name,
        recording_date: candidate.recording_date,
    })
}

fn last_token_matches(full_name: &str, surname: &str) -> bool {
    full_name
        .split_whitespace()
        .last()
        .is_some_and(|last| last.to_lowercase() == surname.to_lowercase())
}

/// Resolve `surname` and extract the topics from the guest's page.
pub async fn lookup_guest<S>(
    store: &S,
    surname: &str,
    markers: &Markers,
) -> Result<Option<GuestData>, LookupError>
where
    S: ContentStore + ?Sized,
{
    let Some(record) = resolve(store, surname).await? else {
        info!("No guest matches {:?}", surname);
        return Ok(None);
    };

    let page_content = content::planned_topics(store, &record.root_node_id, markers)
        .await
        .map_err(|source| LookupError::Content {
            page_id: record.id.clone(),
            source,
        })?;

    info!(
        guest = %record.full_name,
        chars = page_content.as_ref().map_or(0, |c| c.len()),
        "Resolved guest"
    );

    Ok(Some(GuestData {
        id: record.id,
        name: record.full_name,
        page_content,
        recording_date: record.recording_date,
    }))
}
