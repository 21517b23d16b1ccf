pub mod notion;

use async_trait::async_trait;
use thiserror::Error;

pub use notion::NotionClient;

/// Failure talking to the content store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("content store request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("content store returned {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
    #[error("unexpected content store payload: {0}")]
    Decode(String),
}

impl StoreError {
    /// Setup advice for the API errors a misconfigured install runs into.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            StoreError::Api { code, .. } if code == "unauthorized" => {
                Some("Authentication failed. Please check your NOTION_TOKEN")
            }
            StoreError::Api { code, .. } if code == "object_not_found" => {
                Some("Database not found. Please check your NOTION_DATABASE_ID")
            }
            _ => None,
        }
    }
}

/// Block types the flattener knows how to render. Anything else the store
/// returns is kept as `Unsupported` and never rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Paragraph,
    Heading(u8),
    BulletedItem,
    NumberedItem,
    CheckboxItem { checked: bool },
    Quote,
    Toggle,
    Callout,
    Unsupported(String),
}

impl NodeKind {
    pub fn is_heading(&self) -> bool {
        matches!(self, NodeKind::Heading(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentNode {
    pub id: String,
    pub kind: NodeKind,
    pub text_runs: Vec<String>,
    pub has_children: bool,
}

impl ContentNode {
    /// Inline runs joined in order, no separator.
    pub fn text(&self) -> String {
        self.text_runs.concat()
    }

    /// True only when the node has no runs at all. A run list holding empty
    /// strings still counts as text and renders (e.g. `"1. \n"`).
    pub fn is_empty(&self) -> bool {
        self.text_runs.is_empty()
    }
}

/// A record returned by the name query, before disambiguation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: String,
    /// `None` when the name property has no extractable text.
    pub full_name: Option<String>,
    pub recording_date: Option<String>,
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Records whose name field contains `fragment` (case-insensitive, store-side).
    async fn query_by_name(&self, fragment: &str) -> Result<Vec<Candidate>, StoreError>;

    /// Direct children of `node_id`, in document order.
    async fn list_children(&self, node_id: &str) -> Result<Vec<ContentNode>, StoreError>;
}
