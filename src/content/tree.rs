use tracing::warn;

use super::blocks::{format_block, resets_numbering, Depth};
use crate::store::{ContentNode, ContentStore, NodeKind, StoreError};

/// One rendered fragment, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenedLine {
    pub kind: NodeKind,
    pub depth: Depth,
    /// Index of the top-level node this line belongs to. Sub-items share
    /// their top-level parent's index.
    pub block: usize,
    pub text: String,
}

impl FlattenedLine {
    fn new(node: &ContentNode, depth: Depth, block: usize, text: String) -> Self {
        Self {
            kind: node.kind.clone(),
            depth,
            block,
            text,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Walk the children of `root_id` (three levels at most) into document-ordered lines.
///
/// Only the root listing can fail the walk; a failed sub-list is logged and
/// left out.
pub async fn flatten<S>(store: &S, root_id: &str) -> Result<Vec<FlattenedLine>, StoreError>
where
    S: ContentStore + ?Sized,
{
    let nodes = store.list_children(root_id).await?;
    let mut lines = Vec::with_capacity(nodes.len());
    let mut position = 1;

    for (block, node) in nodes.iter().enumerate() {
        if resets_numbering(node) {
            position = 1;
        }
        let Some(text) = format_block(node, Depth::Page, position) else {
            continue;
        };
        lines.push(FlattenedLine::new(node, Depth::Page, block, text));

        if node.kind == NodeKind::NumberedItem {
            if node.has_children {
                child_lines(store, &node.id, block, &mut lines).await;
            }
            position += 1;
        }
    }

    Ok(lines)
}

/// Lettered sub-items of a top-level numbered item.
async fn child_lines<S>(store: &S, parent_id: &str, block: usize, lines: &mut Vec<FlattenedLine>)
where
    S: ContentStore + ?Sized,
{
    let Some(children) = sub_list(store, parent_id, Depth::Child).await else {
        return;
    };

    let mut position = 1;
    for child in &children {
        let Some(text) = format_block(child, Depth::Child, position) else {
            continue;
        };
        lines.push(FlattenedLine::new(child, Depth::Child, block, text));
        if child.has_children {
            grandchild_lines(store, &child.id, block, lines).await;
        }
        position += 1;
    }
}

async fn grandchild_lines<S>(
    store: &S,
    parent_id: &str,
    block: usize,
    lines: &mut Vec<FlattenedLine>,
)
where
    S: ContentStore + ?Sized,
{
    let Some(children) = sub_list(store, parent_id, Depth::Grandchild).await else {
        return;
    };

    let mut position = 1;
    for child in &children {
        if let Some(text) = format_block(child, Depth::Grandchild, position) {
            lines.push(FlattenedLine::new(child, Depth::Grandchild, block, text));
            position += 1;
        }
    }
}

async fn sub_list<S>(store: &S, parent_id: &str, depth: Depth) -> Option<Vec<ContentNode>>
where
    S: ContentStore + ?Sized,
{
    match store.list_children(parent_id).await {
        Ok(nodes) => Some(nodes),
        Err(e) => {
            warn!(parent_id, ?depth, "Omitting sub-list: {}", e);
            None
        }
    }
}
