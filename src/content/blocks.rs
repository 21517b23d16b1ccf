use crate::store::{ContentNode, NodeKind};

/// How far below the page root a node sits. Nothing deeper than
/// `Grandchild` is ever fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    Page,
    Child,
    Grandchild,
}

impl Depth {
    fn indent(self) -> &'static str {
        match self {
            Depth::Page => "",
            Depth::Child => "  ",
            Depth::Grandchild => "    ",
        }
    }

    /// List marker for the `position`-th (1-based) numbered item at this depth.
    fn label(self, position: usize) -> String {
        match self {
            Depth::Child => letter_label(position),
            Depth::Page | Depth::Grandchild => position.to_string(),
        }
    }
}

/// Render one node as a text fragment. `position` is the caller's running
/// counter for numbered items at this depth and is ignored for other kinds.
///
/// Below the page level only numbered items are rendered. Returns `None` for
/// nodes that produce no output.
pub fn format_block(node: &ContentNode, depth: Depth, position: usize) -> Option<String> {
    if depth != Depth::Page {
        return match node.kind {
            NodeKind::NumberedItem if !node.is_empty() => Some(format!(
                "{}{}. {}\n",
                depth.indent(),
                depth.label(position),
                node.text()
            )),
            _ => None,
        };
    }

    if node.is_empty() {
        // Empty paragraphs survive as vertical spacing.
        return match node.kind {
            NodeKind::Paragraph => Some("\n".to_string()),
            _ => None,
        };
    }

    let text = node.text();
    let fragment = match &node.kind {
        NodeKind::Paragraph | NodeKind::Toggle | NodeKind::Callout => format!("{text}\n\n"),
        NodeKind::Heading(level) => format!("{} {text}\n\n", "#".repeat(*level as usize)),
        NodeKind::BulletedItem => format!("• {text}\n"),
        NodeKind::NumberedItem => format!("{}. {text}\n", depth.label(position)),
        NodeKind::CheckboxItem { checked } => {
            let mark = if *checked { "☑ " } else { "☐ " };
            format!("  {mark}{text}\n")
        }
        NodeKind::Quote => format!("> {text}\n\n"),
        NodeKind::Unsupported(_) => return None,
    };
    Some(fragment)
}

/// Whether `node` ends a run of top-level numbered items.
pub fn resets_numbering(node: &ContentNode) -> bool {
    match node.kind {
        NodeKind::Paragraph => true,
        NodeKind::Heading(_) => !node.is_empty(),
        _ => false,
    }
}

/// 1 → a, 26 → z, 27 → aa.
fn letter_label(mut position: usize) -> String {
    let mut letters = Vec::new();
    while position > 0 {
        position -= 1;
        letters.push(char::from(b'a' + (position % 26) as u8));
        position /= 26;
    }
    letters.iter().rev().collect()
}
