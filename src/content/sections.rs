use std::sync::LazyLock;

use regex::Regex;

use super::tree::FlattenedLine;

static HEADER_MARK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#+[ \t]*").unwrap());

/// Lowercase substrings that open and close the topics section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    /// Found in a heading: start collecting after it.
    pub topic: String,
    /// Found in any line: stop, excluding that line.
    pub stop: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            topic: "topic".to_string(),
            stop: "pre-recording".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    SeekingTopic,
    Collecting,
    Done,
}

/// Pull the planned topics out of a flattened page.
///
/// Markers are matched per top-level block: a numbered item and its sub-items
/// are kept or dropped together. Until a topic heading shows up, non-blank
/// blocks are collected anyway, so a page without one yields everything before
/// the stop marker. Those blocks stay in the output even if a topic heading
/// follows later.
pub fn extract_topics(lines: &[FlattenedLine], markers: &Markers) -> String {
    let mut state = State::SeekingTopic;
    let mut collected = String::new();

    for block in lines.chunk_by(|a, b| a.block == b.block) {
        state = step(state, block, markers, &mut collected);
        if state == State::Done {
            break;
        }
    }

    HEADER_MARK_RE
        .replace_all(&collected, "")
        .trim()
        .to_string()
}

fn step(state: State, block: &[FlattenedLine], markers: &Markers, collected: &mut String) -> State {
    let text: String = block.iter().map(|line| line.text.as_str()).collect();
    let lower = text.to_lowercase();

    if block[0].kind.is_heading() && lower.contains(&markers.topic) {
        return State::Collecting;
    }
    if lower.contains(&markers.stop) {
        return State::Done;
    }

    match state {
        State::Collecting => collected.push_str(&text),
        State::SeekingTopic if !block.iter().all(FlattenedLine::is_blank) => {
            collected.push_str(&text)
        }
        _ => {}
    }
    state
}
