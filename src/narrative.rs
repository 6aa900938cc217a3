//! Narrative-text-to-structured-block parser.
//!
//! Converts the free-form narrative string supplied by the report-writing
//! collaborator into typed [`Block`]s. Lines are classified one at a time by
//! a small state machine holding two mutually exclusive accumulators
//! (paragraph, bullets); heading lines are emitted immediately. The parser
//! keeps no state across calls.

use crate::core::Block;
use once_cell::sync::Lazy;
use regex::Regex;

// Ordered-list bullet marker: "1. item" or "2) item".
static ORDERED_BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[.)]\s").unwrap());

/// Parse narrative text into heading / paragraph / bullet blocks.
pub fn parse(text: &str) -> Vec<Block> {
    let mut classifier = LineClassifier::new();
    for line in text.lines() {
        classifier.feed(line);
    }
    classifier.finish()
}

/// Line-by-line block classifier.
///
/// The two buffers never hold content at the same time: a bullet line
/// flushes the paragraph buffer, a paragraph line flushes the bullet
/// buffer, and blank lines or headings flush both.
struct LineClassifier {
    blocks: Vec<Block>,
    paragraph: Vec<String>,
    bullets: Vec<String>,
}

impl LineClassifier {
    fn new() -> Self {
        Self {
            blocks: Vec::new(),
            paragraph: Vec::new(),
            bullets: Vec::new(),
        }
    }

    fn feed(&mut self, raw: &str) {
        let line = strip_decoration(raw);
        if line.is_empty() {
            self.flush_paragraph();
            self.flush_bullets();
            return;
        }

        if let Some(item) = bullet_item(&line) {
            self.flush_paragraph();
            self.bullets.push(item);
        } else if is_heading(&line) {
            self.flush_paragraph();
            self.flush_bullets();
            self.blocks.push(heading_block(&line));
        } else {
            self.flush_bullets();
            self.paragraph.push(line);
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush_paragraph();
        self.flush_bullets();
        self.blocks
    }

    fn flush_paragraph(&mut self) {
        if !self.paragraph.is_empty() {
            let text = self.paragraph.join(" ");
            self.paragraph.clear();
            self.blocks.push(Block::Paragraph(text));
        }
    }

    fn flush_bullets(&mut self) {
        if !self.bullets.is_empty() {
            let items = std::mem::take(&mut self.bullets);
            self.blocks.push(Block::Bullets(items));
        }
    }
}

/// Remove markdown decoration the collaborator tends to emit: leading `#`
/// heading markers, `>` quote markers, and `**`/`__` emphasis pairs. Bullet
/// markers survive so classification can still see them.
fn strip_decoration(line: &str) -> String {
    let without_prefix = line
        .trim()
        .trim_start_matches(|c| c == '#' || c == '>')
        .trim_start();
    without_prefix
        .replace("**", "")
        .replace("__", "")
        .trim()
        .to_string()
}

/// Bullet content when the line carries a bullet marker, `None` otherwise.
fn bullet_item(line: &str) -> Option<String> {
    for marker in ['-', '*', '\u{2022}'] {
        if let Some(rest) = line.strip_prefix(marker) {
            return Some(rest.trim_start().to_string());
        }
    }
    ORDERED_BULLET
        .find(line)
        .map(|m| line[m.end()..].trim_start().to_string())
}

// Heading heuristics, evaluated in this fixed order.
fn is_heading(line: &str) -> bool {
    ends_with_colon(line) || is_all_caps(line) || is_title_case(line)
}

// "Results:" style label lines.
fn ends_with_colon(line: &str) -> bool {
    line.ends_with(':') && line.chars().count() <= 90
}

// Short shouted lines: every alphabetic character uppercase.
fn is_all_caps(line: &str) -> bool {
    if line.split_whitespace().count() > 8 || line.chars().count() > 72 {
        return false;
    }
    let mut has_alpha = false;
    for c in line.chars() {
        if c.is_alphabetic() {
            has_alpha = true;
            if !c.is_uppercase() {
                return false;
            }
        }
    }
    has_alpha
}

// Short lines where every cased word starts uppercase and continues
// lowercase. Words without alphabetic characters are ignored.
fn is_title_case(line: &str) -> bool {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() || words.len() > 8 {
        return false;
    }
    let mut has_cased_word = false;
    for word in words {
        let mut alpha = word.chars().filter(|c| c.is_alphabetic());
        match alpha.next() {
            Some(first) => {
                if !first.is_uppercase() || alpha.any(|c| !c.is_lowercase()) {
                    return false;
                }
                has_cased_word = true;
            }
            None => continue,
        }
    }
    has_cased_word
}

fn heading_block(line: &str) -> Block {
    let text = line.trim_end_matches(':').trim_end().to_string();
    let level = if text.split_whitespace().count() <= 4 {
        1
    } else {
        2
    };
    Block::Heading { level, text }
}
