//! Answer parser: a line-oriented scanner for the header + bullet schema the
//! query templates request.
//!
//! Grammar (one classification per line, after trimming):
//!
//! ```text
//! answer       := preamble section*
//! preamble     := block*
//! section      := header block*
//! rule         := "-"+ | "***" "*"* | "___" "_"*  treated as a blank line
//! header       := "**" title "**" trailing      title non-empty
//! block        := bullets | paragraph
//! bullets      := bullet+
//! bullet       := marker text continuation*     empty bullets are dropped
//! marker       := "-" | "* " | digit{1,2} ". "
//! continuation := text line directly after a bullet, joined with one space
//! paragraph    := consecutive text lines, ended by a blank line
//! ```
//!
//! `trailing` text on a header line (minus a leading `:`) opens the section as
//! a paragraph. Nothing here fails: unrecognised input ends up in paragraphs.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Block {
    Bullets(Vec<String>),
    Paragraph(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: String,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedAnswer {
    /// Blocks that appear before the first header.
    pub preamble: Vec<Block>,
    pub sections: Vec<Section>,
}

impl ParsedAnswer {
    /// True when no header was recognised.
    pub fn is_unstructured(&self) -> bool {
        self.sections.is_empty()
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Header { title: &'a str, trailing: &'a str },
    Bullet(&'a str),
    Text(&'a str),
}

fn classify(raw: &str) -> Line<'_> {
    let line = raw.trim();
    if line.is_empty() || is_rule(line) {
        return Line::Blank;
    }
    if let Some(rest) = line.strip_prefix("**") {
        if let Some(end) = rest.find("**") {
            let title = rest[..end].trim();
            if !title.is_empty() {
                let trailing = rest[end + 2..].trim_start();
                let trailing = trailing.strip_prefix(':').unwrap_or(trailing).trim();
                return Line::Header { title, trailing };
            }
        }
    }
    match bullet_text(line) {
        Some(rest) => Line::Bullet(rest.trim()),
        None => Line::Text(line),
    }
}

/// Markdown horizontal rule. A lone `-` is an empty bullet, which is also dropped.
fn is_rule(line: &str) -> bool {
    let all = |c: char| line.chars().all(|x| x == c);
    all('-') || (line.len() >= 3 && (all('*') || all('_')))
}

fn bullet_text(line: &str) -> Option<&str> {
    if let Some(rest) = line.strip_prefix('-') {
        return Some(rest);
    }
    if let Some(rest) = line.strip_prefix("* ") {
        return Some(rest);
    }
    let digits = line.find(|c: char| !c.is_ascii_digit())?;
    if (1..=2).contains(&digits) {
        return line[digits..].strip_prefix(". ");
    }
    None
}

struct Builder {
    blocks: Vec<Block>,
    /// Whether the next text line continues the last block.
    continuing: bool,
}

impl Builder {
    fn new() -> Self {
        Self {
            blocks: Vec::new(),
            continuing: false,
        }
    }

    fn bullet(&mut self, text: &str) {
        if text.is_empty() {
            // A bare dash opens nothing; following text starts a paragraph.
            self.continuing = false;
            return;
        }
        match self.blocks.last_mut() {
            Some(Block::Bullets(items)) => items.push(text.to_string()),
            _ => self.blocks.push(Block::Bullets(vec![text.to_string()])),
        }
        self.continuing = true;
    }

    fn text(&mut self, text: &str) {
        if self.continuing {
            let last = match self.blocks.last_mut() {
                Some(Block::Bullets(items)) => items.last_mut(),
                Some(Block::Paragraph(p)) => Some(p),
                None => None,
            };
            if let Some(last) = last {
                last.push(' ');
                last.push_str(text);
                return;
            }
        }
        self.blocks.push(Block::Paragraph(text.to_string()));
        self.continuing = true;
    }

    fn blank(&mut self) {
        self.continuing = false;
    }

    fn finish(self) -> Vec<Block> {
        self.blocks
    }
}

pub fn parse_answer(answer: &str) -> ParsedAnswer {
    let mut parsed = ParsedAnswer::default();
    let mut current_title: Option<String> = None;
    let mut builder = Builder::new();

    for raw in answer.lines() {
        match classify(raw) {
            Line::Blank => builder.blank(),
            Line::Bullet(text) => builder.bullet(text),
            Line::Text(text) => builder.text(text),
            Line::Header { title, trailing } => {
                let blocks = std::mem::replace(&mut builder, Builder::new()).finish();
                match current_title.take() {
                    Some(t) => parsed.sections.push(Section { title: t, blocks }),
                    None => parsed.preamble = blocks,
                }
                current_title = Some(title.to_string());
                if !trailing.is_empty() {
                    builder.text(trailing);
                    builder.blank();
                }
            }
        }
    }

    let blocks = builder.finish();
    match current_title {
        Some(title) => parsed.sections.push(Section { title, blocks }),
        None => parsed.preamble = blocks,
    }
    parsed
}
