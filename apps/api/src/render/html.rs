use crate::render::answer::{Block, ParsedAnswer};

const SECTION_STYLE: &str = "color: #4A90E2;";
const NOTICE_STYLE: &str = "text-align: center;color: #4A90E2;";

/// Escape HTML special characters. Model output is untrusted.
pub fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Escapes `text`, then turns balanced `**bold**` runs into `<strong>`.
/// An unmatched trailing `**` is kept literally.
pub fn render_inline(text: &str) -> String {
    let escaped = html_escape(text);
    let parts: Vec<&str> = escaped.split("**").collect();
    let mut out = String::with_capacity(escaped.len());
    let last = parts.len() - 1;
    for (i, part) in parts.iter().enumerate() {
        let inside_bold = i % 2 == 1;
        if inside_bold && i == last {
            out.push_str("**");
            out.push_str(part);
        } else if inside_bold {
            out.push_str("<strong>");
            out.push_str(part);
            out.push_str("</strong>");
        } else {
            out.push_str(part);
        }
    }
    out
}

fn push_blocks(out: &mut String, blocks: &[Block]) {
    for block in blocks {
        match block {
            Block::Bullets(items) => {
                out.push_str("<ul>");
                for item in items {
                    out.push_str("<li>");
                    out.push_str(&render_inline(item));
                    out.push_str("</li>");
                }
                out.push_str("</ul>");
            }
            Block::Paragraph(text) => {
                out.push_str("<p>");
                out.push_str(&render_inline(text));
                out.push_str("</p>");
            }
        }
    }
}

/// Result fragment: view heading, then one styled sub-heading per section.
pub fn render_answer(title: &str, answer: &ParsedAnswer) -> String {
    let mut out = format!("<div class='output-text'><h4>{}</h4>", html_escape(title));
    push_blocks(&mut out, &answer.preamble);
    for section in &answer.sections {
        out.push_str(&format!(
            "<h5 style='{SECTION_STYLE}'>{}</h5>",
            html_escape(&section.title)
        ));
        push_blocks(&mut out, &section.blocks);
    }
    out.push_str("</div>");
    out
}

/// Centered one-line notice used for guidance and errors.
pub fn render_notice(message: &str) -> String {
    format!("<h5 style=\"{NOTICE_STYLE}\">{}</h5>", html_escape(message))
}
