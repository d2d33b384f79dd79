//! Presentation of pipeline outcomes as HTML fragments.

pub mod answer;
pub mod html;

use tracing::debug;

use crate::evaluation::pipeline::PipelineResult;
use crate::evaluation::views::View;

use self::answer::parse_answer;
use self::html::{render_answer, render_notice};

/// Exactly one fragment per outcome: the parsed answer, a guidance line, or an error line.
pub fn render_outcome(view: View, result: &PipelineResult) -> String {
    match result {
        PipelineResult::Ready(answer) => {
            let parsed = parse_answer(&answer.text);
            if parsed.is_unstructured() {
                debug!(view = %view, "Answer has no section headers; rendering as plain paragraphs");
            }
            render_answer(view.title(), &parsed)
        }
        PipelineResult::Blocked(reason) => render_notice(reason.guidance()),
        PipelineResult::Failed(err) => render_notice(&format!("Error: {}", err.user_message())),
    }
}
