// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains the cross-cutting question-answering frame.

/// System prompt for question answering over retrieved passages.
/// Replace `{context}` with the passages, separated by blank lines.
pub const QA_CONTEXT_SYSTEM_TEMPLATE: &str = "\
Use the following pieces of context to answer the user's question. \n\
If you don't know the answer, just say that you don't know, don't try to make up an answer.\n\
----------------\n\
{context}";

/// Separator placed between retrieved passages inside `{context}`.
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Fills the QA system template with the given passages, in order.
pub fn build_qa_system<'a>(passages: impl IntoIterator<Item = &'a str>) -> String {
    let context = passages.into_iter().collect::<Vec<_>>().join(CONTEXT_SEPARATOR);
    QA_CONTEXT_SYSTEM_TEMPLATE.replace("{context}", &context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_qa_system_joins_passages_with_blank_line() {
        let system = build_qa_system(["Jane Doe.", "Skills: Python, Go."]);
        assert!(system.ends_with("----------------\nJane Doe.\n\nSkills: Python, Go."));
        assert!(system.starts_with("Use the following pieces of context"));
    }

    #[test]
    fn test_build_qa_system_with_no_passages_keeps_frame() {
        let system = build_qa_system(std::iter::empty());
        assert!(system.ends_with("----------------\n"));
    }
}
