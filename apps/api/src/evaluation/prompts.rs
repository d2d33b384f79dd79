// Query templates for the three evaluation views.
// Each template fixes the output schema (bold section headers followed by dash
// bullets) that `render::answer` parses. Replace `{content}` before sending.

pub const OVERVIEW_QUERY_TEMPLATE: &str = r#"Provide the output in the following format:

**Key qualifications and skills (top 3-5)**
- [Skill 1]
- [Skill 2]
- [Skill 3]

**Most relevant work experience (1-2 sentences)**
- [Brief description of most relevant experience]

**Educational background (if notable)**
- [Brief description of education]

**Standout achievements or unique selling points**
- [Achievement or unique selling point]

Be specific and quantitative where possible.
Tailor your analysis for a busy hiring manager who needs to quickly grasp the candidate's potential.

Resume content:
{content}"#;

pub const STRENGTHS_QUERY_TEMPLATE: &str = r#"Provide the output in the following format:

**Top 3 key strengths of the candidate**
- [Strength 1]: [Brief explanation]
- [Strength 2]: [Brief explanation]
- [Strength 3]: [Brief explanation]

**Top 2 unique selling points**
- [Unique selling point 1]
- [Unique selling point 2]

**Top 2 specific examples supporting strengths and selling points**
- [Example 1]
- [Example 2]

Please be concise and focus on the most impactful elements.

Resume content:
{content}"#;

pub const CONCERNS_QUERY_TEMPLATE: &str = r#"Provide the output in the following format:

**Potential areas of concern or red flags (2-3)**
- [Concern 1]: [Brief explanation]
- [Concern 2]: [Brief explanation]
- [Concern 3]: [Brief explanation]

**Critical missing information**
- [Missing information 1]
- [Missing information 2]

Provide brief explanations for each point.

Resume content:
{content}"#;

pub fn overview_query(content: &str) -> String {
    OVERVIEW_QUERY_TEMPLATE.replace("{content}", content)
}

pub fn strengths_query(content: &str) -> String {
    STRENGTHS_QUERY_TEMPLATE.replace("{content}", content)
}

pub fn concerns_query(content: &str) -> String {
    CONCERNS_QUERY_TEMPLATE.replace("{content}", content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::answer::parse_answer;

    const CONTENT: &str = "Jane Doe. Skills: Python, Go.";

    #[test]
    fn test_queries_embed_content_at_the_end() {
        for query in [overview_query(CONTENT), strengths_query(CONTENT), concerns_query(CONTENT)] {
            assert!(query.ends_with("Resume content:\nJane Doe. Skills: Python, Go."));
            assert!(!query.contains("{content}"));
        }
    }

    #[test]
    fn test_overview_schema_has_four_sections() {
        let parsed = parse_answer(&overview_query(CONTENT));
        let titles: Vec<&str> = parsed.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Key qualifications and skills (top 3-5)",
                "Most relevant work experience (1-2 sentences)",
                "Educational background (if notable)",
                "Standout achievements or unique selling points",
            ]
        );
    }

    #[test]
    fn test_strengths_and_concerns_schemas_parse() {
        assert_eq!(parse_answer(&strengths_query(CONTENT)).sections.len(), 3);
        let concerns = parse_answer(&concerns_query(CONTENT));
        assert_eq!(concerns.sections.len(), 2);
        assert_eq!(concerns.sections[1].title, "Critical missing information");
    }
}
