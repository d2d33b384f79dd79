use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::evaluation::prompts::{concerns_query, overview_query, strengths_query};

/// The three mutually exclusive evaluation views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Overview,
    Strengths,
    Concerns,
}

impl View {
    pub const ALL: [View; 3] = [View::Overview, View::Strengths, View::Concerns];

    pub fn slug(self) -> &'static str {
        match self {
            View::Overview => "overview",
            View::Strengths => "strengths",
            View::Concerns => "concerns",
        }
    }

    /// Heading of the rendered fragment.
    pub fn title(self) -> &'static str {
        match self {
            View::Overview => "Candidate Overview",
            View::Strengths => "Candidate Strengths",
            View::Concerns => "Areas of Concern",
        }
    }

    /// Shown while the pipeline runs.
    pub fn progress_message(self) -> &'static str {
        match self {
            View::Overview => "Analyzing the resume...",
            View::Strengths => "Identifying candidate strengths...",
            View::Concerns => "Evaluating potential concerns...",
        }
    }

    pub fn build_query(self, content: &str) -> String {
        match self {
            View::Overview => overview_query(content),
            View::Strengths => strengths_query(content),
            View::Concerns => concerns_query(content),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownView(pub String);

impl fmt::Display for UnknownView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown view '{}'; expected one of overview, strengths, concerns",
            self.0
        )
    }
}

impl FromStr for View {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|v| v.slug().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownView(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Overview".parse::<View>(), Ok(View::Overview));
        assert_eq!("concerns".parse::<View>(), Ok(View::Concerns));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "summary".parse::<View>().unwrap_err();
        assert!(err.to_string().contains("summary"));
    }

    #[test]
    fn test_titles_match_views() {
        assert_eq!(View::Overview.title(), "Candidate Overview");
        assert_eq!(View::Strengths.title(), "Candidate Strengths");
        assert_eq!(View::Concerns.title(), "Areas of Concern");
    }

    #[test]
    fn test_each_view_uses_its_own_template() {
        assert!(View::Overview.build_query("x").contains("Key qualifications"));
        assert!(View::Strengths.build_query("x").contains("Top 3 key strengths"));
        assert!(View::Concerns.build_query("x").contains("red flags"));
    }
}
