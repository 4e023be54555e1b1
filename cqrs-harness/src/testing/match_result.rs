use std::fmt;

use super::render;

/// Outcome of evaluating a [`Matcher`](super::Matcher) against a test result.
///
/// Leaf results come from the message matchers; composite results from
/// [`all`](super::all), [`any`](super::any) and [`not`](super::not) carry
/// the results of their sub-matchers as [`children`](Self::children).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    pub(crate) title: String,
    pub(crate) passed: bool,
    pub(crate) message: String,
    pub(crate) hint: String,
    pub(crate) details: String,
    pub(crate) children: Vec<MatchResult>,
}

impl MatchResult {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Why the match failed. Empty if it passed.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// A suggestion for fixing the test. May be empty.
    pub fn hint(&self) -> &str {
        &self.hint
    }

    /// The expected payload, or a diff against the closest candidate. May be empty.
    pub fn details(&self) -> &str {
        &self.details
    }

    pub fn children(&self) -> &[MatchResult] {
        &self.children
    }

    pub fn with_passed(mut self, passed: bool) -> Self {
        self.passed = passed;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }

    pub fn append(&mut self, child: MatchResult) {
        self.children.push(child);
    }

    /// Render the result tree as an indented report.
    pub fn render(&self, color: bool) -> String {
        let mut out = String::new();
        render::write_result(&mut out, self, color);
        out
    }
}

/// Plain-text report, without colours.
impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}
