/// Title and body extracted from edited text.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueText {
    pub title: String,
    pub body: String,
}

/// Splits edited text into a title (first line) and a body (the rest, trimmed).
///
/// An empty title is passed through; the API decides whether to reject it.
pub fn parse_text(input: &[u8]) -> IssueText {
    let content = String::from_utf8_lossy(input);
    let mut lines = content.split('\n');
    let title = lines
        .next()
        .unwrap_or_default()
        .trim_end_matches('\r')
        .to_string();
    let body = lines.collect::<Vec<_>>().join("\n").trim().to_string();
    IssueText { title, body }
}

/// Builds the editor seed for an existing issue.
pub fn compose_text(title: &str, body: &str) -> String {
    format!("{title}\n\n{body}")
}
