use crate::github::issues::Issue;
use chrono::{DateTime, Utc};
use std::io::{self, Write};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Writes `message` to stdout and, when given, to `writer` as well.
pub fn println(message: &str, writer: &mut Option<&mut dyn Write>) -> io::Result<()> {
    if let Err(e) = writeln!(io::stdout(), "{message}") {
        tracing::warn!("failed to write to stdout: {e}");
    }

    if let Some(w) = writer {
        writeln!(w, "{message}")?;
    }

    Ok(())
}

pub fn format_time(time: &DateTime<Utc>) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Renders the `read` view of an issue.
pub fn render_issue(issue: &Issue) -> String {
    format!(
        "Number:  {}\nTitle:   {}\nBody:    {}\nCreated: {}\nUpdated: {}",
        issue.number,
        issue.title,
        issue.body,
        format_time(&issue.created_at),
        format_time(&issue.updated_at),
    )
}
