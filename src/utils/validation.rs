use std::borrow::Cow;

/// Longest filename echoed into log lines.
pub const MAX_LOGGED_FILENAME_CHARS: usize = 255;

/// Make an untrusted client filename safe to write into a log line.
///
/// Control characters (newlines in particular) become `_` so a crafted name
/// cannot forge extra log entries, and overly long names are cut short. The
/// original name is still what the client gets back in the response.
pub fn loggable_filename(filename: &str) -> Cow<'_, str> {
    let too_long = filename.chars().count() > MAX_LOGGED_FILENAME_CHARS;
    if !too_long && !filename.chars().any(char::is_control) {
        return Cow::Borrowed(filename);
    }

    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        tracing::debug!("Client filename contains path components");
    }

    let mut sanitized: String = filename
        .chars()
        .take(MAX_LOGGED_FILENAME_CHARS)
        .map(|c| if c.is_control() { '_' } else { c })
        .collect();
    if too_long {
        sanitized.push('…');
    }
    Cow::Owned(sanitized)
}

/// Header value for `User-Agent` logging.
pub fn user_agent_or_unknown(value: Option<&str>) -> &str {
    match value {
        Some(agent) if !agent.trim().is_empty() => agent,
        _ => "Unknown Client",
    }
}
