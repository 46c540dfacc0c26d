const MAX_PREVIEW_CHARS: usize = 80;

/// Shortens user text for log lines, cutting on a char boundary.
pub fn log_preview(text: &str) -> String {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let total = trimmed.chars().count();
    if total <= MAX_PREVIEW_CHARS {
        return trimmed.to_string();
    }

    let head: String = trimmed.chars().take(MAX_PREVIEW_CHARS).collect();
    format!("{}... ({} chars total)", head, total)
}
