use once_cell::sync::Lazy;
use regex::Regex;

static PARENS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^)]*\)").expect("parens regex"));
static BRACKETS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]").expect("brackets regex"));
static SPACES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Maximum length (in characters) of a sanitized file name.
pub const MAX_FILENAME_LEN: usize = 200;

/// Formats a duration in milliseconds as `M:SS`.
///
/// ```
/// use flowcore::core::utils::format_duration_ms;
///
/// assert_eq!(format_duration_ms(200_000), "3:20");
/// assert_eq!(format_duration_ms(5_000), "0:05");
/// ```
pub fn format_duration_ms(duration_ms: u64) -> String {
    let total_secs = duration_ms / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// Formats a byte count with one decimal place (`B`, `KB`, `MB`, `GB`).
///
/// ```
/// use flowcore::core::utils::format_file_size;
///
/// assert_eq!(format_file_size(0), "0 B");
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// ```
pub fn format_file_size(size_bytes: u64) -> String {
    if size_bytes == 0 {
        return "0 B".to_string();
    }

    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = size_bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{:.1} {}", size, UNITS[unit])
}

/// Replaces characters that are invalid in file names on common file systems.
///
/// `< > : " / \ | ? *` become `_`, leading/trailing spaces and dots are
/// trimmed and the result is capped at [`MAX_FILENAME_LEN`] characters.
///
/// ```
/// use flowcore::core::utils::sanitize_filename;
///
/// assert_eq!(sanitize_filename("AC/DC: Live?"), "AC_DC_ Live_");
/// ```
pub fn sanitize_filename(filename: &str) -> String {
    let replaced: String = filename
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c => c,
        })
        .collect();

    replaced
        .trim_matches(|c: char| c == ' ' || c == '.')
        .chars()
        .take(MAX_FILENAME_LEN)
        .collect()
}

/// Renders a 10-cell progress bar followed by the percentage.
///
/// ```
/// use flowcore::core::utils::create_progress_bar;
///
/// assert_eq!(create_progress_bar(1, 2), "█████░░░░░ 50%");
/// ```
pub fn create_progress_bar(current: usize, total: usize) -> String {
    create_progress_bar_with_length(current, total, 10)
}

pub fn create_progress_bar_with_length(current: usize, total: usize, length: usize) -> String {
    if total == 0 {
        return "░".repeat(length);
    }

    let progress = (current as f64 / total as f64).min(1.0);
    let filled = (length as f64 * progress) as usize;
    let percentage = (progress * 100.0) as u32;

    format!("{}{} {}%", "█".repeat(filled), "░".repeat(length - filled), percentage)
}

/// Truncates text to `max_length` characters, ending with `...` when cut.
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }

    let keep = max_length.saturating_sub(3);
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str("...");
    truncated
}

/// Escapes special characters for Telegram's MarkdownV2 format.
///
/// Telegram requires escaping:
/// `_`, `*`, `[`, `]`, `(`, `)`, `~`, `` ` ``, `>`, `#`, `+`, `-`, `=`, `|`, `{`, `}`, `.`, `!`
/// and the backslash itself.
///
/// ```
/// use flowcore::core::utils::escape_markdown_v2;
///
/// assert_eq!(escape_markdown_v2("Hello. World!"), "Hello\\. World\\!");
/// ```
pub fn escape_markdown_v2(text: &str) -> String {
    let mut result = String::with_capacity(text.len() * 2);

    for c in text.chars() {
        match c {
            '\\' | '_' | '*' | '[' | ']' | '(' | ')' | '~' | '`' | '>' | '#' | '+' | '-' | '=' | '|' | '{' | '}'
            | '.' | '!' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }

    result
}

/// Whether `quality` is one of the supported bitrates (`128`, `192`, `320`).
pub fn is_valid_quality(quality: &str) -> bool {
    matches!(quality, "128" | "192" | "320")
}

fn clean_search_part(part: &str) -> String {
    let part = PARENS_RE.replace_all(part, "");
    let part = BRACKETS_RE.replace_all(&part, "");
    SPACES_RE.replace_all(&part, " ").trim().to_string()
}

/// Builds the downloader search query from a track title and artist.
///
/// Parenthesised and bracketed segments (`(Remastered 2011)`, `[Live]`) are
/// dropped from both parts, whitespace is collapsed.
///
/// ```
/// use flowcore::core::utils::create_search_query;
///
/// assert_eq!(
///     create_search_query("Hey Jude (Remastered 2015)", "The Beatles"),
///     "Hey Jude The Beatles"
/// );
/// ```
pub fn create_search_query(title: &str, artist: &str) -> String {
    let query = format!("{} {}", clean_search_part(title), clean_search_part(artist));
    query.trim().to_string()
}
