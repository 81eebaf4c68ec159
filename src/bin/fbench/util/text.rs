use std::path::Path;

/// Greedy word wrap; a single overlong word stays on its own line.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }

    lines
}

pub fn truncate(s: &str, max_len: usize) -> String {
    match max_len {
        0 => return String::new(),
        1 => return "…".to_string(),
        _ => {}
    }

    if s.chars().nth(max_len).is_none() {
        return s.to_string();
    }

    let mut out: String = s.chars().take(max_len - 1).collect();
    out.push('…');
    out
}

/// File name of `path` for progress output.
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_keeps_short_text() {
        assert_eq!(wrap("bond (3, 4)", 20), vec!["bond (3, 4)"]);
    }

    #[test]
    fn wrap_breaks_on_words() {
        assert_eq!(
            wrap("failed to score bond (3, 4)", 12),
            vec!["failed to", "score bond", "(3, 4)"]
        );
    }

    #[test]
    fn wrap_empty_text_is_one_line() {
        assert_eq!(wrap("", 10), vec![""]);
    }

    #[test]
    fn truncate_short_and_exact() {
        assert_eq!(truncate("amino", 10), "amino");
        assert_eq!(truncate("amino", 5), "amino");
    }

    #[test]
    fn truncate_long() {
        assert_eq!(truncate("trifluoromethyl", 8), "trifluo…");
    }

    #[test]
    fn truncate_unicode() {
        assert_eq!(truncate("αβγδεζ", 4), "αβγ…");
    }

    #[test]
    fn file_label_uses_the_file_name() {
        assert_eq!(
            file_label(Path::new("selected/case1/case1_score_2.json")),
            "case1_score_2.json"
        );
        assert_eq!(file_label(Path::new("/")), "/");
    }
}
