use colored::Colorize;

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Print a multi-line block indented under a key
pub fn block(key: &str, text: &str) {
    println!("  {}:", key.dimmed());
    if text.is_empty() {
        println!("    {}", "(empty)".dimmed());
        return;
    }
    for line in text.lines() {
        println!("    {line}");
    }
}

/// Shorten a string for single-line display, keeping the start
pub fn truncate(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().next().unwrap_or_default();
    let multi_line = text.trim_end_matches('\n').contains('\n');

    if first_line.chars().count() <= max_chars && !multi_line {
        return first_line.to_string();
    }

    let keep = max_chars.saturating_sub(3);
    let head: String = first_line.chars().take(keep).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short() {
        assert_eq!(truncate("hello\n", 20), "hello");
        assert_eq!(truncate("", 20), "");
    }

    #[test]
    fn test_truncate_long_line() {
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
    }

    #[test]
    fn test_truncate_multi_line() {
        assert_eq!(truncate("one\ntwo\n", 20), "one...");
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("ééé", 3), "ééé");
    }
}
