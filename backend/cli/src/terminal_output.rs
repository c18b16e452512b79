//! Terminal output utilities: status notes, key/value tables, stream writing.
//!
//! Notes go to stderr so that recognized text on stdout can be piped.

use std::io::{IsTerminal, Write};

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Check if stderr is a color-capable terminal.
pub fn supports_color() -> bool {
    std::env::var_os("NO_COLOR").is_none()
        && std::io::stderr().is_terminal()
        && std::env::var("TERM").map(|t| t != "dumb").unwrap_or(true)
}

/// Strip ANSI escape codes from a string.
pub fn strip_ansi(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // Skip until 'm'
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}

fn note(symbol: &str, color: &str, plain: &str, msg: &str) {
    if supports_color() {
        eprintln!("{color}{BOLD}{symbol}{RESET} {msg}");
    } else {
        eprintln!("{plain}: {msg}");
    }
}

pub fn note_info(msg: &str) {
    note("ℹ", CYAN, "INFO", msg);
}

pub fn note_warn(msg: &str) {
    note("⚠", YELLOW, "WARN", msg);
}

pub fn note_error(msg: &str) {
    note("✗", RED, "ERROR", msg);
}

pub fn note_success(msg: &str) {
    note("✓", GREEN, "OK", msg);
}

/// Render rows as aligned columns under a bold header.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(strip_ansi(cell).chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad_cell(h, *w))
        .collect();
    out.push_str(&format!("{BOLD}  {}{RESET}\n", header.join("  ").trim_end()));

    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("  {}\n", sep.join("  ")));

    for row in rows {
        let cells: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, w)| pad_cell(row.get(i).map(String::as_str).unwrap_or(""), *w))
            .collect();
        out.push_str(&format!("  {}\n", cells.join("  ").trim_end()));
    }
    out
}

fn pad_cell(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(strip_ansi(s).chars().count());
    format!("{s}{}", " ".repeat(pad))
}

/// Write a chunk and flush, adding a trailing newline when missing.
pub fn write_line(writer: &mut impl Write, chunk: &str) -> std::io::Result<()> {
    writer.write_all(chunk.as_bytes())?;
    if !chunk.ends_with('\n') {
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_ansi() {
        let colored = format!("{GREEN}hello{RESET}");
        assert_eq!(strip_ansi(&colored), "hello");
    }

    #[test]
    fn renders_table() {
        let rows = vec![
            vec!["provider".to_string(), "gemini".to_string()],
            vec!["model".to_string(), format!("{DIM}gemini-2.0-flash{RESET}")],
        ];
        let table = strip_ansi(&render_table(&["Key", "Value"], &rows));
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "  Key       Value");
        assert_eq!(lines[2], "  provider  gemini");
        assert_eq!(lines[3], "  model     gemini-2.0-flash");
    }

    #[test]
    fn write_line_terminates() {
        let mut buf = Vec::new();
        write_line(&mut buf, "abc").unwrap();
        write_line(&mut buf, "def\n").unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "abc\ndef\n");
    }
}
