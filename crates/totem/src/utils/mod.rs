use regex::Regex;
use std::sync::LazyLock;

pub mod config;
pub mod shell;

#[macro_export]
macro_rules! println_pad {
    ($($arg:tt)*) => {{
        let __s = format!($($arg)*);
        for __line in __s.lines() {
            println!("    {}", __line);
        }
    }};
}

static ANSI_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\x1b\\[[0-9;]*m").unwrap());

/// Number of visible characters in `s`, ignoring ANSI color codes.
pub fn visible_len(s: &str) -> usize {
    ANSI_ESCAPE.replace_all(s, "").chars().count()
}

/// Prints the provided lines inside an ASCII box
pub fn print_ansi_boxed_lines(lines: &[String]) {
    let width = lines
        .iter()
        .map(|s| visible_len(s.as_str()))
        .max()
        .unwrap_or(0);

    let border = "-".repeat(width + 4);
    println_pad!("{}", border);
    for line in lines {
        let pad = width - visible_len(line.as_str());
        println_pad!("| {}{} |", line, " ".repeat(pad));
    }
    println_pad!("{}", border);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_len_ignores_ansi_codes() {
        assert_eq!(visible_len("plain"), 5);
        assert_eq!(visible_len("\x1b[1;32mgreen\x1b[0m"), 5);
        assert_eq!(visible_len("\x1b[33m📦 mods\x1b[0m"), 6);
    }

    #[test]
    fn visible_len_strips_every_code_in_a_line() {
        let line = "\x1b[1m\x1b[32mok\x1b[0m and \x1b[31mfailed\x1b[0m";
        assert_eq!(visible_len(line), "ok and failed".len());
    }
}
