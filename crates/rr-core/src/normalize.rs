// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Turns selected command text into a single shell command line.
//!
//! Example commands often live commented out in source files:
//!
//! ```text
//! // $ deploy --env=staging \
//! //     --dry-run
//! ```
//!
//! Block mode strips the comment and prompt markers and joins the lines, so
//! the selection above becomes `deploy --env=staging --dry-run`.

/// Text picked in the editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The line under the cursor, already a runnable command
    Line(String),
    /// A multi-line (visual) selection of example text
    Block(Vec<String>),
}

impl Selection {
    /// Block selection from raw text, one entry per line
    pub fn block_from_text(text: &str) -> Self {
        Selection::Block(text.lines().map(str::to_string).collect())
    }

    pub fn normalize(&self) -> String {
        match self {
            Selection::Line(line) => normalize_line(line),
            Selection::Block(lines) => normalize_block(lines),
        }
    }
}

/// Normalize raw lines: one line is taken as is, several are joined
pub fn normalize<S: AsRef<str>>(lines: &[S]) -> String {
    match lines {
        [line] => normalize_line(line.as_ref()),
        _ => normalize_block(lines),
    }
}

/// Single line: only surrounding whitespace is removed
pub fn normalize_line(line: &str) -> String {
    line.trim().to_string()
}

/// Join a block of example lines into one command.
///
/// Blank lines are dropped. A trailing `\` glues the next line on without a
/// space; otherwise lines are separated by one space.
pub fn normalize_block<S: AsRef<str>>(lines: &[S]) -> String {
    let mut command = String::new();

    for line in lines.iter().map(|l| l.as_ref().trim()).filter(|l| !l.is_empty()) {
        let line = strip_markers(line);
        match line.strip_suffix('\\') {
            Some(glued) => command.push_str(glued),
            None => {
                command.push_str(line);
                command.push(' ');
            }
        }
    }

    command.trim().to_string()
}

/// Remove a leading comment marker (`#` or `//`) and then a `$` prompt
fn strip_markers(line: &str) -> &str {
    let line = if let Some(rest) = line.strip_prefix('#') {
        rest.trim_start()
    } else if let Some(rest) = line.strip_prefix("//") {
        rest.trim_start()
    } else {
        line
    };

    match line.strip_prefix('$') {
        Some(rest) => rest.trim_start(),
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_backslash_and_spaces() {
        assert_eq!(normalize(&["# $ foo", "  bar \\", "baz"]), "foo bar baz");
    }

    #[test]
    fn test_blank_lines_do_not_add_spaces() {
        let lines = ["ls", "", "   ", "-l", "\t", "/tmp"];
        assert_eq!(normalize(&lines), "ls -l /tmp");
    }

    #[test]
    fn test_all_blank_block_is_empty() {
        assert_eq!(normalize(&["", "   ", "\t"]), "");
        assert_eq!(normalize::<&str>(&[]), "");
        assert_eq!(Selection::Block(vec![" ".to_string()]).normalize(), "");
    }

    #[test]
    fn test_slash_comments_and_prompts() {
        let lines = ["  // $ deploy --env=staging \\", "//     --dry-run"];
        assert_eq!(normalize(&lines), "deploy --env=staging --dry-run");
    }

    #[test]
    fn test_backslash_glues_without_space() {
        assert_eq!(normalize(&["echo foo\\", "bar"]), "echo foobar");
    }

    #[test]
    fn test_single_line_is_taken_verbatim() {
        assert_eq!(normalize(&["  # $ rm -rf build  "]), "# $ rm -rf build");
        assert_eq!(
            Selection::Line("// keep me \\".to_string()).normalize(),
            "// keep me \\"
        );
    }

    #[test]
    fn test_block_mode_strips_even_a_single_line() {
        assert_eq!(Selection::block_from_text("# $ make check\n").normalize(), "make check");
    }

    #[test]
    fn test_only_one_marker_of_each_kind_is_removed() {
        assert_eq!(normalize(&["## x", "$$ y"]), "# x $ y");
    }

    #[test]
    fn test_joined_lines_equal_space_joined_trimmed_lines() {
        let lines = ["  git log", "--oneline  ", "# -n 5"];
        let expected = ["git log", "--oneline", "-n 5"].join(" ");
        assert_eq!(normalize(&lines), expected);
    }
}
