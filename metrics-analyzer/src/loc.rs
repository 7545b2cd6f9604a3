//! LOC, comment-line, and blank-line counting (§4.E), one heuristic per
//! language matching the comment syntax each parser already recognizes.

use domain::Language;

pub struct LineCounts {
    pub loc: u32,
    pub comment_lines: u32,
    pub blank_lines: u32,
}

pub fn count_lines(language: Language, body: &str) -> LineCounts {
    let mut comment_lines = 0u32;
    let mut blank_lines = 0u32;
    let mut in_block_comment = false;

    for raw_line in body.lines() {
        let trimmed = raw_line.trim();
        if trimmed.is_empty() {
            blank_lines += 1;
            continue;
        }
        if is_comment_line(language, raw_line, trimmed, &mut in_block_comment) {
            comment_lines += 1;
        }
    }

    LineCounts { loc: body.lines().count() as u32, comment_lines, blank_lines }
}

fn is_comment_line(language: Language, raw_line: &str, trimmed: &str, in_block_comment: &mut bool) -> bool {
    match language {
        Language::Python => trimmed.starts_with('#'),
        Language::C => {
            if *in_block_comment {
                if trimmed.contains("*/") {
                    *in_block_comment = false;
                }
                return true;
            }
            if trimmed.starts_with("//") {
                return true;
            }
            if trimmed.starts_with("/*") {
                if !trimmed.contains("*/") {
                    *in_block_comment = true;
                }
                return true;
            }
            trimmed.starts_with('*')
        }
        Language::Cobol => raw_line.len() > 6 && matches!(raw_line.as_bytes()[6], b'*' | b'/'),
        Language::Assembly => trimmed.starts_with(';') || trimmed.starts_with("//"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_not_comments() {
        let counts = count_lines(Language::Python, "x = 1\n\n# note\n");
        assert_eq!(counts.loc, 3);
        assert_eq!(counts.blank_lines, 1);
        assert_eq!(counts.comment_lines, 1);
    }

    #[test]
    fn c_block_comment_spans_multiple_lines() {
        let body = "/* start\n * middle\n */\nint x;\n";
        let counts = count_lines(Language::C, body);
        assert_eq!(counts.comment_lines, 3);
    }
}
