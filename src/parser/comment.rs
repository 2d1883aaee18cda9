//! Comment stripping
//!
//! Word tokenizing expects comment-free text. This is the front-end step that
//! gets it there for whole files: `;` comments run to the end of the line,
//! parenthetical comments end at the first `)` (or the end of the line).

/// A line split into its code text and its comments
#[derive(Debug, Clone, PartialEq)]
pub struct SplitLine<'a> {
    /// Code with each comment replaced by a single space
    pub code: String,
    /// Comments, delimiters included, in source order
    pub comments: Vec<&'a str>,
}

pub fn split_comments(line: &str) -> SplitLine<'_> {
    let mut code = String::with_capacity(line.len());
    let mut comments = Vec::new();
    let mut chars = line.char_indices();

    while let Some((start_idx, ch)) = chars.next() {
        match ch {
            // Semicolon comment: consume rest of line
            ';' => {
                comments.push(&line[start_idx..]);
                code.push(' ');
                break;
            }

            '(' => {
                let end_idx = chars
                    .by_ref()
                    .find(|&(_, c)| c == ')')
                    .map(|(idx, _)| idx + 1)
                    .unwrap_or(line.len());
                comments.push(&line[start_idx..end_idx]);
                // keeps `G1(a)X1` from fusing into one fragment
                code.push(' ');
            }

            c => code.push(c),
        }
    }

    SplitLine { code, comments }
}

/// Comment-free code text of a line
pub fn strip_comments(line: &str) -> String {
    split_comments(line).code
}
