//! Rolling k-shingles over a token stream (§4.G, default k=40 tokens).

use crate::tokenize::Token;

#[derive(Debug, Clone)]
pub struct Shingle {
    /// The shingle's token texts, concatenated with a separator unlikely to
    /// appear in source (`\u{1}`), used as the hash input.
    pub key: String,
    pub line_start: u32,
    pub line_end: u32,
}

pub const DEFAULT_K: usize = 40;

pub fn shingles(tokens: &[Token], k: usize) -> Vec<Shingle> {
    if tokens.len() < k {
        if tokens.is_empty() {
            return Vec::new();
        }
        return vec![Shingle {
            key: tokens.iter().map(|t| t.text.as_str()).collect::<Vec<_>>().join("\u{1}"),
            line_start: tokens.first().unwrap().line,
            line_end: tokens.last().unwrap().line,
        }];
    }

    tokens
        .windows(k)
        .map(|window| Shingle {
            key: window.iter().map(|t| t.text.as_str()).collect::<Vec<_>>().join("\u{1}"),
            line_start: window.first().unwrap().line,
            line_end: window.last().unwrap().line,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::tokenize;

    #[test]
    fn short_token_streams_yield_one_shingle() {
        let tokens = tokenize("x = 1\n");
        let shingles = shingles(&tokens, 40);
        assert_eq!(shingles.len(), 1);
    }

    #[test]
    fn long_streams_yield_sliding_windows() {
        let source = "a ".repeat(50);
        let tokens = tokenize(&source);
        let shingles = shingles(&tokens, 10);
        assert_eq!(shingles.len(), tokens.len() - 10 + 1);
    }
}
