//! Shell-style filename patterns for selecting entries.

use crate::wad::EntryHeader;

/// A case-sensitive shell glob matched against the whole entry path.
///
/// - `*` matches zero or more characters, `/` included
/// - `?` matches exactly one character
/// - `[abc]`, `[a-z]` match one character from the set, `[!abc]` one not in it
///
/// A `[` without a closing `]` matches itself.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    tokens: Vec<Token>,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Literal(char),
    AnyOne,
    AnyRun,
    Class { negated: bool, ranges: Vec<(char, char)> },
}

impl GlobPattern {
    pub fn new(pattern: &str) -> Self {
        let chars: Vec<char> = pattern.chars().collect();
        let mut tokens = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            match chars[i] {
                '*' => {
                    // runs of stars behave like one
                    if tokens.last() != Some(&Token::AnyRun) {
                        tokens.push(Token::AnyRun);
                    }
                    i += 1;
                }
                '?' => {
                    tokens.push(Token::AnyOne);
                    i += 1;
                }
                '[' => match parse_class(&chars[i + 1..]) {
                    Some((token, used)) => {
                        tokens.push(token);
                        i += 1 + used;
                    }
                    None => {
                        tokens.push(Token::Literal('['));
                        i += 1;
                    }
                },
                c => {
                    tokens.push(Token::Literal(c));
                    i += 1;
                }
            }
        }

        Self { tokens }
    }

    pub fn matches(&self, text: &str) -> bool {
        let text: Vec<char> = text.chars().collect();
        do_match(&self.tokens, &text)
    }

    /// Predicate form for [`WadExtractor::extract`](crate::WadExtractor::extract)
    pub fn matches_entry(&self, header: &EntryHeader) -> bool {
        self.matches(&header.path)
    }
}

/// Parse the body of a `[...]` class. Returns the token and the number of chars
/// consumed, closing `]` included.
fn parse_class(chars: &[char]) -> Option<(Token, usize)> {
    let mut i = 0;
    let negated = matches!(chars.first(), Some('!'));
    if negated {
        i += 1;
    }

    let mut ranges = Vec::new();
    let mut first = true;
    loop {
        let c = *chars.get(i)?;
        // a `]` right after the opening bracket is a member, not the end
        if c == ']' && !first {
            return Some((Token::Class { negated, ranges }, i + 1));
        }
        first = false;

        if chars.get(i + 1) == Some(&'-') && chars.get(i + 2).is_some_and(|&end| end != ']') {
            ranges.push((c, chars[i + 2]));
            i += 3;
        } else {
            ranges.push((c, c));
            i += 1;
        }
    }
}

/// Whether `token` consumes `c`. Only meaningful for single-character tokens.
fn token_matches(token: &Token, c: char) -> bool {
    match token {
        Token::Literal(p) => *p == c,
        Token::AnyOne => true,
        Token::Class { negated, ranges } => {
            ranges.iter().any(|&(lo, hi)| lo <= c && c <= hi) != *negated
        }
        Token::AnyRun => false,
    }
}

/// Two-pointer matcher. On a mismatch it resumes from the most recent `*`,
/// letting that star absorb one more character, so every other token consumes
/// exactly one character and the run time stays within tokens x text.
fn do_match(tokens: &[Token], text: &[char]) -> bool {
    let (mut t, mut s) = (0, 0);
    // token index after the last star, and the text index it resumes from
    let mut resume: Option<(usize, usize)> = None;

    while s < text.len() {
        match tokens.get(t) {
            Some(Token::AnyRun) => {
                t += 1;
                resume = Some((t, s));
            }
            Some(token) if token_matches(token, text[s]) => {
                t += 1;
                s += 1;
            }
            _ => match resume {
                Some((star_t, star_s)) => {
                    t = star_t;
                    s = star_s + 1;
                    resume = Some((star_t, s));
                }
                None => return false,
            },
        }
    }

    // text exhausted: only stars may remain
    tokens[t..].iter().all(|token| *token == Token::AnyRun)
}
