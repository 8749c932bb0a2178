//! Glob Pattern Module
//!
//! Store-compatible glob matching for key scans.
//!
//! Supported syntax:
//! - `h?llo` matches `hello`, `hallo` and `hxllo`
//! - `h*llo` matches `hllo` and `heeeello`
//! - `h[ae]llo` matches `hello` and `hallo`, but not `hillo`
//! - `h[^e]llo` matches `hallo`, `hbllo`, ... but not `hello`
//! - `h[a-b]llo` matches `hallo` and `hbllo`
//!
//! A backslash escapes the next character, inside classes too.

/// Characters with special meaning in a pattern.
const SPECIAL: [char; 5] = ['*', '?', '[', ']', '\\'];

// == Matches ==
/// Returns true if `input` matches `pattern` in full.
pub fn matches(pattern: &str, input: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let input: Vec<char> = input.chars().collect();
    match_from(&pattern, &input)
}

// == Escape ==
/// Escapes `literal` so that it only ever matches itself.
pub fn escape(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());
    for c in literal.chars() {
        if SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Iterative matcher with a single backtrack point.
///
/// Only the most recent `*` is ever retried: every other token consumes
/// exactly one char, so an earlier star never needs to give back more.
/// Runs in O(pattern * input).
fn match_from(pattern: &[char], input: &[char]) -> bool {
    let mut p = 0;
    let mut s = 0;
    // Pattern index after the last star, and the input index it resumes from
    let mut backtrack: Option<(usize, usize)> = None;

    while s < input.len() {
        if p < pattern.len() && pattern[p] == '*' {
            while p < pattern.len() && pattern[p] == '*' {
                p += 1;
            }
            if p == pattern.len() {
                return true;
            }
            backtrack = Some((p, s));
            continue;
        }

        if let Some(next) = match_one(pattern, p, input[s]) {
            p = next;
            s += 1;
            continue;
        }

        match backtrack {
            Some((star_p, star_s)) => {
                p = star_p;
                s = star_s + 1;
                backtrack = Some((star_p, s));
            }
            None => return false,
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

/// Matches the single token at `pattern[p]` against `c`.
///
/// Returns the index of the next token, or `None` on mismatch or at a star.
fn match_one(pattern: &[char], p: usize, c: char) -> Option<usize> {
    match *pattern.get(p)? {
        '*' => None,
        '?' => Some(p + 1),
        '[' => {
            let (matched, consumed) = match_class(&pattern[p + 1..], c);
            matched.then_some(p + 1 + consumed)
        }
        '\\' if p + 1 < pattern.len() => (pattern[p + 1] == c).then_some(p + 2),
        literal => (literal == c).then_some(p + 1),
    }
}

/// Matches `c` against the class body following `[`.
///
/// Returns whether it matched and how many pattern chars the class used,
/// including the closing `]` when present.
fn match_class(class: &[char], c: char) -> (bool, usize) {
    let mut i = 0;
    let negate = class.first() == Some(&'^');
    if negate {
        i += 1;
    }

    let mut matched = false;
    while i < class.len() && class[i] != ']' {
        if class[i] == '\\' && i + 1 < class.len() {
            matched |= class[i + 1] == c;
            i += 2;
        } else if i + 2 < class.len() && class[i + 1] == '-' {
            let (lo, hi) = if class[i] <= class[i + 2] {
                (class[i], class[i + 2])
            } else {
                (class[i + 2], class[i])
            };
            matched |= lo <= c && c <= hi;
            i += 3;
        } else {
            matched |= class[i] == c;
            i += 1;
        }
    }

    let consumed = if i < class.len() { i + 1 } else { i };
    (matched != negate, consumed)
}
