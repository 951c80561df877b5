//! Text-pattern mining for emails and keyword blocks
//!
//! The keyword heuristic is inherently approximate: academic PDFs render
//! their front matter in wildly inconsistent ways. The fallback chain below
//! is best-effort by design; an empty result is a normal outcome, never an
//! error.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid regex")
});

/// Keyword blocks: an introducer phrase, then everything up to a blank line,
/// a new capitalized line, or the start of an abstract/introduction section.
static KEYWORD_BLOCK_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?s)(?i:keywords?)\s*:(.+?)(?:\n\s*\n|\n[A-Z]|\n(?i:abstract)|\n(?i:introduction))",
        r"(?s)(?i:key\s+words?)\s*:(.+?)(?:\n\s*\n|\n[A-Z]|\n(?i:abstract)|\n(?i:introduction))",
        r"(?s)(?i:indexing\s+terms)\s*:(.+?)(?:\n\s*\n|\n[A-Z]|\n(?i:abstract)|\n(?i:introduction))",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid regex"))
    .collect()
});

static KEYWORD_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)keywords?\s*:").expect("valid regex"));

static BLOCK_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;]\s*|\n").expect("valid regex"));

static LINE_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;]\s*").expect("valid regex"));

/// Extracts email addresses in first-seen order
///
/// Duplicates are dropped case-insensitively; the first-seen casing is kept.
pub fn extract_emails(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut emails = Vec::new();

    for found in EMAIL_RE.find_iter(text) {
        let email = found.as_str();
        if seen.insert(email.to_ascii_lowercase()) {
            emails.push(email.to_string());
        }
    }

    emails
}

/// Extracts a keyword list via the documented fallback chain
///
/// 1. A keyword block regex; the first matching pattern wins and its block
///    is split on commas, semicolons, and line breaks.
/// 2. A line-by-line scan for a `keywords:`-like line; the remainder of the
///    line, or the next non-blank line, split on commas and semicolons.
/// 3. An empty list.
pub fn extract_keywords(text: &str) -> Vec<String> {
    for pattern in KEYWORD_BLOCK_RES.iter() {
        if let Some(captures) = pattern.captures(text) {
            return split_block(captures.get(1).map(|m| m.as_str()).unwrap_or(""));
        }
    }

    let lines: Vec<&str> = text.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        if !KEYWORD_LINE_RE.is_match(line) {
            continue;
        }

        if let Some((_, rest)) = line.split_once(':') {
            if !rest.trim().is_empty() {
                return split_line(rest);
            }
        }

        if let Some(next) = lines.get(i + 1) {
            if !next.trim().is_empty() {
                return split_line(next);
            }
        }
    }

    Vec::new()
}

fn split_block(block: &str) -> Vec<String> {
    BLOCK_SPLIT_RE
        .split(block)
        .map(str::trim)
        .filter(|kw| !kw.is_empty())
        .map(str::to_string)
        .collect()
}

fn split_line(line: &str) -> Vec<String> {
    LINE_SPLIT_RE
        .split(line)
        .map(str::trim)
        .filter(|kw| !kw.is_empty())
        .map(str::to_string)
        .collect()
}
