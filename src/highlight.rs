//! Markdown syntax highlighting for the editor pane.

use crossterm::style::Color;
use regex::Regex;
use std::collections::HashMap;

/// Colors available for syntax highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightColor {
    Heading,
    Emphasis,
    Code,
    Link,
    Quote,
    ListMarker,
    Fence,
}

impl HighlightColor {
    pub fn to_crossterm(self) -> Color {
        match self {
            Self::Heading => Color::Cyan,
            Self::Emphasis => Color::Yellow,
            Self::Code => Color::Green,
            Self::Link => Color::Blue,
            Self::Quote => Color::Grey,
            Self::ListMarker => Color::Magenta,
            Self::Fence => Color::DarkGreen,
        }
    }
}

/// A highlighted span within a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSpan {
    /// Start char index (inclusive).
    pub start: usize,
    /// End char index (exclusive).
    pub end: usize,
    pub color: HighlightColor,
    /// Higher priority wins where spans overlap.
    pub priority: i32,
}

/// A compiled highlight rule ready for matching.
struct CompiledRule {
    regex: Regex,
    color: HighlightColor,
    priority: i32,
    /// Which capture group to highlight (0 = whole match).
    group: usize,
}

const RULES: &[(&str, HighlightColor, i32, usize)] = &[
    (r"^#{1,6}\s.*$", HighlightColor::Heading, 10, 0),
    (r"^\s*>.*$", HighlightColor::Quote, 5, 0),
    (r"^\s*(?:[-*+]|\d+[.)])(?:\s\[[ xX]\])?\s", HighlightColor::ListMarker, 5, 0),
    (r"\*\*[^*]+\*\*|__[^_]+__", HighlightColor::Emphasis, 6, 0),
    (r"\*[^*\s][^*]*\*|~~[^~]+~~", HighlightColor::Emphasis, 4, 0),
    (r"!?\[[^\]]*\]\([^)]*\)", HighlightColor::Link, 7, 0),
    (r"`[^`]+`", HighlightColor::Code, 8, 0),
    (r"^\s*```.*$", HighlightColor::Fence, 20, 0),
];

/// Computes per-line highlight spans, cached until the text changes.
pub struct Highlighter {
    rules: Vec<CompiledRule>,
    /// Cache of computed highlights per line (cleared on edit).
    cache: HashMap<usize, Vec<HighlightSpan>>,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    pub fn new() -> Self {
        let rules = RULES
            .iter()
            .filter_map(|&(pattern, color, priority, group)| {
                Regex::new(pattern).ok().map(|regex| CompiledRule { regex, color, priority, group })
            })
            .collect();
        Self { rules, cache: HashMap::new() }
    }

    /// Drop cached spans (call after any edit).
    pub fn invalidate_all(&mut self) {
        self.cache.clear();
    }

    /// Get highlight spans for a line (uses cache).
    pub fn get_highlights(&mut self, line_idx: usize, line: &str) -> Vec<HighlightSpan> {
        if let Some(cached) = self.cache.get(&line_idx) {
            return cached.clone();
        }
        let spans = self.compute(line);
        self.cache.insert(line_idx, spans.clone());
        spans
    }

    fn compute(&self, line: &str) -> Vec<HighlightSpan> {
        let mut spans = Vec::new();
        for rule in &self.rules {
            for caps in rule.regex.captures_iter(line) {
                let Some(m) = caps.get(rule.group) else { continue; };
                let start = line[..m.start()].chars().count();
                let end = start + m.as_str().chars().count();
                if start < end {
                    spans.push(HighlightSpan { start, end, color: rule.color, priority: rule.priority });
                }
            }
        }
        spans.sort_by_key(|s| s.priority);
        spans
    }

    /// Color at `char_idx`, highest-priority span first.
    pub fn color_at(&self, spans: &[HighlightSpan], char_idx: usize) -> Option<HighlightColor> {
        spans
            .iter()
            .rev()
            .find(|s| char_idx >= s.start && char_idx < s.end)
            .map(|s| s.color)
    }
}

/// Marks which lines of `text` sit inside fenced code blocks (including the fence lines).
pub fn fenced_lines(text: &str) -> Vec<bool> {
    let mut inside = false;
    text.split('\n')
        .map(|l| {
            if l.trim_start().starts_with("```") {
                inside = !inside;
                true
            } else {
                inside
            }
        })
        .collect()
}
