//! Preview rendering: Markdown text in, displayable document out.
//!
//! This is deliberately small. It understands the block structure the editor's formatting
//! commands produce (headings, lists, quotes, fences, rules) plus Mermaid diagram fences, and
//! can lay the result out as terminal lines or materialize it as HTML for export.

use anyhow::{anyhow, bail, Result};
use regex::Regex;
use std::fmt::Write as _;
use std::sync::LazyLock;
use tracing::debug;
use unicode_width::UnicodeWidthChar;

static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*?)\s*$").expect("valid regex"));
static RULE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s{0,3}(?:\*\s*){3,}$|^\s{0,3}(?:-\s*){3,}$|^\s{0,3}(?:_\s*){3,}$").expect("valid regex"));
static TASK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*[-*+]\s+\[([ xX])\]\s+(.*)$").expect("valid regex"));
static BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*[-*+]\s+(.*)$").expect("valid regex"));
static ORDERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(\d{1,9})[.)]\s+(.*)$").expect("valid regex"));
static QUOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s{0,3}>\s?(.*)$").expect("valid regex"));

static IMAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)\s]*)\)").expect("valid regex"));
static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)\s]*)\)").expect("valid regex"));
static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*|__(.+?)__").expect("valid regex"));
static STRIKE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"~~(.+?)~~").expect("valid regex"));
static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*\s][^*]*?)\*|\b_([^_\s][^_]*?)_\b").expect("valid regex"));
static CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("valid regex"));

static FLOW_EDGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\w+)\s*(?:\[([^\]]*)\]|\{([^}]*)\}|\(([^)]*)\))?\s*-{2,3}>\s*(?:\|([^|]*)\|\s*)?(\w+)\s*(?:\[([^\]]*)\]|\{([^}]*)\}|\(([^)]*)\))?\s*$")
        .expect("valid regex")
});
static SEQ_PARTICIPANT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(?:participant|actor)\s+(\w+)(?:\s+as\s+(.+?))?\s*$").expect("valid regex"));
static SEQ_MESSAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(\w+)\s*(--?>>?)\s*(\w+)\s*:\s*(.*?)\s*$").expect("valid regex"));
static PIE_SLICE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^\s*"([^"]*)"\s*:\s*(\d+(?:\.\d+)?)\s*$"#).expect("valid regex"));

/// Which of the supported Mermaid diagram kinds a fence contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramKind {
    Flowchart,
    Sequence,
    Pie,
}

impl DiagramKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Flowchart => "Flow chart",
            Self::Sequence => "Sequence diagram",
            Self::Pie => "Pie chart",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowEdge {
    pub from: String,
    pub label: Option<String>,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SequenceMessage {
    pub from: String,
    pub to: String,
    pub text: String,
    /// Dashed arrows (`-->>`) are replies.
    pub reply: bool,
}

/// A parsed diagram ready for display.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagram {
    Flowchart { direction: String, edges: Vec<FlowEdge> },
    Sequence { messages: Vec<SequenceMessage> },
    Pie { title: Option<String>, slices: Vec<(String, f64)> },
}

impl Diagram {
    /// Parse the body of a `mermaid` fence.
    pub fn parse(source: &str) -> Result<Self> {
        let mut lines = source.lines().filter(|l| !l.trim().is_empty() && !l.trim_start().starts_with("%%"));
        let header = lines.next().ok_or_else(|| anyhow!("empty diagram"))?.trim();
        let mut words = header.split_whitespace();
        let keyword = words.next().unwrap_or_default();

        match keyword {
            "graph" | "flowchart" => {
                let direction = words.next().unwrap_or("TD").to_string();
                let mut labels: Vec<(String, String)> = Vec::new();
                let mut raw = Vec::new();
                for line in lines {
                    let Some(c) = FLOW_EDGE.captures(line) else { continue; };
                    let from = c[1].to_string();
                    let to = c[6].to_string();
                    for (id, groups) in [(&from, [2, 3, 4]), (&to, [7, 8, 9])] {
                        if let Some(l) = groups.iter().find_map(|&g| c.get(g)) {
                            if !labels.iter().any(|(k, _)| k == id) {
                                labels.push((id.clone(), l.as_str().trim().to_string()));
                            }
                        }
                    }
                    raw.push((from, c.get(5).map(|m| m.as_str().trim().to_string()), to));
                }
                if raw.is_empty() {
                    bail!("flow chart has no edges");
                }
                let name = |id: &str| {
                    labels.iter().find(|(k, _)| k == id).map_or_else(|| id.to_string(), |(_, v)| v.clone())
                };
                let edges = raw
                    .into_iter()
                    .map(|(from, label, to)| FlowEdge { from: name(&from), label, to: name(&to) })
                    .collect();
                Ok(Self::Flowchart { direction, edges })
            }
            "sequenceDiagram" => {
                let mut aliases: Vec<(String, String)> = Vec::new();
                let mut messages = Vec::new();
                for line in lines {
                    if let Some(c) = SEQ_PARTICIPANT.captures(line) {
                        let alias = c.get(2).map_or(&c[1], |m| m.as_str());
                        aliases.push((c[1].to_string(), alias.to_string()));
                    } else if let Some(c) = SEQ_MESSAGE.captures(line) {
                        let name = |id: &str| {
                            aliases.iter().find(|(k, _)| k == id).map_or_else(|| id.to_string(), |(_, v)| v.clone())
                        };
                        messages.push(SequenceMessage {
                            from: name(&c[1]),
                            to: name(&c[3]),
                            text: c[4].to_string(),
                            reply: c[2].starts_with("--"),
                        });
                    }
                }
                if messages.is_empty() {
                    bail!("sequence diagram has no messages");
                }
                Ok(Self::Sequence { messages })
            }
            "pie" => {
                let rest: Vec<&str> = words.collect();
                let title = match rest.split_first() {
                    Some((&"title", t)) if !t.is_empty() => Some(t.join(" ")),
                    _ => None,
                };
                let slices: Vec<(String, f64)> = lines
                    .filter_map(|l| PIE_SLICE.captures(l))
                    .filter_map(|c| c[2].parse::<f64>().ok().map(|v| (c[1].to_string(), v)))
                    .collect();
                if slices.is_empty() {
                    bail!("pie chart has no slices");
                }
                if slices.iter().map(|(_, v)| v).sum::<f64>() <= 0.0 {
                    bail!("pie chart values sum to zero");
                }
                Ok(Self::Pie { title, slices })
            }
            other => bail!("unsupported diagram type '{}'", other),
        }
    }

    pub fn kind(&self) -> DiagramKind {
        match self {
            Self::Flowchart { .. } => DiagramKind::Flowchart,
            Self::Sequence { .. } => DiagramKind::Sequence,
            Self::Pie { .. } => DiagramKind::Pie,
        }
    }

    /// Text rendering of the diagram body, one entry per line.
    pub fn display_lines(&self) -> Vec<String> {
        match self {
            Self::Flowchart { direction, edges } => {
                let mut out = vec![format!("direction {direction}")];
                for e in edges {
                    match &e.label {
                        Some(l) => out.push(format!("{} ──{}──▶ {}", e.from, l, e.to)),
                        None => out.push(format!("{} ──▶ {}", e.from, e.to)),
                    }
                }
                out
            }
            Self::Sequence { messages } => messages
                .iter()
                .map(|m| {
                    let arrow = if m.reply { "⇠" } else { "→" };
                    format!("{} {} {}: {}", m.from, arrow, m.to, m.text)
                })
                .collect(),
            Self::Pie { title, slices } => {
                const BAR: usize = 20;
                let total: f64 = slices.iter().map(|(_, v)| v).sum();
                let name_w = slices.iter().map(|(n, _)| n.chars().count()).max().unwrap_or(0);
                let mut out = Vec::new();
                if let Some(t) = title {
                    out.push(t.clone());
                }
                for (name, value) in slices {
                    let share = value / total;
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let filled = (share * BAR as f64).round() as usize;
                    out.push(format!(
                        "{:<name_w$} {}{} {:>5.1}%",
                        name,
                        "█".repeat(filled),
                        "░".repeat(BAR.saturating_sub(filled)),
                        share * 100.0,
                    ));
                }
                out
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMarker {
    Bullet,
    Ordered(u32),
    Task { checked: bool },
}

/// A block-level element of the rendered document.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph(String),
    ListItem { marker: ListMarker, text: String },
    Quote(String),
    Code { lang: Option<String>, body: String },
    Diagram { diagram: Diagram, source: String },
    Rule,
    Blank,
}

/// Visual role of a preview line; the terminal renderer maps it to colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Heading(u8),
    Body,
    ListItem,
    Quote,
    Code,
    DiagramTitle,
    Diagram,
    Rule,
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewLine {
    pub text: String,
    pub style: LineStyle,
}

/// The rendered form of a Markdown document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Preview {
    blocks: Vec<Block>,
}

impl Preview {
    /// Render `markdown`. Never fails: diagrams that cannot be rendered are logged and left out.
    pub fn render(markdown: &str) -> Self {
        let mut blocks = Vec::new();
        let mut paragraph: Vec<&str> = Vec::new();
        let mut lines = markdown.lines();

        let flush = |paragraph: &mut Vec<&str>, blocks: &mut Vec<Block>| {
            if !paragraph.is_empty() {
                blocks.push(Block::Paragraph(paragraph.join(" ")));
                paragraph.clear();
            }
        };

        while let Some(line) = lines.next() {
            let trimmed = line.trim_start();

            if let Some(info) = trimmed.strip_prefix("```") {
                flush(&mut paragraph, &mut blocks);
                let lang = info.trim();
                let mut body = Vec::new();
                for inner in lines.by_ref() {
                    if inner.trim_start().starts_with("```") {
                        break;
                    }
                    body.push(inner);
                }
                let body = body.join("\n");
                if lang == "mermaid" {
                    match Diagram::parse(&body) {
                        Ok(diagram) => blocks.push(Block::Diagram { diagram, source: body }),
                        // Runs on every keystroke; half-typed diagrams are normal.
                        Err(e) => debug!(error = %e, "diagram rendering failed"),
                    }
                } else {
                    let lang = (!lang.is_empty()).then(|| lang.to_string());
                    blocks.push(Block::Code { lang, body });
                }
                continue;
            }

            if trimmed.is_empty() {
                flush(&mut paragraph, &mut blocks);
                blocks.push(Block::Blank);
                continue;
            }

            let block = if let Some(c) = HEADING.captures(line) {
                #[allow(clippy::cast_possible_truncation)]
                let level = c[1].len() as u8;
                Some(Block::Heading { level, text: c[2].to_string() })
            } else if RULE.is_match(line) {
                Some(Block::Rule)
            } else if let Some(c) = TASK.captures(line) {
                Some(Block::ListItem { marker: ListMarker::Task { checked: &c[1] != " " }, text: c[2].to_string() })
            } else if let Some(c) = BULLET.captures(line) {
                Some(Block::ListItem { marker: ListMarker::Bullet, text: c[1].to_string() })
            } else if let Some(c) = ORDERED.captures(line) {
                let n = c[1].parse().unwrap_or(1);
                Some(Block::ListItem { marker: ListMarker::Ordered(n), text: c[2].to_string() })
            } else {
                QUOTE.captures(line).map(|c| Block::Quote(c[1].to_string()))
            };

            match block {
                Some(b) => {
                    flush(&mut paragraph, &mut blocks);
                    blocks.push(b);
                }
                None => paragraph.push(line.trim()),
            }
        }
        flush(&mut paragraph, &mut blocks);

        Self { blocks }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Lay the document out as terminal lines no wider than `width` columns.
    pub fn lines(&self, width: usize) -> Vec<PreviewLine> {
        let width = width.max(8);
        let mut out = Vec::new();
        let push_wrapped = |text: &str, prefix: &str, style: LineStyle, out: &mut Vec<PreviewLine>| {
            let indent = " ".repeat(prefix.chars().count());
            for (i, seg) in wrap_text(text, width.saturating_sub(prefix.chars().count())).into_iter().enumerate() {
                let lead = if i == 0 { prefix } else { indent.as_str() };
                out.push(PreviewLine { text: format!("{lead}{seg}"), style });
            }
        };

        for block in &self.blocks {
            match block {
                Block::Heading { level, text } => {
                    push_wrapped(&inline_text(text), "", LineStyle::Heading(*level), &mut out);
                    if *level <= 2 {
                        let w = inline_text(text).chars().count().min(width);
                        let ch = if *level == 1 { "═" } else { "─" };
                        out.push(PreviewLine { text: ch.repeat(w), style: LineStyle::Heading(*level) });
                    }
                }
                Block::Paragraph(text) => push_wrapped(&inline_text(text), "", LineStyle::Body, &mut out),
                Block::ListItem { marker, text } => {
                    let prefix = match marker {
                        ListMarker::Bullet => "• ".to_string(),
                        ListMarker::Ordered(n) => format!("{n}. "),
                        ListMarker::Task { checked: true } => "☑ ".to_string(),
                        ListMarker::Task { checked: false } => "☐ ".to_string(),
                    };
                    push_wrapped(&inline_text(text), &prefix, LineStyle::ListItem, &mut out);
                }
                Block::Quote(text) => push_wrapped(&inline_text(text), "│ ", LineStyle::Quote, &mut out),
                Block::Code { lang, body } => {
                    if let Some(l) = lang {
                        out.push(PreviewLine { text: format!("  [{l}]"), style: LineStyle::Code });
                    }
                    for l in body.lines() {
                        out.push(PreviewLine { text: format!("  {l}"), style: LineStyle::Code });
                    }
                }
                Block::Diagram { diagram, .. } => {
                    out.push(PreviewLine { text: format!("◆ {}", diagram.kind().label()), style: LineStyle::DiagramTitle });
                    for l in diagram.display_lines() {
                        out.push(PreviewLine { text: format!("  {l}"), style: LineStyle::Diagram });
                    }
                }
                Block::Rule => out.push(PreviewLine { text: "─".repeat(width.min(40)), style: LineStyle::Rule }),
                Block::Blank => {
                    if out.last().is_some_and(|l| l.style != LineStyle::Blank) {
                        out.push(PreviewLine { text: String::new(), style: LineStyle::Blank });
                    }
                }
            }
        }
        out
    }

    /// Materialize the preview as an HTML fragment.
    pub fn to_html(&self) -> String {
        #[derive(PartialEq)]
        enum OpenList {
            None,
            Unordered,
            Ordered,
        }

        let mut html = String::new();
        let mut open = OpenList::None;
        let close = |open: &mut OpenList, html: &mut String| {
            match open {
                OpenList::Unordered => html.push_str("</ul>\n"),
                OpenList::Ordered => html.push_str("</ol>\n"),
                OpenList::None => {}
            }
            *open = OpenList::None;
        };

        for block in &self.blocks {
            if let Block::ListItem { marker, text } = block {
                let want = if matches!(marker, ListMarker::Ordered(_)) { OpenList::Ordered } else { OpenList::Unordered };
                if open != want {
                    close(&mut open, &mut html);
                    match (&want, marker) {
                        (OpenList::Ordered, ListMarker::Ordered(n)) if *n != 1 => {
                            let _ = writeln!(html, "<ol start=\"{n}\">");
                        }
                        (OpenList::Ordered, _) => html.push_str("<ol>\n"),
                        _ => html.push_str("<ul>\n"),
                    }
                    open = want;
                }
                match marker {
                    ListMarker::Task { checked } => {
                        let checked = if *checked { " checked" } else { "" };
                        let _ = writeln!(html, "<li><input type=\"checkbox\" disabled{checked}> {}</li>", inline_html(text));
                    }
                    _ => {
                        let _ = writeln!(html, "<li>{}</li>", inline_html(text));
                    }
                }
                continue;
            }
            if *block == Block::Blank {
                continue;
            }
            close(&mut open, &mut html);

            match block {
                Block::Heading { level, text } => {
                    let _ = writeln!(html, "<h{level}>{}</h{level}>", inline_html(text));
                }
                Block::Paragraph(text) => {
                    let _ = writeln!(html, "<p>{}</p>", inline_html(text));
                }
                Block::Quote(text) => {
                    let _ = writeln!(html, "<blockquote><p>{}</p></blockquote>", inline_html(text));
                }
                Block::Code { lang, body } => {
                    let class = lang.as_ref().map(|l| format!(" class=\"language-{}\"", escape_html(l))).unwrap_or_default();
                    let _ = writeln!(html, "<pre><code{class}>{}</code></pre>", escape_html(body));
                }
                Block::Diagram { diagram, source } => {
                    let _ = writeln!(
                        html,
                        "<pre class=\"mermaid\" data-kind=\"{}\">{}</pre>",
                        diagram.kind().label(),
                        escape_html(source)
                    );
                }
                Block::Rule => html.push_str("<hr>\n"),
                Block::ListItem { .. } | Block::Blank => {}
            }
        }
        close(&mut open, &mut html);
        html
    }
}

/// Reduce inline Markdown to plain display text.
pub fn inline_text(s: &str) -> String {
    let s = IMAGE.replace_all(s, "[image: $1]");
    let s = LINK.replace_all(&s, "$1 ($2)");
    let s = BOLD.replace_all(&s, "$1$2");
    let s = STRIKE.replace_all(&s, "$1");
    let s = ITALIC.replace_all(&s, "$1$2");
    CODE.replace_all(&s, "$1").into_owned()
}

/// Convert inline Markdown to escaped HTML.
pub fn inline_html(s: &str) -> String {
    let s = escape_html(s);
    let s = CODE.replace_all(&s, "<code>$1</code>");
    let s = IMAGE.replace_all(&s, "<img src=\"$2\" alt=\"$1\">");
    let s = LINK.replace_all(&s, "<a href=\"$2\">$1</a>");
    let s = BOLD.replace_all(&s, "<strong>$1$2</strong>");
    let s = STRIKE.replace_all(&s, "<del>$1</del>");
    ITALIC.replace_all(&s, "<em>$1$2</em>").into_owned()
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Greedy word wrap by display width. Words longer than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut cur = String::new();
    let mut cur_w = 0;

    for word in text.split_whitespace() {
        let word_w: usize = word.chars().map(|c| UnicodeWidthChar::width(c).unwrap_or(1)).sum();
        if cur_w > 0 && cur_w + 1 + word_w > width {
            lines.push(std::mem::take(&mut cur));
            cur_w = 0;
        }
        if word_w > width {
            for ch in word.chars() {
                let w = UnicodeWidthChar::width(ch).unwrap_or(1);
                if cur_w + w > width {
                    lines.push(std::mem::take(&mut cur));
                    cur_w = 0;
                }
                cur.push(ch);
                cur_w += w;
            }
            continue;
        }
        if cur_w > 0 {
            cur.push(' ');
            cur_w += 1;
        }
        cur.push_str(word);
        cur_w += word_w;
    }
    if !cur.is_empty() || lines.is_empty() {
        lines.push(cur);
    }
    lines
}
