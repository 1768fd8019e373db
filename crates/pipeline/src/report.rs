//! The final report: exact output format, rendering, and structural parsing.
//!
//! The block format is a compatibility contract with downstream renderers
//! and must not drift:
//!
//! ```text
//! ### <Gift Name>
//! **Description**: <one line>
//! **Why it's a great fit**: <one line>
//! **Source**: [<Site Name>](<link>)
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Exact literal the document must begin with — no preamble before it.
pub const REPORT_HEADING: &str = "## 🧾 Gift Recommendations";

/// Line emitted under the heading when no traceable products exist.
pub const EMPTY_REPORT_NOTE: &str = "No recommendations found for this profile.";

pub const MIN_RECOMMENDATIONS: usize = 8;
pub const MAX_RECOMMENDATIONS: usize = 12;

const DESCRIPTION_PREFIX: &str = "**Description**:";
const FIT_PREFIX: &str = "**Why it's a great fit**:";
const SOURCE_PREFIX: &str = "**Source**:";

/// The terminal artifact of the pipeline: a markdown document owned by the
/// caller once returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftReport(String);

impl GiftReport {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for GiftReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One parsed recommendation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationBlock {
    pub name: String,
    pub description: String,
    pub fit: String,
    pub source_name: String,
    pub source_link: String,
}

impl RecommendationBlock {
    pub fn render(&self) -> String {
        format!(
            "### {name}\n\
             {DESCRIPTION_PREFIX} {description}\n\
             {FIT_PREFIX} {fit}\n\
             {SOURCE_PREFIX} [{source}]({link})",
            name = self.name,
            description = self.description,
            fit = self.fit,
            source = self.source_name,
            link = self.source_link,
        )
    }
}

/// Render the canonical report document from validated blocks.
pub fn render_report(blocks: &[RecommendationBlock]) -> GiftReport {
    if blocks.is_empty() {
        return empty_report();
    }
    let body = blocks
        .iter()
        .map(RecommendationBlock::render)
        .collect::<Vec<_>>()
        .join("\n\n");
    GiftReport(format!("{REPORT_HEADING}\n\n{body}\n"))
}

/// The minimal report: mandated heading, zero recommendation blocks.
pub fn empty_report() -> GiftReport {
    GiftReport(format!("{REPORT_HEADING}\n\n{EMPTY_REPORT_NOTE}\n"))
}

/// Structurally parse the recommendation blocks of a report body.
///
/// `text` is everything from the heading onward.  Each `### ` line opens a
/// block; within it the description, fit, and source lines must appear in
/// that order.  Returns an error message naming the first malformed block.
pub fn parse_blocks(text: &str) -> std::result::Result<Vec<RecommendationBlock>, String> {
    let mut blocks = Vec::new();
    let mut lines = text.lines().peekable();

    while let Some(line) = lines.next() {
        let line = line.trim();
        let Some(name) = line.strip_prefix("### ") else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            return Err("recommendation block with empty gift name".to_string());
        }

        let mut field = |prefix: &str| -> std::result::Result<String, String> {
            // Skip blank separator lines inside a block.
            while lines.peek().is_some_and(|l| l.trim().is_empty()) {
                lines.next();
            }
            let line = lines
                .next()
                .map(str::trim)
                .ok_or_else(|| format!("block '{name}' ends before '{prefix}'"))?;
            line.strip_prefix(prefix)
                .map(|rest| rest.trim().to_string())
                .ok_or_else(|| format!("block '{name}' missing '{prefix}' line (got: {line})"))
        };

        let description = field(DESCRIPTION_PREFIX)?;
        let fit = field(FIT_PREFIX)?;
        let source = field(SOURCE_PREFIX)?;
        let (source_name, source_link) = parse_source(&source)
            .ok_or_else(|| format!("block '{name}' has malformed source line: {source}"))?;

        blocks.push(RecommendationBlock {
            name: name.to_string(),
            description,
            fit,
            source_name,
            source_link,
        });
    }

    Ok(blocks)
}

/// Split `[Site Name](link)` into its parts.
fn parse_source(text: &str) -> Option<(String, String)> {
    let text = text.trim();
    let rest = text.strip_prefix('[')?;
    let close = rest.find("](")?;
    let name = rest[..close].trim();
    let link = rest[close + 2..].strip_suffix(')')?.trim();
    if name.is_empty() || link.is_empty() {
        return None;
    }
    Some((name.to_string(), link.to_string()))
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn block(n: usize) -> RecommendationBlock {
        RecommendationBlock {
            name: format!("Gift {n}"),
            description: "A one-line description.".to_string(),
            fit: "Matches the occasion and budget.".to_string(),
            source_name: "Good Housekeeping".to_string(),
            source_link: format!("https://www.goodhousekeeping.com/gift-{n}"),
        }
    }

    #[test]
    fn report_begins_with_exact_heading() {
        let report = render_report(&[block(1)]);
        assert!(report.as_str().starts_with("## 🧾 Gift Recommendations\n"));
        assert!(empty_report().as_str().starts_with(REPORT_HEADING));
    }

    #[test]
    fn block_renders_exact_format() {
        let rendered = block(1).render();
        assert_eq!(
            rendered,
            "### Gift 1\n\
             **Description**: A one-line description.\n\
             **Why it's a great fit**: Matches the occasion and budget.\n\
             **Source**: [Good Housekeeping](https://www.goodhousekeeping.com/gift-1)"
        );
    }

    #[test]
    fn into_inner_returns_the_full_document() {
        let text = render_report(&[block(1)]).into_inner();
        assert!(text.starts_with(REPORT_HEADING));
        assert!(text.contains("### Gift 1"));
    }

    #[test]
    fn render_then_parse_roundtrip() {
        let blocks: Vec<_> = (1..=3).map(block).collect();
        let report = render_report(&blocks);
        let parsed = parse_blocks(report.as_str()).unwrap();
        assert_eq!(parsed, blocks);
    }

    #[test]
    fn empty_report_has_zero_blocks() {
        let report = empty_report();
        assert!(parse_blocks(report.as_str()).unwrap().is_empty());
        assert!(report.as_str().contains(EMPTY_REPORT_NOTE));
    }

    #[test]
    fn parse_tolerates_blank_lines_inside_block() {
        let text = "### Copper Pan\n\n**Description**: A pan.\n\n**Why it's a great fit**: They cook.\n\n**Source**: [Etsy](https://www.etsy.com/pan)";
        let parsed = parse_blocks(text).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].source_link, "https://www.etsy.com/pan");
    }

    #[test]
    fn parse_rejects_out_of_order_fields() {
        let text = "### Copper Pan\n**Why it's a great fit**: They cook.\n**Description**: A pan.\n**Source**: [Etsy](https://www.etsy.com/pan)";
        let err = parse_blocks(text).unwrap_err();
        assert!(err.contains("**Description**:"), "{err}");
    }

    #[test]
    fn parse_rejects_truncated_block() {
        let text = "### Copper Pan\n**Description**: A pan.";
        assert!(parse_blocks(text).is_err());
    }

    #[test]
    fn parse_rejects_malformed_source() {
        let text =
            "### Copper Pan\n**Description**: A pan.\n**Why it's a great fit**: They cook.\n**Source**: see etsy.com";
        let err = parse_blocks(text).unwrap_err();
        assert!(err.contains("malformed source"), "{err}");
    }

    #[test]
    fn parse_source_variants() {
        assert_eq!(
            parse_source("[Etsy](https://etsy.com)"),
            Some(("Etsy".to_string(), "https://etsy.com".to_string()))
        );
        assert!(parse_source("[](https://etsy.com)").is_none());
        assert!(parse_source("[Etsy]()").is_none());
        assert!(parse_source("Etsy - https://etsy.com").is_none());
    }
}
