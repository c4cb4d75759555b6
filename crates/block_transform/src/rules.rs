//! Specific type-pair conversion rules
//!
//! Each rule is a pure, synchronous function from a source block to a
//! block of the target type. The pair table in [`specific_rule`] covers
//! the well-understood conversions; everything else goes through the
//! transformer's generic fallback. Rules never change the block id.

use crate::{language::detect_language, Result};
use block_model::{Block, BlockContent, BlockType, CodeContent, Column, TableContent, TableRow};
use regex_lite::Regex;
use std::sync::OnceLock;
use unicode_segmentation::UnicodeSegmentation;

/// Headings are not expected to hold long text
const HEADING_MAX_GRAPHEMES: usize = 100;

/// Cell delimiters tried in priority order when parsing a line into cells
const CELL_DELIMITERS: [char; 3] = [':', '|', ','];

pub(crate) type SpecificRule = fn(&Block, BlockType) -> Result<Block>;

/// The pair table: look up the conversion rule for (source, target)
pub(crate) fn specific_rule(source: BlockType, target: BlockType) -> Option<SpecificRule> {
    use BlockType::*;
    match (source, target) {
        (s, t) if s.is_list() && t.is_tabular() => Some(list_to_table),
        (s, t) if s.is_tabular() && t.is_list() => Some(table_to_list),
        (s, t) if s.is_list() && t.is_list() => Some(carry_text),
        (Paragraph, t) if t.is_heading() => Some(paragraph_to_heading),
        (s, Paragraph) if s.is_heading() => Some(carry_text),
        (Paragraph, Quote) | (Quote, Paragraph) => Some(carry_text),
        (Paragraph, Code) => Some(paragraph_to_code),
        (Code, Paragraph) => Some(carry_text),
        _ => None,
    }
}

fn list_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"^\s*(?:[-*•]|\d+[.)])\s*").unwrap())
}

/// Strip a leading bullet or number marker from a list line
pub(crate) fn strip_list_marker(line: &str) -> String {
    list_marker().replace(line, "").trim().to_string()
}

/// Parse plain-text lines into tabular content: each line is split on the
/// first delimiter found (`:` then `|` then `,`), all rows padded to the
/// widest row, columns generated as col1..colN.
pub(crate) fn parse_delimited_table(lines: &[String]) -> TableContent {
    let cell_rows: Vec<Vec<String>> = lines
        .iter()
        .map(|line| match CELL_DELIMITERS.iter().find(|d| line.contains(**d)) {
            Some(delimiter) => line
                .split(*delimiter)
                .map(|cell| cell.trim().to_string())
                .collect(),
            None => vec![line.trim().to_string()],
        })
        .collect();

    let width = cell_rows.iter().map(Vec::len).max().unwrap_or(0);
    if width == 0 {
        return TableContent::minimal();
    }

    let columns: Vec<Column> = (1..=width).map(Column::numbered).collect();
    let rows = cell_rows
        .into_iter()
        .map(|cells| {
            let mut row = TableRow::new();
            for (i, column) in columns.iter().enumerate() {
                row.set_cell(column.id.clone(), cells.get(i).cloned().unwrap_or_default());
            }
            row
        })
        .collect();

    TableContent::new(columns, rows)
}

fn list_to_table(block: &Block, target: BlockType) -> Result<Block> {
    let items: Vec<String> = block
        .plain_text()
        .lines()
        .map(strip_list_marker)
        .filter(|item| !item.is_empty())
        .collect();
    let content = BlockContent::Table(parse_delimited_table(&items));
    Ok(block.retyped(target, content)?)
}

fn table_to_list(block: &Block, target: BlockType) -> Result<Block> {
    let lines = match &block.content {
        BlockContent::Table(table) => table.rows_as_lines(),
        other => other.plain_text().lines().map(str::to_string).collect(),
    };
    let text = lines
        .iter()
        .enumerate()
        .map(|(i, line)| match target {
            BlockType::NumberedList => format!("{}. {}", i + 1, line),
            _ => format!("• {}", line),
        })
        .collect::<Vec<_>>()
        .join("\n");
    Ok(block.retyped(target, BlockContent::text(text))?)
}

fn paragraph_to_heading(block: &Block, target: BlockType) -> Result<Block> {
    let text = block.plain_text();
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    let heading = if graphemes.len() > HEADING_MAX_GRAPHEMES {
        let mut truncated: String = graphemes[..HEADING_MAX_GRAPHEMES].concat();
        truncated.push('…');
        truncated
    } else {
        text
    };
    Ok(block.retyped(target, BlockContent::text(heading))?)
}

fn paragraph_to_code(block: &Block, target: BlockType) -> Result<Block> {
    let text = block.plain_text();
    let language = detect_language(&text);
    let content = BlockContent::Code(CodeContent::new(text, language));
    Ok(block.retyped(target, content)?)
}

/// Text carried over unchanged; only the type changes
fn carry_text(block: &Block, target: BlockType) -> Result<Block> {
    Ok(block.retyped(target, BlockContent::text(block.plain_text()))?)
}
