//! Block content payloads - one tagged variant per content shape
//!
//! Every block type maps to exactly one content variant:
//! - text-like types (paragraph, headings, lists, quote, divider) → `Text`
//! - table and database → `Table`
//! - code → `Code`
//!
//! Operations that build or reshape content go through the constructors
//! here so a block never carries a payload inconsistent with its type.

use crate::BlockType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A column definition in a table or database block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Stable column id ("col1", "col2", ...) - row cells key on this,
    /// never on the display name
    pub id: String,
    /// Display name shown in the column header
    pub name: String,
}

impl Column {
    /// Create the Nth column (1-based) with its generated id and name
    pub fn numbered(n: usize) -> Self {
        Self {
            id: format!("col{}", n),
            name: format!("Column {}", n),
        }
    }
}

/// A single row - cells keyed by column id
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableRow {
    pub cells: HashMap<String, String>,
}

impl TableRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cell value by column id, empty string if absent
    pub fn cell(&self, column_id: &str) -> &str {
        self.cells.get(column_id).map(String::as_str).unwrap_or("")
    }

    pub fn set_cell(&mut self, column_id: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(column_id.into(), value.into());
    }
}

/// Tabular content for table and database blocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableContent {
    pub columns: Vec<Column>,
    pub rows: Vec<TableRow>,
}

impl TableContent {
    pub fn new(columns: Vec<Column>, rows: Vec<TableRow>) -> Self {
        Self { columns, rows }
    }

    /// The smallest valid table: one column, one empty row.
    /// Tables and databases must never have zero columns or zero rows.
    pub fn minimal() -> Self {
        let column = Column::numbered(1);
        let mut row = TableRow::new();
        row.set_cell(column.id.clone(), "");
        Self {
            columns: vec![column],
            rows: vec![row],
        }
    }

    /// Column ids in display order
    pub fn column_ids(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.id.as_str()).collect()
    }

    /// Flatten each row to a line, cells joined with " - " in column order
    pub fn rows_as_lines(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|col| row.cell(&col.id))
                    .collect::<Vec<_>>()
                    .join(" - ")
            })
            .collect()
    }
}

/// Code content with a detected or user-chosen language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeContent {
    pub code: String,
    pub language: String,
}

impl CodeContent {
    pub fn new(code: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
        }
    }
}

/// The polymorphic payload of a block, tagged by shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BlockContent {
    Text { text: String },
    Table(TableContent),
    Code(CodeContent),
}

impl BlockContent {
    /// Plain text content
    pub fn text(text: impl Into<String>) -> Self {
        BlockContent::Text { text: text.into() }
    }

    /// The default (minimum valid) content shape for a block type.
    /// Structured types get a non-degenerate payload: a table or database
    /// always has at least one column and one row.
    pub fn default_for(block_type: BlockType) -> Self {
        match block_type {
            BlockType::Table | BlockType::Database => BlockContent::Table(TableContent::minimal()),
            BlockType::Code => BlockContent::Code(CodeContent::new("", "text")),
            _ => BlockContent::text(""),
        }
    }

    /// Build content of the shape `block_type` expects from plain text.
    /// Tabular types get one row per line in a single generated column.
    pub fn from_text(block_type: BlockType, text: &str) -> Self {
        match block_type {
            BlockType::Table | BlockType::Database => {
                let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
                if lines.is_empty() {
                    return BlockContent::Table(TableContent::minimal());
                }
                let column = Column::numbered(1);
                let rows = lines
                    .iter()
                    .map(|line| {
                        let mut row = TableRow::new();
                        row.set_cell(column.id.clone(), line.trim());
                        row
                    })
                    .collect();
                BlockContent::Table(TableContent::new(vec![column], rows))
            }
            BlockType::Code => BlockContent::Code(CodeContent::new(text, "text")),
            _ => BlockContent::text(text),
        }
    }

    /// Whether this content shape is valid for the given block type
    pub fn matches(&self, block_type: BlockType) -> bool {
        match self {
            BlockContent::Text { .. } => block_type.is_text_like(),
            BlockContent::Table(_) => block_type.is_tabular(),
            BlockContent::Code(_) => block_type == BlockType::Code,
        }
    }

    /// Lossy flattening to plain text, used for content matching, merging,
    /// and building context summaries
    pub fn plain_text(&self) -> String {
        match self {
            BlockContent::Text { text } => text.clone(),
            BlockContent::Code(code) => code.code.clone(),
            BlockContent::Table(table) => table.rows_as_lines().join("\n"),
        }
    }

    /// True when the content holds nothing user-visible
    pub fn is_empty(&self) -> bool {
        self.plain_text().trim().is_empty()
    }
}
