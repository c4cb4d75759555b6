//! Block type enumeration and natural-language aliases

use serde::{Deserialize, Serialize};

/// The kind of a block. Determines the expected content shape and how the
/// block is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockType {
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    BulletList,
    NumberedList,
    Quote,
    Code,
    Table,
    Database,
    Divider,
}

impl BlockType {
    /// Whether this type stores its content as plain text
    pub fn is_text_like(&self) -> bool {
        matches!(
            self,
            BlockType::Paragraph
                | BlockType::Heading1
                | BlockType::Heading2
                | BlockType::Heading3
                | BlockType::BulletList
                | BlockType::NumberedList
                | BlockType::Quote
                | BlockType::Divider
        )
    }

    /// Whether this type carries a structured (non-text) payload
    pub fn is_structured(&self) -> bool {
        matches!(self, BlockType::Table | BlockType::Database | BlockType::Code)
    }

    /// Whether this type is one of the list variants
    pub fn is_list(&self) -> bool {
        matches!(self, BlockType::BulletList | BlockType::NumberedList)
    }

    /// Whether this type is a heading level
    pub fn is_heading(&self) -> bool {
        matches!(self, BlockType::Heading1 | BlockType::Heading2 | BlockType::Heading3)
    }

    /// Whether this type stores tabular content
    pub fn is_tabular(&self) -> bool {
        matches!(self, BlockType::Table | BlockType::Database)
    }

    /// Parse a type name, accepting the natural aliases users (and language
    /// models) produce: "bullet list", "h1", "blockquote", etc.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect();

        match normalized.as_str() {
            "paragraph" | "text" => Some(BlockType::Paragraph),
            "heading" | "heading1" | "h1" | "title" => Some(BlockType::Heading1),
            "heading2" | "h2" | "subheading" => Some(BlockType::Heading2),
            "heading3" | "h3" => Some(BlockType::Heading3),
            "bulletlist" | "bullets" | "list" | "bulletedlist" => Some(BlockType::BulletList),
            "numberedlist" | "orderedlist" | "numberlist" => Some(BlockType::NumberedList),
            "quote" | "blockquote" => Some(BlockType::Quote),
            "code" | "codeblock" => Some(BlockType::Code),
            "table" => Some(BlockType::Table),
            "database" | "db" => Some(BlockType::Database),
            "divider" | "hr" | "separator" => Some(BlockType::Divider),
            _ => None,
        }
    }

    /// The canonical camelCase name, matching the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Paragraph => "paragraph",
            BlockType::Heading1 => "heading1",
            BlockType::Heading2 => "heading2",
            BlockType::Heading3 => "heading3",
            BlockType::BulletList => "bulletList",
            BlockType::NumberedList => "numberedList",
            BlockType::Quote => "quote",
            BlockType::Code => "code",
            BlockType::Table => "table",
            BlockType::Database => "database",
            BlockType::Divider => "divider",
        }
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
