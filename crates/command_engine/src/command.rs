//! Parsed command types - the structured form of a user instruction

use block_model::{BlockId, BlockType};
use serde::{Deserialize, Serialize};

/// What a command does to the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommandAction {
    Create,
    Edit,
    Delete,
    Move,
    Transform,
    Duplicate,
    Merge,
    Split,
    Style,
}

impl CommandAction {
    /// Parse an action name as the language model writes it
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "create" | "add" | "insert" => Some(CommandAction::Create),
            "edit" | "update" | "change" => Some(CommandAction::Edit),
            "delete" | "remove" => Some(CommandAction::Delete),
            "move" => Some(CommandAction::Move),
            "transform" | "convert" => Some(CommandAction::Transform),
            "duplicate" | "copy" => Some(CommandAction::Duplicate),
            "merge" | "combine" => Some(CommandAction::Merge),
            "split" => Some(CommandAction::Split),
            "style" | "format" => Some(CommandAction::Style),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandAction::Create => "create",
            CommandAction::Edit => "edit",
            CommandAction::Delete => "delete",
            CommandAction::Move => "move",
            CommandAction::Transform => "transform",
            CommandAction::Duplicate => "duplicate",
            CommandAction::Merge => "merge",
            CommandAction::Split => "split",
            CommandAction::Style => "style",
        }
    }
}

impl std::fmt::Display for CommandAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A symbolic description of which block(s) a command acts on, resolved
/// against the document by the target resolver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum TargetReference {
    This,
    Selected,
    Above,
    Below,
    First,
    Last,
    All,
    /// 1-based position in the document
    Position(usize),
    /// Case-insensitive content match
    Content(String),
    /// Every block of a type
    #[serde(rename = "type")]
    TypeIs(BlockType),
    /// A specific block
    Id(BlockId),
}

/// A target reference plus the block ids it resolved to. `block_ids`
/// starts empty and is bound exactly once before execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandTarget {
    pub reference: TargetReference,
    #[serde(default)]
    pub block_ids: Vec<BlockId>,
}

/// Where an insertion lands relative to its anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InsertPosition {
    Before,
    #[default]
    After,
    Inside,
    Replace,
}

impl InsertPosition {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "before" => Some(InsertPosition::Before),
            "after" => Some(InsertPosition::After),
            "inside" => Some(InsertPosition::Inside),
            "replace" => Some(InsertPosition::Replace),
            _ => None,
        }
    }
}

/// Typed command parameters. `destination` anchors a move; everything
/// else is action-specific and optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandParameters {
    pub new_type: Option<BlockType>,
    pub content: Option<String>,
    pub position: Option<InsertPosition>,
    pub count: Option<usize>,
    pub style: Option<String>,
    pub destination: Option<TargetReference>,
}

/// The structured command produced by the parser for one user input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedCommand {
    pub action: CommandAction,
    /// Heuristic certainty that this command matches user intent, [0, 1]
    pub confidence: f32,
    pub target: CommandTarget,
    pub parameters: CommandParameters,
    pub natural_language: String,
}

impl ParsedCommand {
    /// A command with full confidence and default parameters, for
    /// callers that build commands programmatically
    pub fn new(action: CommandAction, reference: TargetReference) -> Self {
        Self {
            action,
            confidence: 1.0,
            target: CommandTarget {
                reference,
                block_ids: Vec::new(),
            },
            parameters: CommandParameters::default(),
            natural_language: String::new(),
        }
    }

    /// Bind the target to explicit block ids
    pub fn with_block_ids(mut self, block_ids: Vec<BlockId>) -> Self {
        self.target.block_ids = block_ids;
        self
    }

    pub fn with_parameters(mut self, parameters: CommandParameters) -> Self {
        self.parameters = parameters;
        self
    }
}
