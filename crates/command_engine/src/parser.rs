//! Command parser - free text to structured command
//!
//! Language understanding is delegated to the adapter; this module owns
//! the contract: the prompt the adapter sees, validation and coercion of
//! whatever it returns, and the deterministic confidence score callers
//! rely on. Parsing is stateless and safely retryable.

use crate::{
    CommandAction, CommandParameters, CommandTarget, InsertPosition, ParseError, ParsedCommand,
    TargetReference,
};
use ai_adapter::{LanguageModelAdapter, RawParameters, RawTarget};
use block_model::{document, Block, BlockId, BlockType};
use std::sync::Arc;
use tracing::{debug, warn};

/// Inputs shorter than this earn a small confidence bonus
const SHORT_INPUT_CHARS: usize = 50;
const BASE_CONFIDENCE: f32 = 0.5;

/// Document state the parser describes to the language model
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    pub blocks: &'a [Block],
    pub selected_block_id: Option<BlockId>,
}

/// Turns user text plus document context into a [`ParsedCommand`]
pub struct CommandParser {
    adapter: Arc<dyn LanguageModelAdapter>,
}

impl CommandParser {
    pub fn new(adapter: Arc<dyn LanguageModelAdapter>) -> Self {
        Self { adapter }
    }

    /// Parse one instruction. Fails with [`ParseError`] when the adapter
    /// is unreachable or returns an unusable structure - callers surface
    /// that as "please rephrase".
    pub async fn parse(
        &self,
        input: &str,
        context: &ParseContext<'_>,
    ) -> Result<ParsedCommand, ParseError> {
        let system_prompt = build_system_prompt(context);
        let raw = self.adapter.understand(&system_prompt, input).await?;

        let action_present = raw.action.is_some();
        let action = raw
            .action
            .as_deref()
            .and_then(CommandAction::parse)
            .ok_or_else(|| ParseError::Unparsable(format!("unusable action: {:?}", raw.action)))?;

        let reference = match raw.target.as_ref() {
            Some(target) => coerce_target(target)?,
            None => TargetReference::Selected,
        };
        let parameters = coerce_parameters(raw.parameters.as_ref())?;
        let confidence = score_confidence(action_present, action, &reference, &parameters, input);
        debug!(action = %action, confidence, "parsed command");

        Ok(ParsedCommand {
            action,
            confidence,
            target: CommandTarget {
                reference,
                block_ids: Vec::new(),
            },
            parameters,
            natural_language: input.to_string(),
        })
    }
}

fn build_system_prompt(context: &ParseContext<'_>) -> String {
    let mut prompt = String::from(
        "You are the command layer of a block-based document editor. \
         Translate the user's instruction into a JSON command with fields: \
         `action` (create, edit, delete, move, transform, duplicate, merge, split, style), \
         `target` (one of the keywords this, selected, above, below, first, last, all, \
         or an object {\"type\": \"position\"|\"content\"|\"type\"|\"id\", \"value\": ...}) and \
         `parameters` (newType, content, position, count, style, destination).\n\n\
         Document blocks:\n",
    );
    prompt.push_str(&document::summarize(context.blocks));
    if let Some(selected) = context
        .selected_block_id
        .and_then(|id| document::find(context.blocks, id))
    {
        prompt.push_str("\n\nSelected block content:\n");
        prompt.push_str(&selected.plain_text());
    }
    prompt
}

/// Coerce a raw target into a typed reference. Unknown keywords fall
/// back to the selection; unusable typed forms are a parse failure.
fn coerce_target(raw: &RawTarget) -> Result<TargetReference, ParseError> {
    match raw {
        RawTarget::Keyword(word) => Ok(match word.trim().to_lowercase().as_str() {
            "this" | "it" => TargetReference::This,
            "selected" | "selection" => TargetReference::Selected,
            "above" | "previous" => TargetReference::Above,
            "below" | "next" => TargetReference::Below,
            "first" => TargetReference::First,
            "last" => TargetReference::Last,
            "all" | "everything" => TargetReference::All,
            other => {
                warn!(keyword = other, "unknown target keyword, defaulting to selection");
                TargetReference::Selected
            }
        }),
        RawTarget::Typed { kind, value } => match kind.trim().to_lowercase().as_str() {
            "position" => coerce_number(value)
                .map(TargetReference::Position)
                .ok_or_else(|| ParseError::Unparsable(format!("bad position value: {value}"))),
            "type" => value
                .as_str()
                .and_then(BlockType::parse)
                .map(TargetReference::TypeIs)
                .ok_or_else(|| ParseError::Unparsable(format!("bad type value: {value}"))),
            "content" => value
                .as_str()
                .map(|s| TargetReference::Content(s.to_string()))
                .ok_or_else(|| ParseError::Unparsable(format!("bad content value: {value}"))),
            "id" => value
                .as_str()
                .and_then(BlockId::from_string)
                .map(TargetReference::Id)
                .ok_or_else(|| ParseError::Unparsable(format!("bad id value: {value}"))),
            other => Err(ParseError::Unparsable(format!("unknown target kind: {other}"))),
        },
    }
}

fn coerce_parameters(raw: Option<&RawParameters>) -> Result<CommandParameters, ParseError> {
    let Some(raw) = raw else {
        return Ok(CommandParameters::default());
    };
    Ok(CommandParameters {
        new_type: raw.new_type.as_deref().and_then(BlockType::parse),
        content: raw.content.clone(),
        position: raw.position.as_deref().and_then(InsertPosition::parse),
        count: raw.count.as_ref().and_then(coerce_number),
        style: raw.style.clone(),
        destination: raw.destination.as_ref().map(coerce_target).transpose()?,
    })
}

/// Accept both numeric and numeric-string forms
fn coerce_number(value: &serde_json::Value) -> Option<usize> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().map(|v| v as usize),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// The deterministic confidence heuristic. This, not the adapter's own
/// certainty, is the score callers rely on.
fn score_confidence(
    action_present: bool,
    action: CommandAction,
    reference: &TargetReference,
    parameters: &CommandParameters,
    input: &str,
) -> f32 {
    let mut confidence = BASE_CONFIDENCE;
    if action_present {
        confidence += 0.2;
    }
    if !matches!(reference, TargetReference::All) {
        confidence += 0.15;
    }
    if action == CommandAction::Create && parameters.new_type.is_some() {
        confidence += 0.1;
    }
    if input.chars().count() < SHORT_INPUT_CHARS {
        confidence += 0.05;
    }
    confidence.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_adapter::doubles::{ScriptedAdapter, UnavailableAdapter};
    use ai_adapter::RawCommand;

    fn parser_with(adapter: ScriptedAdapter) -> CommandParser {
        CommandParser::new(Arc::new(adapter))
    }

    fn context_over(blocks: &[Block]) -> ParseContext<'_> {
        ParseContext {
            blocks,
            selected_block_id: None,
        }
    }

    fn raw(json: serde_json::Value) -> RawCommand {
        serde_json::from_value(json).unwrap()
    }

    #[tokio::test]
    async fn test_parse_full_command() {
        let adapter = ScriptedAdapter::new();
        adapter.push_command(raw(serde_json::json!({
            "action": "transform",
            "target": {"type": "type", "value": "bulletList"},
            "parameters": {"newType": "table"}
        })));
        let blocks = vec![Block::bullet_list("a: 1")];

        let command = parser_with(adapter)
            .parse("turn the list into a table", &context_over(&blocks))
            .await
            .unwrap();

        assert_eq!(command.action, CommandAction::Transform);
        assert_eq!(command.target.reference, TargetReference::TypeIs(BlockType::BulletList));
        assert!(command.target.block_ids.is_empty());
        assert_eq!(command.parameters.new_type, Some(BlockType::Table));
        assert_eq!(command.natural_language, "turn the list into a table");
    }

    #[tokio::test]
    async fn test_missing_target_defaults_to_selected() {
        let adapter = ScriptedAdapter::new();
        adapter.push_command(raw(serde_json::json!({"action": "delete"})));
        let blocks = vec![Block::paragraph("x")];

        let command = parser_with(adapter)
            .parse("delete it", &context_over(&blocks))
            .await
            .unwrap();

        assert_eq!(command.target.reference, TargetReference::Selected);
    }

    #[tokio::test]
    async fn test_unusable_action_is_unparsable() {
        let adapter = ScriptedAdapter::new();
        adapter.push_command(raw(serde_json::json!({"action": "explode"})));
        let blocks = vec![Block::paragraph("x")];

        let result = parser_with(adapter)
            .parse("explode the page", &context_over(&blocks))
            .await;

        assert!(matches!(result, Err(ParseError::Unparsable(_))));
    }

    #[tokio::test]
    async fn test_adapter_failure_propagates() {
        let parser = CommandParser::new(Arc::new(UnavailableAdapter));
        let blocks = vec![Block::paragraph("x")];

        let result = parser.parse("anything", &context_over(&blocks)).await;

        assert!(matches!(result, Err(ParseError::Adapter(_))));
    }

    #[tokio::test]
    async fn test_confidence_specific_short_command() {
        let adapter = ScriptedAdapter::new();
        adapter.push_command(raw(serde_json::json!({
            "action": "delete",
            "target": "this"
        })));
        let blocks = vec![Block::paragraph("x")];

        let command = parser_with(adapter)
            .parse("delete this", &context_over(&blocks))
            .await
            .unwrap();

        // 0.5 base + 0.2 action + 0.15 specific target + 0.05 short input
        assert!((command.confidence - 0.9).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_confidence_all_target_scores_lower() {
        let adapter = ScriptedAdapter::new();
        adapter.push_command(raw(serde_json::json!({
            "action": "delete",
            "target": "all"
        })));
        let blocks = vec![Block::paragraph("x")];

        let command = parser_with(adapter)
            .parse("delete every block in this whole document right now please", &context_over(&blocks))
            .await
            .unwrap();

        // 0.5 base + 0.2 action, no specificity or brevity bonus
        assert!((command.confidence - 0.7).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_confidence_caps_at_one() {
        let adapter = ScriptedAdapter::new();
        adapter.push_command(raw(serde_json::json!({
            "action": "create",
            "target": "last",
            "parameters": {"newType": "database"}
        })));
        let blocks = vec![Block::paragraph("x")];

        let command = parser_with(adapter)
            .parse("add a database", &context_over(&blocks))
            .await
            .unwrap();

        assert!((command.confidence - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_count_tolerates_string_form() {
        let adapter = ScriptedAdapter::new();
        adapter.push_command(raw(serde_json::json!({
            "action": "duplicate",
            "target": "this",
            "parameters": {"count": "3"}
        })));
        let blocks = vec![Block::paragraph("x")];

        let command = parser_with(adapter)
            .parse("make three copies", &context_over(&blocks))
            .await
            .unwrap();

        assert_eq!(command.parameters.count, Some(3));
    }
}
