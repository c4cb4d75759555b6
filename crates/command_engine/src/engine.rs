//! Manipulation engine - transactional execution of parsed commands
//!
//! `execute` is the transaction boundary: it snapshots the document,
//! dispatches to one action handler, and either commits (recording the
//! transaction for undo and returning the new list) or returns the
//! original list untouched with a human-readable error. Handlers build
//! new lists rather than mutating, so a failed transaction leaves no
//! partial state. `execute` itself never returns `Err`.

use crate::{
    resolver, BlockChange, CommandAction, CommandParameters, EngineError, InsertPosition,
    ParsedCommand, ResolveContext, Transaction, UndoManager,
};
use block_model::{document, Block, BlockContent, BlockId, BlockType};
use block_transform::BlockTransformer;
use std::collections::HashSet;
use tracing::debug;

/// The outcome of one `execute` call. On failure `blocks` is the input
/// list unchanged and `error` is a non-empty description.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub success: bool,
    pub blocks: Vec<Block>,
    pub changes: Vec<BlockChange>,
    pub error: Option<String>,
}

type HandlerOutcome = Result<(Vec<Block>, Vec<BlockChange>), EngineError>;

/// Executes commands against a document's block list. One engine per
/// open document - the embedded undo manager is that document's
/// history. Construct with an injected transformer; the engine holds no
/// global state.
pub struct ManipulationEngine {
    transformer: BlockTransformer,
    undo: UndoManager,
}

impl ManipulationEngine {
    pub fn new(transformer: BlockTransformer) -> Self {
        Self {
            transformer,
            undo: UndoManager::new(),
        }
    }

    pub fn with_history_limit(transformer: BlockTransformer, limit: usize) -> Self {
        Self {
            transformer,
            undo: UndoManager::with_limit(limit),
        }
    }

    /// Execute one command as an atomic transaction
    pub async fn execute(
        &mut self,
        command: &ParsedCommand,
        blocks: &[Block],
        ctx: &ResolveContext,
    ) -> ExecutionResult {
        let original = blocks.to_vec();
        let targets = bind_targets(command, blocks, ctx);
        debug!(action = %command.action, targets = targets.len(), "executing command");

        let outcome = match command.action {
            CommandAction::Create => create(&command.parameters, &targets, blocks),
            CommandAction::Delete => delete(&targets, blocks),
            CommandAction::Edit => edit(&command.parameters, &targets, blocks),
            CommandAction::Move => move_blocks(&command.parameters, &targets, blocks, ctx),
            CommandAction::Transform => {
                self.transform(&command.parameters, &targets, blocks).await
            }
            CommandAction::Duplicate => duplicate(&command.parameters, &targets, blocks),
            CommandAction::Merge => merge(&targets, blocks),
            CommandAction::Split => split(&targets, blocks),
            CommandAction::Style => Err(EngineError::Unsupported(command.action)),
        };

        match outcome {
            Ok((new_blocks, changes)) => {
                self.undo.commit(Transaction::new(changes.clone(), original));
                ExecutionResult {
                    success: true,
                    blocks: new_blocks,
                    changes,
                    error: None,
                }
            }
            Err(err) => ExecutionResult {
                success: false,
                blocks: original,
                changes: Vec::new(),
                error: Some(err.to_string()),
            },
        }
    }

    /// Restore the document to its state before the last committed
    /// transaction; `None` when there is nothing to undo
    pub fn undo(&mut self) -> Option<Vec<Block>> {
        self.undo.undo()
    }

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    /// Drop this document's history (when switching documents)
    pub fn clear_history(&mut self) {
        self.undo.clear();
    }

    async fn transform(
        &self,
        parameters: &CommandParameters,
        targets: &[Block],
        blocks: &[Block],
    ) -> HandlerOutcome {
        if targets.is_empty() {
            return Err(EngineError::EmptyTarget { action: "transform" });
        }
        let target_type = parameters
            .new_type
            .ok_or_else(|| EngineError::Validation("No target type specified".to_string()))?;

        let ids = id_set(targets);
        let mut new_blocks = Vec::with_capacity(blocks.len());
        let mut changes = Vec::new();
        for block in blocks {
            if ids.contains(&block.id()) {
                let transformed = self.transformer.transform(block, target_type).await?;
                changes.push(BlockChange::transformed(block.clone(), transformed.clone()));
                new_blocks.push(transformed);
            } else {
                new_blocks.push(block.clone());
            }
        }
        Ok((new_blocks, changes))
    }
}

/// Use pre-bound ids when the caller supplied them, otherwise resolve
/// the reference. Either way targets come back in document order.
fn bind_targets(command: &ParsedCommand, blocks: &[Block], ctx: &ResolveContext) -> Vec<Block> {
    if command.target.block_ids.is_empty() {
        resolver::resolve(&command.target.reference, blocks, ctx)
    } else {
        blocks
            .iter()
            .filter(|b| command.target.block_ids.contains(&b.id()))
            .cloned()
            .collect()
    }
}

fn id_set(targets: &[Block]) -> HashSet<BlockId> {
    targets.iter().map(Block::id).collect()
}

fn create(parameters: &CommandParameters, targets: &[Block], blocks: &[Block]) -> HandlerOutcome {
    let block_type = parameters.new_type.unwrap_or(BlockType::Paragraph);
    let content = match &parameters.content {
        Some(text) => BlockContent::from_text(block_type, text),
        None => BlockContent::default_for(block_type),
    };
    let block = Block::new(block_type, content);

    let index = match targets.first().and_then(|t| document::index_of(blocks, t.id())) {
        Some(anchor) => match parameters.position.unwrap_or_default() {
            InsertPosition::Before => anchor,
            _ => anchor + 1,
        },
        None => blocks.len(),
    };

    let mut new_blocks = blocks.to_vec();
    new_blocks.insert(index, block.clone());
    Ok((new_blocks, vec![BlockChange::created(block, index)]))
}

fn delete(targets: &[Block], blocks: &[Block]) -> HandlerOutcome {
    if targets.is_empty() {
        return Err(EngineError::EmptyTarget { action: "delete" });
    }
    let ids = id_set(targets);
    let mut new_blocks = Vec::with_capacity(blocks.len() - targets.len());
    let mut changes = Vec::new();
    for (index, block) in blocks.iter().enumerate() {
        if ids.contains(&block.id()) {
            changes.push(BlockChange::deleted(block.clone(), index));
        } else {
            new_blocks.push(block.clone());
        }
    }
    Ok((new_blocks, changes))
}

fn edit(parameters: &CommandParameters, targets: &[Block], blocks: &[Block]) -> HandlerOutcome {
    if targets.is_empty() {
        return Err(EngineError::EmptyTarget { action: "edit" });
    }
    let content = parameters
        .content
        .as_ref()
        .ok_or_else(|| EngineError::Validation("No content specified".to_string()))?;

    let ids = id_set(targets);
    let mut new_blocks = Vec::with_capacity(blocks.len());
    let mut changes = Vec::new();
    for block in blocks {
        if ids.contains(&block.id()) {
            let mut updated = block.clone();
            updated.set_text_content(content);
            changes.push(BlockChange::updated(block.clone(), updated.clone()));
            new_blocks.push(updated);
        } else {
            new_blocks.push(block.clone());
        }
    }
    Ok((new_blocks, changes))
}

fn move_blocks(
    parameters: &CommandParameters,
    targets: &[Block],
    blocks: &[Block],
    ctx: &ResolveContext,
) -> HandlerOutcome {
    if targets.is_empty() {
        return Err(EngineError::EmptyTarget { action: "move" });
    }
    let ids = id_set(targets);
    let moved: Vec<Block> = blocks.iter().filter(|b| ids.contains(&b.id())).cloned().collect();
    let mut remaining: Vec<Block> = blocks
        .iter()
        .filter(|b| !ids.contains(&b.id()))
        .cloned()
        .collect();

    // The destination anchor is resolved against the list with the moved
    // blocks already removed
    let anchor = parameters
        .destination
        .as_ref()
        .map(|dest| resolver::resolve(dest, &remaining, ctx))
        .and_then(|resolved| {
            resolved
                .first()
                .and_then(|b| document::index_of(&remaining, b.id()))
        });

    let insert_at = match (anchor, parameters.position.unwrap_or_default()) {
        (Some(i), InsertPosition::Before) => i,
        (Some(i), _) => i + 1,
        (None, InsertPosition::Before) => 0,
        (None, _) => remaining.len(),
    };

    let changes = moved
        .iter()
        .enumerate()
        .map(|(offset, b)| BlockChange::moved(b.clone(), insert_at + offset))
        .collect();
    remaining.splice(insert_at..insert_at, moved);
    Ok((remaining, changes))
}

fn duplicate(parameters: &CommandParameters, targets: &[Block], blocks: &[Block]) -> HandlerOutcome {
    if targets.is_empty() {
        return Err(EngineError::EmptyTarget { action: "duplicate" });
    }
    let count = parameters.count.unwrap_or(1).max(1);
    let ids = id_set(targets);
    let mut new_blocks = Vec::with_capacity(blocks.len() + targets.len() * count);
    let mut changes = Vec::new();
    for block in blocks {
        new_blocks.push(block.clone());
        if ids.contains(&block.id()) {
            for _ in 0..count {
                let copy = block.with_fresh_identity();
                changes.push(BlockChange::created(copy.clone(), new_blocks.len()));
                new_blocks.push(copy);
            }
        }
    }
    Ok((new_blocks, changes))
}

fn merge(targets: &[Block], blocks: &[Block]) -> HandlerOutcome {
    if targets.len() < 2 {
        return Err(EngineError::Validation(
            "Merge requires at least 2 blocks".to_string(),
        ));
    }
    let first = &targets[0];
    let combined = targets
        .iter()
        .map(Block::plain_text)
        .collect::<Vec<_>>()
        .join("\n\n");
    let mut merged = first.clone();
    merged.set_text_content(&combined);

    let rest_ids: HashSet<BlockId> = targets[1..].iter().map(Block::id).collect();
    let mut changes = vec![BlockChange::updated(first.clone(), merged.clone())];
    let mut new_blocks = Vec::with_capacity(blocks.len() - rest_ids.len());
    for (index, block) in blocks.iter().enumerate() {
        if block.id() == first.id() {
            new_blocks.push(merged.clone());
        } else if rest_ids.contains(&block.id()) {
            changes.push(BlockChange::deleted(block.clone(), index));
        } else {
            new_blocks.push(block.clone());
        }
    }
    Ok((new_blocks, changes))
}

fn split(targets: &[Block], blocks: &[Block]) -> HandlerOutcome {
    if targets.is_empty() {
        return Err(EngineError::EmptyTarget { action: "split" });
    }
    let source = &targets[0];
    let text = source.plain_text();
    let parts: Vec<&str> = text
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() < 2 {
        return Err(EngineError::Validation("Content cannot be split".to_string()));
    }

    let mut head = source.clone();
    head.set_text_content(parts[0]);
    let tail: Vec<Block> = parts[1..]
        .iter()
        .map(|part| Block::text_block(source.block_type, *part))
        .collect();

    let source_index = document::index_of(blocks, source.id())
        .ok_or(block_model::BlockModelError::BlockNotFound(source.id()))?;
    let mut changes = vec![BlockChange::updated(source.clone(), head.clone())];
    for (offset, block) in tail.iter().enumerate() {
        changes.push(BlockChange::created(block.clone(), source_index + 1 + offset));
    }

    let mut new_blocks = Vec::with_capacity(blocks.len() + tail.len());
    for block in blocks {
        if block.id() == source.id() {
            new_blocks.push(head.clone());
            new_blocks.extend(tail.iter().cloned());
        } else {
            new_blocks.push(block.clone());
        }
    }
    Ok((new_blocks, changes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChangeKind, TargetReference};

    fn engine() -> ManipulationEngine {
        ManipulationEngine::new(BlockTransformer::new())
    }

    fn sample_blocks() -> Vec<Block> {
        vec![
            Block::paragraph("b1 text"),
            Block::heading1("b2 heading"),
            Block::quote("b3 quote"),
        ]
    }

    #[tokio::test]
    async fn test_delete_by_bound_ids() {
        let blocks = sample_blocks();
        let target = blocks[1].id();
        let command =
            ParsedCommand::new(CommandAction::Delete, TargetReference::All).with_block_ids(vec![target]);

        let result = engine().execute(&command, &blocks, &ResolveContext::none()).await;

        assert!(result.success);
        assert_eq!(result.blocks.len(), 2);
        assert_eq!(result.blocks[0].id(), blocks[0].id());
        assert_eq!(result.blocks[1].id(), blocks[2].id());
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].kind, ChangeKind::Delete);
        assert_eq!(result.changes[0].block_id, target);
    }

    #[tokio::test]
    async fn test_delete_empty_target_fails_without_mutation() {
        let blocks = sample_blocks();
        let command = ParsedCommand::new(CommandAction::Delete, TargetReference::Selected);

        let mut eng = engine();
        let result = eng.execute(&command, &blocks, &ResolveContext::none()).await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("No blocks to delete"));
        assert_eq!(result.blocks, blocks);
        assert!(!eng.can_undo());
    }

    #[tokio::test]
    async fn test_create_inserts_after_anchor() {
        let blocks = sample_blocks();
        let mut command = ParsedCommand::new(CommandAction::Create, TargetReference::First);
        command.parameters.new_type = Some(BlockType::Quote);
        command.parameters.content = Some("fresh".to_string());

        let result = engine().execute(&command, &blocks, &ResolveContext::none()).await;

        assert!(result.success);
        assert_eq!(result.blocks.len(), 4);
        assert_eq!(result.blocks[1].block_type, BlockType::Quote);
        assert_eq!(result.blocks[1].plain_text(), "fresh");
    }

    #[tokio::test]
    async fn test_create_before_anchor() {
        let blocks = sample_blocks();
        let mut command = ParsedCommand::new(CommandAction::Create, TargetReference::First);
        command.parameters.position = Some(InsertPosition::Before);

        let result = engine().execute(&command, &blocks, &ResolveContext::none()).await;

        assert!(result.success);
        assert_eq!(result.blocks[0].block_type, BlockType::Paragraph);
        assert_eq!(result.blocks[1].id(), blocks[0].id());
    }

    #[tokio::test]
    async fn test_create_without_anchor_appends() {
        let blocks = sample_blocks();
        let command = ParsedCommand::new(CommandAction::Create, TargetReference::Selected);

        let result = engine().execute(&command, &blocks, &ResolveContext::none()).await;

        assert!(result.success);
        assert_eq!(result.blocks.len(), 4);
        assert_eq!(result.blocks[3].block_type, BlockType::Paragraph);
    }

    #[tokio::test]
    async fn test_create_database_has_minimum_structure() {
        let mut command = ParsedCommand::new(CommandAction::Create, TargetReference::Selected);
        command.parameters.new_type = Some(BlockType::Database);

        let result = engine().execute(&command, &[], &ResolveContext::none()).await;

        assert!(result.success);
        match &result.blocks[0].content {
            BlockContent::Table(table) => {
                assert!(table.columns.len() >= 1);
                assert!(table.rows.len() >= 1);
            }
            other => panic!("expected table content, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_edit_requires_content() {
        let blocks = sample_blocks();
        let command = ParsedCommand::new(CommandAction::Edit, TargetReference::First);

        let result = engine().execute(&command, &blocks, &ResolveContext::none()).await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("No content specified"));
        assert_eq!(result.blocks, blocks);
    }

    #[tokio::test]
    async fn test_edit_replaces_content() {
        let blocks = sample_blocks();
        let mut command = ParsedCommand::new(CommandAction::Edit, TargetReference::First);
        command.parameters.content = Some("rewritten".to_string());

        let result = engine().execute(&command, &blocks, &ResolveContext::none()).await;

        assert!(result.success);
        assert_eq!(result.blocks[0].plain_text(), "rewritten");
        assert_eq!(result.blocks[0].id(), blocks[0].id());
        assert_eq!(result.changes[0].kind, ChangeKind::Update);
    }

    #[tokio::test]
    async fn test_move_after_destination() {
        // 4 blocks, move index 1 after index 3 -> order [0, 2, 3, 1]
        let blocks = vec![
            Block::paragraph("zero"),
            Block::paragraph("one"),
            Block::paragraph("two"),
            Block::paragraph("three"),
        ];
        let mut command = ParsedCommand::new(CommandAction::Move, TargetReference::Position(2));
        command.parameters.destination = Some(TargetReference::Id(blocks[3].id()));

        let result = engine().execute(&command, &blocks, &ResolveContext::none()).await;

        assert!(result.success);
        let order: Vec<String> = result.blocks.iter().map(Block::plain_text).collect();
        assert_eq!(order, vec!["zero", "two", "three", "one"]);
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].kind, ChangeKind::Move);
    }

    #[tokio::test]
    async fn test_move_without_destination_goes_to_end() {
        let blocks = sample_blocks();
        let command = ParsedCommand::new(CommandAction::Move, TargetReference::First);

        let result = engine().execute(&command, &blocks, &ResolveContext::none()).await;

        assert!(result.success);
        assert_eq!(result.blocks[2].id(), blocks[0].id());
    }

    #[tokio::test]
    async fn test_move_before_without_destination_goes_to_front() {
        let blocks = sample_blocks();
        let mut command = ParsedCommand::new(CommandAction::Move, TargetReference::Last);
        command.parameters.position = Some(InsertPosition::Before);

        let result = engine().execute(&command, &blocks, &ResolveContext::none()).await;

        assert!(result.success);
        assert_eq!(result.blocks[0].id(), blocks[2].id());
    }

    #[tokio::test]
    async fn test_transform_requires_target_type() {
        let blocks = sample_blocks();
        let command = ParsedCommand::new(CommandAction::Transform, TargetReference::First);

        let result = engine().execute(&command, &blocks, &ResolveContext::none()).await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("No target type specified"));
    }

    #[tokio::test]
    async fn test_transform_preserves_id() {
        let blocks = sample_blocks();
        let mut command = ParsedCommand::new(CommandAction::Transform, TargetReference::First);
        command.parameters.new_type = Some(BlockType::Heading2);

        let result = engine().execute(&command, &blocks, &ResolveContext::none()).await;

        assert!(result.success);
        assert_eq!(result.blocks[0].id(), blocks[0].id());
        assert_eq!(result.blocks[0].block_type, BlockType::Heading2);
    }

    #[tokio::test]
    async fn test_duplicate_with_count() {
        let blocks = sample_blocks();
        let mut command = ParsedCommand::new(CommandAction::Duplicate, TargetReference::First);
        command.parameters.count = Some(2);

        let result = engine().execute(&command, &blocks, &ResolveContext::none()).await;

        assert!(result.success);
        assert_eq!(result.blocks.len(), 5);
        assert_eq!(result.blocks[1].plain_text(), blocks[0].plain_text());
        assert_ne!(result.blocks[1].id(), blocks[0].id());
        assert_ne!(result.blocks[1].id(), result.blocks[2].id());
        assert_eq!(result.blocks[3].id(), blocks[1].id());
    }

    #[tokio::test]
    async fn test_merge_keeps_first_id_and_joins_text() {
        let blocks = vec![Block::paragraph("Hello"), Block::paragraph("World")];
        let command = ParsedCommand::new(CommandAction::Merge, TargetReference::All);

        let result = engine().execute(&command, &blocks, &ResolveContext::none()).await;

        assert!(result.success);
        assert_eq!(result.blocks.len(), 1);
        assert_eq!(result.blocks[0].id(), blocks[0].id());
        assert_eq!(result.blocks[0].plain_text(), "Hello\n\nWorld");
    }

    #[tokio::test]
    async fn test_merge_requires_two_blocks() {
        let blocks = sample_blocks();
        let command = ParsedCommand::new(CommandAction::Merge, TargetReference::First);

        let result = engine().execute(&command, &blocks, &ResolveContext::none()).await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Merge requires at least 2 blocks"));
    }

    #[tokio::test]
    async fn test_split_on_blank_lines() {
        let blocks = vec![Block::paragraph("part one\n\npart two\n\npart three")];
        let command = ParsedCommand::new(CommandAction::Split, TargetReference::First);

        let result = engine().execute(&command, &blocks, &ResolveContext::none()).await;

        assert!(result.success);
        assert_eq!(result.blocks.len(), 3);
        assert_eq!(result.blocks[0].id(), blocks[0].id());
        assert_eq!(result.blocks[0].plain_text(), "part one");
        assert_eq!(result.blocks[2].plain_text(), "part three");
        assert!(result.blocks.iter().all(|b| b.block_type == BlockType::Paragraph));
    }

    #[tokio::test]
    async fn test_split_unsplittable_content_fails() {
        let blocks = vec![Block::paragraph("single part")];
        let command = ParsedCommand::new(CommandAction::Split, TargetReference::First);

        let result = engine().execute(&command, &blocks, &ResolveContext::none()).await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Content cannot be split"));
        assert_eq!(result.blocks, blocks);
    }

    #[tokio::test]
    async fn test_style_action_is_unsupported() {
        let blocks = sample_blocks();
        let command = ParsedCommand::new(CommandAction::Style, TargetReference::First);

        let result = engine().execute(&command, &blocks, &ResolveContext::none()).await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Unsupported action: style"));
    }

    #[tokio::test]
    async fn test_undo_restores_exact_prior_state() {
        let blocks = sample_blocks();
        let mut eng = engine();
        let ctx = ResolveContext::none();

        let mut edit_cmd = ParsedCommand::new(CommandAction::Edit, TargetReference::First);
        edit_cmd.parameters.content = Some("edited".to_string());
        let after_edit = eng.execute(&edit_cmd, &blocks, &ctx).await;
        assert!(after_edit.success);

        let delete_cmd = ParsedCommand::new(CommandAction::Delete, TargetReference::Last);
        let after_delete = eng.execute(&delete_cmd, &after_edit.blocks, &ctx).await;
        assert!(after_delete.success);

        let dup_cmd = ParsedCommand::new(CommandAction::Duplicate, TargetReference::First);
        let after_dup = eng.execute(&dup_cmd, &after_delete.blocks, &ctx).await;
        assert!(after_dup.success);

        assert_eq!(eng.undo().unwrap(), after_delete.blocks);
        assert_eq!(eng.undo().unwrap(), after_edit.blocks);
        assert_eq!(eng.undo().unwrap(), blocks);
        assert!(eng.undo().is_none());
    }

    #[tokio::test]
    async fn test_failed_transaction_leaves_no_history() {
        let blocks = sample_blocks();
        let mut eng = engine();
        let command = ParsedCommand::new(CommandAction::Delete, TargetReference::Position(99));

        let result = eng.execute(&command, &blocks, &ResolveContext::none()).await;

        assert!(!result.success);
        assert!(!eng.can_undo());
    }
}
