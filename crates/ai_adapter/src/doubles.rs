//! Adapter test doubles
//!
//! `ScriptedAdapter` replays queued responses in order; `UnavailableAdapter`
//! fails every call. Both live in the library (not behind `cfg(test)`)
//! because downstream crates drive their own tests with them.

use crate::{AdapterError, LanguageModelAdapter, RawCommand, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays pre-queued responses; fails `Unreachable` when the queue runs dry
#[derive(Default)]
pub struct ScriptedAdapter {
    commands: Mutex<VecDeque<RawCommand>>,
    contents: Mutex<VecDeque<String>>,
}

impl ScriptedAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next `understand` response
    pub fn push_command(&self, command: RawCommand) {
        self.commands.lock().unwrap().push_back(command);
    }

    /// Queue the next `transform_content` response
    pub fn push_content(&self, content: impl Into<String>) {
        self.contents.lock().unwrap().push_back(content.into());
    }
}

#[async_trait]
impl LanguageModelAdapter for ScriptedAdapter {
    async fn understand(&self, _system_prompt: &str, _user_text: &str) -> Result<RawCommand> {
        self.commands
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AdapterError::Unreachable("no scripted response".to_string()))
    }

    async fn transform_content(&self, _content: &str, _target_type: &str) -> Result<String> {
        self.contents
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AdapterError::Unreachable("no scripted response".to_string()))
    }
}

/// Fails every call, for exercising offline fallback paths
pub struct UnavailableAdapter;

#[async_trait]
impl LanguageModelAdapter for UnavailableAdapter {
    async fn understand(&self, _system_prompt: &str, _user_text: &str) -> Result<RawCommand> {
        Err(AdapterError::Unreachable("adapter disabled".to_string()))
    }

    async fn transform_content(&self, _content: &str, _target_type: &str) -> Result<String> {
        Err(AdapterError::Unreachable("adapter disabled".to_string()))
    }
}
