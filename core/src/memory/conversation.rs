use crate::agent::{StepInput, ToolAction};
use crate::traits::ChatMessage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryStepEntry {
    pub id: u32,
    pub action: ToolAction,
    pub input: StepInput,
    pub output: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ConversationMemory {
    messages: Vec<ChatMessage>,
    steps: Vec<MemoryStepEntry>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn add_messages(&mut self, messages: impl IntoIterator<Item = ChatMessage>) {
        self.messages.extend(messages);
    }

    pub fn get_conversation(&self, limit: Option<usize>) -> &[ChatMessage] {
        match limit {
            Some(limit) => {
                let start = self.messages.len().saturating_sub(limit);
                &self.messages[start..]
            }
            None => &self.messages,
        }
    }

    pub fn add_step(&mut self, id: u32, action: ToolAction, input: StepInput, output: String) {
        self.steps.push(MemoryStepEntry {
            id,
            action,
            input,
            output,
            timestamp: Utc::now(),
        });
    }

    pub fn get_steps(&self) -> Vec<MemoryStepEntry> {
        self.steps.clone()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_limit_returns_tail() {
        let mut memory = ConversationMemory::new();
        memory.add_messages((1..=5).map(|i| ChatMessage::user(format!("m{i}"))));

        let tail: Vec<_> = memory
            .get_conversation(Some(2))
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(tail, vec!["m4", "m5"]);

        assert_eq!(memory.get_conversation(None).len(), 5);
        assert_eq!(memory.get_conversation(Some(50)).len(), 5);
        assert!(memory.get_conversation(Some(0)).is_empty());
    }

    #[test]
    fn steps_are_append_only_and_time_ordered() {
        let mut memory = ConversationMemory::new();
        for id in 1..=4 {
            memory.add_step(
                id,
                ToolAction::TravelTips,
                StepInput::new(),
                format!("out {id}"),
            );
        }

        let steps = memory.get_steps();
        assert_eq!(steps.len(), 4);
        assert_eq!(
            steps.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
        assert!(steps.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn get_steps_returns_a_copy() {
        let mut memory = ConversationMemory::new();
        memory.add_step(1, ToolAction::CheckVisa, StepInput::new(), "a".into());

        let mut copy = memory.get_steps();
        copy.clear();

        assert_eq!(memory.step_count(), 1);
    }
}
