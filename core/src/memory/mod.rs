pub mod conversation;

pub use conversation::{ConversationMemory, MemoryStepEntry};
