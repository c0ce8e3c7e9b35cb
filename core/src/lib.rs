pub mod agent;
pub mod config;
pub mod error;
pub mod interface;
pub mod memory;
pub mod providers;
pub mod tools;
pub mod traits;
pub mod weather;

#[cfg(test)]
mod testing;

pub use agent::{
    AgentLoop, AgentRunResult, Plan, RunOptions, ToolAction, ToolRegistry, TravelContext,
};
pub use config::Config;
pub use error::{AgentError, Result};
pub use interface::{
    PlanTripRequest, PublicError, TravelService, VisaInfoRequest, VisaInfoResponse,
};
pub use memory::ConversationMemory;
pub use traits::{ChatMessage, Provider, Tool, ToolResult};
