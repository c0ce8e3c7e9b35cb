pub mod action;
pub mod context;
pub mod executor;
pub mod loop_;
pub mod planner;
pub mod registry;

pub use action::ToolAction;
pub use context::{StepInput, ToolContext, TravelContext};
pub use executor::{Executor, StepExecutionResult};
pub use loop_::{AgentLoop, AgentRunResult, RunOptions, primary_step, resolve_final_text};
pub use planner::{Plan, Planner, PlannerStep, fallback_plan, parse_plan};
pub use registry::ToolRegistry;
