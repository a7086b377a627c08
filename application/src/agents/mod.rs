//! Role workers
//!
//! Every worker implements [`Agent`]: `plan` (planner only), `act` on one
//! plan step, `observe` (logged) and `report` (last report produced). `plan`
//! and `act` also hand back the report they produced so callers can keep it
//! per run instead of reading shared worker state.

mod contract;
pub mod coder;
pub mod executor;
pub mod planner;
pub mod reviewer;

pub use coder::CoderAgent;
pub use contract::{Acted, Agent, AgentError, AgentOptions, Planned};
pub use executor::ExecutorAgent;
pub use planner::PlannerAgent;
pub use reviewer::ReviewerAgent;

pub(crate) use contract::ReportSlot;
