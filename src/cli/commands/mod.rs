//! CLI command implementations.

mod agents;
mod call;
mod chat;
mod config;
mod doctor;
mod mcp;
mod run;
mod serve;

pub use agents::{run_agents, run_show};
pub use call::run_call;
pub use chat::run_chat;
pub use config::run_config;
pub use doctor::run_doctor;
pub use mcp::run_mcp;
pub use run::run_run;
pub use serve::run_serve;
