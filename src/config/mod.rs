//! Configuration module for Daisy.
//!
//! Handles loading application settings and agent instruction overrides.

mod instructions;
mod settings;

pub use instructions::{render, Instructions};
pub use settings::{
    AgentSettings, GeneralSettings, GraphSettings, InstructionSettings, KnowledgeMode,
    KnowledgeSettings, RuntimeSettings, Settings,
};
