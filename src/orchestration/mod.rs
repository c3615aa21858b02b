//! # Orchestration
//!
//! The generation loop and the report it produces.

pub mod generator;
pub mod report;

pub use generator::BatchGenerator;
pub use report::{ContainerStatus, ContainerSummary, GenerationReport};
