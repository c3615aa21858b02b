pub mod container;
pub mod record;

// Re-export core models for easy access
pub use container::ContainerId;
pub use record::Record;
