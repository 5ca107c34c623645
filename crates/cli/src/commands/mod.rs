pub mod agent;
pub mod analyze;
pub mod coordinator;
pub mod doctor;
pub mod onboard;
pub mod serve;
pub mod status;

/// Result type shared by every command.
pub type CommandResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
