mod agent;
mod memo;
mod report;
mod research;
mod source;
mod stage;

pub use agent::AgentCommands;
pub use memo::MemoCommands;
pub use report::ReportCommands;
pub use research::ResearchCommands;
pub use source::SourceCommands;
pub use stage::StageCommands;
