pub mod agent;
pub mod dispatch;
pub mod export;
pub mod init;
pub mod interview;
pub mod memo;
pub mod register;
pub mod report;
pub mod research;
pub mod schema;
pub mod shared;
pub mod source;
pub mod stage;
