//! CLI commands for tally

pub mod course;
pub mod dispatch;
pub mod helpers;
pub mod init;
pub mod list;
pub mod new;
pub mod set;
pub mod show;
pub mod start;
pub mod sync;
pub mod total;
pub mod validate;
