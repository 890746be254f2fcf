//! # jira-comments
//!
//! A terminal comment panel for Jira issues. Comments are read and posted
//! through a JSON proxy endpoint; drafts are converted to the Atlassian
//! Document Format before they are sent.

pub mod adf;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod issue;
pub mod jira;
pub mod panel;
pub mod render;
pub mod ui;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use jira::{Comment, CommentsApi, JiraProxy};
pub use panel::CommentPanel;
