use std::fmt;

use inquire::error::InquireError;
use inquire::ui::{Color, RenderConfig, Styled};
use inquire::{set_global_render_config, Editor, Select, Text};

use crate::error::Error;
use crate::issue::{self, RecentIssues};

/// Initialize the global render configuration for inquire prompts
pub fn init_render_config() {
    let mut style = RenderConfig::default_colored();
    style.prompt_prefix = Styled::new(">").with_fg(Color::LightGreen);
    set_global_render_config(style);
}

/// What the user can do from the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Fetch,
    EditDraft,
    Submit,
    ChangeIssue,
    Quit,
}

impl Action {
    /// Actions offered in the menu, in display order
    pub fn menu(has_draft: bool) -> Vec<Action> {
        let mut actions = vec![Action::Fetch, Action::EditDraft];
        if has_draft {
            actions.push(Action::Submit);
        }
        actions.push(Action::ChangeIssue);
        actions.push(Action::Quit);
        actions
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::Fetch => "Fetch comments",
            Action::EditDraft => "Write comment",
            Action::Submit => "Add comment",
            Action::ChangeIssue => "Change issue",
            Action::Quit => "Quit",
        };
        f.write_str(label)
    }
}

/// Prompt for the next panel action
pub fn prompt_action(has_draft: bool) -> Result<Action, Error> {
    Select::new("Action:", Action::menu(has_draft))
        .prompt()
        .map_err(map_inquire_error)
}

/// Prompt for the comment draft using an editor, starting from the current draft
pub fn prompt_draft(current: &str) -> Result<String, Error> {
    Editor::new("Comment:")
        .with_predefined_text(current)
        .with_file_extension(".txt")
        .with_formatter(&|x| x.lines().next().unwrap_or_default().to_string())
        .prompt()
        .map_err(map_inquire_error)
}

/// Prompt for an issue key with autocomplete from recently viewed issues
pub fn prompt_issue_key(recent: &RecentIssues) -> Result<String, Error> {
    let default = recent.latest().unwrap_or_default().to_string();

    let mut prompt = Text::new("Issue key:").with_validator(issue::validator);
    if !recent.is_empty() {
        prompt = prompt
            .with_autocomplete(recent.clone())
            .with_default(&default);
    }

    let key = prompt.prompt().map_err(map_inquire_error)?;
    issue::normalize(&key).ok_or(Error::InvalidInput(key))
}

/// Map inquire errors to our error type
fn map_inquire_error(err: InquireError) -> Error {
    match err {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => Error::Cancelled,
        _ => Error::Prompt(err.to_string()),
    }
}
