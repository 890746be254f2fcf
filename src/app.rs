use std::io::Read;

use colored::Colorize;

use crate::adf;
use crate::cli::{Args, Command};
use crate::config::{self, Config};
use crate::error::{Error, Result};
use crate::git::{self, KeySource};
use crate::issue::RecentIssues;
use crate::jira::{CommentsApi, JiraProxy};
use crate::panel::CommentPanel;
use crate::render;
use crate::ui::{self, Action};

/// Main application entry point
pub fn run(args: Args) -> Result<()> {
    if args.no_color {
        colored::control::set_override(false);
    }

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => config::get_config_path()?,
    };
    let config = Config::load(&config_path)?.with_endpoint(args.endpoint.clone());
    config.validate()?;

    let recent_path = config::get_recent_path(&config_path)?;
    let mut recent = RecentIssues::from_file(recent_path, config.recent_limit)?;

    match args.command {
        None => {
            ui::init_render_config();
            let key = resolve_issue_key(args.issue, &recent, true)?;
            recent.add_and_save(&key)?;
            interactive(CommentPanel::new(proxy(&config)?, key), &mut recent)
        }
        Some(Command::List) => {
            let key = resolve_issue_key(args.issue, &recent, false)?;
            recent.add_and_save(&key)?;
            list(CommentPanel::new(proxy(&config)?, key))
        }
        Some(Command::Add { text, dry_run }) => {
            let text = match text {
                Some(text) => text,
                None => read_stdin()?,
            };
            if text.trim().is_empty() {
                return Err(Error::InvalidInput("comment text is empty".into()));
            }

            if dry_run {
                print!("{}", render::adf_preview(&adf::from_plain_text(&text).to_pretty_json()?));
                return Ok(());
            }

            let key = resolve_issue_key(args.issue, &recent, false)?;
            recent.add_and_save(&key)?;
            add(CommentPanel::new(proxy(&config)?, key), text)
        }
    }
}

fn proxy(config: &Config) -> Result<JiraProxy> {
    let proxy = JiraProxy::new(config.endpoint.clone(), config.timeout())?;
    tracing::info!(endpoint = proxy.endpoint(), "using Jira proxy");
    Ok(proxy)
}

/// Pick the issue to show: explicit flag, then git detection, then a prompt
fn resolve_issue_key(
    explicit: Option<String>,
    recent: &RecentIssues,
    interactive: bool,
) -> Result<String> {
    if let Some(key) = explicit {
        return Ok(key);
    }

    let cwd = std::env::current_dir()?;
    match git::detect_issue_key(&cwd) {
        Ok(Some((key, source))) => {
            let origin = match source {
                KeySource::Branch(branch) => format!("branch {}", branch),
                KeySource::Commit(summary) => format!("commit \"{}\"", summary),
            };
            println!(
                "{} Issue: {} (from {})",
                ">".bright_green(),
                key.bright_cyan(),
                origin
            );
            return Ok(key);
        }
        Ok(None) | Err(Error::NotInGitRepo) => {}
        Err(err) => tracing::warn!(error = %err, "issue key detection failed"),
    }

    if interactive {
        ui::prompt_issue_key(recent)
    } else {
        Err(Error::NoIssueKey)
    }
}

/// The interactive panel loop
fn interactive<A: CommentsApi>(mut panel: CommentPanel<A>, recent: &mut RecentIssues) -> Result<()> {
    panel.mount();

    loop {
        println!("{}", render::panel(&panel));

        let action = match ui::prompt_action(!panel.draft().is_empty()) {
            Ok(action) => action,
            Err(Error::Cancelled) => return Ok(()),
            Err(err) => return Err(err),
        };

        match action {
            Action::Fetch => {
                panel.refresh();
            }
            Action::EditDraft => match ui::prompt_draft(panel.draft()) {
                Ok(draft) => panel.set_draft(draft),
                Err(Error::Cancelled) => {}
                Err(err) => return Err(err),
            },
            Action::Submit => {
                panel.submit();
            }
            Action::ChangeIssue => match ui::prompt_issue_key(recent) {
                Ok(key) => {
                    recent.add_and_save(&key)?;
                    panel.set_issue_key(key);
                }
                Err(Error::Cancelled) => {}
                Err(err) => return Err(err),
            },
            Action::Quit => return Ok(()),
        }
    }
}

fn list<A: CommentsApi>(mut panel: CommentPanel<A>) -> Result<()> {
    let loaded = panel.mount();
    print!("{}", render::panel(&panel));

    // The rendered panel already carries the error line
    if loaded {
        Ok(())
    } else {
        Err(Error::Reported)
    }
}

fn add<A: CommentsApi>(mut panel: CommentPanel<A>, text: String) -> Result<()> {
    panel.set_draft(text);
    if !panel.submit() {
        return Err(panel_error(&panel));
    }

    println!(
        "{} Added comment to {}",
        "+".bright_green(),
        panel.issue_key().bright_cyan()
    );
    if let Some(comment) = panel.comments().last() {
        print!("{}", render::comment(comment));
    }
    Ok(())
}

fn panel_error<A: CommentsApi>(panel: &CommentPanel<A>) -> Error {
    Error::Api(panel.error().unwrap_or("unknown error").to_string())
}

fn read_stdin() -> Result<String> {
    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;
    Ok(text)
}
