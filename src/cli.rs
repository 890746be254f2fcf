use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::issue;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Issue key (e.g. PROJ-123); detected from the git branch or commits when omitted
    #[clap(short, long, value_parser = parse_issue_key)]
    pub issue: Option<String>,

    /// URL of the Jira proxy route
    #[clap(short, long, env = "JIRA_COMMENTS_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Path to the config file (defaults to ~/.config/jira-comments/config.yaml)
    #[clap(short, long, env = "JIRA_COMMENTS_CONFIG")]
    pub config: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable coloured output
    #[clap(long, default_value_t = false)]
    pub no_color: bool,

    #[clap(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print the issue's comments and exit
    List,

    /// Add a comment and exit
    Add {
        /// Comment text; read from stdin when omitted
        text: Option<String>,

        /// Only print the ADF document that would be sent
        #[clap(short, long, default_value_t = false)]
        dry_run: bool,
    },
}

fn parse_issue_key(input: &str) -> Result<String, String> {
    issue::normalize(input)
        .ok_or_else(|| format!("{:?} does not look like an issue key (e.g., PROJ-123)", input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_interactive() {
        let args = Args::try_parse_from(["jira-comments"]).unwrap();
        assert_eq!(args.issue, None);
        assert_eq!(args.command, None);
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_issue_key_is_normalized() {
        let args = Args::try_parse_from(["jira-comments", "-i", "proj-5", "list"]).unwrap();
        assert_eq!(args.issue.as_deref(), Some("PROJ-5"));
        assert_eq!(args.command, Some(Command::List));
    }

    #[test]
    fn test_invalid_issue_key_is_rejected() {
        assert!(Args::try_parse_from(["jira-comments", "--issue", "nope"]).is_err());
    }

    #[test]
    fn test_add_subcommand() {
        let args =
            Args::try_parse_from(["jira-comments", "-vv", "add", "--dry-run", "hello"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert_eq!(
            args.command,
            Some(Command::Add {
                text: Some("hello".to_string()),
                dry_run: true,
            })
        );
    }
}
