//! Comment panel state
//!
//! Holds everything the panel shows for one issue: the loaded comments, the
//! last error, the unsent draft and the ADF preview of the last submission
//! attempt. All mutation goes through the operations below; a failing
//! operation records its message and never leaves the panel unusable.

use crate::adf;
use crate::error::{Error, Result};
use crate::jira::{Comment, CommentsApi};

/// View state and actions for the comments of a single issue
#[derive(Debug)]
pub struct CommentPanel<A> {
    api: A,
    issue_key: String,
    comments: Vec<Comment>,
    error: Option<String>,
    draft: String,
    adf_preview: Option<String>,
}

impl<A: CommentsApi> CommentPanel<A> {
    /// Create an unmounted panel; nothing is fetched until [`mount`](Self::mount)
    pub fn new(api: A, issue_key: impl Into<String>) -> Self {
        Self {
            api,
            issue_key: issue_key.into(),
            comments: Vec::new(),
            error: None,
            draft: String::new(),
            adf_preview: None,
        }
    }

    /// Initial load when the panel is first shown
    pub fn mount(&mut self) -> bool {
        self.load_comments()
    }

    /// Switch to another issue, loading its comments once if the key changed
    pub fn set_issue_key(&mut self, issue_key: impl Into<String>) -> bool {
        let issue_key = issue_key.into();
        if issue_key == self.issue_key {
            return true;
        }

        tracing::debug!(from = %self.issue_key, to = %issue_key, "issue changed");
        self.issue_key = issue_key;
        self.load_comments()
    }

    /// Replace the list with the server's comments for the current issue
    ///
    /// On failure the previous list is kept and the error is recorded.
    /// Returns whether the load succeeded.
    pub fn load_comments(&mut self) -> bool {
        match self.api.fetch_comments(&self.issue_key) {
            Ok(comments) => {
                tracing::debug!(issue_key = %self.issue_key, count = comments.len(), "comments loaded");
                self.comments = comments;
                self.error = None;
                true
            }
            Err(err) => self.fail(err),
        }
    }

    /// User-triggered reload
    pub fn refresh(&mut self) -> bool {
        self.load_comments()
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// Convert the draft to ADF and post it
    ///
    /// The preview is updated before the request is sent, so it reflects the
    /// attempt even when the request fails. On success the returned comment
    /// is appended and the draft cleared; on failure the draft is kept.
    pub fn submit(&mut self) -> bool {
        match self.try_submit() {
            Ok(comment) => {
                self.comments.push(comment);
                self.draft.clear();
                self.error = None;
                true
            }
            Err(err) => self.fail(err),
        }
    }

    fn try_submit(&mut self) -> Result<Comment> {
        let document = adf::from_plain_text(&self.draft);
        self.adf_preview = Some(document.to_pretty_json()?);
        self.api.add_comment(&self.issue_key, &document)
    }

    fn fail(&mut self, err: Error) -> bool {
        tracing::warn!(issue_key = %self.issue_key, error = %err, "panel action failed");
        self.error = Some(err.to_string());
        false
    }

    pub fn issue_key(&self) -> &str {
        &self.issue_key
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn adf_preview(&self) -> Option<&str> {
        self.adf_preview.as_deref()
    }

    #[cfg(test)]
    fn api(&self) -> &A {
        &self.api
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adf::Document;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Fetch(String),
        Add(String, Document),
    }

    /// In-memory backend keyed by issue, with optional canned failures
    #[derive(Debug, Default)]
    struct FakeApi {
        issues: RefCell<HashMap<String, Vec<Comment>>>,
        fetch_error: RefCell<Option<String>>,
        add_error: RefCell<Option<String>>,
        calls: RefCell<Vec<Call>>,
    }

    impl FakeApi {
        fn with_issue(self, key: &str, comments: Vec<Comment>) -> Self {
            self.issues.borrow_mut().insert(key.to_string(), comments);
            self
        }

        fn fail_fetch(&self, message: &str) {
            *self.fetch_error.borrow_mut() = Some(message.to_string());
        }

        fn fail_add(&self, message: &str) {
            *self.add_error.borrow_mut() = Some(message.to_string());
        }

        fn fetches(&self) -> Vec<String> {
            self.calls
                .borrow()
                .iter()
                .filter_map(|call| match call {
                    Call::Fetch(key) => Some(key.clone()),
                    Call::Add(..) => None,
                })
                .collect()
        }
    }

    impl CommentsApi for FakeApi {
        fn fetch_comments(&self, issue_key: &str) -> Result<Vec<Comment>> {
            self.calls.borrow_mut().push(Call::Fetch(issue_key.to_string()));
            if let Some(message) = self.fetch_error.borrow().clone() {
                return Err(Error::Api(message));
            }
            Ok(self
                .issues
                .borrow()
                .get(issue_key)
                .cloned()
                .unwrap_or_default())
        }

        fn add_comment(&self, issue_key: &str, comment: &Document) -> Result<Comment> {
            self.calls
                .borrow_mut()
                .push(Call::Add(issue_key.to_string(), comment.clone()));
            if let Some(message) = self.add_error.borrow().clone() {
                return Err(Error::Api(message));
            }
            Ok(Comment::new(comment.to_plain_text(), "Tester"))
        }
    }

    fn sample() -> Vec<Comment> {
        vec![
            Comment::new("first", "Ana"),
            Comment::new("second", "Bo"),
            Comment::new("third", "Cy"),
        ]
    }

    #[test]
    fn test_new_panel_does_not_fetch() {
        let panel = CommentPanel::new(FakeApi::default(), "PROJ-1");
        assert!(panel.api().calls.borrow().is_empty());
        assert!(panel.comments().is_empty());
    }

    #[test]
    fn test_mount_loads_comments_in_order() {
        let api = FakeApi::default().with_issue("PROJ-1", sample());
        let mut panel = CommentPanel::new(api, "PROJ-1");

        assert!(panel.mount());
        assert_eq!(panel.comments(), sample().as_slice());
        assert_eq!(panel.error(), None);
        assert_eq!(panel.adf_preview(), None);
    }

    #[test]
    fn test_failed_fetch_keeps_previous_comments() {
        let api = FakeApi::default().with_issue("PROJ-1", sample());
        let mut panel = CommentPanel::new(api, "PROJ-1");
        panel.mount();

        panel.api().fail_fetch("x");
        assert!(!panel.refresh());

        assert_eq!(panel.error(), Some("x"));
        assert_eq!(panel.comments().len(), 3);
    }

    #[test]
    fn test_successful_load_clears_error() {
        let api = FakeApi::default().with_issue("PROJ-1", sample());
        api.fail_fetch("temporarily unavailable");
        let mut panel = CommentPanel::new(api, "PROJ-1");

        assert!(!panel.mount());
        assert_eq!(panel.error(), Some("temporarily unavailable"));

        *panel.api().fetch_error.borrow_mut() = None;
        assert!(panel.refresh());
        assert_eq!(panel.error(), None);
        assert_eq!(panel.comments().len(), 3);
    }

    #[test]
    fn test_error_is_replaced_not_accumulated() {
        let api = FakeApi::default().with_issue("PROJ-1", sample());
        api.fail_fetch("fetch is down");
        api.fail_add("submit is down");
        let mut panel = CommentPanel::new(api, "PROJ-1");

        assert!(!panel.mount());
        assert_eq!(panel.error(), Some("fetch is down"));

        panel.set_draft("hello");
        assert!(!panel.submit());
        assert_eq!(panel.error(), Some("submit is down"));
        assert_eq!(panel.draft(), "hello");
    }

    #[test]
    fn test_submit_appends_and_clears_draft() {
        let api = FakeApi::default().with_issue("PROJ-1", sample());
        let mut panel = CommentPanel::new(api, "PROJ-1");
        panel.mount();

        panel.set_draft("Ship it");
        assert!(panel.submit());

        assert_eq!(panel.comments().len(), 4);
        assert_eq!(panel.comments()[3], Comment::new("Ship it", "Tester"));
        assert_eq!(panel.draft(), "");
        assert_eq!(panel.error(), None);
    }

    #[test]
    fn test_submit_sends_converted_document() {
        let mut panel = CommentPanel::new(FakeApi::default(), "PROJ-7");
        panel.set_draft("line one\nline two");
        panel.submit();

        let expected = adf::from_plain_text("line one\nline two");
        assert_eq!(
            panel.api().calls.borrow().last(),
            Some(&Call::Add("PROJ-7".to_string(), expected.clone()))
        );
        assert_eq!(
            panel.adf_preview(),
            Some(expected.to_pretty_json().unwrap().as_str())
        );
    }

    #[test]
    fn test_failed_submit_keeps_draft() {
        let api = FakeApi::default().with_issue("PROJ-1", sample());
        let mut panel = CommentPanel::new(api, "PROJ-1");
        panel.mount();

        panel.api().fail_add("Comment body is not valid");
        panel.set_draft("needs more work");
        assert!(!panel.submit());

        assert_eq!(panel.draft(), "needs more work");
        assert_eq!(panel.error(), Some("Comment body is not valid"));
        assert_eq!(panel.comments().len(), 3);
        assert!(panel.adf_preview().is_some());
    }

    #[test]
    fn test_changing_issue_fetches_once() {
        let api = FakeApi::default()
            .with_issue("PROJ-1", sample())
            .with_issue("PROJ-2", vec![Comment::new("other", "Dee")]);
        let mut panel = CommentPanel::new(api, "PROJ-1");
        panel.mount();

        assert!(panel.set_issue_key("PROJ-2"));
        assert_eq!(panel.api().fetches(), vec!["PROJ-1", "PROJ-2"]);
        assert_eq!(panel.issue_key(), "PROJ-2");
        assert_eq!(panel.comments(), &[Comment::new("other", "Dee")]);

        panel.set_issue_key("PROJ-2");
        assert_eq!(panel.api().fetches().len(), 2);
    }

    #[test]
    fn test_preview_only_after_submit_attempt() {
        let api = FakeApi::default().with_issue("PROJ-1", sample());
        let mut panel = CommentPanel::new(api, "PROJ-1");

        panel.mount();
        panel.refresh();
        assert_eq!(panel.adf_preview(), None);

        panel.submit();
        assert!(panel.adf_preview().is_some());
    }
}
