use std::fmt;

use crate::{Time, ANONYMOUS};

#[derive(
    Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct CommentId(pub String);

impl CommentId {
    pub fn stub() -> CommentId {
        CommentId(String::from("c_stub"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CommentId {
    fn from(s: &str) -> CommentId {
        CommentId(String::from(s))
    }
}

fn anonymous() -> String {
    String::from(ANONYMOUS)
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,

    /// Always trimmed and non-empty
    pub text: String,

    #[serde(default = "anonymous")]
    pub author: String,

    /// Creation date, never changes afterwards
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub created_at: Time,

    /// Set once the comment has been edited at least once
    #[serde(default)]
    pub edited: bool,

    /// Date of the last edit, `Some` iff `edited`
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub edited_at: Option<Time>,

    #[serde(default)]
    pub votes: i64,

    /// Whether the replies are hidden when rendering
    #[serde(default)]
    pub collapsed: bool,

    /// Child comments, in display order
    #[serde(default)]
    pub replies: Vec<Comment>,
}

impl Comment {
    pub fn new(id: CommentId, text: String, author: String, created_at: Time) -> Comment {
        Comment {
            id,
            text,
            author,
            created_at,
            edited: false,
            edited_at: None,
            votes: 0,
            collapsed: false,
            replies: Vec::new(),
        }
    }

    pub fn set_text(&mut self, text: String, date: Time) {
        self.text = text;
        self.edited = true;
        self.edited_at = Some(date);
    }

    pub fn add_votes(&mut self, delta: i64) {
        self.votes = self.votes.saturating_add(delta);
    }
}
