use serde_json::json;

use crate::CommentId;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Comment text is empty")]
    EmptyText,

    #[error("Comment not found {0}")]
    NotFound(CommentId),

    #[error("Parent comment not found {0}")]
    ParentNotFound(CommentId),

    #[error("Replies cannot be nested more than {max_depth} levels deep")]
    DepthExceeded { max_depth: usize },

    #[error("Comment storage unavailable: {0}")]
    PersistenceUnavailable(String),
}

impl Error {
    pub fn kind(&self) -> &'static str {
        match self {
            Error::EmptyText => "empty-text",
            Error::NotFound(_) => "not-found",
            Error::ParentNotFound(_) => "parent-not-found",
            Error::DepthExceeded { .. } => "depth-exceeded",
            Error::PersistenceUnavailable(_) => "persistence-unavailable",
        }
    }

    /// Whether the operation was refused because of its input, rather than
    /// because the comment store could not be written to
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Error::PersistenceUnavailable(_))
    }

    pub fn contents(&self) -> serde_json::Value {
        let message = self.to_string();
        match self {
            Error::EmptyText => json!({
                "message": message,
                "type": self.kind(),
            }),
            Error::NotFound(id) | Error::ParentNotFound(id) => json!({
                "message": message,
                "type": self.kind(),
                "id": id,
            }),
            Error::DepthExceeded { max_depth } => json!({
                "message": message,
                "type": self.kind(),
                "max_depth": max_depth,
            }),
            Error::PersistenceUnavailable(details) => json!({
                "message": message,
                "type": self.kind(),
                "details": details,
            }),
        }
    }
}
