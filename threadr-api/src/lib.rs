use chrono::{SubsecRound, Utc};

mod comment;
pub use comment::{Comment, CommentId};

mod error;
pub use error::Error;

mod order;
pub use order::Order;

mod store;
pub use store::BlobStore;

pub type Time = chrono::DateTime<Utc>;

/// Author recorded for comments posted without a name
pub const ANONYMOUS: &str = "Anonymous";

/// Current time, truncated to the millisecond precision the stored blob keeps
pub fn now() -> Time {
    Utc::now().trunc_subsecs(3)
}

/// Returns the trimmed text, or `Error::EmptyText` if nothing is left after trimming
pub fn validate_text(text: &str) -> Result<String, Error> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::EmptyText);
    }
    Ok(String::from(text))
}

pub fn author_or_anonymous(author: Option<&str>) -> String {
    match author.map(str::trim) {
        Some(a) if !a.is_empty() => String::from(a),
        _ => String::from(ANONYMOUS),
    }
}
