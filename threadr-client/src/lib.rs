mod db;
pub use db::{CommentDb, DbConfig, DEFAULT_STORAGE_KEY};

mod fuzz;

mod id;
pub use id::new_id;

pub mod locate;

mod order;
pub use order::OrderExt;

mod render;
pub use render::{flatten_for_render, RenderLine, View};

mod search;
pub use search::Search;

mod storage;
pub use storage::{decode_forest, encode_forest, find_anomalies, Anomaly, FileStore, Gateway};
#[cfg(feature = "local-storage")]
pub use storage::LocalStorage;

pub mod api {
    pub use threadr_api::*;
}

pub mod prelude {
    pub use crate::OrderExt;
}
