use crate::{
    api::{self, BlobStore, Comment, CommentId, Error, Order},
    id::new_id_at,
    locate, Gateway, OrderExt, Search, View,
};

/// Key the forest is stored under unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "comments_tree_v2";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DbConfig {
    /// Key of the blob holding the whole forest
    pub storage_key: String,

    /// Deepest depth a reply may be inserted at, roots being at depth 0.
    /// `None`, the default, means replies may nest without limit.
    pub max_depth: Option<usize>,
}

impl Default for DbConfig {
    fn default() -> DbConfig {
        DbConfig {
            storage_key: String::from(DEFAULT_STORAGE_KEY),
            max_depth: None,
        }
    }
}

/// The forest of comments, written through to a `BlobStore` after every
/// change
///
/// Every mutating method either fails without touching anything, or applies
/// its change and then saves the whole forest exactly once. A failure to save
/// is reported as `Error::PersistenceUnavailable`, in which case the change is
/// kept in memory but is not durable.
pub struct CommentDb<S> {
    forest: Vec<Comment>,
    gateway: Gateway<S>,
    max_depth: Option<usize>,
    search: Search,
}

impl<S: BlobStore> CommentDb<S> {
    /// Loads the last saved forest, starting empty if there is none or it
    /// cannot be read
    pub fn open(store: S, config: DbConfig) -> CommentDb<S> {
        let gateway = Gateway::new(store, config.storage_key);
        let forest = gateway.load();
        tracing::debug!(
            key = gateway.key(),
            num_comments = locate::count(&forest),
            "opened comment db"
        );
        CommentDb {
            forest,
            gateway,
            max_depth: config.max_depth,
            search: Search::default(),
        }
    }

    /// Saves one last time and hands back the underlying store
    pub fn close(mut self) -> Result<S, Error> {
        self.persist()?;
        Ok(self.gateway.into_store())
    }

    pub fn comments(&self) -> &[Comment] {
        &self.forest
    }

    pub fn get(&self, id: &CommentId) -> Option<&Comment> {
        locate::find(&self.forest, id)
    }

    pub fn depth_of(&self, id: &CommentId) -> Option<usize> {
        locate::find_with_depth(&self.forest, id).map(|(_, depth)| depth)
    }

    pub fn count(&self) -> usize {
        locate::count(&self.forest)
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn search(&self) -> &Search {
        &self.search
    }

    pub fn store(&self) -> &S {
        self.gateway.store()
    }

    fn persist(&mut self) -> Result<(), Error> {
        self.gateway.save(&self.forest)
    }

    /// Appends a new top-level comment, returning its id
    pub fn add_root(&mut self, text: &str, author: Option<&str>) -> Result<CommentId, Error> {
        let text = api::validate_text(text).map_err(|e| {
            tracing::info!("refusing to post an empty comment");
            e
        })?;
        let comment = new_comment(text, author);
        let id = comment.id.clone();
        self.forest.push(comment);
        tracing::debug!(%id, "posted comment");
        self.persist()?;
        Ok(id)
    }

    /// Appends a reply at the end of `parent`'s replies, returning its id
    pub fn add_reply(
        &mut self,
        parent: &CommentId,
        text: &str,
        author: Option<&str>,
    ) -> Result<CommentId, Error> {
        let text = api::validate_text(text).map_err(|e| {
            tracing::info!(%parent, "refusing to post an empty reply");
            e
        })?;
        let (parent_comment, parent_depth) = locate::find_mut_with_depth(&mut self.forest, parent)
            .ok_or_else(|| {
                tracing::info!(%parent, "refusing to reply to missing comment");
                Error::ParentNotFound(parent.clone())
            })?;
        if let Some(max_depth) = self.max_depth {
            if parent_depth + 1 > max_depth {
                tracing::info!(%parent, parent_depth, max_depth, "refusing too deep reply");
                return Err(Error::DepthExceeded { max_depth });
            }
        }
        let comment = new_comment(text, author);
        let id = comment.id.clone();
        parent_comment.replies.push(comment);
        tracing::debug!(%id, %parent, "posted reply");
        self.persist()?;
        Ok(id)
    }

    /// Replaces the text of a comment, marking it as edited even if the text
    /// did not actually change
    pub fn edit(&mut self, id: &CommentId, text: &str) -> Result<(), Error> {
        let text = api::validate_text(text).map_err(|e| {
            tracing::info!(%id, "refusing to empty a comment");
            e
        })?;
        self.find_mut(id)?.set_text(text, api::now());
        tracing::debug!(%id, "edited comment");
        self.persist()
    }

    /// Removes a comment along with all its replies, returning it
    pub fn delete(&mut self, id: &CommentId) -> Result<Comment, Error> {
        let (container, idx) = locate::find_container(&mut self.forest, id).ok_or_else(|| {
            tracing::info!(%id, "refusing to delete missing comment");
            Error::NotFound(id.clone())
        })?;
        let removed = container.remove(idx);
        tracing::debug!(
            %id,
            num_removed = 1 + locate::count(&removed.replies),
            "deleted comment"
        );
        self.persist()?;
        Ok(removed)
    }

    /// Adds `delta` to the votes of a comment, returning its new vote count
    pub fn vote(&mut self, id: &CommentId, delta: i64) -> Result<i64, Error> {
        let comment = self.find_mut(id)?;
        comment.add_votes(delta);
        let votes = comment.votes;
        tracing::debug!(%id, delta, votes, "voted on comment");
        self.persist()?;
        Ok(votes)
    }

    /// Sets the collapsed flag of a comment to `explicit`, or flips it if
    /// `None`, returning the new value
    pub fn toggle_collapse(
        &mut self,
        id: &CommentId,
        explicit: Option<bool>,
    ) -> Result<bool, Error> {
        let comment = self.find_mut(id)?;
        comment.collapsed = explicit.unwrap_or(!comment.collapsed);
        let collapsed = comment.collapsed;
        tracing::debug!(%id, collapsed, "toggled comment collapse");
        self.persist()?;
        Ok(collapsed)
    }

    pub fn clear_all(&mut self) -> Result<(), Error> {
        let num_removed = self.count();
        self.forest.clear();
        tracing::debug!(num_removed, "cleared all comments");
        self.persist()
    }

    /// Reorders the stored forest, at all depths
    ///
    /// `None` leaves everything as it is, and returns `Ok(false)`.
    pub fn set_sort_order(&mut self, order: Option<Order>) -> Result<bool, Error> {
        let order = match order {
            Some(order) => order,
            None => {
                tracing::info!("ignoring unknown sort order");
                return Ok(false);
            }
        };
        order.sort(&mut self.forest);
        self.search.order = Some(order);
        tracing::debug!(%order, "sorted comments");
        self.persist()?;
        Ok(true)
    }

    /// Sets the query used by `view`, this is not persisted
    pub fn set_search_query(&mut self, query: &str) {
        self.search.query = String::from(query);
    }

    /// The comments matching the current search query, ready for rendering
    pub fn view(&self) -> View<'_> {
        View::new(self.search.filter(&self.forest), self.count())
    }

    fn find_mut(&mut self, id: &CommentId) -> Result<&mut Comment, Error> {
        locate::find_mut(&mut self.forest, id).ok_or_else(|| {
            tracing::info!(%id, "comment not found");
            Error::NotFound(id.clone())
        })
    }
}

fn new_comment(text: String, author: Option<&str>) -> Comment {
    let date = api::now();
    Comment::new(new_id_at(date), text, api::author_or_anonymous(author), date)
}
