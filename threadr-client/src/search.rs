use std::borrow::Cow;

use crate::api::{Comment, Order};

/// What the comment list is currently showing
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Search {
    /// Free text, matched case-insensitively against comment text
    pub query: String,

    /// Last order applied to the stored forest, if any
    pub order: Option<Order>,
}

impl Search {
    pub fn for_query(query: &str) -> Search {
        Search {
            query: String::from(query),
            order: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty()
    }

    pub fn matches(&self, c: &Comment) -> bool {
        self.is_empty() || text_matches(c, &self.needle())
    }

    fn needle(&self) -> String {
        self.query.trim().to_lowercase()
    }

    /// Returns the comments that match, along with all their ancestors
    ///
    /// Anything else is pruned, including the non-matching replies of a
    /// matching comment. With an empty query the forest is returned as-is,
    /// without copying it.
    pub fn filter<'a>(&self, forest: &'a [Comment]) -> Cow<'a, [Comment]> {
        if self.is_empty() {
            return Cow::Borrowed(forest);
        }
        Cow::Owned(prune(forest, &self.needle()))
    }
}

fn text_matches(c: &Comment, needle: &str) -> bool {
    c.text.to_lowercase().contains(needle)
}

fn prune(comments: &[Comment], needle: &str) -> Vec<Comment> {
    comments
        .iter()
        .filter_map(|c| {
            let replies = prune(&c.replies, needle);
            if replies.is_empty() && !text_matches(c, needle) {
                return None;
            }
            Some(Comment {
                id: c.id.clone(),
                text: c.text.clone(),
                author: c.author.clone(),
                created_at: c.created_at,
                edited: c.edited,
                edited_at: c.edited_at,
                votes: c.votes,
                collapsed: c.collapsed,
                replies,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locate::{
        self,
        tests::{comment, example_forest},
    };

    fn ids(comments: &[Comment]) -> Vec<&str> {
        let mut res = Vec::new();
        fn walk<'a>(comments: &'a [Comment], res: &mut Vec<&'a str>) {
            for c in comments {
                res.push(c.id.as_str());
                walk(&c.replies, res);
            }
        }
        walk(comments, &mut res);
        res
    }

    #[test]
    fn empty_query_borrows_forest() {
        let forest = example_forest();
        for q in ["", "   "] {
            match Search::for_query(q).filter(&forest) {
                Cow::Borrowed(f) => assert!(std::ptr::eq(f, &forest[..])),
                Cow::Owned(_) => panic!("empty query {q:?} copied the forest"),
            }
        }
    }

    #[test]
    fn deep_match_keeps_ancestor_chain_only() {
        let forest = example_forest();
        let res = Search::for_query("deepest").filter(&forest);
        assert_eq!(ids(&res), ["a", "b", "c", "d"]);
        // input forest is left untouched
        assert_eq!(locate::count(&forest), 6);
    }

    #[test]
    fn matching_parent_drops_unmatched_replies() {
        let forest = example_forest();
        let res = Search::for_query("ROOT").filter(&forest);
        assert_eq!(ids(&res), ["a", "f"]);
        assert!(res[0].replies.is_empty());
    }

    #[test]
    fn case_insensitive_and_trimmed() {
        let forest = vec![comment("x", "Hello World", vec![]), comment("y", "bye", vec![])];
        assert_eq!(ids(&Search::for_query("  wORLD ").filter(&forest)), ["x"]);
        assert!(Search::for_query("nothing").filter(&forest).is_empty());
    }

    #[test]
    fn multiple_matching_branches() {
        let forest = example_forest();
        let res = Search::for_query("reply").filter(&forest);
        assert_eq!(ids(&res), ["a", "b", "e"]);
        assert!(res[0].replies[0].replies.is_empty());
    }

    #[test]
    fn filtered_copies_keep_fields() {
        let mut forest = example_forest();
        forest[0].collapsed = true;
        forest[0].votes = 4;
        let res = Search::for_query("deeper").filter(&forest);
        assert!(res[0].collapsed);
        assert_eq!(res[0].votes, 4);
        assert!(Search::for_query("deeper").matches(&res[0].replies[0].replies[0]));
        assert!(!Search::for_query("deeper").matches(&res[0]));
    }
}
