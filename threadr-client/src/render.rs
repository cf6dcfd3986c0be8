use std::borrow::Cow;

use crate::{api::Comment, locate};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderLine<'a> {
    pub comment: &'a Comment,
    pub depth: usize,
}

impl RenderLine<'_> {
    /// Whether this comment has replies that are hidden because it is collapsed
    pub fn hides_replies(&self) -> bool {
        self.comment.collapsed && !self.comment.replies.is_empty()
    }
}

/// Flattens the forest in pre-order, pairing each comment with its depth
///
/// Replies of collapsed comments are skipped.
pub fn flatten_for_render(forest: &[Comment]) -> Vec<RenderLine<'_>> {
    let mut res = Vec::new();
    flatten_into(forest, 0, &mut res);
    res
}

fn flatten_into<'a>(comments: &'a [Comment], depth: usize, res: &mut Vec<RenderLine<'a>>) {
    for comment in comments {
        res.push(RenderLine { comment, depth });
        if !comment.collapsed {
            flatten_into(&comment.replies, depth + 1, res);
        }
    }
}

/// The forest as it should be displayed: filtered by the current search
pub struct View<'a> {
    forest: Cow<'a, [Comment]>,
    total: usize,
}

impl<'a> View<'a> {
    pub(crate) fn new(forest: Cow<'a, [Comment]>, total: usize) -> View<'a> {
        View { forest, total }
    }

    pub fn lines(&self) -> Vec<RenderLine<'_>> {
        flatten_for_render(&self.forest)
    }

    pub fn forest(&self) -> &[Comment] {
        &self.forest
    }

    /// Number of comments in the whole store, regardless of the search
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of comments that made it through the search
    pub fn shown(&self) -> usize {
        locate::count(&self.forest)
    }

    pub fn is_filtered(&self) -> bool {
        matches!(self.forest, Cow::Owned(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locate::tests::example_forest;

    fn lines(forest: &[Comment]) -> Vec<(&str, usize)> {
        flatten_for_render(forest)
            .into_iter()
            .map(|l| (l.comment.id.as_str(), l.depth))
            .collect()
    }

    #[test]
    fn pre_order_with_depths() {
        assert_eq!(
            lines(&example_forest()),
            [("a", 0), ("b", 1), ("c", 2), ("d", 3), ("e", 1), ("f", 0)]
        );
        assert!(lines(&[]).is_empty());
    }

    #[test]
    fn collapsed_replies_are_hidden_but_kept() {
        let mut forest = example_forest();
        forest[0].replies[0].collapsed = true;
        forest[1].collapsed = true;
        let flat = flatten_for_render(&forest);
        assert_eq!(
            flat.iter().map(|l| l.comment.id.as_str()).collect::<Vec<_>>(),
            ["a", "b", "e", "f"]
        );
        assert!(flat[1].hides_replies());
        // f is collapsed but has nothing to hide
        assert!(!flat[3].hides_replies());
        assert_eq!(locate::count(&forest), 6);
    }

    #[test]
    fn collapsed_root_hides_whole_subtree() {
        let mut forest = example_forest();
        forest[0].collapsed = true;
        assert_eq!(lines(&forest), [("a", 0), ("f", 0)]);
    }
}
