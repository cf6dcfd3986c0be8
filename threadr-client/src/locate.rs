//! Depth-first, pre-order lookups of comments by id
//!
//! Every function here walks the whole forest in the worst case. Ids being
//! unique, the first match is the only one.

use crate::api::{Comment, CommentId};

pub fn find<'a>(forest: &'a [Comment], id: &CommentId) -> Option<&'a Comment> {
    find_with_depth(forest, id).map(|(c, _)| c)
}

pub fn find_mut<'a>(forest: &'a mut [Comment], id: &CommentId) -> Option<&'a mut Comment> {
    find_mut_with_depth(forest, id).map(|(c, _)| c)
}

/// Also returns the depth of the comment, roots being at depth 0
pub fn find_with_depth<'a>(forest: &'a [Comment], id: &CommentId) -> Option<(&'a Comment, usize)> {
    find_below(forest, id, 0)
}

pub fn find_mut_with_depth<'a>(
    forest: &'a mut [Comment],
    id: &CommentId,
) -> Option<(&'a mut Comment, usize)> {
    find_mut_below(forest, id, 0)
}

fn find_below<'a>(
    comments: &'a [Comment],
    id: &CommentId,
    depth: usize,
) -> Option<(&'a Comment, usize)> {
    for c in comments {
        if c.id == *id {
            return Some((c, depth));
        }
        if let Some(res) = find_below(&c.replies, id, depth + 1) {
            return Some(res);
        }
    }
    None
}

fn find_mut_below<'a>(
    comments: &'a mut [Comment],
    id: &CommentId,
    depth: usize,
) -> Option<(&'a mut Comment, usize)> {
    for c in comments.iter_mut() {
        if c.id == *id {
            return Some((c, depth));
        }
        if let Some(res) = find_mut_below(&mut c.replies, id, depth + 1) {
            return Some(res);
        }
    }
    None
}

/// Returns the list that directly holds comment `id`, along with its index
/// in that list
pub fn find_container<'a>(
    comments: &'a mut Vec<Comment>,
    id: &CommentId,
) -> Option<(&'a mut Vec<Comment>, usize)> {
    // siblings are checked before descending, which finds the same comment as
    // a pre-order walk given ids are unique
    let idx = comments.iter().position(|c| c.id == *id);
    if let Some(idx) = idx {
        return Some((comments, idx));
    }
    for c in comments.iter_mut() {
        if let Some(res) = find_container(&mut c.replies, id) {
            return Some(res);
        }
    }
    None
}

/// Number of comments in the forest, at all depths
pub fn count(forest: &[Comment]) -> usize {
    forest.iter().map(|c| 1 + count(&c.replies)).sum()
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::TimeZone;

    use super::*;

    pub(crate) fn comment(id: &str, text: &str, replies: Vec<Comment>) -> Comment {
        let mut c = Comment::new(
            CommentId::from(id),
            String::from(text),
            String::from("Anonymous"),
            chrono::Utc.timestamp_millis_opt(0).unwrap(),
        );
        c.replies = replies;
        c
    }

    /// a
    /// ├── b
    /// │   └── c
    /// │       └── d
    /// └── e
    /// f
    pub(crate) fn example_forest() -> Vec<Comment> {
        vec![
            comment(
                "a",
                "first root",
                vec![
                    comment(
                        "b",
                        "reply to a",
                        vec![comment("c", "deeper", vec![comment("d", "deepest", vec![])])],
                    ),
                    comment("e", "second reply to a", vec![]),
                ],
            ),
            comment("f", "second root", vec![]),
        ]
    }

    fn id(s: &str) -> CommentId {
        CommentId::from(s)
    }

    #[test]
    fn finds_at_all_depths() {
        let forest = example_forest();
        for (name, depth) in [("a", 0), ("b", 1), ("c", 2), ("d", 3), ("e", 1), ("f", 0)] {
            let (c, d) = find_with_depth(&forest, &id(name)).unwrap();
            assert_eq!(c.id, id(name));
            assert_eq!(d, depth, "depth of {name}");
        }
        assert!(find(&forest, &id("nope")).is_none());
        assert!(find(&[], &id("a")).is_none());
    }

    #[test]
    fn find_mut_mutates_in_place() {
        let mut forest = example_forest();
        find_mut(&mut forest, &id("d")).unwrap().votes = 7;
        assert_eq!(forest[0].replies[0].replies[0].replies[0].votes, 7);
        let (c, depth) = find_mut_with_depth(&mut forest, &id("e")).unwrap();
        c.collapsed = true;
        assert_eq!(depth, 1);
        assert!(forest[0].replies[1].collapsed);
    }

    #[test]
    fn container_of_root_is_the_forest() {
        let mut forest = example_forest();
        let (container, idx) = find_container(&mut forest, &id("f")).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(container.len(), 2);
    }

    #[test]
    fn container_of_nested_comment() {
        let mut forest = example_forest();
        let (container, idx) = find_container(&mut forest, &id("e")).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(container[0].id, id("b"));
        container.remove(idx);
        assert_eq!(forest[0].replies.len(), 1);

        let (container, idx) = find_container(&mut forest, &id("d")).unwrap();
        assert_eq!((container.len(), idx), (1, 0));
        assert!(find_container(&mut forest, &id("nope")).is_none());
    }

    #[test]
    fn counts_all_depths() {
        assert_eq!(count(&example_forest()), 6);
        assert_eq!(count(&[]), 0);
    }
}
