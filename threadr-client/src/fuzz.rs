#![cfg(test)]

use std::collections::HashSet;

use bolero::generator::TypeGenerator;
use threadr_mock_store::MockStore;

use crate::{
    api::{Comment, CommentId, Error, Order},
    decode_forest, find_anomalies, locate, CommentDb, DbConfig, DEFAULT_STORAGE_KEY,
};

const MAX_DEPTH: usize = 4;

#[derive(Clone, Debug, bolero::generator::TypeGenerator)]
enum FuzzOp {
    AddRoot { blank: bool },
    AddReply { parent: u8, blank: bool },
    Edit { target: u8, blank: bool },
    Delete { target: u8 },
    Vote { target: u8, delta: i8 },
    Collapse { target: u8, explicit: Option<bool> },
    Sort { order: u8 },
    Search { target: u8 },
    Clear,
}

fn all_ids(forest: &[Comment]) -> Vec<CommentId> {
    let mut res = Vec::new();
    fn walk(comments: &[Comment], res: &mut Vec<CommentId>) {
        for c in comments {
            res.push(c.id.clone());
            walk(&c.replies, res);
        }
    }
    walk(forest, &mut res);
    res
}

fn max_depth(forest: &[Comment]) -> Option<usize> {
    forest
        .iter()
        .map(|c| max_depth(&c.replies).map_or(0, |d| d + 1))
        .max()
}

/// Picks an existing comment, or an id that is not in the forest
fn pick(forest: &[Comment], target: u8) -> CommentId {
    let ids = all_ids(forest);
    ids.get(target as usize % (ids.len() + 1))
        .cloned()
        .unwrap_or_else(|| CommentId::from("c_missing"))
}

fn text(blank: bool) -> &'static str {
    match blank {
        true => " \t ",
        false => "Some comment",
    }
}

fn check_invariants(db: &CommentDb<MockStore>, expected_writes: usize) {
    let forest = db.comments();
    let ids = all_ids(forest);
    assert_eq!(db.count(), ids.len(), "count does not match reachable comments");
    assert_eq!(
        ids.iter().collect::<HashSet<_>>().len(),
        ids.len(),
        "duplicate comment ids"
    );
    assert!(max_depth(forest).map_or(true, |d| d <= MAX_DEPTH), "forest is too deep");
    assert!(find_anomalies(forest).is_empty(), "forest has anomalies");
    for id in ids.iter() {
        let c = db.get(id).expect("listed comment cannot be found");
        assert_eq!(c.edited, c.edited_at.is_some(), "edited flag out of sync for {id}");
        assert!(!c.text.trim().is_empty(), "comment {id} has blank text");
    }
    assert_eq!(db.store().test_num_writes(), expected_writes, "unexpected number of saves");
    if expected_writes > 0 {
        let blob = db
            .store()
            .test_blob(DEFAULT_STORAGE_KEY)
            .expect("saved without writing the blob");
        assert_eq!(decode_forest(blob).expect("stored blob is corrupt"), forest);
    }
}

#[test]
fn fuzz_comment_db() {
    bolero::check!().with_type::<Vec<FuzzOp>>().for_each(|ops| {
        let mut db = CommentDb::open(
            MockStore::new(),
            DbConfig {
                max_depth: Some(MAX_DEPTH),
                ..DbConfig::default()
            },
        );
        let mut expected_writes = 0;
        for op in ops.iter() {
            let count_before = db.count();
            let forest_before = db.comments().to_vec();
            let saved = match *op {
                FuzzOp::AddRoot { blank } => match db.add_root(text(blank), None) {
                    Ok(id) => {
                        assert!(!blank);
                        assert_eq!(db.comments().last().map(|c| &c.id), Some(&id));
                        true
                    }
                    Err(e) => {
                        assert_eq!(e, Error::EmptyText);
                        false
                    }
                },
                FuzzOp::AddReply { parent, blank } => {
                    let parent = pick(db.comments(), parent);
                    match db.add_reply(&parent, text(blank), Some("fuzz")) {
                        Ok(id) => {
                            assert_eq!(
                                db.get(&parent).and_then(|p| p.replies.last()).map(|c| &c.id),
                                Some(&id)
                            );
                            true
                        }
                        Err(Error::EmptyText) => {
                            assert!(blank);
                            false
                        }
                        Err(Error::ParentNotFound(_)) => {
                            assert!(db.get(&parent).is_none());
                            false
                        }
                        Err(Error::DepthExceeded { .. }) => {
                            assert_eq!(db.depth_of(&parent), Some(MAX_DEPTH));
                            false
                        }
                        Err(e) => panic!("unexpected error {e}"),
                    }
                }
                FuzzOp::Edit { target, blank } => {
                    let target = pick(db.comments(), target);
                    match db.edit(&target, text(blank)) {
                        Ok(()) => {
                            assert!(db.get(&target).map_or(false, |c| c.edited));
                            true
                        }
                        Err(Error::EmptyText) => {
                            assert!(blank);
                            false
                        }
                        Err(Error::NotFound(_)) => false,
                        Err(e) => panic!("unexpected error {e}"),
                    }
                }
                FuzzOp::Delete { target } => {
                    let target = pick(db.comments(), target);
                    match db.delete(&target) {
                        Ok(removed) => {
                            let removed_ids = all_ids(std::slice::from_ref(&removed));
                            for id in removed_ids.iter() {
                                assert!(db.get(id).is_none(), "{id} survived its deletion");
                            }
                            assert_eq!(db.count(), count_before - removed_ids.len());
                            true
                        }
                        Err(e) => {
                            assert_eq!(e, Error::NotFound(target));
                            false
                        }
                    }
                }
                FuzzOp::Vote { target, delta } => {
                    let target = pick(db.comments(), target);
                    let before = db.get(&target).map(|c| c.votes);
                    match db.vote(&target, i64::from(delta)) {
                        Ok(votes) => {
                            assert_eq!(Some(votes - i64::from(delta)), before);
                            true
                        }
                        Err(_) => false,
                    }
                }
                FuzzOp::Collapse { target, explicit } => {
                    let target = pick(db.comments(), target);
                    let before = db.get(&target).map(|c| c.collapsed);
                    match db.toggle_collapse(&target, explicit) {
                        Ok(collapsed) => {
                            assert_eq!(Some(collapsed), explicit.or(before.map(|b| !b)));
                            true
                        }
                        Err(_) => false,
                    }
                }
                FuzzOp::Sort { order } => {
                    let order = Order::ALL.get(order as usize % 4).copied();
                    db.set_sort_order(order).expect("sorting failed")
                }
                FuzzOp::Search { target } => {
                    let target = pick(db.comments(), target);
                    let query = db.get(&target).map(|c| c.text.clone()).unwrap_or_default();
                    db.set_search_query(&query);
                    let view = db.view();
                    if db.get(&target).is_some() {
                        assert!(locate::find(view.forest(), &target).is_some());
                    }
                    assert!(view.shown() <= view.total());
                    false
                }
                FuzzOp::Clear => {
                    db.clear_all().expect("clearing failed");
                    assert_eq!(db.count(), 0);
                    true
                }
            };
            if saved {
                expected_writes += 1;
            } else {
                assert_eq!(db.comments(), &forest_before[..], "rejected {op:?} changed the forest");
                assert_eq!(db.count(), count_before);
            }
            check_invariants(&db, expected_writes);
        }
        assert_eq!(locate::count(db.comments()), db.count());
    });
}
