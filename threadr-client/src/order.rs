use std::cmp::Reverse;

use crate::api::{Comment, Order};

pub trait OrderExt {
    fn sort(&self, comments: &mut [Comment]);
}

impl OrderExt for Order {
    /// Sorts each list of siblings independently, at every depth
    ///
    /// Sorting is stable: comments comparing equal keep their previous order.
    fn sort(&self, comments: &mut [Comment]) {
        match self {
            Order::Newest => comments.sort_by_key(|c| Reverse(c.created_at)),
            Order::Oldest => comments.sort_by_key(|c| c.created_at),
            Order::Top => comments.sort_by_key(|c| Reverse(c.votes)),
        }
        for c in comments.iter_mut() {
            self.sort(&mut c.replies);
        }
    }
}
