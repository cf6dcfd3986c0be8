use rand::Rng;

use crate::api::{self, CommentId, Time};

const ID_PREFIX: &str = "c_";
const RANDOM_SUFFIX_LEN: usize = 6;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates a fresh comment id
///
/// Ids are made of the creation time in milliseconds followed by a random
/// suffix, so that two ids generated during the same millisecond still differ
/// (with overwhelming probability, this is not a cryptographic guarantee).
pub fn new_id() -> CommentId {
    new_id_at(api::now())
}

pub(crate) fn new_id_at(date: Time) -> CommentId {
    let mut rng = rand::thread_rng();
    let mut id = String::from(ID_PREFIX);
    id.push_str(&to_base36(date.timestamp_millis().max(0) as u64));
    id.extend((0..RANDOM_SUFFIX_LEN).map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char));
    CommentId(id)
}

fn to_base36(mut n: u64) -> String {
    let mut digits = Vec::new();
    loop {
        digits.push(BASE36[(n % 36) as usize] as char);
        n /= 36;
        if n == 0 {
            break;
        }
    }
    digits.into_iter().rev().collect()
}
