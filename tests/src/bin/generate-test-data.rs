use chrono::Duration;
use rand::{seq::SliceRandom, Rng};
use threadr_client::{
    api::{self, Comment, Order, Time},
    encode_forest, new_id, OrderExt,
};

const NUM_ROOTS: usize = 20;
const MAX_REPLIES: usize = 4;
const MAX_DEPTH: usize = 5;

const MAX_WORDS: usize = 40;
const MAX_AGE_DAYS: i64 = 30;

const AUTHORS: &[&str] = &["Alice", "Bob", "Carol", "Dave", api::ANONYMOUS];

fn gen_text(rng: &mut impl Rng) -> String {
    lipsum::lipsum_words(rng.gen_range(1..=MAX_WORDS))
}

/// A random date between `after` and `now`
fn gen_date(rng: &mut impl Rng, after: Time, now: Time) -> Time {
    let span = (now - after).num_milliseconds().max(1);
    after + Duration::milliseconds(rng.gen_range(0..span))
}

fn gen_comment(rng: &mut impl Rng, after: Time, now: Time, depth: usize) -> Comment {
    let date = gen_date(rng, after, now);
    let author = AUTHORS.choose(rng).copied().unwrap_or(api::ANONYMOUS);
    let mut c = Comment::new(new_id(), gen_text(rng), String::from(author), date);
    if rng.gen_bool(0.2) {
        let edited_at = gen_date(rng, date, now);
        c.set_text(gen_text(rng), edited_at);
    }
    c.add_votes(rng.gen_range(-5..=25));
    c.collapsed = rng.gen_bool(0.1);
    if depth < MAX_DEPTH {
        // deeper comments get fewer replies
        let num_replies = rng.gen_range(0..=MAX_REPLIES.saturating_sub(depth));
        c.replies = (0..num_replies)
            .map(|_| gen_comment(rng, date, now, depth + 1))
            .collect();
    }
    c
}

fn main() -> anyhow::Result<()> {
    let mut rng = rand::thread_rng();
    let now = api::now();
    let oldest = now - Duration::days(MAX_AGE_DAYS);

    let mut forest = (0..NUM_ROOTS)
        .map(|_| gen_comment(&mut rng, oldest, now, 0))
        .collect::<Vec<_>>();
    if let Some(order) = Order::ALL.choose(&mut rng) {
        order.sort(&mut forest);
    }

    println!("{}", encode_forest(&forest)?);
    Ok(())
}
