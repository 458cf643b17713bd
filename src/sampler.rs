use rand::seq::SliceRandom;
use rand::Rng;

use crate::question::{Question, QuestionBank};

/// Pick `n` distinct questions from the bank in random order.
///
/// Smaller banks are returned whole, shuffled. Call this fresh for every
/// session; nothing is remembered between calls.
pub fn sample<R: Rng + ?Sized>(bank: &QuestionBank, n: usize, rng: &mut R) -> Vec<Question> {
    let mut pool: Vec<&Question> = bank.questions().iter().collect();
    let take = n.min(pool.len());
    let (picked, _) = pool.partial_shuffle(rng, take);

    picked.iter().map(|q| (*q).clone()).collect()
}
