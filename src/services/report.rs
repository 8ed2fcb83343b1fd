//! Word frequency aggregation.

use std::collections::HashMap;

use crate::models::WordCount;

/// The `n` most frequent words, by count descending.
///
/// Ties keep the order in which the words first appeared in the stream.
pub fn top_n<S: AsRef<str>>(words: &[S], n: usize) -> Vec<WordCount> {
    // word -> (count, first index)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (index, word) in words.iter().enumerate() {
        counts.entry(word.as_ref()).or_insert((0, index)).0 += 1;
    }

    let mut ranked: Vec<_> = counts.into_iter().collect();
    ranked.sort_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
        count_b.cmp(count_a).then(first_a.cmp(first_b))
    });

    ranked
        .into_iter()
        .take(n)
        .map(|(word, (count, _))| WordCount::new(word, count))
        .collect()
}
