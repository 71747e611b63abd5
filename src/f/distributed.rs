/// Deal items out to `buckets` queues in turn, so item `i` lands in `i % buckets`.
/// The assignment only depends on the input order.
pub fn round_robin<T>(items: impl IntoIterator<Item = T>, buckets: usize) -> Vec<Vec<T>> {
    let buckets = buckets.max(1);
    let mut dealt: Vec<Vec<T>> = (0..buckets).map(|_| vec![]).collect();

    for (i, item) in items.into_iter().enumerate() {
        dealt[i % buckets].push(item);
    }

    dealt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deals_in_turn() {
        let dealt = round_robin(0..7, 3);
        assert_eq!(dealt, vec![vec![0, 3, 6], vec![1, 4], vec![2, 5]]);
    }

    #[test]
    fn zero_buckets_means_one() {
        assert_eq!(round_robin(0..3, 0), vec![vec![0, 1, 2]]);
    }
}
