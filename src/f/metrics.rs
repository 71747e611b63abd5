pub fn accuracy<T: Copy + PartialEq>(prediction: &[T], actual: &[T]) -> f64 {
    if prediction.is_empty() {
        return 0.;
    }

    let hits = prediction
        .iter()
        .zip(actual.iter())
        .filter(|(p, a)| p == a)
        .count();

    (hits as f64 / prediction.len() as f64) * 100.
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_of_matches() {
        assert_eq!(accuracy(&[1, 0, 1, 1], &[1, 1, 1, 0]), 50.);
        assert_eq!(accuracy::<usize>(&[], &[]), 0.);
    }
}
