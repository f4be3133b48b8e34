use markov_core::{token_id, ChainError, TokenId};
use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::Rng;

/// Draw a successor of `row_id` with probability proportional to `row[j]`.
///
/// Weights need not sum to one. An empty or all-zero row fails with
/// `DegenerateRow`; a negative or non-finite weight, or weights whose total
/// overflows, fail with `InvalidWeight`.
pub fn sample<R: Rng + ?Sized>(
    row_id: TokenId,
    row: &[f32],
    rng: &mut R,
) -> Result<TokenId, ChainError> {
    if !row.iter().sum::<f32>().is_finite() {
        return Err(ChainError::InvalidWeight { row: row_id });
    }
    let dist = WeightedIndex::<f32>::new(row).map_err(|err| match err {
        WeightedError::NoItem | WeightedError::AllWeightsZero => {
            ChainError::DegenerateRow { row: row_id }
        }
        _ => ChainError::InvalidWeight { row: row_id },
    })?;
    token_id(dist.sample(rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn single_successor_is_always_drawn() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(sample(3, &[0.0, 1.0, 0.0], &mut rng), Ok(1));
        }
    }

    #[test]
    fn zero_row_is_degenerate() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            sample(4, &[0.0, 0.0, 0.0], &mut rng),
            Err(ChainError::DegenerateRow { row: 4 })
        );
        assert_eq!(sample(0, &[], &mut rng), Err(ChainError::DegenerateRow { row: 0 }));
    }

    #[test]
    fn bad_weights_are_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            sample(2, &[0.5, -0.5], &mut rng),
            Err(ChainError::InvalidWeight { row: 2 })
        );
        assert_eq!(
            sample(2, &[f32::NAN, 1.0], &mut rng),
            Err(ChainError::InvalidWeight { row: 2 })
        );
    }

    #[test]
    fn overflowing_total_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            sample(5, &[f32::MAX, f32::MAX], &mut rng),
            Err(ChainError::InvalidWeight { row: 5 })
        );
    }

    #[test]
    fn frequencies_track_weights() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let row = [0.25, 0.75];
        let draws = 20_000;
        let ones = (0..draws)
            .filter(|_| sample(0, &row, &mut rng) == Ok(1))
            .count();
        let share = ones as f64 / draws as f64;
        assert!((share - 0.75).abs() < 0.02, "share of id 1 was {share}");
    }

    proptest! {
        #[test]
        fn never_draws_a_zero_weight(weights in prop::collection::vec(0u8..4, 1..16), seed in any::<u64>()) {
            let row: Vec<f32> = weights.iter().map(|&w| f32::from(w)).collect();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            match sample(0, &row, &mut rng) {
                Ok(id) => prop_assert!(row[id as usize] > 0.0),
                Err(err) => {
                    prop_assert_eq!(err, ChainError::DegenerateRow { row: 0 });
                    prop_assert!(row.iter().all(|&w| w == 0.0));
                }
            }
        }
    }
}
