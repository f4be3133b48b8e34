use markov_core::{token_id, ChainError, TokenId};

/// Heaviest successor of `row_id`; the lowest id wins ties.
pub fn argmax(row_id: TokenId, row: &[f32]) -> Result<TokenId, ChainError> {
    let mut best: Option<(usize, f32)> = None;
    for (j, &w) in row.iter().enumerate() {
        if !w.is_finite() || w < 0.0 {
            return Err(ChainError::InvalidWeight { row: row_id });
        }
        if w > 0.0 && best.map_or(true, |(_, b)| w > b) {
            best = Some((j, w));
        }
    }
    match best {
        Some((j, _)) => token_id(j),
        None => Err(ChainError::DegenerateRow { row: row_id }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_heaviest() {
        assert_eq!(argmax(0, &[0.1, 0.6, 0.3]), Ok(1));
    }

    #[test]
    fn ties_go_to_lowest_id() {
        assert_eq!(argmax(0, &[0.0, 0.5, 0.5]), Ok(1));
    }

    #[test]
    fn zero_row_is_degenerate() {
        assert_eq!(argmax(7, &[0.0, 0.0]), Err(ChainError::DegenerateRow { row: 7 }));
    }
}
