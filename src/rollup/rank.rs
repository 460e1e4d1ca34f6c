/// Assigns competition-style ranks to an already-sorted slice.
///
/// Each row gets a provisional rank equal to its 1-based position; every run
/// of rows whose key compares equal shares the minimum rank of the run, so
/// ties share a rank and the next distinct key skips values:
/// event counts `[50, 50, 30]` rank as `[1, 1, 3]`.
pub fn competition_ranks<T, K: PartialEq>(rows: &[T], key: impl Fn(&T) -> K) -> Vec<u32> {
    let mut ranks = Vec::with_capacity(rows.len());
    let mut run_start = 0usize;

    for (i, row) in rows.iter().enumerate() {
        if i > 0 && key(row) == key(&rows[i - 1]) {
            ranks.push(ranks[run_start]);
        } else {
            run_start = i;
            ranks.push(i as u32 + 1);
        }
    }

    ranks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let rows: Vec<u64> = vec![];
        assert!(competition_ranks(&rows, |&v| v).is_empty());
    }

    #[test]
    fn test_distinct_keys() {
        let rows = vec![50u64, 40, 30];
        assert_eq!(competition_ranks(&rows, |&v| v), vec![1, 2, 3]);
    }

    #[test]
    fn test_tie_shares_lower_rank_and_skips() {
        let rows = vec![50u64, 50, 30];
        assert_eq!(competition_ranks(&rows, |&v| v), vec![1, 1, 3]);
    }

    #[test]
    fn test_long_run_and_trailing_tie() {
        let rows = vec![9u64, 9, 9, 5, 5];
        assert_eq!(competition_ranks(&rows, |&v| v), vec![1, 1, 1, 4, 4]);
    }

    #[test]
    fn test_tuple_keys() {
        // Equal shaves but different user counts are not a tie.
        let rows = vec![(50u64, 10u64), (50, 10), (50, 8), (30, 8)];
        assert_eq!(competition_ranks(&rows, |&r| r), vec![1, 1, 3, 4]);
    }
}
