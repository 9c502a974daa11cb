use parfind::{partition, search, SearchOutcome, Strategy as SearchStrategy};
use proptest::prelude::*;

fn len_and_threads() -> impl Strategy<Value = (usize, usize)> {
    (1usize..500).prop_flat_map(|len| (Just(len), 1..=len))
}

fn haystack_and_threads() -> impl Strategy<Value = (Vec<u8>, usize)> {
    prop::collection::vec(0u8..4, 1..200).prop_flat_map(|data| {
        let len = data.len();
        (Just(data), 1..=len)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn partitions_tile_the_input((len, threads) in len_and_threads()) {
        let parts = partition(len, threads).unwrap();
        prop_assert_eq!(parts.len(), threads);

        let mut next = 0;
        for p in &parts {
            prop_assert_eq!(p.start, next);
            prop_assert!(p.end > p.start);
            next = p.end;
        }
        prop_assert_eq!(next, len);

        let sizes: Vec<usize> = parts.iter().map(|p| p.len()).collect();
        let max = *sizes.iter().max().unwrap();
        let min = *sizes.iter().min().unwrap();
        prop_assert!(max - min <= 1);

        // Larger partitions come first.
        prop_assert!(sizes.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn search_matches_sequential_position(
        (data, threads) in haystack_and_threads(),
        target in 0u8..5,
    ) {
        let expected = data
            .iter()
            .position(|&x| x == target)
            .map_or(SearchOutcome::NotFound, SearchOutcome::Found);

        for strategy in [SearchStrategy::Join, SearchStrategy::Shared] {
            let report = search(&data, target)
                .threads(threads)
                .strategy(strategy)
                .run()
                .unwrap();
            prop_assert_eq!(report.outcome, expected);
            prop_assert!(report.stats.scanned <= data.len());
        }
    }

    #[test]
    fn out_of_range_thread_counts_are_rejected(len in 0usize..64, extra in 1usize..8) {
        prop_assert!(partition(len, 0).unwrap_err().is_configuration());
        prop_assert!(partition(len, len + extra).unwrap_err().is_configuration());
    }
}
