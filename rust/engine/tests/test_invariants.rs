use proptest::prelude::*;

use montyhall_engine::bulk::{sample_interval, simulate_bulk};
use montyhall_engine::door::DoorId;
use montyhall_engine::game::{GameState, Strategy};
use montyhall_engine::rng::rng_from_seed;
use montyhall_engine::stats::{win_percentage, Statistics};

proptest! {
    #[test]
    fn host_never_opens_pick_or_prize(seed in any::<u64>(), pick in 0u8..3) {
        let mut rng = rng_from_seed(seed);
        let pick = DoorId::new(pick).unwrap();
        let state = GameState::create_round(&mut rng).choose_initial(pick, &mut rng).unwrap();
        let host = state.host_revealed_door().unwrap();
        prop_assert_ne!(host, pick);
        prop_assert_ne!(host, state.prize_door());
        prop_assert_eq!(state.doors().iter().filter(|d| d.has_prize).count(), 1);
    }

    #[test]
    fn exactly_one_strategy_wins(seed in any::<u64>(), pick in 0u8..3) {
        let mut rng = rng_from_seed(seed);
        let pick = DoorId::new(pick).unwrap();
        let state = GameState::create_round(&mut rng).choose_initial(pick, &mut rng).unwrap();
        let stay = state.choose_final(pick).unwrap();
        let switch = state.choose_final(state.switch_target().unwrap()).unwrap();
        prop_assert_ne!(stay.player_won(), switch.player_won());
        prop_assert_eq!(stay.strategy(), Some(Strategy::Stay));
        prop_assert_eq!(switch.strategy(), Some(Strategy::Switch));
    }

    #[test]
    fn stats_totals_stay_consistent(outcomes in prop::collection::vec((any::<bool>(), any::<bool>()), 0..200)) {
        let mut s = Statistics::new();
        for (switched, won) in &outcomes {
            let strategy = if *switched { Strategy::Switch } else { Strategy::Stay };
            s.record(strategy, *won);
        }
        prop_assert_eq!(s.total_games, outcomes.len() as u64);
        prop_assert_eq!(s.total_games, s.stay_total + s.switch_total);
        prop_assert!(s.stay_wins <= s.stay_total);
        prop_assert!(s.switch_wins <= s.switch_total);
    }

    #[test]
    fn percentage_matches_rounded_ratio(total in 1u64..10_000, frac in 0.0f64..=1.0) {
        let wins = ((total as f64) * frac) as u64;
        let expected = (100.0 * wins as f64 / total as f64 + 0.5).floor() as u64;
        prop_assert_eq!(win_percentage(wins, total), expected);
        prop_assert!(win_percentage(wins, total) <= 100);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn bulk_counts_and_series_fit_any_size(n in 1u64..2_000, seed in any::<u64>()) {
        let mut rng = rng_from_seed(seed);
        let report = simulate_bulk(n, &mut rng).unwrap();

        prop_assert_eq!(report.stats.total_games, 2 * n);
        prop_assert_eq!(report.stats.stay_total, n);
        prop_assert_eq!(report.stats.switch_total, n);
        prop_assert_eq!(report.stats.stay_wins + report.stats.switch_wins, n);

        let last = report.convergence.last().unwrap();
        prop_assert_eq!(last.game_number, n);
        // One point per sampling interval plus the final round.
        let interval = sample_interval(n);
        let sampled = (n - 1) / interval + 1;
        let tail = u64::from((n - 1) % interval != 0);
        prop_assert_eq!(report.convergence.len() as u64, sampled + tail);
        if n % 100 == 0 {
            prop_assert!(report.convergence.len() <= 101);
        }
        prop_assert!(report.convergence.len() <= 201);
        prop_assert!(report
            .convergence
            .windows(2)
            .all(|w| w[0].game_number < w[1].game_number));
    }
}
