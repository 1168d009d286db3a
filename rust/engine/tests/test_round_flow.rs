use montyhall_engine::door::DoorId;
use montyhall_engine::errors::GameError;
use montyhall_engine::game::{GameState, Phase, Strategy};
use montyhall_engine::result::{build_result, UuidIds};
use montyhall_engine::rng::rng_from_seed;

fn door(n: u8) -> DoorId {
    DoorId::new(n).expect("valid door")
}

fn revealed_after_picking_zero(seed: u64) -> GameState {
    let mut rng = rng_from_seed(seed);
    let round = GameState::create_round(&mut rng);
    round.choose_initial(door(0), &mut rng).expect("initial choice")
}

#[test]
fn initial_choice_moves_to_host_reveal() {
    for seed in 0..50 {
        let state = revealed_after_picking_zero(seed);
        assert_eq!(state.phase(), Phase::HostReveal);
        assert_eq!(state.initial_choice(), Some(door(0)));

        let open: Vec<_> = state.doors().iter().filter(|d| d.is_open).collect();
        assert_eq!(open.len(), 1);
        assert_ne!(open[0].id, door(0));
        assert!(!open[0].has_prize);
        assert_eq!(state.host_revealed_door(), Some(open[0].id));
        assert!(state.door(door(0)).is_selected);
    }
}

#[test]
fn staying_scores_the_first_pick() {
    for seed in 0..50 {
        let state = revealed_after_picking_zero(seed);
        let done = state.choose_final(door(0)).expect("final choice");
        assert_eq!(done.phase(), Phase::GameOver);
        assert_eq!(done.strategy(), Some(Strategy::Stay));
        assert_eq!(done.player_won(), Some(done.door(door(0)).has_prize));
    }
}

#[test]
fn switching_scores_the_remaining_closed_door() {
    for seed in 0..50 {
        let state = revealed_after_picking_zero(seed);
        let closed: Vec<_> = state
            .doors()
            .iter()
            .filter(|d| !d.is_open && d.id != door(0))
            .map(|d| d.id)
            .collect();
        assert_eq!(closed.len(), 1);
        assert_eq!(state.switch_target(), Some(closed[0]));

        let done = state.choose_final(closed[0]).expect("final choice");
        assert_eq!(done.strategy(), Some(Strategy::Switch));
        assert_eq!(done.player_won(), Some(done.door(closed[0]).has_prize));
    }
}

#[test]
fn initial_choice_rejected_outside_initial_phase() {
    let mut rng = rng_from_seed(4);
    let revealed = revealed_after_picking_zero(4);
    let err = revealed.choose_initial(door(1), &mut rng).unwrap_err();
    assert_eq!(
        err,
        GameError::InvalidPhase {
            operation: "make initial choice",
            expected: Phase::Initial,
            actual: Phase::HostReveal,
        }
    );

    let done = revealed.choose_final(door(0)).unwrap();
    assert!(matches!(
        done.choose_initial(door(1), &mut rng),
        Err(GameError::InvalidPhase {
            actual: Phase::GameOver,
            ..
        })
    ));
}

#[test]
fn final_choice_rejected_before_host_reveal() {
    let round = GameState::with_prize(door(1));
    assert!(matches!(
        round.choose_final(door(1)),
        Err(GameError::InvalidPhase {
            expected: Phase::HostReveal,
            actual: Phase::Initial,
            ..
        })
    ));
}

#[test]
fn result_requires_finished_round() {
    let revealed = revealed_after_picking_zero(8);
    let err = build_result(&revealed, "s", &mut UuidIds).unwrap_err();
    assert_eq!(err, GameError::IncompleteRound(Phase::HostReveal));
    assert!(err.to_string().contains("not complete"));
}

#[test]
fn transitions_leave_the_input_untouched() {
    let mut rng = rng_from_seed(30);
    let round = GameState::create_round(&mut rng);
    let snapshot = round.clone();
    let _ = round.choose_initial(door(2), &mut rng).unwrap();
    assert_eq!(round, snapshot);
}

#[test]
fn state_serializes_with_camel_case_keys() {
    let state = revealed_after_picking_zero(1);
    let json = serde_json::to_value(&state).unwrap();
    assert_eq!(json["phase"], "host-reveal");
    assert_eq!(json["initialChoice"], 0);
    assert!(json["finalChoice"].is_null());
    assert_eq!(json["doors"].as_array().map(|d| d.len()), Some(3));
    assert!(json["doors"][0].get("hasPrize").is_some());
}
