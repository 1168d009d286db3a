//! Door, outcome and statistics formatters for terminal display.
//!
//! Doors are shown 1-based, the way players type them.

use montyhall_engine::door::{Door, DoorId};
use montyhall_engine::game::GameState;
use montyhall_engine::stats::Statistics;

pub fn door_label(id: DoorId) -> usize {
    id.index() + 1
}

/// `[1]` for a closed door, `[2*]` when selected, `[3:goat]` / `[3:car]` once open.
pub fn format_door(door: &Door) -> String {
    let mark = if door.is_selected { "*" } else { "" };
    if door.is_open {
        let content = if door.has_prize { "car" } else { "goat" };
        format!("[{}{}:{}]", door_label(door.id), mark, content)
    } else {
        format!("[{}{}]", door_label(door.id), mark)
    }
}

pub fn format_doors(state: &GameState) -> String {
    state
        .doors()
        .iter()
        .map(format_door)
        .collect::<Vec<_>>()
        .join(" ")
}

/// One-line summary of a finished round.
pub fn format_outcome(state: &GameState) -> String {
    let verdict = match state.player_won() {
        Some(true) => "WIN",
        Some(false) => "LOSE",
        None => "IN PROGRESS",
    };
    match (state.final_choice(), state.strategy()) {
        (Some(door), Some(strategy)) => format!(
            "{}: door {} ({}), car behind door {}",
            verdict,
            door_label(door),
            strategy,
            door_label(state.prize_door())
        ),
        _ => verdict.to_string(),
    }
}

/// `wins/total (pct%)` with the half-up whole percentage.
pub fn format_record(wins: u64, total: u64, pct: u64) -> String {
    format!("{}/{} ({}%)", wins, total, pct)
}

pub fn format_stats_summary(stats: &Statistics) -> Vec<String> {
    vec![
        format!("Games: {}", stats.total_games),
        format!(
            "Stay: {}",
            format_record(stats.stay_wins, stats.stay_total, stats.stay_win_percentage())
        ),
        format!(
            "Switch: {}",
            format_record(
                stats.switch_wins,
                stats.switch_total,
                stats.switch_win_percentage()
            )
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use montyhall_engine::rng::rng_from_seed;

    #[test]
    fn closed_and_open_doors() {
        let mut door = Door::closed(DoorId::ALL[0], false);
        assert_eq!(format_door(&door), "[1]");
        door.is_open = true;
        assert_eq!(format_door(&door), "[1:goat]");
        door.is_selected = true;
        door.has_prize = true;
        assert_eq!(format_door(&door), "[1*:car]");
    }

    #[test]
    fn outcome_names_strategy_and_prize() {
        let mut rng = rng_from_seed(1);
        let done = GameState::with_prize(DoorId::ALL[2])
            .choose_initial(DoorId::ALL[0], &mut rng)
            .unwrap()
            .choose_final(DoorId::ALL[2])
            .unwrap();
        assert_eq!(
            format_outcome(&done),
            "WIN: door 3 (switch), car behind door 3"
        );
    }

    #[test]
    fn summary_uses_rounded_percentages() {
        let mut stats = Statistics::new();
        stats.record(montyhall_engine::game::Strategy::Stay, true);
        stats.record(montyhall_engine::game::Strategy::Stay, false);
        stats.record(montyhall_engine::game::Strategy::Stay, false);
        let lines = format_stats_summary(&stats);
        assert_eq!(lines[1], "Stay: 1/3 (33%)");
        assert_eq!(lines[2], "Switch: 0/0 (0%)");
    }
}
