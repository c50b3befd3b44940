use proptest::prelude::*;
use scoreboard_terminal::error::MatchError;
use scoreboard_terminal::futsal::{DEFAULT_PERIOD_SECS, Futsal};
use scoreboard_terminal::history::MAX_HISTORY;
use scoreboard_terminal::notify::Notifier;
use scoreboard_terminal::persist::MemoryStore;
use scoreboard_terminal::score::Team;
use scoreboard_terminal::volleyball::{Volleyball, VolleyballState};

#[derive(Debug, Clone, Copy)]
enum Op {
    Add(Team),
    Remove(Team),
}

fn team() -> impl Strategy<Value = Team> {
    prop_oneof![Just(Team::A), Just(Team::B)]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => team().prop_map(Op::Add),
        1 => team().prop_map(Op::Remove),
    ]
}

fn new_volleyball() -> Volleyball {
    let (notifier, _rx) = Notifier::channel();
    Volleyball::load(Box::new(MemoryStore::new()), notifier)
}

fn new_futsal() -> Futsal {
    let (notifier, _rx) = Notifier::channel();
    Futsal::load(Box::new(MemoryStore::new()), notifier, DEFAULT_PERIOD_SECS)
}

proptest! {
    #[test]
    fn undo_walks_back_through_the_last_fifty_states(ops in prop::collection::vec(op(), 0..120)) {
        let mut game = new_volleyball();
        let mut before: Vec<VolleyballState> = Vec::new();

        for op in ops {
            let snapshot = *game.state();
            match op {
                Op::Add(team) => {
                    before.push(snapshot);
                    game.add_point(team);
                }
                Op::Remove(team) => {
                    if snapshot.scores[team] > 0 {
                        before.push(snapshot);
                    }
                    game.rem_point(team);
                }
            }
        }

        let undoable = before.len().min(MAX_HISTORY);
        prop_assert_eq!(game.undo_depth(), undoable);
        for expected in before.iter().rev().take(undoable) {
            prop_assert!(game.undo().is_ok());
            prop_assert_eq!(game.state(), expected);
        }
        prop_assert_eq!(game.undo(), Err(MatchError::NothingToUndo));
    }

    #[test]
    fn goals_match_a_saturating_model(ops in prop::collection::vec(op(), 0..200)) {
        let mut game = new_futsal();
        let mut model = [0u32; 2];

        for op in ops {
            match op {
                Op::Add(team) => {
                    game.add_goal(team);
                    model[team as usize] += 1;
                }
                Op::Remove(team) => {
                    game.rem_goal(team);
                    model[team as usize] = model[team as usize].saturating_sub(1);
                }
            }
            prop_assert_eq!(game.scores().a, model[0]);
            prop_assert_eq!(game.scores().b, model[1]);
        }
    }
}

#[test]
fn only_the_last_fifty_points_can_be_undone() {
    let mut game = new_volleyball();
    for _ in 0..60 {
        game.add_point(Team::A);
        game.add_point(Team::B);
    }
    assert_eq!(game.undo_depth(), MAX_HISTORY);

    for _ in 0..MAX_HISTORY {
        game.undo().expect("within history");
    }
    assert_eq!(game.undo(), Err(MatchError::NothingToUndo));
    // 120 points scored, 50 undone.
    assert_eq!(game.state().scores.total(), 70);
}
