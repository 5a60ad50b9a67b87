//! Property tests for the puzzle grid under arbitrary play.

use arcade_games::prelude::*;
use arcade_games::puzzle::GRID_HEIGHT;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Action {
    Left,
    Right,
    Rotate,
    HardDrop,
    Wait(u16),
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::Left),
        Just(Action::Right),
        Just(Action::Rotate),
        Just(Action::HardDrop),
        (1u16..1200).prop_map(Action::Wait),
    ]
}

fn tap(game: &mut Puzzle, harness: &mut GameHarness, key: Key) {
    let mut ctx = harness.context();
    game.handle_input(&mut ctx, &key, true);
    game.handle_input(&mut ctx, &key, false);
}

proptest! {
    #[test]
    fn grid_accounting_holds(seed in any::<u64>(), actions in prop::collection::vec(action(), 1..120)) {
        let config = EngineConfig { seed, ..Default::default() };
        let mut harness = GameHarness::new(config);
        let mut game = Puzzle::new(&mut harness.context());

        for action in actions {
            match action {
                Action::Left => tap(&mut game, &mut harness, Key::ArrowLeft),
                Action::Right => tap(&mut game, &mut harness, Key::ArrowRight),
                Action::Rotate => tap(&mut game, &mut harness, Key::ArrowUp),
                Action::HardDrop => tap(&mut game, &mut harness, Key::Space),
                Action::Wait(ms) => {
                    if harness.state() == LoopState::Running {
                        game.update(&mut harness.context(), f64::from(ms));
                    }
                }
            }

            prop_assert_eq!(game.grid().len(), GRID_HEIGHT);
            let expected = 4 * game.pieces_locked() as usize - 10 * game.lines() as usize;
            prop_assert_eq!(game.filled_cells(), expected);
            prop_assert_eq!(game.level(), game.lines() / 10 + 1);

            if harness.state() == LoopState::Running {
                let piece = game.current().unwrap();
                prop_assert!(game.can_place(piece, piece.x, piece.y));
            }
        }
    }

    #[test]
    fn four_rotations_are_identity(seed in any::<u64>()) {
        let config = EngineConfig { seed, ..Default::default() };
        let mut harness = GameHarness::new(config);
        let game = Puzzle::new(&mut harness.context());
        let piece = game.current().unwrap().clone();
        let turned = piece.rotated().rotated().rotated().rotated();
        prop_assert_eq!(turned, piece);
    }
}
