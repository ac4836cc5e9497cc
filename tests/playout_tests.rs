//! Playout and N-player tests.
//!
//! All chance flows from the context's seeded RNG, so a playout is a pure
//! function of the game and the seed. Nothing assumes two players.

use ludeme_engine::core::{GameMetadata, PlayerId};
use ludeme_engine::games::{dice_race, tic_tac_toe};
use ludeme_engine::ludeme::{BooleanFunction, IntFunction, MovesFunction, RegionFunction};
use ludeme_engine::rules::{playout, Game, GameResult, Outcome, PlayoutConfig, Rules, RulesEngine};

#[test]
fn test_same_seed_same_record() {
    let game = dice_race().unwrap();
    for seed in 0..50 {
        let config = PlayoutConfig::default().with_seed(seed).with_max_moves(200);
        assert_eq!(game.playout(&config), game.playout(&config));
    }
}

#[test]
fn test_seeds_differ() {
    let game = dice_race().unwrap();
    let records: Vec<_> = (0..20)
        .map(|seed| game.playout(&PlayoutConfig::default().with_seed(seed).with_max_moves(200)))
        .collect();
    assert!(records.iter().any(|r| r != &records[0]));
}

/// Replaying from a snapshot of a forked context repeats the continuation.
#[test]
fn test_fork_replays_from_snapshot() {
    let game = dice_race().unwrap();
    let mut ctx = game.new_context(17);
    let opening = playout(&game, &mut ctx, 6);
    assert_eq!(opening.len(), 6);

    let mut fork = ctx.fork();
    assert_eq!(fork.trial(), ctx.trial());
    let snapshot = fork.snapshot_state();
    let first = playout(&game, &mut fork, 100);
    fork.restore_state(snapshot);
    assert_eq!(playout(&game, &mut fork, 100), first);
}

/// A snapshot restores the position and the move history.
#[test]
fn test_snapshot_restore() {
    let game = tic_tac_toe().unwrap();
    let mut ctx = game.new_context(2);
    let snapshot = ctx.snapshot_state();

    playout(&game, &mut ctx, 9);
    assert!(!ctx.trial().is_empty());

    ctx.restore_state(snapshot);
    assert!(ctx.trial().is_empty());
    assert_eq!(game.legal_moves(&mut ctx).len(), 9);
}

/// Placement on a 4x4 board for any number of players; a full board ends it.
fn crowded(player_count: usize) -> Game {
    let meta = GameMetadata::builder("Crowded", player_count)
        .board(4, 4)
        .component_per_player("Stone")
        .build()
        .unwrap();
    let rules = Rules::new(MovesFunction::add(RegionFunction::empty(), None, None)).end(
        BooleanFunction::is_line(IntFunction::constant(4), None),
        Outcome::MoverLoses,
    );
    Game::compile(meta, rules).unwrap()
}

#[test]
fn test_n_player_turn_order() {
    for player_count in 1..=6 {
        let game = crowded(player_count);
        let record = game.playout(&PlayoutConfig::default().with_seed(player_count as u64));
        for (i, mv) in record.moves.iter().enumerate() {
            assert_eq!(mv.mover, PlayerId::new((i % player_count) as u8));
            assert_eq!(mv.what, mv.mover.number());
        }
        assert!(record.result.is_some());
    }
}

#[test]
fn test_n_player_results_name_real_players() {
    for player_count in 2..=5 {
        let game = crowded(player_count);
        for seed in 0..30 {
            let record = game.playout(&PlayoutConfig::default().with_seed(seed));
            match record.result {
                Some(GameResult::Winner(p)) => assert!(p.index() < player_count),
                Some(GameResult::Winners(ps)) => {
                    assert_eq!(ps.len(), player_count - 1);
                    assert!(ps.iter().all(|p| p.index() < player_count));
                }
                Some(GameResult::Draw) => {}
                None => panic!("placement on sixteen sites always ends"),
            }
        }
    }
}
