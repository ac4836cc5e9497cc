//! Benchmarks for rule-tree evaluation.
//!
//! - Legal-move generation on an opening position
//! - End-condition checks with and without constant folding
//! - Full random playouts

use criterion::{criterion_group, criterion_main, Criterion};
use ludeme_engine::games::{dice_race, tic_tac_toe};
use ludeme_engine::{optimise_game, PlayoutConfig, RulesEngine};
use std::hint::black_box;

/// Move generation for the empty tic-tac-toe board.
fn bench_legal_moves_opening(c: &mut Criterion) {
    let game = tic_tac_toe().unwrap();
    let mut ctx = game.new_context(0);

    c.bench_function("legal_moves_opening", |b| {
        b.iter(|| black_box(game.legal_moves(black_box(&mut ctx))));
    });
}

/// End-condition check on a half-filled board, before folding.
fn bench_terminal_unfolded(c: &mut Criterion) {
    let game = tic_tac_toe().unwrap();
    let mut ctx = game.new_context(0);
    for mv in game.playout(&PlayoutConfig::default().with_max_moves(4)).moves {
        game.apply_move(&mut ctx, &mv);
    }

    c.bench_function("terminal_unfolded", |b| {
        b.iter(|| black_box(game.is_terminal(black_box(&mut ctx))));
    });
}

/// Same check after the line length has been folded to a literal.
fn bench_terminal_folded(c: &mut Criterion) {
    let mut game = tic_tac_toe().unwrap();
    optimise_game(&mut game);
    let mut ctx = game.new_context(0);
    for mv in game.playout(&PlayoutConfig::default().with_max_moves(4)).moves {
        game.apply_move(&mut ctx, &mv);
    }

    c.bench_function("terminal_folded", |b| {
        b.iter(|| black_box(game.is_terminal(black_box(&mut ctx))));
    });
}

/// One complete tic-tac-toe playout.
fn bench_playout_tic_tac_toe(c: &mut Criterion) {
    let game = tic_tac_toe().unwrap();
    let config = PlayoutConfig::default();

    c.bench_function("playout_tic_tac_toe", |b| {
        b.iter(|| black_box(game.playout(black_box(&config))));
    });
}

/// One dice-race playout, capped at 200 moves.
fn bench_playout_dice_race(c: &mut Criterion) {
    let game = dice_race().unwrap();
    let config = PlayoutConfig::default().with_max_moves(200);

    c.bench_function("playout_dice_race", |b| {
        b.iter(|| black_box(game.playout(black_box(&config))));
    });
}

criterion_group!(
    benches,
    bench_legal_moves_opening,
    bench_terminal_unfolded,
    bench_terminal_folded,
    bench_playout_tic_tac_toe,
    bench_playout_dice_race,
);
criterion_main!(benches);
