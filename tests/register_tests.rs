//! Register hygiene tests.
//!
//! Every node that binds a register must hand the context back with the
//! caller's register values intact, whatever the board looks like and
//! whatever was bound before, including when iteration stops early.

use std::sync::Arc;

use ludeme_engine::context::{Context, Register};
use ludeme_engine::core::{GameMetadata, PlayerId};
use ludeme_engine::ludeme::{
    BooleanFunction, Function, IntArrayFunction, IntFunction, Ludeme, MovesFunction, RegionFunction,
};
use proptest::prelude::*;

/// A rule node of any family, evaluated for its side effects only.
enum Node {
    Boolean(BooleanFunction),
    Int(IntFunction),
    Region(RegionFunction),
    Moves(MovesFunction),
}

impl Node {
    fn as_ludeme(&self) -> &dyn Ludeme {
        match self {
            Node::Boolean(n) => n,
            Node::Int(n) => n,
            Node::Region(n) => n,
            Node::Moves(n) => n,
        }
    }

    fn eval(&self, ctx: &mut Context) {
        match self {
            Node::Boolean(n) => {
                n.eval(ctx);
            }
            Node::Int(n) => {
                n.eval(ctx);
            }
            Node::Region(n) => {
                n.eval(ctx);
            }
            Node::Moves(n) => {
                n.eval(ctx);
            }
        }
    }
}

fn metadata() -> Arc<GameMetadata> {
    Arc::new(
        GameMetadata::builder("Hygiene", 2)
            .board(3, 3)
            .component_per_player("Disc")
            .track("Main", (0..9).collect(), None)
            .region("Corners", vec![0, 2, 6, 8], None)
            .hint(vec![0, 1, 2], 3)
            .with_stacking()
            .build()
            .unwrap(),
    )
}

/// Every register-binding node, each with a condition that can stop
/// iteration early.
fn catalogue() -> Vec<Node> {
    let friend = |site: IntFunction| BooleanFunction::is_friend(site);
    vec![
        Node::Boolean(BooleanFunction::exists(RegionFunction::all(), friend(IntFunction::site()))),
        Node::Boolean(BooleanFunction::for_all(
            RegionFunction::all(),
            BooleanFunction::is_empty(IntFunction::site()),
        )),
        Node::Boolean(BooleanFunction::destination(IntFunction::constant(4), friend(IntFunction::to()))),
        Node::Boolean(BooleanFunction::all_between(
            IntFunction::constant(0),
            IntFunction::constant(8),
            BooleanFunction::is_empty(IntFunction::register(Register::Between)),
        )),
        Node::Boolean(BooleanFunction::any_level(
            IntFunction::constant(4),
            BooleanFunction::ge(IntFunction::register(Register::Level), IntFunction::constant(1)),
        )),
        Node::Boolean(BooleanFunction::all_hints(BooleanFunction::eq(
            IntFunction::count_in(RegionFunction::hint_region()),
            IntFunction::hint_value(),
        ))),
        Node::Boolean(BooleanFunction::any_value(
            IntArrayFunction::constant([1, 2, 3]),
            BooleanFunction::eq(IntFunction::register(Register::Value), IntFunction::mover()),
        )),
        Node::Boolean(BooleanFunction::any_region(BooleanFunction::exists(
            RegionFunction::current(),
            friend(IntFunction::site()),
        ))),
        Node::Boolean(BooleanFunction::any_edge(
            IntFunction::constant(4),
            friend(IntFunction::register(Register::Edge)),
        )),
        Node::Int(IntFunction::sum(RegionFunction::all(), IntFunction::who(IntFunction::site()))),
        Node::Int(IntFunction::sum_players(IntFunction::score(IntFunction::register(
            Register::Player,
        )))),
        Node::Region(RegionFunction::filter(
            RegionFunction::all(),
            BooleanFunction::is_enemy(IntFunction::site()),
        )),
        Node::Moves(MovesFunction::add(RegionFunction::empty(), None, None)),
        Node::Moves(MovesFunction::step(RegionFunction::occupied(IntFunction::mover()), None, None)),
        Node::Moves(MovesFunction::track_step("Main", IntFunction::constant(2))),
    ]
}

#[test]
fn test_catalogue_writes_registers() {
    let game = metadata();
    for node in catalogue() {
        let ludeme = node.as_ludeme();
        ludeme.preprocess(&game);
        assert!(
            !ludeme.writes_effects().is_empty(),
            "`{}` should bind a register",
            ludeme.name()
        );
    }
}

proptest! {
    #[test]
    fn test_registers_restored(
        seed in any::<u64>(),
        bound in prop::collection::vec(-1i32..9, Register::COUNT),
        board in prop::collection::vec(0i32..3, 9),
        mover in 0u8..2,
    ) {
        let game = metadata();
        let nodes = catalogue();
        for node in &nodes {
            node.as_ludeme().preprocess(&game);
        }

        let mut ctx = Context::new(Arc::clone(&game), seed);
        for (site, &who) in board.iter().enumerate() {
            if who > 0 {
                ctx.state_mut().place(site as i32, who, who, 1);
            }
        }
        ctx.state_mut().set_mover(PlayerId::new(mover));
        for (&register, &value) in Register::ALL.iter().zip(&bound) {
            ctx.set(register, value);
        }

        let before = ctx.registers();
        for node in &nodes {
            node.eval(&mut ctx);
            prop_assert_eq!(ctx.registers(), before, "`{}` leaked a register", node.as_ludeme().name());
        }
    }
}

/// A condition that holds on the first destination still restores `to`.
#[test]
fn test_early_exit_restores() {
    let game = metadata();
    let mut ctx = Context::new(Arc::clone(&game), 0);
    ctx.state_mut().place(0, 1, 1, 1);
    ctx.set(Register::Site, 7);

    let found = BooleanFunction::exists(RegionFunction::all(), BooleanFunction::is_friend(IntFunction::site()));
    found.preprocess(&game);

    assert!(found.eval(&mut ctx));
    assert_eq!(ctx.get(Register::Site), 7);
}

/// Nested scopes on the same register unwind in order.
#[test]
fn test_nested_scopes_unwind() {
    let game = metadata();
    let mut ctx = Context::new(Arc::clone(&game), 0);
    ctx.set(Register::Site, 5);

    let inner = BooleanFunction::exists(
        RegionFunction::sites([1, 2]),
        BooleanFunction::not(BooleanFunction::is_empty(IntFunction::site())),
    );
    let outer = BooleanFunction::for_all(RegionFunction::sites([3, 4]), BooleanFunction::not(inner));
    outer.preprocess(&game);

    assert!(outer.eval(&mut ctx));
    assert_eq!(ctx.get(Register::Site), 5);
}
