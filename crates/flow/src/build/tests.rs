use super::*;
use std::num::NonZeroUsize;
use toroid_config::GridSize;

fn grid(height: usize, width: usize, src: &str) -> Grid {
    let size = GridSize::new(NonZeroUsize::new(height).unwrap(), NonZeroUsize::new(width).unwrap());
    Grid::new(src, size)
}

fn state(direction: Option<Direction>, x: usize, y: usize, string_mode: bool) -> State {
    State::new(direction, Pos::new(x, y), string_mode)
}

/// Follows the straight-line chain of instructions starting at the root.
fn chain(tree: &ControlTree) -> Vec<(State, char)> {
    let mut out = Vec::new();
    let mut next = Some(tree.root());
    while let Some(id) = next {
        next = None;
        if let Node::Instruction { state, cell, next: n } = tree.node(id) {
            out.push((*state, *cell));
            next = *n;
        }
    }
    out
}

fn back_edges(tree: &ControlTree) -> Vec<State> {
    tree.nodes()
        .iter()
        .filter_map(|node| match node {
            Node::BackEdge(state) => Some(*state),
            _ => None,
        })
        .collect()
}

#[test]
fn straight_line() {
    let tree = build(&grid(1, 5, "52*,@"));
    let cells = chain(&tree).into_iter().map(|(_, c)| c).collect::<String>();
    assert_eq!(cells, "52*,@");
    assert!(tree.destinations().is_empty());
    assert_eq!(tree.nodes().len(), 5);

    let (last, _) = *chain(&tree).last().unwrap();
    assert_eq!(last, state(None, 4, 0, false));
}

#[test]
fn entry_is_root() {
    let tree = build(&grid(1, 1, "@"));
    assert_eq!(tree.root(), NodeId::new(0));
    assert_eq!(
        *tree.node(tree.root()),
        Node::Instruction { state: State::ENTRY, cell: '@', next: None }
    );
}

#[test]
fn blank_row_loops_back_to_entry() {
    let tree = build(&grid(1, 2, ""));
    assert_eq!(chain(&tree).len(), 2);
    assert_eq!(back_edges(&tree), [State::ENTRY]);
    assert!(tree.destinations().iter().eq([&State::ENTRY]));
}

#[test]
fn turning_loop() {
    use Direction::*;

    // (0,0) `>` heads right into `v`, which heads down into `<`, left into `^`, and up into the
    // `>` again, this time arriving from below.
    let tree = build(&grid(2, 2, ">v\n^<"));
    let states = chain(&tree).into_iter().map(|(s, _)| s).collect::<Vec<_>>();
    assert_eq!(
        states,
        [
            State::ENTRY,
            state(Some(Right), 1, 0, false),
            state(Some(Down), 1, 1, false),
            state(Some(Left), 0, 1, false),
            state(Some(Up), 0, 0, false),
        ]
    );
    assert_eq!(back_edges(&tree), [state(Some(Right), 1, 0, false)]);
}

#[test]
fn wraps_around_every_edge() {
    use Direction::*;

    // Up off the top, left off the left edge, down off the bottom, and right off the right edge
    // back into the entry cell.
    let tree = build(&grid(3, 3, "^ >\n   \n< v"));
    let states = chain(&tree).into_iter().map(|(s, _)| s).collect::<Vec<_>>();
    assert_eq!(
        states,
        [
            State::ENTRY,
            state(Some(Up), 0, 2, false),
            state(Some(Left), 2, 2, false),
            state(Some(Down), 2, 0, false),
        ]
    );
    assert_eq!(back_edges(&tree), [State::ENTRY]);
}

#[test]
fn string_mode() {
    let tree = build(&grid(1, 4, "\"a\"@"));
    let chain = chain(&tree);
    let modes = chain.iter().map(|(s, c)| (*c, s.string_mode)).collect::<Vec<_>>();
    assert_eq!(modes, [('"', false), ('a', true), ('"', true), ('@', false)]);
    assert_eq!(chain.last().unwrap().0.direction, None);
}

#[test]
fn at_sign_is_literal_in_string_mode() {
    let tree = build(&grid(1, 4, "\"@\"@"));
    let chain = chain(&tree);
    assert_eq!(chain.len(), 4);
    assert_eq!(chain[1].0, state(Some(Direction::Right), 1, 0, true));
    assert_eq!(chain[3].0, state(None, 3, 0, false));
}

#[test]
fn bridge_skips_a_cell() {
    let tree = build(&grid(1, 4, "#p1@"));
    let cells = chain(&tree).into_iter().map(|(_, c)| c).collect::<String>();
    assert_eq!(cells, "#1@");
}

#[test]
fn horizontal_divergence() {
    let tree = build(&grid(1, 3, "_ @"));
    let Node::Instruction { next: Some(next), .. } = tree.node(tree.root()) else {
        panic!("root is not an instruction");
    };
    let Node::Divergence(divergence) = tree.node(*next) else { panic!("expected a divergence") };
    assert_eq!(divergence.up, None);
    assert_eq!(divergence.down, None);
    let slots = divergence.slots().map(|(d, _)| d).collect::<Vec<_>>();
    assert_eq!(slots, [Direction::Left, Direction::Right]);

    // Both sides reach the `@` at (2,0); approaching from different directions still yields one
    // shared state.
    let halt = state(None, 2, 0, false);
    assert!(tree.destinations().iter().eq([&halt]));
    assert_eq!(back_edges(&tree), [halt]);
}

#[test]
fn vertical_divergence() {
    let tree = build(&grid(3, 1, "|\n@\n@"));
    let Node::Instruction { next: Some(next), .. } = tree.node(tree.root()) else {
        panic!("root is not an instruction");
    };
    let Node::Divergence(divergence) = tree.node(*next) else { panic!("expected a divergence") };
    let slots = divergence.slots().map(|(d, _)| d).collect::<Vec<_>>();
    assert_eq!(slots, [Direction::Up, Direction::Down]);
    // Up wraps to the bottom row.
    let Node::Instruction { state: up, .. } = tree.node(divergence.up.unwrap()) else {
        panic!("expected an instruction")
    };
    assert_eq!(up.pos, Pos::new(0, 2));
    assert!(tree.destinations().is_empty());
}

#[test]
fn random_divergence_order() {
    use Direction::*;

    // Every exit of a lone `?` lands back on itself.
    let tree = build(&grid(1, 1, "?"));
    let dests = tree.destinations().iter().map(|s| s.direction).collect::<Vec<_>>();
    assert_eq!(dests, [Some(Up), Some(Down), Some(Left), Some(Right)]);
    assert_eq!(tree.destinations().len(), 4);
}

#[test]
fn back_edges_are_destinations() {
    let sources = [
        "v  <\n>?#^\n_ |@\n\"!\"@",
        ">25*\"!dlroW ,olleH\":v\n                 v:,_@\n                 >  ^",
        "1>:1+:9`#@_\n ^       <",
        "?",
        "",
    ];
    for src in sources {
        let grid = grid(4, 24, src);
        let tree = build(&grid);
        let back_edges = back_edges(&tree);
        for state in &back_edges {
            assert!(tree.is_destination(state), "{state} in {src:?}");
        }
        for dest in tree.destinations() {
            assert!(back_edges.contains(dest), "{dest} in {src:?}");
        }
        let bound = 4 * grid.width() * grid.height() * 2;
        assert!(tree.destinations().len() <= bound);
        let instructions =
            tree.nodes().iter().filter(|n| matches!(n, Node::Instruction { .. })).count();
        assert!(instructions <= bound);
    }
}

#[test]
fn idempotent() {
    let grid = grid(3, 12, ">1?2v\n^ _3<\n^.:@|");
    let a = build(&grid);
    let b = build(&grid);
    assert_eq!(a, b);
    assert!(a.destinations().iter().eq(b.destinations().iter()));
    assert_eq!(a.to_string(), b.to_string());
}

#[test]
fn long_row_does_not_overflow_the_stack() {
    let width = 200_000;
    let tree = build(&grid(1, width, ""));
    assert_eq!(tree.nodes().len(), width + 1);
    assert_eq!(tree.to_string().lines().count(), width + 1);
}

#[test]
fn dump() {
    let tree = build(&grid(1, 3, "_ @"));
    let expected = "\
right_0_0 '_'
left:
  any_2_0 '@' *
right:
  right_1_0 ' '
  -> any_2_0
";
    assert_eq!(tree.to_string(), expected);
}
