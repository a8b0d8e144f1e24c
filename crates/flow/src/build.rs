use crate::{ControlTree, Divergence, Node, NodeId, State};
use toroid_data_structures::{
    index::IndexVec,
    map::{FxHashSet, FxIndexSet},
    smallvec::SmallVec,
};
use toroid_grid::{Direction, Grid};
use toroid_interface::Pos;

/// Builds the control-flow tree of the program in `grid`.
///
/// The walk starts at [`State::ENTRY`]. Every state is expanded at most once; reaching an already
/// expanded state produces a [`Node::BackEdge`] and records the state as a destination. The number
/// of states is bounded by `4 * width * height * 2`, so this always terminates.
#[instrument(level = "debug", skip_all)]
pub fn build(grid: &Grid) -> ControlTree {
    let tree = TreeBuilder::new(grid).build();
    debug!(
        nodes = tree.nodes.len(),
        destinations = tree.destinations.len(),
        "built control-flow tree"
    );
    tree
}

/// What follows a state.
enum Transition {
    /// The program terminates.
    Halt,
    /// Execution continues in a single state.
    Step(State),
    /// Control splits; one state per exit direction, in up, down, left, right order.
    Diverge(SmallVec<[(Direction, State); 4]>),
}

/// Where the node built for a pending state is linked.
#[derive(Clone, Copy)]
enum Link {
    Root,
    Next(NodeId),
    Slot(NodeId, Direction),
}

struct TreeBuilder<'a> {
    grid: &'a Grid,
    nodes: IndexVec<NodeId, Node>,
    visited: FxHashSet<State>,
    destinations: FxIndexSet<State>,
}

impl<'a> TreeBuilder<'a> {
    fn new(grid: &'a Grid) -> Self {
        Self {
            grid,
            nodes: IndexVec::new(),
            visited: FxHashSet::default(),
            destinations: FxIndexSet::default(),
        }
    }

    /// Expands states depth-first with an explicit work stack.
    ///
    /// Continuations are pushed in reverse so that they are popped in up, down, left, right order,
    /// which visits states in the same preorder as a recursive expansion would.
    fn build(mut self) -> ControlTree {
        let mut root = None;
        let mut stack = vec![(State::ENTRY, Link::Root)];
        while let Some((state, link)) = stack.pop() {
            let id = self.expand(state, &mut stack);
            match link {
                Link::Root => root = Some(id),
                Link::Next(parent) => {
                    if let Node::Instruction { next, .. } = &mut self.nodes[parent] {
                        *next = Some(id);
                    }
                }
                Link::Slot(parent, direction) => {
                    if let Node::Divergence(divergence) = &mut self.nodes[parent] {
                        *divergence.slot_mut(direction) = Some(id);
                    }
                }
            }
        }
        trace!(visited = self.visited.len(), "expanded every reachable state");

        let Self { nodes, destinations, .. } = self;
        // The entry state is always expanded first.
        let root = root.unwrap_or(NodeId::new(0));
        ControlTree { nodes, root, destinations }
    }

    /// Creates the node for `state`, queueing its continuations on `stack`.
    fn expand(&mut self, state: State, stack: &mut Vec<(State, Link)>) -> NodeId {
        if !self.visited.insert(state) {
            self.destinations.insert(state);
            return self.nodes.push(Node::BackEdge(state));
        }

        let cell = self.grid.lookup(state.pos);
        let id = self.nodes.push(Node::Instruction { state, cell, next: None });
        match self.transition(state, cell) {
            Transition::Halt => {}
            Transition::Step(next) => stack.push((next, Link::Next(id))),
            Transition::Diverge(slots) => {
                let divergence = self.nodes.push(Node::Divergence(Divergence::default()));
                if let Node::Instruction { next, .. } = &mut self.nodes[id] {
                    *next = Some(divergence);
                }
                for &(direction, next) in slots.iter().rev() {
                    stack.push((next, Link::Slot(divergence, direction)));
                }
            }
        }
        id
    }

    /// Computes what follows `state`, whose cell holds `cell`.
    fn transition(&self, state: State, cell: char) -> Transition {
        if !state.string_mode && cell == '@' {
            return Transition::Halt;
        }
        let Some(direction) = state.direction else {
            unreachable!("only terminating states lose their direction: {state}");
        };

        if state.string_mode {
            return Transition::Step(self.advance(state.pos, direction, cell != '"'));
        }
        match cell {
            '"' => Transition::Step(self.advance(state.pos, direction, true)),
            '_' => self.diverge(state.pos, &[Direction::Left, Direction::Right]),
            '|' => self.diverge(state.pos, &[Direction::Up, Direction::Down]),
            '?' => self.diverge(state.pos, &Direction::ALL),
            '#' => {
                let (skipped, _) = self.grid.step(state.pos, direction);
                Transition::Step(self.advance(skipped, direction, false))
            }
            _ => {
                let direction = Direction::from_glyph(cell).unwrap_or(direction);
                Transition::Step(self.advance(state.pos, direction, false))
            }
        }
    }

    fn diverge(&self, pos: Pos, directions: &[Direction]) -> Transition {
        Transition::Diverge(
            directions.iter().map(|&d| (d, self.advance(pos, d, false))).collect(),
        )
    }

    /// Moves one cell from `pos` in `direction`.
    ///
    /// Outside of string mode, a state about to terminate forgets its direction so that every
    /// path into the same `@` shares one state.
    fn advance(&self, pos: Pos, direction: Direction, string_mode: bool) -> State {
        let (pos, cell) = self.grid.step(pos, direction);
        let direction = (string_mode || cell != '@').then_some(direction);
        State::new(direction, pos, string_mode)
    }
}

#[cfg(test)]
mod tests;
