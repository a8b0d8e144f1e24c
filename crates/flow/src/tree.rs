use crate::State;
use std::fmt;
use toroid_data_structures::{
    index::IndexVec,
    map::FxIndexSet,
    newtype_index,
};
use toroid_grid::Direction;

newtype_index! {
    /// A node in a [`ControlTree`].
    pub struct NodeId;
}

/// A node of the control-flow tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// A single step of the instruction pointer.
    Instruction {
        state: State,
        /// The character at the state's position.
        cell: char,
        /// What executes next, or `None` if this instruction terminates the program.
        next: Option<NodeId>,
    },
    /// Control splits; each populated slot is the continuation for that exit direction.
    Divergence(Divergence),
    /// A reference to a state that was already expanded elsewhere in the tree.
    BackEdge(State),
}

/// The continuations of a branching instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Divergence {
    pub up: Option<NodeId>,
    pub down: Option<NodeId>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl Divergence {
    /// Returns the continuation for `direction`.
    #[inline]
    pub fn get(&self, direction: Direction) -> Option<NodeId> {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn slot_mut(&mut self, direction: Direction) -> &mut Option<NodeId> {
        match direction {
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }

    /// Iterates over the populated slots in up, down, left, right order.
    pub fn slots(&self) -> impl DoubleEndedIterator<Item = (Direction, NodeId)> + '_ {
        Direction::ALL.into_iter().filter_map(move |d| self.get(d).map(|node| (d, node)))
    }
}

/// The finite, loop-free unfolding of a program's control flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlTree {
    pub(crate) nodes: IndexVec<NodeId, Node>,
    pub(crate) root: NodeId,
    pub(crate) destinations: FxIndexSet<State>,
}

impl ControlTree {
    /// Returns the node executed first.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the node with the given ID.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Returns every node in the tree, in the order they were created.
    #[inline]
    pub fn nodes(&self) -> &IndexVec<NodeId, Node> {
        &self.nodes
    }

    /// Returns the states reached by more than one control path, in the order they were first
    /// revisited.
    #[inline]
    pub fn destinations(&self) -> &FxIndexSet<State> {
        &self.destinations
    }

    /// Returns `true` if `state` is reached by more than one control path.
    #[inline]
    pub fn is_destination(&self, state: &State) -> bool {
        self.destinations.contains(state)
    }

    /// Consumes the tree, returning the node arena, the root, and the destination set.
    pub fn into_parts(self) -> (IndexVec<NodeId, Node>, NodeId, FxIndexSet<State>) {
        (self.nodes, self.root, self.destinations)
    }
}

/// Dumps the tree with one line per node.
///
/// Straight-line continuations stay at the same indentation, divergence slots are indented under a
/// `{direction}:` header, destinations are marked with `*`, and back-edges print as `-> {state}`.
impl fmt::Display for ControlTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        enum Item {
            Node(NodeId, usize),
            Slot(Direction, usize),
        }

        let mut stack = vec![Item::Node(self.root, 0)];
        while let Some(item) = stack.pop() {
            let (id, depth) = match item {
                Item::Node(id, depth) => (id, depth),
                Item::Slot(direction, depth) => {
                    writeln!(f, "{:indent$}{direction}:", "", indent = depth * 2)?;
                    continue;
                }
            };
            let indent = depth * 2;
            match &self.nodes[id] {
                Node::Instruction { state, cell, next } => {
                    write!(f, "{:indent$}{state} {cell:?}", "")?;
                    if self.is_destination(state) {
                        f.write_str(" *")?;
                    }
                    f.write_str("\n")?;
                    if let Some(next) = *next {
                        stack.push(Item::Node(next, depth));
                    }
                }
                Node::Divergence(divergence) => {
                    for (direction, child) in divergence.slots().rev() {
                        stack.push(Item::Node(child, depth + 1));
                        stack.push(Item::Slot(direction, depth));
                    }
                }
                Node::BackEdge(state) => writeln!(f, "{:indent$}-> {state}", "")?,
            }
        }
        Ok(())
    }
}
