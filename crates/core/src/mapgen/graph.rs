//! Randomised branching BFS over room-grid cells.
//!
//! The origin claims all four neighbours up front. Every later expansion
//! rolls against the branch policy; a success claims one free neighbour and
//! re-queues the parent so it may branch again, a failure retires it as an
//! end room. Draw order is part of the contract: the same seed always yields
//! the same graph.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::rng::DungeonRng;
use crate::types::{Connections, Direction, GridPos};

use super::progression::BranchPolicy;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomGraphNode {
    pub grid_pos: GridPos,
    pub depth: u32,
    pub connections: Connections,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoomGraph {
    depths: BTreeMap<GridPos, u32>,
    connections: BTreeMap<GridPos, Vec<GridPos>>,
    end_rooms: Vec<GridPos>,
}

impl RoomGraph {
    pub fn generate(max_depth: u32, policy: BranchPolicy, rng: &mut DungeonRng) -> Self {
        let mut graph = Self::default();
        let mut queue = VecDeque::new();

        graph.claim(GridPos::ORIGIN, 0);
        for direction in Direction::ALL {
            let neighbour = GridPos::ORIGIN.step(direction);
            graph.claim(neighbour, 1);
            graph.link(GridPos::ORIGIN, neighbour);
            queue.push_back((neighbour, 1));
        }

        while let Some((pos, depth)) = queue.pop_front() {
            if depth > max_depth {
                continue;
            }

            let available: Vec<Direction> = Direction::ALL
                .into_iter()
                .filter(|&direction| !graph.depths.contains_key(&pos.step(direction)))
                .collect();
            if available.is_empty() {
                graph.end_rooms.push(pos);
                continue;
            }

            if rng.unit() < policy.chance(depth) {
                let direction = available[rng.below(available.len())];
                let child = pos.step(direction);
                graph.claim(child, depth + 1);
                graph.link(pos, child);
                queue.push_back((child, depth + 1));
                queue.push_back((pos, depth));
            } else {
                graph.end_rooms.push(pos);
            }
        }

        log::debug!(
            "room graph: {} rooms, {} end rooms, max depth {max_depth}",
            graph.depths.len(),
            graph.end_rooms.len()
        );
        graph
    }

    fn claim(&mut self, pos: GridPos, depth: u32) {
        self.depths.insert(pos, depth);
        self.connections.entry(pos).or_default();
    }

    fn link(&mut self, a: GridPos, b: GridPos) {
        self.connections.entry(a).or_default().push(b);
        self.connections.entry(b).or_default().push(a);
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        self.depths.contains_key(&pos)
    }

    pub fn node(&self, pos: GridPos) -> Option<RoomGraphNode> {
        let depth = *self.depths.get(&pos)?;
        let mut connections = Connections::NONE;
        for &neighbour in self.neighbours(pos) {
            if let Some(direction) = pos.direction_to(neighbour) {
                connections.set(direction);
            }
        }
        Some(RoomGraphNode { grid_pos: pos, depth, connections })
    }

    /// Every node in grid order.
    pub fn nodes(&self) -> impl Iterator<Item = RoomGraphNode> + '_ {
        self.depths.keys().filter_map(|&pos| self.node(pos))
    }

    pub fn neighbours(&self, pos: GridPos) -> &[GridPos] {
        self.connections.get(&pos).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn connections(&self) -> &BTreeMap<GridPos, Vec<GridPos>> {
        &self.connections
    }

    pub fn end_rooms(&self) -> &[GridPos] {
        &self.end_rooms
    }

    /// Each undirected edge once, parent first, in BFS order from the origin.
    pub fn hallway_edges(&self) -> Vec<(GridPos, GridPos)> {
        let mut edges = Vec::new();
        if !self.contains(GridPos::ORIGIN) {
            return edges;
        }

        let mut visited = BTreeSet::from([GridPos::ORIGIN]);
        let mut queue = VecDeque::from([GridPos::ORIGIN]);
        while let Some(pos) = queue.pop_front() {
            for &neighbour in self.neighbours(pos) {
                if visited.insert(neighbour) {
                    edges.push((pos, neighbour));
                    queue.push_back(neighbour);
                }
            }
        }
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(seed: u64, depth: u32) -> RoomGraph {
        let mut rng = DungeonRng::seed_from_u64(seed);
        RoomGraph::generate(depth, BranchPolicy::tapered(0.85, depth), &mut rng)
    }

    #[test]
    fn origin_always_has_four_neighbours() {
        let graph = generate(5, 3);
        let origin = graph.node(GridPos::ORIGIN).expect("origin claimed");
        assert_eq!(origin.depth, 0);
        assert_eq!(origin.connections.count(), 4);
    }

    #[test]
    fn never_branching_policy_keeps_only_the_first_ring() {
        let mut rng = DungeonRng::seed_from_u64(11);
        let policy = BranchPolicy { base_chance: 0.0, decay_per_depth: 0.0 };
        let graph = RoomGraph::generate(3, policy, &mut rng);

        assert_eq!(graph.len(), 5);
        assert_eq!(graph.end_rooms().len(), 4);
        assert!(!graph.end_rooms().contains(&GridPos::ORIGIN));
    }

    #[test]
    fn always_branching_policy_respects_depth_cap() {
        let mut rng = DungeonRng::seed_from_u64(3);
        let policy = BranchPolicy { base_chance: 1.0, decay_per_depth: 0.0 };
        let graph = RoomGraph::generate(2, policy, &mut rng);

        let deepest = graph.nodes().map(|node| node.depth).max().expect("non-empty");
        assert_eq!(deepest, 3, "children of the deepest expanded ring are claimed but not grown");
        for node in graph.nodes() {
            let manhattan = node.grid_pos.x.unsigned_abs() + node.grid_pos.y.unsigned_abs();
            assert!(manhattan <= node.depth, "{node:?} is farther than its depth allows");
        }
    }

    #[test]
    fn edges_are_symmetric_and_cardinal() {
        let graph = generate(77, 4);
        for (pos, neighbours) in graph.connections() {
            for neighbour in neighbours {
                assert!(pos.direction_to(*neighbour).is_some());
                assert!(graph.neighbours(*neighbour).contains(pos));
            }
        }
    }

    #[test]
    fn hallway_edges_form_a_spanning_tree() {
        let graph = generate(2_024, 4);
        let edges = graph.hallway_edges();
        assert_eq!(edges.len(), graph.len() - 1);

        let undirected: BTreeSet<_> =
            edges.iter().map(|&(a, b)| if a < b { (a, b) } else { (b, a) }).collect();
        assert_eq!(undirected.len(), edges.len(), "no edge is emitted twice");
    }

    #[test]
    fn end_rooms_are_unique() {
        for seed in 0..20 {
            let graph = generate(seed, 3);
            let unique: BTreeSet<_> = graph.end_rooms().iter().collect();
            assert_eq!(unique.len(), graph.end_rooms().len(), "seed {seed}");
        }
    }
}
