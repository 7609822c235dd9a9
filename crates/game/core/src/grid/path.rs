//! Pathfinding and reachability under a movement budget.
//!
//! Movement is orthogonal with a uniform cost of one MP per step, so the
//! A* heuristic (Manhattan distance) is exact on open ground. Occupied cells
//! block traversal; the start cell is exempt because the mover stands on it.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap, VecDeque};

use crate::state::Position;

use super::Grid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct AStarNode {
    f_score: u32,
    g_score: u32,
    position: Position,
}

impl Ord for AStarNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse for min-heap behaviour.
        // Ties fall back to the deeper node, then to position order.
        other
            .f_score
            .cmp(&self.f_score)
            .then_with(|| self.g_score.cmp(&other.g_score))
            .then_with(|| other.position.cmp(&self.position))
    }
}

impl PartialOrd for AStarNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Grid {
    /// Cells a mover standing on `from` may step into.
    fn open_neighbours(&self, position: Position) -> impl Iterator<Item = Position> + '_ {
        position
            .neighbours()
            .into_iter()
            .filter(move |&next| self.is_walkable(next))
    }

    /// Finds a minimal-cost path from `from` to `to` costing at most `budget` MP.
    ///
    /// Returns the ordered cells including `from`, or an empty vector when the
    /// target is out of bounds, not walkable, occupied, or farther than `budget`.
    pub fn find_path(&self, from: Position, to: Position, budget: u32) -> Vec<Position> {
        if !self.contains(from) || !self.is_walkable(to) {
            return Vec::new();
        }
        if from.distance(to) > budget {
            return Vec::new();
        }

        let mut open_set = BinaryHeap::new();
        let mut came_from: BTreeMap<Position, Position> = BTreeMap::new();
        let mut g_scores: BTreeMap<Position, u32> = BTreeMap::new();

        g_scores.insert(from, 0);
        open_set.push(AStarNode {
            f_score: from.distance(to),
            g_score: 0,
            position: from,
        });

        while let Some(node) = open_set.pop() {
            if node.position == to {
                return reconstruct_path(&came_from, to);
            }
            if g_scores.get(&node.position).is_some_and(|&best| node.g_score > best) {
                continue;
            }

            let tentative = node.g_score + 1;
            if tentative > budget {
                continue;
            }

            for next in self.open_neighbours(node.position) {
                if g_scores.get(&next).is_some_and(|&best| best <= tentative) {
                    continue;
                }
                g_scores.insert(next, tentative);
                came_from.insert(next, node.position);
                let f_score = tentative + next.distance(to);
                if f_score <= budget {
                    open_set.push(AStarNode {
                        f_score,
                        g_score: tentative,
                        position: next,
                    });
                }
            }
        }

        Vec::new()
    }

    /// All cells reachable from `from` within `budget` MP, with their step cost.
    ///
    /// The start cell is not included.
    pub fn reachable(&self, from: Position, budget: u32) -> BTreeMap<Position, u32> {
        let mut costs = BTreeMap::new();
        if !self.contains(from) || budget == 0 {
            return costs;
        }

        let mut frontier = VecDeque::from([(from, 0u32)]);
        let mut visited = BTreeMap::from([(from, 0u32)]);

        while let Some((position, cost)) = frontier.pop_front() {
            if cost == budget {
                continue;
            }
            for next in self.open_neighbours(position) {
                if visited.contains_key(&next) {
                    continue;
                }
                visited.insert(next, cost + 1);
                costs.insert(next, cost + 1);
                frontier.push_back((next, cost + 1));
            }
        }

        costs
    }
}

fn reconstruct_path(came_from: &BTreeMap<Position, Position>, goal: Position) -> Vec<Position> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&previous) = came_from.get(&current) {
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::EntityId;

    fn open_grid() -> Grid {
        Grid::new(8, 8)
    }

    #[test]
    fn straight_path_includes_start() {
        let grid = open_grid();
        let path = grid.find_path(Position::new(0, 0), Position::new(3, 0), 5);
        assert_eq!(
            path,
            vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(2, 0),
                Position::new(3, 0),
            ]
        );
    }

    #[test]
    fn path_longer_than_budget_is_unreachable() {
        let grid = open_grid();
        assert!(grid.find_path(Position::new(0, 0), Position::new(3, 3), 5).is_empty());
        assert_eq!(
            grid.find_path(Position::new(0, 0), Position::new(3, 3), 6).len(),
            7
        );
    }

    #[test]
    fn walls_force_a_detour() {
        let grid = Grid::from_rows(&[".#..", ".#..", "...."]).unwrap();
        let from = Position::new(0, 0);
        let to = Position::new(2, 0);
        assert!(grid.find_path(from, to, 4).is_empty());
        let path = grid.find_path(from, to, 6);
        assert_eq!(path.len(), 7);
        assert_eq!(path.first(), Some(&from));
        assert_eq!(path.last(), Some(&to));
    }

    #[test]
    fn occupied_or_blocked_targets_are_unreachable() {
        let mut grid = Grid::from_rows(&["..#"]).unwrap();
        grid.claim(Position::new(1, 0), EntityId(3)).unwrap();
        assert!(grid.find_path(Position::new(0, 0), Position::new(1, 0), 4).is_empty());
        assert!(grid.find_path(Position::new(0, 0), Position::new(2, 0), 4).is_empty());
        assert!(grid.find_path(Position::new(0, 0), Position::new(9, 9), 40).is_empty());
    }

    #[test]
    fn reachable_respects_budget_and_blockers() {
        let mut grid = open_grid();
        grid.claim(Position::new(1, 0), EntityId(2)).unwrap();
        let reach = grid.reachable(Position::new(0, 0), 2);

        assert!(!reach.contains_key(&Position::new(0, 0)));
        assert!(!reach.contains_key(&Position::new(1, 0)));
        assert_eq!(reach.get(&Position::new(0, 1)), Some(&1));
        assert_eq!(reach.get(&Position::new(1, 1)), Some(&2));
        assert_eq!(reach.get(&Position::new(0, 2)), Some(&2));
        // (2, 0) is two steps away on open ground; the blocker forces a detour of four.
        assert!(!reach.contains_key(&Position::new(2, 0)));
    }

    #[test]
    fn zero_budget_reaches_nothing() {
        assert!(open_grid().reachable(Position::new(4, 4), 0).is_empty());
    }
}
