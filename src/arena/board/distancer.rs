use std::collections::VecDeque;

use tracing::{debug, instrument};

use super::layout::Layout;
use crate::arena::action::Action;
use crate::core::Position;

const UNREACHABLE: u32 = u32::MAX;

/// All pairs shortest path lengths over the open cells of a layout.
///
/// Computed once with a breadth first search from every open cell, then
/// shared between all the states of a game.
#[derive(Debug, Clone)]
pub struct Distancer {
    num_cells: usize,
    width: u16,
    height: u16,
    distances: Vec<u32>,
}

impl Distancer {
    #[instrument(level = "debug", skip(layout), fields(width = layout.width(), height = layout.height()))]
    pub fn new(layout: &Layout) -> Self {
        let num_cells = layout.num_cells();
        let mut distances = vec![UNREACHABLE; num_cells * num_cells];
        let mut queue = VecDeque::new();

        for source in 0..num_cells {
            let start = layout.position_of(source);
            if layout.is_wall(start) {
                continue;
            }
            let row = &mut distances[source * num_cells..(source + 1) * num_cells];
            row[source] = 0;
            queue.push_back(start);

            while let Some(current) = queue.pop_front() {
                let Some(current_idx) = layout.index(current) else {
                    continue;
                };
                let next_distance = row[current_idx] + 1;
                for next in neighbors(layout, current) {
                    if let Some(idx) = layout.index(next) {
                        if row[idx] == UNREACHABLE {
                            row[idx] = next_distance;
                            queue.push_back(next);
                        }
                    }
                }
            }
        }

        debug!(num_cells, "computed maze distances");
        Self {
            num_cells,
            width: layout.width(),
            height: layout.height(),
            distances,
        }
    }

    fn index(&self, position: Position) -> Option<usize> {
        if position.x < self.width && position.y < self.height {
            Some(usize::from(position.y) * usize::from(self.width) + usize::from(position.x))
        } else {
            None
        }
    }

    /// Maze distance between two cells.
    ///
    /// Cells that are walls, off the board, or not connected fall back to
    /// the manhattan distance.
    pub fn get_distance(&self, a: Position, b: Position) -> u32 {
        match (self.index(a), self.index(b)) {
            (Some(from), Some(to)) => match self.distances[from * self.num_cells + to] {
                UNREACHABLE => a.manhattan(b),
                distance => distance,
            },
            _ => a.manhattan(b),
        }
    }
}

/// Open cells one step away from `position`.
pub(crate) fn neighbors(layout: &Layout, position: Position) -> impl Iterator<Item = Position> + '_ {
    Action::ALL
        .into_iter()
        .filter(|action| *action != Action::Stop)
        .filter_map(move |action| {
            let (dx, dy) = action.vector();
            position.offset(dx, dy)
        })
        .filter(move |next| !layout.is_wall(*next))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distances_follow_walls() {
        // The wall in the middle forces a detour through the bottom row.
        let layout = Layout::parse(
            "\
%%%%%%%
%1 % 2%
%  %  %
%     %
%%%%%%%",
        )
        .unwrap();
        let distancer = Distancer::new(&layout);

        let a = Position::new(2, 1);
        let b = Position::new(4, 1);
        assert_eq!(a.manhattan(b), 2);
        assert_eq!(distancer.get_distance(a, b), 6);
        assert_eq!(distancer.get_distance(b, a), 6);
        assert_eq!(distancer.get_distance(a, a), 0);
    }

    #[test]
    fn test_unreachable_falls_back_to_manhattan() {
        let layout = Layout::parse(
            "\
%%%%%%
%1%%2%
%%%%%%",
        )
        .unwrap();
        let distancer = Distancer::new(&layout);
        let a = Position::new(1, 1);
        let b = Position::new(4, 1);
        assert_eq!(distancer.get_distance(a, b), 3);
        assert_eq!(distancer.get_distance(a, Position::new(100, 1)), 99);
    }
}
