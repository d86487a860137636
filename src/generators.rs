use bit_set::BitSet;
use rand::Rng;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary, COMPASS_PRIMARY_DIRECTIONS};
use crate::grid::{Grid, IndexType};

/// One cell on the carving stack: where we are, the order we will try its
/// neighbours in, and how many of them we have already tried.
struct Frame {
    coord: Cartesian2DCoordinate,
    directions: [CompassPrimary; 4],
    next_direction: usize,
}

/// Apply the recursive backtracker (randomized depth-first) maze generation
/// algorithm to a grid.
///
/// Starting from a random cell, carve a passage into a randomly chosen
/// unvisited neighbour and keep walking until boxed in, then back up to the
/// most recent cell that still has unvisited neighbours. Carving only ever
/// opens a passage into an unvisited cell, so the links form a spanning tree
/// over the grid: every cell reachable, exactly `grid.size() - 1` passages,
/// no cycles.
///
/// The walk depth can reach the full cell count on a serpentine maze, so the
/// pending cells live on an explicit heap stack rather than the call stack.
///
/// Deterministic for a deterministic `rng`.
pub fn recursive_backtracker<GridIndexType, R>(grid: &mut Grid<GridIndexType>, rng: &mut R)
where
    GridIndexType: IndexType,
    R: Rng,
{
    let cells_count = grid.size();
    if cells_count == 0 {
        return;
    }

    // Visited flags, indexed by the cell's row major index. Local to this
    // invocation so concurrent generations of independent mazes never share state.
    let mut visited = BitSet::with_capacity(cells_count);
    let mut stack: Vec<Frame> = Vec::with_capacity(cells_count);

    let start = grid.random_cell(rng);
    visited.insert(
        grid.grid_coordinate_to_index(start)
            .expect("random_cell returned an out of bounds coordinate"),
    );
    stack.push(Frame {
        coord: start,
        directions: shuffled_directions(rng),
        next_direction: 0,
    });

    while let Some(top) = stack.len().checked_sub(1) {
        let mut carve_into = None;
        {
            let frame = &mut stack[top];
            while frame.next_direction < frame.directions.len() {
                let direction = frame.directions[frame.next_direction];
                frame.next_direction += 1;

                if let Some(neighbour) = grid.neighbour_at_direction(frame.coord, direction) {
                    let neighbour_index = grid
                        .grid_coordinate_to_index(neighbour)
                        .expect("neighbour_at_direction returned an out of bounds coordinate");
                    if !visited.contains(neighbour_index) {
                        carve_into = Some((frame.coord, neighbour, neighbour_index));
                        break;
                    }
                }
            }
        }

        match carve_into {
            Some((current, neighbour, neighbour_index)) => {
                grid.link(current, neighbour)
                    .expect("carving a passage between two in-bounds cells cannot fail");
                visited.insert(neighbour_index);
                stack.push(Frame {
                    coord: neighbour,
                    directions: shuffled_directions(rng),
                    next_direction: 0,
                });
            }
            // Every neighbour visited or out of bounds: backtrack.
            None => {
                stack.pop();
            }
        }
    }
}

/// Fisher-Yates shuffle of the four neighbour directions: walk from the last
/// index down to 1, swapping each element with a uniformly chosen element at
/// or before it.
fn shuffled_directions<R: Rng>(rng: &mut R) -> [CompassPrimary; 4] {
    let mut directions = COMPASS_PRIMARY_DIRECTIONS;
    for i in (1..directions.len()).rev() {
        let j = rng.gen_range(0..=i);
        directions.swap(i, j);
    }
    directions
}

#[cfg(test)]
mod tests {

    use quickcheck::{quickcheck, TestResult};
    use rand::{rngs::SmallRng, RngCore, SeedableRng};

    use super::*;
    use crate::cells::Cartesian2DCoordinate;
    use crate::grids::{large_rect_grid, medium_rect_grid, LargeRectangularGrid};
    use crate::passages::PassageMatrices;
    use crate::pathing::Distances;
    use crate::units::{ColumnLength, RowLength};
    use crate::utils::FnvHashMap;

    fn carved_grid(width: usize, height: usize, seed: u64) -> LargeRectangularGrid {
        let mut g = large_rect_grid(RowLength(width), ColumnLength(height))
            .expect("invalid test grid dimensions");
        let mut rng = SmallRng::seed_from_u64(seed);
        recursive_backtracker(&mut g, &mut rng);
        g
    }

    fn all_cells_reachable(g: &LargeRectangularGrid) -> bool {
        let distances = Distances::<u32>::new(g, Cartesian2DCoordinate::new(0, 0))
            .expect("start coordinate invalid");
        g.iter()
            .all(|coord| distances.distance_from_start_to(coord).is_some())
    }

    #[test]
    fn carves_a_spanning_tree() {
        let g = carved_grid(15, 10, 42);
        assert_eq!(g.links_count(), 15 * 10 - 1);
        assert!(all_cells_reachable(&g));
    }

    #[test]
    fn single_cell_grid_needs_no_passages() {
        let g = carved_grid(1, 1, 0);
        assert_eq!(g.links_count(), 0);
    }

    #[test]
    fn single_row_grid_is_fully_open() {
        // Any closed passage in a 1 row grid would split it into two
        // unreachable components, so the spanning tree is the whole row.
        let g = carved_grid(8, 1, 3);
        assert_eq!(g.links_count(), 7);
        for x in 0..7 {
            assert!(g.is_linked(
                Cartesian2DCoordinate::new(x, 0),
                Cartesian2DCoordinate::new(x + 1, 0)
            ));
        }
    }

    #[test]
    fn single_column_grid_is_fully_open() {
        let g = carved_grid(1, 8, 3);
        assert_eq!(g.links_count(), 7);
        for y in 0..7 {
            assert!(g.is_linked(
                Cartesian2DCoordinate::new(0, y),
                Cartesian2DCoordinate::new(0, y + 1)
            ));
        }
    }

    #[test]
    fn same_seed_carves_the_same_maze() {
        let a = PassageMatrices::from_grid(&carved_grid(12, 9, 7));
        let b = PassageMatrices::from_grid(&carved_grid(12, 9, 7));
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_usually_differ() {
        let a = PassageMatrices::from_grid(&carved_grid(12, 9, 7));
        let b = PassageMatrices::from_grid(&carved_grid(12, 9, 8));
        assert_ne!(a, b);
    }

    /// An rng that always returns zero, so the start pick and every shuffle
    /// swap are fixed. The maze is still a spanning tree.
    struct ZeroRng;
    impl RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }
        fn next_u64(&mut self) -> u64 {
            0
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for byte in dest.iter_mut() {
                *byte = 0;
            }
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    #[test]
    fn degenerate_rng_still_carves_a_connected_two_by_two() {
        let mut g =
            medium_rect_grid(RowLength(2), ColumnLength(2)).expect("invalid test grid dimensions");
        recursive_backtracker(&mut g, &mut ZeroRng);

        assert_eq!(g.links_count(), 3);
        let distances = Distances::<u32>::new(&g, Cartesian2DCoordinate::new(0, 0))
            .expect("start coordinate invalid");
        for coord in g.iter() {
            assert!(distances.distance_from_start_to(coord).is_some());
        }
    }

    #[test]
    fn shuffle_orderings_are_roughly_uniform() {
        let mut rng = SmallRng::seed_from_u64(99);
        let trials = 120_000;
        let mut ordering_counts: FnvHashMap<[CompassPrimary; 4], usize> = FnvHashMap::default();
        for _ in 0..trials {
            *ordering_counts.entry(shuffled_directions(&mut rng)).or_insert(0) += 1;
        }

        assert_eq!(ordering_counts.len(), 24);
        let expected = trials / 24;
        for (&ordering, &count) in ordering_counts.iter() {
            assert!(
                count > expected / 2 && count < expected * 2,
                "ordering {:?} appeared {} times, expected about {}",
                ordering,
                count,
                expected
            );
        }
    }

    #[test]
    fn quickcheck_spanning_tree_properties() {
        fn prop(width: u8, height: u8, seed: u64) -> TestResult {
            if width == 0 || height == 0 || width > 16 || height > 16 {
                return TestResult::discard();
            }
            let g = carved_grid(width as usize, height as usize, seed);
            let is_spanning_tree = g.links_count() == (width as usize * height as usize) - 1
                && all_cells_reachable(&g);
            TestResult::from_bool(is_spanning_tree)
        }
        quickcheck(prop as fn(u8, u8, u64) -> TestResult);
    }
}
