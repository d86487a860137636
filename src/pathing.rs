use std::fmt::{Debug, Display, LowerHex};
use std::ops::Add;

use itertools::Itertools;
use num::traits::{Bounded, One, Unsigned, Zero};
use smallvec::SmallVec;

use crate::cells::{Cartesian2DCoordinate, CoordinateSmallVec};
use crate::grid::{Grid, IndexType};
use crate::utils;
use crate::utils::FnvHashMap;

/// Trait (hack) used purely as a generic type parameter alias because it looks ugly
/// to type this out each time. Generic parameter type aliases are not in the language.
pub trait MaxDistance:
    Zero + One + Bounded + Unsigned + Add + Debug + Clone + Copy + Display + LowerHex + Ord
{
}
impl<T: Zero + One + Bounded + Unsigned + Add + Debug + Clone + Copy + Display + LowerHex + Ord>
    MaxDistance for T
{
}

/// Breadth-first flood fill of passage step counts away from one start cell.
#[derive(Debug, Clone)]
pub struct Distances<MaxDistanceT = u32> {
    start_coordinate: Cartesian2DCoordinate,
    distances: FnvHashMap<Cartesian2DCoordinate, MaxDistanceT>,
    max_distance: MaxDistanceT,
}

impl<MaxDistanceT: MaxDistance> Distances<MaxDistanceT> {
    pub fn new<GridIndexType: IndexType>(
        grid: &Grid<GridIndexType>,
        start_coordinate: Cartesian2DCoordinate,
    ) -> Option<Distances<MaxDistanceT>> {
        if !grid.is_valid_coordinate(start_coordinate) {
            return None;
        }

        let mut max = Zero::zero();
        let cells_count = grid.size();
        let mut distances = utils::fnv_hashmap(cells_count);
        distances.insert(start_coordinate, Zero::zero());

        // Every link is one step from the previous cell, so a cell's distance is final
        // the first time it is inserted and the distances map doubles as the visited set.
        let mut frontier = vec![start_coordinate];
        while !frontier.is_empty() {
            let mut new_frontier = vec![];
            for cell_coord in &frontier {
                // All cells except the start are at infinity (Option::None in the map)
                // until the flood reaches them.
                let distance_to_cell: MaxDistanceT = *distances
                    .entry(*cell_coord)
                    .or_insert_with(Bounded::max_value);
                if distance_to_cell > max {
                    max = distance_to_cell;
                }

                let links: CoordinateSmallVec = grid
                    .links(*cell_coord)
                    .expect("source cell has an invalid cell coordinate");
                for link_coordinate in &*links {
                    let distance_to_link: MaxDistanceT = *distances
                        .entry(*link_coordinate)
                        .or_insert_with(Bounded::max_value);
                    if distance_to_link == Bounded::max_value() {
                        distances.insert(*link_coordinate, distance_to_cell + One::one());
                        new_frontier.push(*link_coordinate);
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start_coordinate,
            distances,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> Cartesian2DCoordinate {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn max(&self) -> MaxDistanceT {
        self.max_distance
    }

    #[inline(always)]
    pub fn distance_from_start_to(&self, coord: Cartesian2DCoordinate) -> Option<MaxDistanceT> {
        self.distances.get(&coord).cloned()
    }

    pub(crate) fn distances(&self) -> &FnvHashMap<Cartesian2DCoordinate, MaxDistanceT> {
        &self.distances
    }

    /// The cells furthest from the start, in coordinate order.
    pub fn furthest_points_on_grid(&self) -> SmallVec<[Cartesian2DCoordinate; 8]> {
        let furthest_distance = self.max();
        self.distances
            .iter()
            .filter(|&(_, distance)| *distance == furthest_distance)
            .map(|(coord, _)| *coord)
            .sorted()
            .collect()
    }
}

/// Walk from the end point back towards the start, at each step moving to a
/// linked neighbour strictly closer to the start. `None` when the end point is
/// unreachable from the distances' start.
pub fn shortest_path<GridIndexType, MaxDistanceT>(
    grid: &Grid<GridIndexType>,
    distances_from_start: &Distances<MaxDistanceT>,
    end_point: Cartesian2DCoordinate,
) -> Option<Vec<Cartesian2DCoordinate>>
where
    GridIndexType: IndexType,
    MaxDistanceT: MaxDistance,
{
    distances_from_start.distance_from_start_to(end_point)?;

    let mut path = vec![end_point];
    let start = distances_from_start.start();
    let mut current_coord = end_point;

    while current_coord != start {
        let current_distance_to_start = distances_from_start
            .distance_from_start_to(current_coord)
            .expect("coordinate invalid for distances_from_start data");

        let closest_to_start: Option<(Cartesian2DCoordinate, MaxDistanceT)> = grid
            .neighbours(current_coord)
            .iter()
            .cloned()
            .filter(|&neighbour_coord| grid.is_linked(neighbour_coord, current_coord))
            .map(|coord| {
                (
                    coord,
                    distances_from_start
                        .distance_from_start_to(coord)
                        .expect("coordinate invalid for distances_from_start data"),
                )
            })
            .min_by_key(|&(_, distance)| distance);

        if let Some((closer_coord, closer_distance)) = closest_to_start {
            if closer_distance >= current_distance_to_start {
                // We have not got any closer to the start, so there is no path there.
                return None;
            }

            current_coord = closer_coord;
            path.push(current_coord);
        } else {
            // There are no linked neighbours - this input data is broken.
            return None;
        }
    }

    path.reverse();
    Some(path)
}

/// Twice applied flood fill: the point furthest from an arbitrary cell starts the
/// longest path, the point furthest from that starting point ends it.
/// Only exact for a perfect maze, otherwise some arbitrary path comes back.
pub fn dijkstra_longest_path<GridIndexType, MaxDistanceT>(
    grid: &Grid<GridIndexType>,
) -> Option<Vec<Cartesian2DCoordinate>>
where
    GridIndexType: IndexType,
    MaxDistanceT: MaxDistance,
{
    let arbitrary_start_point = Cartesian2DCoordinate::new(0, 0);
    let first_distances =
        Distances::<MaxDistanceT>::new(grid, arbitrary_start_point)?;

    let long_path_start_coordinate = first_distances.furthest_points_on_grid()[0];

    let distances_from_start = Distances::<MaxDistanceT>::new(grid, long_path_start_coordinate)?;
    let end_point = distances_from_start.furthest_points_on_grid()[0];

    shortest_path(grid, &distances_from_start, end_point)
}
