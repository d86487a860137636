use std::fmt;
use std::rc::Rc;
use std::slice;

use petgraph::graph;
pub use petgraph::graph::IndexType;
use petgraph::{Graph, Undirected};
use rand::Rng;

use crate::cells::{
    offset_coordinate, Cartesian2DCoordinate, CompassPrimary, CoordinateSmallVec,
    COMPASS_PRIMARY_DIRECTIONS,
};
use crate::grid_displays::GridDisplay;
use crate::units::{
    ColumnIndex, ColumnLength, ColumnsCount, EdgesCount, NodesCount, RowIndex, RowLength, RowsCount,
};

/// A rectangular grid of cells where an edge in the underlying undirected graph
/// is an open passage between two adjacent cells.
pub struct Grid<GridIndexType: IndexType> {
    graph: Graph<(), (), Undirected, GridIndexType>,
    row_width: RowLength,
    column_height: ColumnLength,
    grid_display: Option<Rc<dyn GridDisplay>>,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CellLinkError {
    InvalidGridCoordinate,
    SelfLink,
}

impl<GridIndexType: IndexType> fmt::Debug for Grid<GridIndexType> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Grid :: graph: {:?}, row width: {:?}, column height: {:?}",
            self.graph, self.row_width, self.column_height
        )
    }
}

impl<GridIndexType: IndexType> Grid<GridIndexType> {
    /// Create a grid with all passages closed.
    ///
    /// Dimensions must be at least 1x1 and the cell count must be indexable by
    /// `GridIndexType` - the constructors in the `grids` module check both.
    pub fn new(row_width: RowLength, column_height: ColumnLength) -> Grid<GridIndexType> {
        let (NodesCount(nodes), EdgesCount(edges)) = graph_size(row_width, column_height);

        let mut grid = Grid {
            graph: Graph::with_capacity(nodes, edges),
            row_width,
            column_height,
            grid_display: None,
        };
        for _ in 0..nodes {
            let _ = grid.graph.add_node(());
        }

        grid
    }

    #[inline]
    pub fn set_grid_display(&mut self, grid_display: Option<Rc<dyn GridDisplay>>) {
        self.grid_display = grid_display;
    }

    #[inline]
    pub fn grid_display(&self) -> &Option<Rc<dyn GridDisplay>> {
        &self.grid_display
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.row_width.0 * self.column_height.0
    }

    #[inline]
    pub fn links_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        RowsCount(self.column_height.0)
    }

    #[inline]
    pub fn row_length(&self) -> RowLength {
        self.row_width
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        ColumnsCount(self.row_width.0)
    }

    #[inline]
    pub fn column_length(&self) -> ColumnLength {
        self.column_height
    }

    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> Cartesian2DCoordinate {
        let index = rng.gen_range(0..self.size());
        Cartesian2DCoordinate::from_row_major_index(index, self.row_width)
    }

    /// Link two cells, opening the passage between them.
    pub fn link(
        &mut self,
        a: Cartesian2DCoordinate,
        b: Cartesian2DCoordinate,
    ) -> Result<(), CellLinkError> {
        if a != b {
            let a_index_opt = self.grid_coordinate_graph_index(a);
            let b_index_opt = self.grid_coordinate_graph_index(b);
            match (a_index_opt, b_index_opt) {
                (Some(a_index), Some(b_index)) => {
                    let _ = self.graph.update_edge(a_index, b_index, ());
                    Ok(())
                }
                _ => Err(CellLinkError::InvalidGridCoordinate),
            }
        } else {
            Err(CellLinkError::SelfLink)
        }
    }

    /// Unlink two cells, if the grid coordinates are valid and a link exists between them.
    /// Returns true if an unlink occurred.
    pub fn unlink(&mut self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> bool {
        let a_index_opt = self.grid_coordinate_graph_index(a);
        let b_index_opt = self.grid_coordinate_graph_index(b);

        if let (Some(a_index), Some(b_index)) = (a_index_opt, b_index_opt) {
            if let Some(edge_index) = self.graph.find_edge(a_index, b_index) {
                // This will invalidate the last edge index in the graph, which is fine as we
                // are not storing them for any reason.
                self.graph.remove_edge(edge_index);
                return true;
            }
        }

        false
    }

    /// Cell nodes that are linked to a particular node by a passage.
    pub fn links(&self, coord: Cartesian2DCoordinate) -> Option<CoordinateSmallVec> {
        if let Some(graph_node_index) = self.grid_coordinate_graph_index(coord) {
            let linked_cells = self
                .graph
                .neighbors(graph_node_index)
                .map(|node_index| {
                    Cartesian2DCoordinate::from_row_major_index(node_index.index(), self.row_width)
                })
                .collect();
            Some(linked_cells)
        } else {
            None
        }
    }

    /// Cell nodes that are to the North, South, East or West of a particular node, but not
    /// necessarily linked by a passage.
    pub fn neighbours(&self, coord: Cartesian2DCoordinate) -> CoordinateSmallVec {
        COMPASS_PRIMARY_DIRECTIONS
            .iter()
            .filter_map(|&dir| self.neighbour_at_direction(coord, dir))
            .collect()
    }

    pub fn neighbour_at_direction(
        &self,
        coord: Cartesian2DCoordinate,
        direction: CompassPrimary,
    ) -> Option<Cartesian2DCoordinate> {
        offset_coordinate(coord, direction)
            .filter(|&neighbour_coord| self.is_valid_coordinate(neighbour_coord))
    }

    /// Are two cells in the grid linked?
    pub fn is_linked(&self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> bool {
        let a_index_opt = self.grid_coordinate_graph_index(a);
        let b_index_opt = self.grid_coordinate_graph_index(b);
        if let (Some(a_index), Some(b_index)) = (a_index_opt, b_index_opt) {
            self.graph.find_edge(a_index, b_index).is_some()
        } else {
            false
        }
    }

    pub fn is_neighbour_linked(
        &self,
        coord: Cartesian2DCoordinate,
        direction: CompassPrimary,
    ) -> bool {
        self.neighbour_at_direction(coord, direction)
            .map_or(false, |neighbour_coord| self.is_linked(coord, neighbour_coord))
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            let RowLength(row_size) = self.row_width;
            Some((coord.y as usize * row_size) + coord.x as usize)
        } else {
            None
        }
    }

    pub fn iter(&self) -> CellIter {
        CellIter {
            current_cell_number: 0,
            row_width: self.row_width,
            cells_count: self.size(),
        }
    }

    pub fn iter_row(&self) -> BatchIter {
        BatchIter {
            iter_type: BatchIterType::Row,
            current_index: 0,
            row_width: self.row_width,
            column_height: self.column_height,
        }
    }

    pub fn iter_column(&self) -> BatchIter {
        BatchIter {
            iter_type: BatchIterType::Column,
            current_index: 0,
            row_width: self.row_width,
            column_height: self.column_height,
        }
    }

    pub fn iter_links(&self) -> LinksIter<GridIndexType> {
        LinksIter {
            graph_edge_iter: self.graph.raw_edges().iter(),
            row_width: self.row_width,
        }
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Cartesian2DCoordinate) -> bool {
        (coord.x as usize) < self.row_width.0 && (coord.y as usize) < self.column_height.0
    }

    /// Convert a grid coordinate into a petgraph node index.
    /// Returns None if the grid coordinate is invalid (out of the grid's dimensions).
    #[inline]
    fn grid_coordinate_graph_index(
        &self,
        coord: Cartesian2DCoordinate,
    ) -> Option<graph::NodeIndex<GridIndexType>> {
        self.grid_coordinate_to_index(coord)
            .map(graph::NodeIndex::<GridIndexType>::new)
    }
}

fn graph_size(row_width: RowLength, column_height: ColumnLength) -> (NodesCount, EdgesCount) {
    let cells_count = row_width.0 * column_height.0;
    // Overkill for a perfect maze, but we never want a capacity panic.
    let edges_count_hint =
        (4 * cells_count).saturating_sub(4 * std::cmp::max(row_width.0, column_height.0));
    (NodesCount(cells_count), EdgesCount(edges_count_hint))
}

#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    row_width: RowLength,
    cells_count: usize,
}
impl Iterator for CellIter {
    type Item = Cartesian2DCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = Cartesian2DCoordinate::from_row_major_index(
                self.current_cell_number,
                self.row_width,
            );
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        (lower_bound, Some(lower_bound))
    }
}
impl ExactSizeIterator for CellIter {} // default impl using size_hint()

// Converting the Grid into an iterator (CellIter - the default most sensible)
impl<'a, GridIndexType: IndexType> IntoIterator for &'a Grid<GridIndexType> {
    type Item = Cartesian2DCoordinate;
    type IntoIter = CellIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Copy, Clone)]
enum BatchIterType {
    Row,
    Column,
}

#[derive(Debug, Copy, Clone)]
pub struct BatchIter {
    iter_type: BatchIterType,
    current_index: usize,
    row_width: RowLength,
    column_height: ColumnLength,
}
impl Iterator for BatchIter {
    type Item = Vec<Cartesian2DCoordinate>;
    fn next(&mut self) -> Option<Self::Item> {
        if let BatchIterType::Row = self.iter_type {
            if self.current_index < self.column_height.0 {
                let coords = (0..self.row_width.0)
                    .map(|i| {
                        Cartesian2DCoordinate::from_row_column_indices(
                            ColumnIndex(i),
                            RowIndex(self.current_index),
                        )
                    })
                    .collect();
                self.current_index += 1;
                Some(coords)
            } else {
                None
            }
        } else if self.current_index < self.row_width.0 {
            let coords = (0..self.column_height.0)
                .map(|i| {
                    Cartesian2DCoordinate::from_row_column_indices(
                        ColumnIndex(self.current_index),
                        RowIndex(i),
                    )
                })
                .collect();
            self.current_index += 1;
            Some(coords)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = if let BatchIterType::Row = self.iter_type {
            self.column_height.0
        } else {
            self.row_width.0
        };
        let lower_bound = count - self.current_index;
        (lower_bound, Some(lower_bound))
    }
}
impl ExactSizeIterator for BatchIter {} // default impl using size_hint()

pub struct LinksIter<'a, GridIndexType: IndexType> {
    graph_edge_iter: slice::Iter<'a, graph::Edge<(), GridIndexType>>,
    row_width: RowLength,
}

impl<'a, GridIndexType: IndexType> Iterator for LinksIter<'a, GridIndexType> {
    type Item = (Cartesian2DCoordinate, Cartesian2DCoordinate);

    fn next(&mut self) -> Option<Self::Item> {
        self.graph_edge_iter.next().map(|edge| {
            let src = Cartesian2DCoordinate::from_row_major_index(
                edge.source().index(),
                self.row_width,
            );
            let dst = Cartesian2DCoordinate::from_row_major_index(
                edge.target().index(),
                self.row_width,
            );
            (src, dst)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.graph_edge_iter.size_hint()
    }
}
impl<'a, GridIndexType: IndexType> ExactSizeIterator for LinksIter<'a, GridIndexType> {}

impl<'a, GridIndexType: IndexType> fmt::Debug for LinksIter<'a, GridIndexType> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LinksIter :: edges iter : {:?}", self.graph_edge_iter)
    }
}
