use rand::Rng;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
use crate::generators::recursive_backtracker;
use crate::grid::{Grid, IndexType};
use crate::grids::large_rect_grid;
use crate::units::{ColumnIndex, ColumnLength, ColumnsCount, RowIndex, RowLength, RowsCount};

/// The two boolean adjacency matrices a maze reduces to for wall placement.
///
/// `vertical[r][c]` true means no wall between columns `c` and `c + 1` in row
/// `r` (an R x (C-1) matrix). `horizontal[r][c]` true means no wall between
/// rows `r` and `r + 1` in column `c` (an (R-1) x C matrix). The true entries
/// of both matrices together form a spanning tree over the R x C cells when
/// built from a generated grid.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PassageMatrices {
    rows: usize,
    columns: usize,
    vertical: Vec<Vec<bool>>,
    horizontal: Vec<Vec<bool>>,
}

impl PassageMatrices {
    /// Read the passages out of a carved grid as plain owned matrices.
    pub fn from_grid<GridIndexType: IndexType>(grid: &Grid<GridIndexType>) -> PassageMatrices {
        let rows = grid.rows().0;
        let columns = grid.columns().0;

        let mut vertical = vec![vec![false; columns.saturating_sub(1)]; rows];
        let mut horizontal = vec![vec![false; columns]; rows.saturating_sub(1)];

        for r in 0..rows {
            for c in 0..columns {
                let coord = Cartesian2DCoordinate::new(c as u32, r as u32);
                if c + 1 < columns && grid.is_neighbour_linked(coord, CompassPrimary::East) {
                    vertical[r][c] = true;
                }
                if r + 1 < rows && grid.is_neighbour_linked(coord, CompassPrimary::South) {
                    horizontal[r][c] = true;
                }
            }
        }

        PassageMatrices {
            rows,
            columns,
            vertical,
            horizontal,
        }
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        RowsCount(self.rows)
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        ColumnsCount(self.columns)
    }

    /// R x (C-1) matrix of open passages between horizontally adjacent cells.
    #[inline]
    pub fn vertical(&self) -> &[Vec<bool>] {
        &self.vertical
    }

    /// (R-1) x C matrix of open passages between vertically adjacent cells.
    #[inline]
    pub fn horizontal(&self) -> &[Vec<bool>] {
        &self.horizontal
    }

    /// Is the passage between cell (row, column) and (row, column + 1) open?
    /// False at the grid boundary.
    pub fn is_open_east(&self, row: RowIndex, column: ColumnIndex) -> bool {
        self.vertical
            .get(row.0)
            .and_then(|r| r.get(column.0))
            .cloned()
            .unwrap_or(false)
    }

    /// Is the passage between cell (row, column) and (row + 1, column) open?
    /// False at the grid boundary.
    pub fn is_open_south(&self, row: RowIndex, column: ColumnIndex) -> bool {
        self.horizontal
            .get(row.0)
            .and_then(|r| r.get(column.0))
            .cloned()
            .unwrap_or(false)
    }

    pub fn open_passage_count(&self) -> usize {
        let open = |matrix: &[Vec<bool>]| -> usize {
            matrix
                .iter()
                .map(|row| row.iter().filter(|&&open| open).count())
                .sum()
        };
        open(&self.vertical) + open(&self.horizontal)
    }
}

/// Generate a perfect maze over a `rows` x `columns` grid and hand back its
/// passage matrices.
///
/// Returns `None` when a dimension is zero or the grid would not fit the
/// generator's index type - invalid dimensions are a precondition violation,
/// generation itself cannot fail.
pub fn generate<R: Rng>(
    rows: RowsCount,
    columns: ColumnsCount,
    rng: &mut R,
) -> Option<PassageMatrices> {
    let mut grid = large_rect_grid(RowLength(columns.0), ColumnLength(rows.0))?;
    recursive_backtracker(&mut grid, rng);
    Some(PassageMatrices::from_grid(&grid))
}

#[cfg(test)]
mod tests {

    use rand::{rngs::SmallRng, SeedableRng};

    use super::*;
    use crate::grids::small_rect_grid;

    #[test]
    fn matrices_have_the_documented_shapes() {
        let mut rng = SmallRng::seed_from_u64(1);
        let passages = generate(RowsCount(10), ColumnsCount(15), &mut rng).unwrap();

        assert_eq!(passages.rows().0, 10);
        assert_eq!(passages.columns().0, 15);
        assert_eq!(passages.vertical().len(), 10);
        assert!(passages.vertical().iter().all(|row| row.len() == 14));
        assert_eq!(passages.horizontal().len(), 9);
        assert!(passages.horizontal().iter().all(|row| row.len() == 15));
    }

    #[test]
    fn open_passage_count_is_the_spanning_tree_edge_count() {
        let mut rng = SmallRng::seed_from_u64(2);
        let passages = generate(RowsCount(10), ColumnsCount(15), &mut rng).unwrap();
        assert_eq!(passages.open_passage_count(), 10 * 15 - 1);
    }

    #[test]
    fn single_cell_maze_has_empty_matrices() {
        let mut rng = SmallRng::seed_from_u64(3);
        let passages = generate(RowsCount(1), ColumnsCount(1), &mut rng).unwrap();
        assert_eq!(passages.vertical().len(), 1);
        assert!(passages.vertical()[0].is_empty());
        assert!(passages.horizontal().is_empty());
        assert_eq!(passages.open_passage_count(), 0);
    }

    #[test]
    fn single_row_maze_is_the_full_row() {
        let mut rng = SmallRng::seed_from_u64(4);
        let passages = generate(RowsCount(1), ColumnsCount(9), &mut rng).unwrap();
        assert!(passages.horizontal().is_empty());
        assert!(passages.vertical()[0].iter().all(|&open| open));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let mut rng = SmallRng::seed_from_u64(5);
        assert!(generate(RowsCount(0), ColumnsCount(5), &mut rng).is_none());
        assert!(generate(RowsCount(5), ColumnsCount(0), &mut rng).is_none());
    }

    #[test]
    fn from_grid_maps_links_to_the_lower_index() {
        let mut g = small_rect_grid(RowLength(3), ColumnLength(2)).unwrap();
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        // Passage east of (1, 0) and south of (2, 0).
        g.link(gc(1, 0), gc(2, 0)).unwrap();
        g.link(gc(2, 0), gc(2, 1)).unwrap();

        let passages = PassageMatrices::from_grid(&g);
        assert!(passages.is_open_east(RowIndex(0), ColumnIndex(1)));
        assert!(!passages.is_open_east(RowIndex(0), ColumnIndex(0)));
        assert!(passages.is_open_south(RowIndex(0), ColumnIndex(2)));
        assert!(!passages.is_open_south(RowIndex(0), ColumnIndex(0)));
        assert_eq!(passages.open_passage_count(), 2);

        // Boundary coordinates are never open.
        assert!(!passages.is_open_east(RowIndex(0), ColumnIndex(2)));
        assert!(!passages.is_open_south(RowIndex(1), ColumnIndex(0)));
    }
}
