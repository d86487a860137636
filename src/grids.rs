use crate::grid::Grid;
use crate::units::{ColumnLength, RowLength};

pub type SmallRectangularGrid = Grid<u8>;
pub type MediumRectangularGrid = Grid<u16>;
pub type LargeRectangularGrid = Grid<u32>;

/// Grid constructors. `None` when a dimension is zero or the cell count cannot
/// be indexed by the grid's index type.
pub fn small_rect_grid(
    row_width: RowLength,
    column_height: ColumnLength,
) -> Option<SmallRectangularGrid> {
    if valid_dimensions(row_width, column_height, u8::MAX as usize) {
        Some(SmallRectangularGrid::new(row_width, column_height))
    } else {
        None
    }
}

pub fn medium_rect_grid(
    row_width: RowLength,
    column_height: ColumnLength,
) -> Option<MediumRectangularGrid> {
    if valid_dimensions(row_width, column_height, u16::MAX as usize) {
        Some(MediumRectangularGrid::new(row_width, column_height))
    } else {
        None
    }
}

pub fn large_rect_grid(
    row_width: RowLength,
    column_height: ColumnLength,
) -> Option<LargeRectangularGrid> {
    if valid_dimensions(row_width, column_height, u32::MAX as usize) {
        Some(LargeRectangularGrid::new(row_width, column_height))
    } else {
        None
    }
}

fn valid_dimensions(row_width: RowLength, column_height: ColumnLength, max_cells: usize) -> bool {
    let (RowLength(w), ColumnLength(h)) = (row_width, column_height);
    w > 0 && h > 0 && w.checked_mul(h).map_or(false, |cells| cells <= max_cells)
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn zero_sized_grids_are_rejected() {
        assert!(small_rect_grid(RowLength(0), ColumnLength(4)).is_none());
        assert!(small_rect_grid(RowLength(4), ColumnLength(0)).is_none());
        assert!(large_rect_grid(RowLength(0), ColumnLength(0)).is_none());
    }

    #[test]
    fn grids_too_large_for_the_index_type_are_rejected() {
        assert!(small_rect_grid(RowLength(16), ColumnLength(16)).is_none());
        assert!(medium_rect_grid(RowLength(256), ColumnLength(256)).is_none());
        assert!(large_rect_grid(RowLength(256), ColumnLength(256)).is_some());
    }

    #[test]
    fn single_cell_grid_is_valid() {
        let g = small_rect_grid(RowLength(1), ColumnLength(1)).unwrap();
        assert_eq!(g.size(), 1);
        assert_eq!(g.links_count(), 0);
    }
}
