use docopt::Docopt;
use rand::{rngs::SmallRng, SeedableRng};
use serde_derive::Deserialize;
use std::{fs::File, io, io::prelude::*, rc::Rc};
use tiltmaze::{
    cells::{Cartesian2DCoordinate, CoordinateSmallVec},
    generators,
    grid_displays::{GridDisplay, PathDisplay, StartEndPointsDisplay},
    grids::{large_rect_grid, LargeRectangularGrid},
    level::{Body, BodyShape, LevelDimensions, LevelLayout},
    passages::PassageMatrices,
    pathing, units,
};

const USAGE: &str = "Tiltmaze

Usage:
    tiltmaze_driver -h | --help
    tiltmaze_driver [--grid-width=<w> --grid-height=<h>] [--seed=<n>] [--save-edges=<path>]
    tiltmaze_driver render text [--text-out=<path>] [(--show-distances|--show-path)] [--grid-width=<w> --grid-height=<h>] [--seed=<n>] [--save-edges=<path>]
    tiltmaze_driver layout [--level-width=<px> --level-height=<px>] [--layout-out=<path>] [--grid-width=<w> --grid-height=<h>] [--seed=<n>]

Options:
    -h --help              Show this screen.
    --grid-width=<w>       Maze cell columns [default: 15].
    --grid-height=<h>      Maze cell rows [default: 10].
    --seed=<n>             Seed the maze generator for a reproducible maze.
    --text-out=<path>      Output file path for a textual rendering of the maze.
    --show-distances       Show the distance from the start cell to every other cell.
    --show-path            Show the solution path from the start cell to the goal cell.
    --level-width=<px>     Staged level width in pixels [default: 1500].
    --level-height=<px>    Staged level height in pixels [default: 1000].
    --layout-out=<path>    Output file path for the staged level body list.
    --save-edges=<path>    Serialize the maze to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_grid_width: usize,
    flag_grid_height: usize,
    flag_seed: Option<u64>,
    flag_text_out: String,
    flag_show_distances: bool,
    flag_show_path: bool,
    cmd_layout: bool,
    flag_level_width: f64,
    flag_level_height: f64,
    flag_layout_out: String,
    flag_save_edges: String,
}

// We'll put our errors in an `errors` module, and other modules in
// this crate will `use errors::*;` to get access to everything
// `error_chain!` creates.
mod errors {
    // Create the Error, ErrorKind, ResultExt, and Result types
    // Result is a typedef of std `Result` with the error type our own `Error`
    // Defines the From conversions that let try! and ? work for our `Error`.
    // ResultExt adds the `chain_err` trait method.
    use error_chain::*;
    error_chain! {

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {
    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let (width, height) = (args.flag_grid_width, args.flag_grid_height);
    let mut rng = match args.flag_seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    let mut maze_grid = large_rect_grid(units::RowLength(width), units::ColumnLength(height))
        .ok_or("Maze dimensions must be at least 1x1.")?;
    generators::recursive_backtracker(&mut maze_grid, &mut rng);

    if !args.flag_save_edges.is_empty() {
        save_maze_graph(&maze_grid, &args.flag_save_edges)?;
    }

    if args.cmd_layout {
        let passages = PassageMatrices::from_grid(&maze_grid);
        let layout = LevelLayout::build(
            &passages,
            LevelDimensions {
                width: args.flag_level_width,
                height: args.flag_level_height,
            },
        );
        let body_list = layout_body_list(&layout);

        if args.flag_layout_out.is_empty() {
            print!("{}", body_list);
        } else {
            write_text_to_file(&body_list, &args.flag_layout_out).chain_err(|| {
                format!("Failed to write level layout to text file {}", args.flag_layout_out)
            })?;
        }
    } else {
        set_maze_griddisplay(&mut maze_grid, &args)?;

        if args.flag_text_out.is_empty() {
            println!("{}", maze_grid);
        } else {
            write_text_to_file(&format!("{}", maze_grid), &args.flag_text_out)
                .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
        }
    }

    Ok(())
}

/// Decide how the grid should have cells displayed as text
/// - Distances from the start cell to all other cells
/// - The solution path between the start cell and the goal cell
/// - Otherwise just the start and goal cell markers
/// The start is always the ball's cell (top left) and the end the goal's cell
/// (bottom right), matching how the level is staged.
fn set_maze_griddisplay(maze_grid: &mut LargeRectangularGrid, maze_args: &MazeArgs) -> Result<()> {
    let start = Cartesian2DCoordinate::new(0, 0);
    let end = Cartesian2DCoordinate::new(
        (maze_args.flag_grid_width - 1) as u32,
        (maze_args.flag_grid_height - 1) as u32,
    );

    if maze_args.flag_show_distances || maze_args.flag_show_path {
        let distances = Rc::new(
            pathing::Distances::<u32>::new(maze_grid, start)
                .ok_or("Invalid start coordinate from which to show path distances.")?,
        );

        if maze_args.flag_show_distances {
            maze_grid.set_grid_display(Some(distances.clone() as Rc<dyn GridDisplay>));
        } else {
            let path_opt = pathing::shortest_path(maze_grid, &distances, end);

            if let Some(path) = path_opt {
                let display_path = Rc::new(PathDisplay::new(&path));
                maze_grid.set_grid_display(Some(display_path as Rc<dyn GridDisplay>));
            } else {
                // Somehow there is no route, maze generation failed to make a perfect maze
                let display_start_end_points = Rc::new(StartEndPointsDisplay::new(
                    as_coordinate_smallvec(start),
                    as_coordinate_smallvec(end),
                ));
                maze_grid.set_grid_display(Some(display_start_end_points as Rc<dyn GridDisplay>));
            }
        }
    } else {
        let display_start_end_points = Rc::new(StartEndPointsDisplay::new(
            as_coordinate_smallvec(start),
            as_coordinate_smallvec(end),
        ));
        maze_grid.set_grid_display(Some(display_start_end_points as Rc<dyn GridDisplay>));
    }

    Ok(())
}

fn as_coordinate_smallvec(coord: Cartesian2DCoordinate) -> CoordinateSmallVec {
    std::iter::once(coord).collect()
}

/// One body per line: label, centre, shape and whether the physics engine
/// should treat it as static.
fn layout_body_list(layout: &LevelLayout) -> String {
    let mut out = String::new();
    let dimensions = layout.dimensions();
    out.push_str(&format!("level {} {}\n", dimensions.width, dimensions.height));

    for body in layout.bodies() {
        let &Body {
            label,
            position,
            shape,
            is_static,
        } = body;
        let shape_text = match shape {
            BodyShape::Rectangle { width, height } => format!("rect {} {}", width, height),
            BodyShape::Circle { radius } => format!("circle {}", radius),
        };
        let static_text = if is_static { " static" } else { "" };
        out.push_str(&format!(
            "{} {} {} {}{}\n",
            label, position.x, position.y, shape_text, static_text
        ));
    }

    out
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

fn save_maze_graph(maze_grid: &LargeRectangularGrid, file_path: &str) -> Result<()> {
    let mut graph_data = String::new();
    let vertices_count = maze_grid.size();
    let edges_count = maze_grid.links_count();
    graph_data.push_str(vertices_count.to_string().as_ref());
    graph_data.push(' ');
    graph_data.push_str(edges_count.to_string().as_ref());
    graph_data.push('\n');

    for (src, dst) in maze_grid.iter_links() {
        let index_a = maze_grid
            .grid_coordinate_to_index(src)
            .expect("Links iter should give valid coordinate");
        let index_b = maze_grid
            .grid_coordinate_to_index(dst)
            .expect("Links iter should give valid coordinate");
        let src_as_1_based_index = index_a + 1;
        let dst_as_1_based_index = index_b + 1;

        graph_data.push_str(src_as_1_based_index.to_string().as_ref());
        graph_data.push(' ');
        graph_data.push_str(dst_as_1_based_index.to_string().as_ref());
        graph_data.push('\n');
    }

    write_text_to_file(&graph_data, file_path)
        .chain_err(|| format!("Failed to write maze graph to text file {}", file_path))?;

    Ok(())
}
