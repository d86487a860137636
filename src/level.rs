//! Level geometry and game state for the gravity-flip maze game.
//!
//! Everything here is plain data: the physics engine that integrates the
//! bodies and detects the ball/goal collision lives downstream. The layout
//! lists rigid bodies exactly as the game stages them - static border and
//! maze walls, a static goal region in the bottom right cell and a dynamic
//! ball in the top left cell.

use std::fmt;

use crate::passages::PassageMatrices;
use crate::units::{ColumnIndex, RowIndex};

/// Ball speed set on a key press, in pixels per tick.
pub const BALL_SPEED: f64 = 7.0;
/// Maze wall segment thickness in pixels.
pub const WALL_THICKNESS: f64 = 10.0;
/// Screen border wall thickness in pixels.
pub const BORDER_THICKNESS: f64 = 2.0;
/// The goal rectangle's size as a fraction of its cell.
pub const GOAL_SCALE: f64 = 0.7;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Vec2 {
        Vec2 { x, y }
    }

    pub fn zero() -> Vec2 {
        Vec2 { x: 0.0, y: 0.0 }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BodyLabel {
    Border,
    Wall,
    Goal,
    Ball,
}

impl fmt::Display for BodyLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match *self {
            BodyLabel::Border => "border",
            BodyLabel::Wall => "wall",
            BodyLabel::Goal => "goal",
            BodyLabel::Ball => "ball",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum BodyShape {
    Rectangle { width: f64, height: f64 },
    Circle { radius: f64 },
}

/// One rigid body for the downstream physics engine, positioned by its centre.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Body {
    pub label: BodyLabel,
    pub position: Vec2,
    pub shape: BodyShape,
    pub is_static: bool,
}

/// Pixel size of the play field.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LevelDimensions {
    pub width: f64,
    pub height: f64,
}

/// The staged level: every rigid body plus the cell unit lengths wall
/// placement derived them from.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelLayout {
    dimensions: LevelDimensions,
    unit_length_x: f64,
    unit_length_y: f64,
    bodies: Vec<Body>,
}

impl LevelLayout {
    /// Place walls for every closed passage, the goal and the ball.
    ///
    /// A closed `horizontal[r][c]` puts a wall one cell wide under cell
    /// (r, c); a closed `vertical[r][c]` puts a wall one cell high to the
    /// right of cell (r, c). The four screen borders are always present.
    pub fn build(passages: &PassageMatrices, dimensions: LevelDimensions) -> LevelLayout {
        let rows = passages.rows().0;
        let columns = passages.columns().0;
        let unit_length_x = dimensions.width / columns as f64;
        let unit_length_y = dimensions.height / rows as f64;

        let mut bodies = Vec::new();

        let LevelDimensions { width, height } = dimensions;
        let border = |x, y, w, h| Body {
            label: BodyLabel::Border,
            position: Vec2::new(x, y),
            shape: BodyShape::Rectangle {
                width: w,
                height: h,
            },
            is_static: true,
        };
        bodies.push(border(width / 2.0, 0.0, width, BORDER_THICKNESS));
        bodies.push(border(width / 2.0, height, width, BORDER_THICKNESS));
        bodies.push(border(0.0, height / 2.0, BORDER_THICKNESS, height));
        bodies.push(border(width, height / 2.0, BORDER_THICKNESS, height));

        for r in 0..rows.saturating_sub(1) {
            for c in 0..columns {
                if passages.is_open_south(RowIndex(r), ColumnIndex(c)) {
                    continue;
                }
                bodies.push(Body {
                    label: BodyLabel::Wall,
                    position: Vec2::new(
                        c as f64 * unit_length_x + unit_length_x / 2.0,
                        r as f64 * unit_length_y + unit_length_y,
                    ),
                    shape: BodyShape::Rectangle {
                        width: unit_length_x,
                        height: WALL_THICKNESS,
                    },
                    is_static: true,
                });
            }
        }

        for r in 0..rows {
            for c in 0..columns.saturating_sub(1) {
                if passages.is_open_east(RowIndex(r), ColumnIndex(c)) {
                    continue;
                }
                bodies.push(Body {
                    label: BodyLabel::Wall,
                    position: Vec2::new(
                        c as f64 * unit_length_x + unit_length_x,
                        r as f64 * unit_length_y + unit_length_y / 2.0,
                    ),
                    shape: BodyShape::Rectangle {
                        width: WALL_THICKNESS,
                        height: unit_length_y,
                    },
                    is_static: true,
                });
            }
        }

        // Goal region fills most of the bottom right cell.
        bodies.push(Body {
            label: BodyLabel::Goal,
            position: Vec2::new(width - unit_length_x / 2.0, height - unit_length_y / 2.0),
            shape: BodyShape::Rectangle {
                width: unit_length_x * GOAL_SCALE,
                height: unit_length_y * GOAL_SCALE,
            },
            is_static: true,
        });

        // The ball spawns in the top left cell.
        bodies.push(Body {
            label: BodyLabel::Ball,
            position: Vec2::new(unit_length_x / 2.0, unit_length_y / 2.0),
            shape: BodyShape::Circle {
                radius: unit_length_x.min(unit_length_y) / 4.0,
            },
            is_static: false,
        });

        LevelLayout {
            dimensions,
            unit_length_x,
            unit_length_y,
            bodies,
        }
    }

    #[inline]
    pub fn dimensions(&self) -> LevelDimensions {
        self.dimensions
    }

    #[inline]
    pub fn unit_length_x(&self) -> f64 {
        self.unit_length_x
    }

    #[inline]
    pub fn unit_length_y(&self) -> f64 {
        self.unit_length_y
    }

    #[inline]
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn ball(&self) -> &Body {
        self.bodies
            .iter()
            .find(|body| body.label == BodyLabel::Ball)
            .expect("a built layout always stages a ball")
    }

    pub fn goal(&self) -> &Body {
        self.bodies
            .iter()
            .find(|body| body.label == BodyLabel::Goal)
            .expect("a built layout always stages a goal")
    }

    pub fn walls(&self) -> impl Iterator<Item = &Body> {
        self.bodies
            .iter()
            .filter(|body| body.label == BodyLabel::Wall)
    }

    /// The win condition's side effect on the world: walls and the goal stop
    /// being static so they tumble once gravity turns on.
    fn release_walls_and_goal(&mut self) {
        for body in &mut self.bodies {
            if body.label == BodyLabel::Wall || body.label == BodyLabel::Goal {
                body.is_static = false;
            }
        }
    }
}

/// The four directional inputs steering the ball.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ControlInput {
    Up,
    Down,
    Left,
    Right,
}

impl ControlInput {
    /// Key down: set the controlled axis to the fixed ball speed, leaving the
    /// other axis untouched.
    pub fn press(self, velocity: Vec2) -> Vec2 {
        match self {
            ControlInput::Up => Vec2::new(velocity.x, -BALL_SPEED),
            ControlInput::Down => Vec2::new(velocity.x, BALL_SPEED),
            ControlInput::Left => Vec2::new(-BALL_SPEED, velocity.y),
            ControlInput::Right => Vec2::new(BALL_SPEED, velocity.y),
        }
    }

    /// Key up: zero the controlled axis whatever its sign.
    pub fn release(self, velocity: Vec2) -> Vec2 {
        match self {
            ControlInput::Up | ControlInput::Down => Vec2::new(velocity.x, 0.0),
            ControlInput::Left | ControlInput::Right => Vec2::new(0.0, velocity.y),
        }
    }
}

/// World state toggled by the win condition. The game starts weightless;
/// the ball touching the goal turns gravity on and lets the maze collapse.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    gravity: Vec2,
    won: bool,
}

impl Default for GameState {
    fn default() -> GameState {
        GameState::new()
    }
}

impl GameState {
    pub fn new() -> GameState {
        GameState {
            gravity: Vec2::zero(),
            won: false,
        }
    }

    #[inline]
    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    #[inline]
    pub fn won(&self) -> bool {
        self.won
    }

    /// The ball/goal collision callback. Idempotent.
    pub fn ball_reached_goal(&mut self, layout: &mut LevelLayout) {
        self.won = true;
        self.gravity = Vec2::new(0.0, 1.0);
        layout.release_walls_and_goal();
    }
}

#[cfg(test)]
mod tests {

    use rand::{rngs::SmallRng, SeedableRng};

    use super::*;
    use crate::passages::generate;
    use crate::units::{ColumnsCount, RowsCount};

    fn stage(rows: usize, columns: usize, seed: u64) -> (PassageMatrices, LevelLayout) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let passages = generate(RowsCount(rows), ColumnsCount(columns), &mut rng).unwrap();
        let layout = LevelLayout::build(
            &passages,
            LevelDimensions {
                width: 1500.0,
                height: 1000.0,
            },
        );
        (passages, layout)
    }

    #[test]
    fn unit_lengths_divide_the_play_field() {
        let (_, layout) = stage(10, 15, 1);
        assert_eq!(layout.unit_length_x(), 100.0);
        assert_eq!(layout.unit_length_y(), 100.0);
    }

    #[test]
    fn one_wall_per_closed_passage_plus_borders() {
        let (passages, layout) = stage(10, 15, 2);

        // A spanning tree leaves (cells - 1) passages open out of the
        // (R(C-1) + (R-1)C) total adjacencies; every closed one is a wall.
        let adjacencies = 10 * 14 + 9 * 15;
        let closed = adjacencies - passages.open_passage_count();
        assert_eq!(layout.walls().count(), closed);

        let borders = layout
            .bodies()
            .iter()
            .filter(|b| b.label == BodyLabel::Border)
            .count();
        assert_eq!(borders, 4);
    }

    #[test]
    fn ball_spawns_in_the_top_left_cell() {
        let (_, layout) = stage(10, 15, 3);
        let ball = layout.ball();
        assert_eq!(ball.position, Vec2::new(50.0, 50.0));
        assert_eq!(ball.shape, BodyShape::Circle { radius: 25.0 });
        assert!(!ball.is_static);
    }

    #[test]
    fn goal_fills_most_of_the_bottom_right_cell() {
        let (_, layout) = stage(10, 15, 4);
        let goal = layout.goal();
        assert_eq!(goal.position, Vec2::new(1450.0, 950.0));
        assert_eq!(
            goal.shape,
            BodyShape::Rectangle {
                width: 70.0,
                height: 70.0
            }
        );
        assert!(goal.is_static);
    }

    #[test]
    fn wall_segments_sit_on_cell_boundaries() {
        // A 1x2 maze has one open vertical passage and no walls besides
        // the borders, so carve a 2x1 column grid instead: the single
        // horizontal adjacency is open, again no inner walls. Use a
        // hand-made passages value via from_grid for a closed passage.
        use crate::cells::Cartesian2DCoordinate;
        use crate::grids::small_rect_grid;
        use crate::units::{ColumnLength, RowLength};

        // 2 columns x 2 rows, only the left pair and bottom pair linked:
        // closed passages are east of (1,0)->... i.e. vertical[0][0] is the
        // top pair, horizontal[0][1] is the right pair.
        let mut g = small_rect_grid(RowLength(2), ColumnLength(2)).unwrap();
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        g.link(gc(0, 0), gc(0, 1)).unwrap();
        g.link(gc(0, 1), gc(1, 1)).unwrap();
        let passages = PassageMatrices::from_grid(&g);

        let layout = LevelLayout::build(
            &passages,
            LevelDimensions {
                width: 200.0,
                height: 200.0,
            },
        );

        let walls: Vec<&Body> = layout.walls().collect();
        assert_eq!(walls.len(), 2);

        // Closed horizontal[0][1]: wall under cell (0, 1).
        assert!(walls.contains(&&Body {
            label: BodyLabel::Wall,
            position: Vec2::new(150.0, 100.0),
            shape: BodyShape::Rectangle {
                width: 100.0,
                height: WALL_THICKNESS
            },
            is_static: true,
        }));
        // Closed vertical[0][0]: wall right of cell (0, 0).
        assert!(walls.contains(&&Body {
            label: BodyLabel::Wall,
            position: Vec2::new(100.0, 50.0),
            shape: BodyShape::Rectangle {
                width: WALL_THICKNESS,
                height: 100.0
            },
            is_static: true,
        }));
    }

    #[test]
    fn key_presses_set_the_mapped_axis() {
        let v = Vec2::new(1.0, 2.0);
        assert_eq!(ControlInput::Up.press(v), Vec2::new(1.0, -BALL_SPEED));
        assert_eq!(ControlInput::Down.press(v), Vec2::new(1.0, BALL_SPEED));
        assert_eq!(ControlInput::Left.press(v), Vec2::new(-BALL_SPEED, 2.0));
        assert_eq!(ControlInput::Right.press(v), Vec2::new(BALL_SPEED, 2.0));
    }

    #[test]
    fn key_releases_zero_the_mapped_axis() {
        let v = Vec2::new(-BALL_SPEED, BALL_SPEED);
        assert_eq!(ControlInput::Up.release(v), Vec2::new(-BALL_SPEED, 0.0));
        assert_eq!(ControlInput::Down.release(v), Vec2::new(-BALL_SPEED, 0.0));
        assert_eq!(ControlInput::Left.release(v), Vec2::new(0.0, BALL_SPEED));
        assert_eq!(ControlInput::Right.release(v), Vec2::new(0.0, BALL_SPEED));
    }

    #[test]
    fn winning_flips_gravity_and_releases_the_maze() {
        let (_, mut layout) = stage(4, 4, 6);
        let mut state = GameState::new();
        assert_eq!(state.gravity(), Vec2::zero());
        assert!(!state.won());

        state.ball_reached_goal(&mut layout);
        assert!(state.won());
        assert_eq!(state.gravity(), Vec2::new(0.0, 1.0));
        assert!(layout.walls().all(|wall| !wall.is_static));
        assert!(!layout.goal().is_static);
        // Borders keep the collapsing maze on screen.
        assert!(layout
            .bodies()
            .iter()
            .filter(|b| b.label == BodyLabel::Border)
            .all(|b| b.is_static));
        // The ball stays dynamic.
        assert!(!layout.ball().is_static);

        // Idempotent on repeat collisions.
        let snapshot = layout.clone();
        state.ball_reached_goal(&mut layout);
        assert_eq!(snapshot, layout);
    }
}
