//! Grid snake game driven by the terminal session.
//!
//! The game is a plain state machine: the terminal view owns the tick timer and keyboard
//! listeners and feeds them into [`SnakeGame::tick`] and [`SnakeGame::steer`].

use std::collections::VecDeque;

use desktop_app_contract::SurfaceSize;
use platform_host::EntropySource;

/// Edge length of one grid cell in CSS pixels.
pub const CELL_SIZE_PX: i32 = 16;
/// Delay between two game steps.
pub const TICK_INTERVAL_MS: u64 = 120;
/// Random draws tried before food falls back to the origin cell.
pub const FOOD_PLACEMENT_ATTEMPTS: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Size of the playing field in cells. Never smaller than 1×1.
pub struct GridSize {
    /// Number of columns.
    pub cols: i32,
    /// Number of rows.
    pub rows: i32,
}

impl GridSize {
    /// Creates a grid, raising each axis to at least one cell.
    pub fn new(cols: i32, rows: i32) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
        }
    }

    /// Number of whole cells that fit on a pixel surface.
    pub fn from_surface(surface: SurfaceSize) -> Self {
        Self::new(surface.width / CELL_SIZE_PX, surface.height / CELL_SIZE_PX)
    }

    /// Returns whether `cell` lies inside `[0, cols) × [0, rows)`.
    pub fn contains(self, cell: Cell) -> bool {
        (0..self.cols).contains(&cell.x) && (0..self.rows).contains(&cell.y)
    }

    /// Moves `cell` onto the nearest in-bounds cell.
    pub fn clamp(self, cell: Cell) -> Cell {
        Cell {
            x: cell.x.clamp(0, self.cols - 1),
            y: cell.y.clamp(0, self.rows - 1),
        }
    }

    /// Pixel size of a canvas that draws exactly this grid.
    pub fn pixel_size(self) -> SurfaceSize {
        SurfaceSize::new(self.cols * CELL_SIZE_PX, self.rows * CELL_SIZE_PX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Grid coordinate.
pub struct Cell {
    /// Column index.
    pub x: i32,
    /// Row index.
    pub y: i32,
}

impl Cell {
    /// Creates a cell.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Heading of the snake.
pub enum Direction {
    /// Towards row 0.
    Up,
    /// Towards the last row.
    Down,
    /// Towards column 0.
    Left,
    /// Towards the last column.
    Right,
}

impl Direction {
    /// Unit step in grid coordinates.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// The direction pointing the other way.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Whether the game still accepts ticks.
pub enum GameStatus {
    /// Ticks advance the snake.
    Running,
    /// The snake hit a wall or itself, or the player quit.
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Result of one [`SnakeGame::tick`].
pub enum TickOutcome {
    /// The snake advanced one cell.
    Moved,
    /// The snake advanced onto the food and grew.
    Ate,
    /// The step would leave the grid or bite the snake; the game is over.
    GameOver,
    /// The game had already ended.
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Snake game state.
pub struct SnakeGame {
    grid: GridSize,
    snake: VecDeque<Cell>,
    direction: Direction,
    heading: Direction,
    food: Cell,
    score: u32,
    status: GameStatus,
}

impl SnakeGame {
    /// Starts a game with a one-cell snake in the middle of the grid, moving right.
    pub fn new(grid: GridSize, entropy: &dyn EntropySource) -> Self {
        let head = Cell::new(grid.cols / 2, grid.rows / 2);
        let mut game = Self {
            grid,
            snake: VecDeque::from([head]),
            direction: Direction::Right,
            heading: Direction::Right,
            food: Cell::new(0, 0),
            score: 0,
            status: GameStatus::Running,
        };
        game.food = game.place_food(entropy);
        game
    }

    #[cfg(test)]
    pub(crate) fn with_layout(
        grid: GridSize,
        snake: impl IntoIterator<Item = Cell>,
        direction: Direction,
        food: Cell,
    ) -> Self {
        Self {
            grid,
            snake: snake.into_iter().collect(),
            direction,
            heading: direction,
            food,
            score: 0,
            status: GameStatus::Running,
        }
    }

    /// Current grid size.
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Snake cells, head first.
    pub fn snake(&self) -> impl Iterator<Item = Cell> + '_ {
        self.snake.iter().copied()
    }

    /// Head cell.
    pub fn head(&self) -> Option<Cell> {
        self.snake.front().copied()
    }

    /// Direction the next tick will move in.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Food cell.
    pub fn food(&self) -> Cell {
        self.food
    }

    /// Food eaten so far.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Running or over.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns whether ticks still advance the game.
    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    /// Requests a new direction. Turning straight back onto the last step is rejected.
    ///
    /// Returns whether the request was accepted.
    pub fn steer(&mut self, direction: Direction) -> bool {
        if !self.is_running() || direction == self.heading.opposite() {
            return false;
        }
        self.direction = direction;
        true
    }

    /// Advances the snake by one cell.
    pub fn tick(&mut self, entropy: &dyn EntropySource) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Stopped;
        }
        let Some(head) = self.head() else {
            self.status = GameStatus::GameOver;
            return TickOutcome::GameOver;
        };

        let next = head.step(self.direction);
        // The tail still counts: it only moves out after the head has moved in.
        if !self.grid.contains(next) || self.snake.contains(&next) {
            self.status = GameStatus::GameOver;
            return TickOutcome::GameOver;
        }

        self.snake.push_front(next);
        self.heading = self.direction;
        if next == self.food {
            self.score += 1;
            self.food = self.place_food(entropy);
            TickOutcome::Ate
        } else {
            self.snake.pop_back();
            TickOutcome::Moved
        }
    }

    /// Fits the game onto a new grid.
    ///
    /// The head is clamped into bounds. The body is cut at the first segment that was out of
    /// bounds or that would overlap the clamped head, so what remains is an unmoved run of the
    /// old body and the next step can only collide where it would have without the resize.
    /// Food is clamped too and placed again when it lands on the snake.
    pub fn resize(&mut self, grid: GridSize, entropy: &dyn EntropySource) {
        self.grid = grid;
        if let Some(head) = self.head().map(|cell| grid.clamp(cell)) {
            let mut kept = VecDeque::with_capacity(self.snake.len());
            kept.push_back(head);
            for cell in self.snake.iter().skip(1) {
                if !grid.contains(*cell) || *cell == head {
                    break;
                }
                kept.push_back(*cell);
            }
            self.snake = kept;
        }

        self.food = grid.clamp(self.food);
        if self.snake.contains(&self.food) {
            self.food = self.place_food(entropy);
        }
    }

    /// Stops the game and returns the final score.
    pub fn end(&mut self) -> u32 {
        self.status = GameStatus::GameOver;
        self.score
    }

    fn place_food(&self, entropy: &dyn EntropySource) -> Cell {
        let cols = u32::try_from(self.grid.cols).unwrap_or(1);
        let rows = u32::try_from(self.grid.rows).unwrap_or(1);
        for _ in 0..FOOD_PLACEMENT_ATTEMPTS {
            let candidate = Cell::new(entropy.below(cols) as i32, entropy.below(rows) as i32);
            if !self.snake.contains(&candidate) {
                return candidate;
            }
        }
        self.grid.clamp(Cell::new(0, 0))
    }
}
