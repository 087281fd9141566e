//! Mindfulness Maze - reach the exit while keeping stress below the limit.
//!
//! Walls raise stress, every step raises it slightly, and lotus spots along
//! the way pause the walk for a short mindfulness prompt that lowers it.

use std::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wellnest_logic::constants::games::{
    MAZE_HEIGHT, MAZE_MAX_STRESS, MAZE_MINDFULNESS_RELIEF, MAZE_MINDFULNESS_SPOTS,
    MAZE_START_STRESS, MAZE_STEP_STRESS, MAZE_WALL_STRESS, MAZE_WIDTH,
};
use wellnest_logic::notify::Notification;

const PROMPTS_JSON: &str = include_str!("../../../../data/mindfulness_prompts.json");

const MIN_SIDE: usize = 5;

/// The bundled mindfulness prompts.
pub fn default_prompts() -> Result<Vec<String>, serde_json::Error> {
    serde_json::from_str(PROMPTS_JSON)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MazeError {
    #[error("maze must be at least 5x5, got {width}x{height}")]
    TooSmall { width: usize, height: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    Wall,
    Path,
    Start,
    End,
    Mindfulness,
}

impl Cell {
    pub fn is_walkable(self) -> bool {
        !matches!(self, Cell::Wall)
    }

    fn glyph(self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Path => '.',
            Cell::Start => 'S',
            Cell::End => 'E',
            Cell::Mindfulness => '*',
        }
    }
}

/// Row-major grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Maze {
    fn filled(width: usize, height: usize, cell: Cell) -> Self {
        Self {
            width,
            height,
            cells: vec![cell; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|c| **c == cell).count()
    }

    pub fn start(&self) -> (usize, usize) {
        (1, 1)
    }

    pub fn end(&self) -> (usize, usize) {
        (self.width - 2, self.height - 2)
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width) {
            let line: String = row.iter().map(|c| c.glyph()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Carve a maze with a guaranteed route down column 1 and along the second
/// to last row, random side passages, and `spots` mindfulness cells placed
/// on open path.
pub fn generate_maze<R: Rng>(
    width: usize,
    height: usize,
    spots: usize,
    rng: &mut R,
) -> Result<Maze, MazeError> {
    if width < MIN_SIDE || height < MIN_SIDE {
        return Err(MazeError::TooSmall { width, height });
    }
    let mut maze = Maze::filled(width, height, Cell::Wall);

    for y in 0..height {
        maze.set(1, y, Cell::Path);
    }
    for x in 1..width - 1 {
        maze.set(x, height - 2, Cell::Path);
    }

    // side passages
    for y in (2..height - 2).step_by(2) {
        for x in (3..width - 1).step_by(2) {
            if rng.gen_bool(0.7) {
                maze.set(x, y, Cell::Path);
            }
        }
    }
    // vertical connections
    for y in (3..height - 3).step_by(2) {
        for x in (2..width - 2).step_by(2) {
            if rng.gen_bool(0.5) {
                maze.set(x, y, Cell::Path);
                maze.set(x, y + 1, Cell::Path);
            }
        }
    }
    // horizontal connections
    for y in (2..height - 2).step_by(2) {
        for x in (3..width - 3).step_by(2) {
            if rng.gen_bool(0.7) {
                maze.set(x, y, Cell::Path);
                maze.set(x + 1, y, Cell::Path);
            }
        }
    }

    let (sx, sy) = maze.start();
    let (ex, ey) = maze.end();
    maze.set(sx, sy, Cell::Start);
    maze.set(ex, ey, Cell::End);

    let open: Vec<(usize, usize)> = (1..height - 1)
        .flat_map(|y| (1..width - 1).map(move |x| (x, y)))
        .filter(|&(x, y)| maze.get(x, y) == Some(Cell::Path))
        .collect();
    for &(x, y) in open.choose_multiple(rng, spots) {
        maze.set(x, y, Cell::Mindfulness);
    }

    Ok(maze)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn step(self, (x, y): (usize, usize)) -> Option<(usize, usize)> {
        match self {
            Direction::Up => Some((x, y.checked_sub(1)?)),
            Direction::Down => Some((x, y + 1)),
            Direction::Left => Some((x.checked_sub(1)?, y)),
            Direction::Right => Some((x + 1, y)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MazePhase {
    NotStarted,
    Exploring,
    Won,
    Lost,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Off the grid, paused for a prompt, or not exploring.
    Ignored,
    /// Walked into a wall.
    Blocked,
    Moved,
    /// Stepped on a mindfulness spot; the prompt must be completed first.
    Mindfulness(String),
    Won(Notification),
    Lost(Notification),
}

pub struct MazeGame {
    maze: Option<Maze>,
    prompts: Vec<String>,
    rng: StdRng,
    player: (usize, usize),
    stress: u32,
    mindfulness_completed: u32,
    prompt: Option<String>,
    phase: MazePhase,
}

impl MazeGame {
    pub fn new(prompts: Vec<String>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            maze: None,
            prompts,
            rng,
            player: (1, 1),
            stress: MAZE_START_STRESS,
            mindfulness_completed: 0,
            prompt: None,
            phase: MazePhase::NotStarted,
        }
    }

    /// Generate a fresh maze and reset the walk.
    pub fn start(&mut self) -> Result<Notification, MazeError> {
        let maze = generate_maze(MAZE_WIDTH, MAZE_HEIGHT, MAZE_MINDFULNESS_SPOTS, &mut self.rng)?;
        self.player = maze.start();
        self.maze = Some(maze);
        self.stress = MAZE_START_STRESS;
        self.mindfulness_completed = 0;
        self.prompt = None;
        self.phase = MazePhase::Exploring;
        Ok(Notification::info(
            "Maze Started!",
            "Find your way through while practicing mindfulness",
        ))
    }

    pub fn move_player(&mut self, direction: Direction) -> MoveOutcome {
        if self.phase != MazePhase::Exploring || self.prompt.is_some() {
            return MoveOutcome::Ignored;
        }
        let Some(maze) = self.maze.as_mut() else {
            return MoveOutcome::Ignored;
        };
        let Some((x, y)) = direction.step(self.player) else {
            return MoveOutcome::Ignored;
        };
        let Some(cell) = maze.get(x, y) else {
            return MoveOutcome::Ignored;
        };

        match cell {
            Cell::Wall => {
                self.raise_stress(MAZE_WALL_STRESS);
                return self.check_stress().unwrap_or(MoveOutcome::Blocked);
            }
            Cell::End => {
                self.player = (x, y);
                self.phase = MazePhase::Won;
                log::info!(
                    "Maze solved with {} mindfulness practices",
                    self.mindfulness_completed
                );
                return MoveOutcome::Won(Notification::info(
                    "Congratulations!",
                    format!(
                        "You've completed the maze with {} mindfulness practices!",
                        self.mindfulness_completed
                    ),
                ));
            }
            Cell::Mindfulness => {
                maze.set(x, y, Cell::Path);
                let prompt = self
                    .prompts
                    .choose(&mut self.rng)
                    .cloned()
                    .unwrap_or_else(|| "Take a slow, deep breath.".to_string());
                self.prompt = Some(prompt);
            }
            Cell::Path | Cell::Start => {}
        }

        self.player = (x, y);
        self.raise_stress(MAZE_STEP_STRESS);
        if let Some(lost) = self.check_stress() {
            return lost;
        }
        match &self.prompt {
            Some(prompt) => MoveOutcome::Mindfulness(prompt.clone()),
            None => MoveOutcome::Moved,
        }
    }

    /// Finish the prompt on screen. `None` when no prompt is showing.
    pub fn complete_mindfulness(&mut self) -> Option<Notification> {
        self.prompt.take()?;
        self.mindfulness_completed += 1;
        self.stress = self.stress.saturating_sub(MAZE_MINDFULNESS_RELIEF);
        Some(Notification::info(
            "Mindfulness Practice Complete",
            "Your stress level has decreased!",
        ))
    }

    fn raise_stress(&mut self, amount: u32) {
        self.stress = (self.stress + amount).min(MAZE_MAX_STRESS);
    }

    fn check_stress(&mut self) -> Option<MoveOutcome> {
        if self.stress < MAZE_MAX_STRESS {
            return None;
        }
        self.phase = MazePhase::Lost;
        self.prompt = None;
        log::info!("Maze lost to stress");
        Some(MoveOutcome::Lost(Notification::destructive(
            "Game Over",
            "Your stress level got too high!",
        )))
    }

    pub fn maze(&self) -> Option<&Maze> {
        self.maze.as_ref()
    }

    pub fn player(&self) -> (usize, usize) {
        self.player
    }

    pub fn stress(&self) -> u32 {
        self.stress
    }

    pub fn mindfulness_completed(&self) -> u32 {
        self.mindfulness_completed
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn phase(&self) -> MazePhase {
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(seed: u64) -> MazeGame {
        let mut game = MazeGame::new(default_prompts().unwrap(), Some(seed));
        game.start().unwrap();
        game
    }

    /// Step in `direction`, finishing any prompt met on the way.
    fn walk(game: &mut MazeGame, direction: Direction) -> MoveOutcome {
        let outcome = game.move_player(direction);
        if let MoveOutcome::Mindfulness(_) = outcome {
            assert!(game.complete_mindfulness().is_some());
        }
        outcome
    }

    #[test]
    fn test_generated_layout() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let maze = generate_maze(15, 15, 5, &mut rng).unwrap();
            assert_eq!(maze.get(1, 1), Some(Cell::Start));
            assert_eq!(maze.get(13, 13), Some(Cell::End));
            assert_eq!(maze.count(Cell::Mindfulness), 5);
            for y in 0..15 {
                assert_eq!(maze.get(0, y), Some(Cell::Wall));
                assert!(maze.get(1, y).unwrap().is_walkable());
            }
            for x in 1..14 {
                assert!(maze.get(x, 13).unwrap().is_walkable());
            }
        }
    }

    #[test]
    fn test_too_small() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            generate_maze(4, 9, 1, &mut rng),
            Err(MazeError::TooSmall { width: 4, height: 9 })
        );
    }

    #[test]
    fn test_walls_block_and_stress() {
        let mut game = started(3);
        assert_eq!(game.move_player(Direction::Left), MoveOutcome::Blocked);
        assert_eq!(game.player(), (1, 1));
        assert_eq!(game.stress(), 55);
    }

    #[test]
    fn test_walk_to_exit() {
        let mut game = started(8);
        for _ in 0..12 {
            walk(&mut game, Direction::Down);
        }
        assert_eq!(game.player(), (1, 13));

        let mut last = MoveOutcome::Ignored;
        for _ in 0..12 {
            last = walk(&mut game, Direction::Right);
        }
        assert!(matches!(last, MoveOutcome::Won(_)));
        assert_eq!(game.phase(), MazePhase::Won);
        assert_eq!(game.player(), (13, 13));
        assert_eq!(game.move_player(Direction::Up), MoveOutcome::Ignored);
    }

    #[test]
    fn test_prompt_pauses_moves() {
        let mut game = started(21);
        let maze = game.maze().unwrap().clone();
        let spot = (1..14).find(|y| maze.get(1, *y) == Some(Cell::Mindfulness));

        // with a lotus on the entry column, the walk stops there
        if let Some(spot_y) = spot {
            for _ in 1..spot_y - 1 {
                assert_eq!(game.move_player(Direction::Down), MoveOutcome::Moved);
            }
            assert!(matches!(game.move_player(Direction::Down), MoveOutcome::Mindfulness(_)));
            assert!(game.prompt().is_some());
            assert_eq!(game.move_player(Direction::Down), MoveOutcome::Ignored);

            let stress = game.stress();
            game.complete_mindfulness().unwrap();
            assert_eq!(game.stress(), stress - 15);
            assert_eq!(game.mindfulness_completed(), 1);
            assert_eq!(game.maze().unwrap().get(1, spot_y), Some(Cell::Path));
        }
        assert!(game.complete_mindfulness().is_none());
    }

    #[test]
    fn test_stress_limit_loses() {
        let mut game = started(4);
        let mut outcome = MoveOutcome::Ignored;
        for _ in 0..10 {
            outcome = game.move_player(Direction::Left);
        }
        assert!(matches!(outcome, MoveOutcome::Lost(_)));
        assert_eq!(game.stress(), 100);
        assert_eq!(game.phase(), MazePhase::Lost);
        assert_eq!(game.move_player(Direction::Down), MoveOutcome::Ignored);
    }
}
