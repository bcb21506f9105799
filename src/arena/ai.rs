//! AI opponent: per-difficulty steering and grid pathfinding.

use super::food::Food;
use super::snake::Snake;
use super::types::{Cell, Difficulty, Direction};
use crate::core::constants::{EASY_EDGE_MARGIN, EASY_RANDOM_TURN_CHANCE, NORMAL_NOISE_CHANCE};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{HashMap, HashSet, VecDeque};

/// Steering brain attached to a snake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiController {
    pub difficulty: Difficulty,
}

impl AiController {
    pub fn new(difficulty: Difficulty) -> Self {
        Self { difficulty }
    }

    /// Pick a direction for `me` this tick. Always returns something; search
    /// failure falls back to the current heading or a random free neighbour.
    ///
    /// `snakes` is every snake in the match (including `me`); all live
    /// segments count as obstacles for the search.
    pub fn decide<R: Rng + ?Sized>(
        &self,
        me: &Snake,
        snakes: &[Snake],
        foods: &[Food],
        grid: i16,
        rng: &mut R,
    ) -> Direction {
        match self.difficulty {
            Difficulty::Easy => wander(me, grid, rng),
            Difficulty::Normal if rng.gen_bool(NORMAL_NOISE_CHANCE) => Direction::random(rng),
            Difficulty::Normal | Difficulty::Hard => seek_food(me, snakes, foods, grid, rng),
        }
    }
}

/// Easy play: occasional random turns, pushed back from the edges.
fn wander<R: Rng + ?Sized>(me: &Snake, grid: i16, rng: &mut R) -> Direction {
    let mut direction = me.direction;
    if rng.gen_bool(EASY_RANDOM_TURN_CHANCE) {
        direction = Direction::random(rng);
    }
    inward_direction(me, grid).unwrap_or(direction)
}

/// Direction pointing away from any edge within the margin, or `None` when
/// the head is clear of all edges. Never the reverse of the current heading.
pub fn inward_direction(me: &Snake, grid: i16) -> Option<Direction> {
    let head = me.head();
    let mut candidates = Vec::new();
    if head.x < EASY_EDGE_MARGIN {
        candidates.push(Direction::Right);
    }
    if head.x >= grid - EASY_EDGE_MARGIN {
        candidates.push(Direction::Left);
    }
    if head.y < EASY_EDGE_MARGIN {
        candidates.push(Direction::Down);
    }
    if head.y >= grid - EASY_EDGE_MARGIN {
        candidates.push(Direction::Up);
    }
    if candidates.is_empty() {
        return None;
    }

    let reverse = me.direction.opposite();
    if let Some(&direction) = candidates.iter().find(|&&d| d != reverse) {
        return Some(direction);
    }

    // Only inward move is a reversal: turn toward the center on the other axis
    let center = grid / 2;
    Some(match me.direction {
        Direction::Left | Direction::Right if head.y < center => Direction::Down,
        Direction::Left | Direction::Right => Direction::Up,
        _ if head.x < center => Direction::Right,
        _ => Direction::Left,
    })
}

/// Path toward the nearest food, or an escape move when there is none.
fn seek_food<R: Rng + ?Sized>(
    me: &Snake,
    snakes: &[Snake],
    foods: &[Food],
    grid: i16,
    rng: &mut R,
) -> Direction {
    let head = me.head();
    let obstacles = occupied_cells(snakes);

    if let Some(target) = nearest_food(head, foods) {
        match find_path(head, target, &obstacles, grid) {
            Some(path) if path.len() >= 2 => {
                if let Some(direction) = Direction::toward(path[0], path[1]) {
                    return direction;
                }
            }
            Some(_) => {}
            None => tracing::trace!(?head, ?target, "ai found no path"),
        }
    }

    escape_direction(me, &obstacles, grid, rng)
}

/// Keep heading if the next cell is free, otherwise pick a random free
/// neighbour. With nowhere to go the heading is kept.
fn escape_direction<R: Rng + ?Sized>(
    me: &Snake,
    obstacles: &HashSet<Cell>,
    grid: i16,
    rng: &mut R,
) -> Direction {
    let head = me.head();
    let is_free = |d: Direction| {
        let next = head.offset(d);
        next.inside(grid) && !obstacles.contains(&next)
    };

    if is_free(me.direction) {
        return me.direction;
    }

    let reverse = me.direction.opposite();
    let options: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|&d| d != reverse && is_free(d))
        .collect();
    options.choose(rng).copied().unwrap_or(me.direction)
}

/// Every segment of every live snake.
pub fn occupied_cells(snakes: &[Snake]) -> HashSet<Cell> {
    snakes
        .iter()
        .filter(|s| s.alive)
        .flat_map(|s| s.body.iter().copied())
        .collect()
}

/// Nearest food by Manhattan distance; ties go to the earlier food.
pub fn nearest_food(from: Cell, foods: &[Food]) -> Option<Cell> {
    foods
        .iter()
        .min_by_key(|f| from.manhattan(f.position))
        .map(|f| f.position)
}

/// BFS shortest path over the 4-connected grid.
///
/// Cells in `obstacles` are impassable except `goal`, which is always
/// enterable. The returned path includes both endpoints. Returns `None`
/// when the goal cannot be reached.
pub fn find_path(
    start: Cell,
    goal: Cell,
    obstacles: &HashSet<Cell>,
    grid: i16,
) -> Option<Vec<Cell>> {
    if start == goal {
        return Some(vec![start]);
    }

    let mut came_from: HashMap<Cell, Cell> = HashMap::new();
    let mut visited: HashSet<Cell> = HashSet::new();
    let mut queue: VecDeque<Cell> = VecDeque::new();

    visited.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for direction in Direction::ALL {
            let next = current.offset(direction);
            if !next.inside(grid) || visited.contains(&next) {
                continue;
            }
            if next != goal && obstacles.contains(&next) {
                continue;
            }

            visited.insert(next);
            came_from.insert(next, current);

            if next == goal {
                return Some(rebuild_path(&came_from, start, goal));
            }
            queue.push_back(next);
        }
    }

    None
}

fn rebuild_path(came_from: &HashMap<Cell, Cell>, start: Cell, goal: Cell) -> Vec<Cell> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        match came_from.get(&current) {
            Some(&previous) => {
                path.push(previous);
                current = previous;
            }
            None => break,
        }
    }
    path.reverse();
    path
}
