//! Food items and the spawner that places them.

use super::snake::Snake;
use super::types::Cell;
use crate::core::constants::MAX_PLACEMENT_ATTEMPTS;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Special food subtypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecialKind {
    Bonus,
    Slow,
    Poison,
    Invisible,
}

impl SpecialKind {
    pub const ALL: [SpecialKind; 4] = [
        SpecialKind::Bonus,
        SpecialKind::Slow,
        SpecialKind::Poison,
        SpecialKind::Invisible,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bonus => "bonus",
            Self::Slow => "slow",
            Self::Poison => "poison",
            Self::Invisible => "invisible",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodKind {
    Normal,
    Special(SpecialKind),
}

impl FoodKind {
    pub fn is_special(&self) -> bool {
        matches!(self, Self::Special(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub position: Cell,
    pub kind: FoodKind,
    /// Match clock (ms) when the food was placed.
    #[serde(default)]
    pub spawned_at_ms: u64,
}

impl Food {
    pub fn new(position: Cell, kind: FoodKind) -> Self {
        Self {
            position,
            kind,
            spawned_at_ms: 0,
        }
    }
}

/// Find a random free cell and place food of `kind` there.
///
/// A cell is free when no live snake segment and no other food occupies it.
/// Gives up after a fixed number of samples and returns `None`; callers
/// treat that as "no spawn this time".
pub fn place_food<R: Rng + ?Sized>(
    kind: FoodKind,
    snakes: &[Snake],
    foods: &[Food],
    grid: i16,
    now_ms: u64,
    rng: &mut R,
) -> Option<Food> {
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let cell = Cell::new(rng.gen_range(0..grid), rng.gen_range(0..grid));
        let on_snake = snakes
            .iter()
            .filter(|s| s.alive)
            .any(|s| s.body.contains(&cell));
        let on_food = foods.iter().any(|f| f.position == cell);
        if !on_snake && !on_food {
            return Some(Food {
                position: cell,
                kind,
                spawned_at_ms: now_ms,
            });
        }
    }

    tracing::debug!(?kind, attempts = MAX_PLACEMENT_ATTEMPTS, "food placement exhausted");
    None
}

/// Place a special food with a uniformly chosen subtype.
pub fn place_special<R: Rng + ?Sized>(
    snakes: &[Snake],
    foods: &[Food],
    grid: i16,
    now_ms: u64,
    rng: &mut R,
) -> Option<Food> {
    let subtype = SpecialKind::random(rng);
    place_food(FoodKind::Special(subtype), snakes, foods, grid, now_ms, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::snake::SnakeId;
    use crate::arena::types::Direction;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_place_food_avoids_snakes_and_food() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let snakes = vec![Snake::spawn_player(10), Snake::spawn_ai()];
        let mut foods = Vec::new();
        for _ in 0..20 {
            let food = place_food(FoodKind::Normal, &snakes, &foods, 10, 0, &mut rng)
                .expect("plenty of room");
            assert!(food.position.inside(10));
            assert!(snakes.iter().all(|s| !s.body.contains(&food.position)));
            assert!(foods.iter().all(|f: &Food| f.position != food.position));
            foods.push(food);
        }
    }

    #[test]
    fn test_place_food_ignores_dead_snakes() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        // A dead snake covering the only cell of a 1x1 grid does not block it
        let mut corpse = Snake::new(SnakeId::Ai, [Cell::new(0, 0)], Direction::Right);
        corpse.alive = false;

        let food = place_food(FoodKind::Normal, &[corpse], &[], 1, 0, &mut rng);
        assert_eq!(food.map(|f| f.position), Some(Cell::new(0, 0)));
    }

    #[test]
    fn test_place_food_exhaustion_returns_none() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        // 2x2 grid fully covered by a live snake
        let snake = Snake::new(
            SnakeId::Player,
            [
                Cell::new(0, 0),
                Cell::new(1, 0),
                Cell::new(1, 1),
                Cell::new(0, 1),
            ],
            Direction::Up,
        );

        assert!(place_food(FoodKind::Normal, &[snake], &[], 2, 0, &mut rng).is_none());
    }

    #[test]
    fn test_place_special_records_spawn_time() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let food = place_special(&[], &[], 30, 12_345, &mut rng).expect("empty grid");
        assert!(food.kind.is_special());
        assert_eq!(food.spawned_at_ms, 12_345);
    }

    #[test]
    fn test_special_subtypes_all_reachable() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(SpecialKind::random(&mut rng));
        }
        assert_eq!(seen.len(), SpecialKind::ALL.len());
    }
}
