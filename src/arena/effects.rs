//! Food consumption and its effects.

use super::events::TickEvent;
use super::food::{place_food, Food, FoodKind, SpecialKind};
use super::snake::{Snake, SnakeId};
use super::state::MatchState;
use crate::core::constants::{
    BONUS_FOOD_GROWTH, BONUS_FOOD_SCORE, INVISIBLE_DURATION_MS, NORMAL_FOOD_BOOST_DISCOUNT,
    NORMAL_FOOD_SCORE, NORMAL_FOOD_SPEED_FACTOR, POISON_SCORE_PENALTY, POISON_TRUNCATE,
};
use rand::Rng;

/// Resolve every food under a live head.
///
/// Foods are scanned in list order; for each one the first live snake in
/// `snakes` order whose head sits on it eats it. Removals are applied after
/// the scan, then replacement normal food is placed.
pub fn resolve_food<R: Rng + ?Sized>(
    snakes: &mut [Snake],
    foods: &mut Vec<Food>,
    state: &mut MatchState,
    grid: i16,
    rng: &mut R,
) -> Vec<TickEvent> {
    let mut events = Vec::new();
    let mut eaten: Vec<usize> = Vec::new();

    for (food_index, food) in foods.iter().enumerate() {
        let Some(eater) = snakes
            .iter_mut()
            .find(|s| s.alive && !s.is_empty() && s.head() == food.position)
        else {
            continue;
        };

        apply_effect(eater, food.kind, state);
        eaten.push(food_index);
        events.push(TickEvent::FoodEaten {
            by: eater.id,
            kind: food.kind,
            at: food.position,
        });
    }

    if eaten.is_empty() {
        return events;
    }

    let replacements = eaten
        .iter()
        .filter(|&&i| foods[i].kind == FoodKind::Normal)
        .count();

    let mut index = 0;
    foods.retain(|_| {
        let keep = !eaten.contains(&index);
        index += 1;
        keep
    });

    for _ in 0..replacements {
        if let Some(food) = place_food(
            FoodKind::Normal,
            snakes,
            foods,
            grid,
            state.game_time_ms,
            rng,
        ) {
            events.push(TickEvent::FoodSpawned {
                kind: food.kind,
                at: food.position,
            });
            foods.push(food);
        }
    }

    events
}

/// Apply a single food's effect to its eater and the match.
pub fn apply_effect(eater: &mut Snake, kind: FoodKind, state: &mut MatchState) {
    let is_player = eater.id == SnakeId::Player;

    match kind {
        FoodKind::Normal => {
            eater.pending_growth += 1;
            if is_player {
                state.add_score(NORMAL_FOOD_SCORE);
            }
            eater.speed_factor *= NORMAL_FOOD_SPEED_FACTOR;
            state.discount_boost(NORMAL_FOOD_BOOST_DISCOUNT);
        }
        FoodKind::Special(SpecialKind::Bonus) => {
            if is_player {
                state.add_score(BONUS_FOOD_SCORE);
            }
            eater.pending_growth += BONUS_FOOD_GROWTH;
        }
        FoodKind::Special(SpecialKind::Slow) => {
            state.apply_slow();
        }
        FoodKind::Special(SpecialKind::Poison) => {
            if is_player {
                state.deduct_score(POISON_SCORE_PENALTY);
            }
            eater.truncate_tail(POISON_TRUNCATE);
        }
        FoodKind::Special(SpecialKind::Invisible) => {
            if is_player {
                let ticks = (INVISIBLE_DURATION_MS as f64 / state.tick_interval_ms as f64).round();
                eater.invisible_ticks = (ticks as u32).max(1);
            }
        }
    }
}
