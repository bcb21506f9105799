//! Collision detection between live snakes.
//!
//! Checks run against the geometry after this tick's steps and food
//! effects. Passes run in a fixed order (self, head-to-head, head-into-body)
//! and a snake killed in one pass no longer participates in later ones.

use super::events::{Death, DeathCause};
use super::snake::Snake;

/// Mark colliding snakes dead and report each transition once.
pub fn resolve_collisions(snakes: &mut [Snake]) -> Vec<Death> {
    let mut deaths = Vec::new();

    // Self-collision
    for snake in snakes.iter_mut().filter(|s| s.alive) {
        if snake.body_contains(snake.head()) {
            snake.alive = false;
            deaths.push(Death {
                id: snake.id,
                cause: DeathCause::SelfBite,
            });
        }
    }

    // Head-to-head
    for i in 0..snakes.len() {
        for j in (i + 1)..snakes.len() {
            if !snakes[i].alive || !snakes[j].alive {
                continue;
            }
            if snakes[i].head() == snakes[j].head() {
                for k in [i, j] {
                    snakes[k].alive = false;
                    deaths.push(Death {
                        id: snakes[k].id,
                        cause: DeathCause::Mutual,
                    });
                }
            }
        }
    }

    // Head-into-body, judged against the survivors of the earlier passes
    let mut rammers = Vec::new();
    for (i, snake) in snakes.iter().enumerate() {
        if !snake.alive {
            continue;
        }
        let head = snake.head();
        let hit = snakes
            .iter()
            .enumerate()
            .any(|(j, other)| j != i && other.alive && other.body_contains(head));
        if hit {
            rammers.push(i);
        }
    }
    for i in rammers {
        snakes[i].alive = false;
        deaths.push(Death {
            id: snakes[i].id,
            cause: DeathCause::Collision,
        });
    }

    for death in &deaths {
        tracing::debug!(snake = death.id.name(), cause = %death.cause, "snake died");
    }

    deaths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::snake::SnakeId;
    use crate::arena::types::{Cell, Direction};

    fn snake(id: SnakeId, points: &[(i16, i16)]) -> Snake {
        Snake::new(id, points.iter().map(|&p| Cell::from(p)), Direction::Up)
    }

    #[test]
    fn test_self_collision_after_u_turn() {
        let mut snakes = vec![snake(SnakeId::Player, &[(10, 10), (10, 11), (10, 9)])];
        // Head revisits a later segment
        snakes[0].body.push_back(Cell::new(10, 10));

        let deaths = resolve_collisions(&mut snakes);

        assert!(!snakes[0].alive);
        assert_eq!(
            deaths,
            vec![Death {
                id: SnakeId::Player,
                cause: DeathCause::SelfBite
            }]
        );
    }

    #[test]
    fn test_no_collision_for_straight_snakes() {
        let mut snakes = vec![
            snake(SnakeId::Player, &[(5, 5), (4, 5), (3, 5)]),
            snake(SnakeId::Ai, &[(5, 8), (4, 8), (3, 8)]),
        ];
        assert!(resolve_collisions(&mut snakes).is_empty());
        assert!(snakes.iter().all(|s| s.alive));
    }

    #[test]
    fn test_head_to_head_kills_both() {
        let mut snakes = vec![
            snake(SnakeId::Player, &[(5, 5), (4, 5)]),
            snake(SnakeId::Ai, &[(5, 5), (6, 5)]),
        ];

        let deaths = resolve_collisions(&mut snakes);

        assert_eq!(deaths.len(), 2);
        assert!(deaths.iter().all(|d| d.cause == DeathCause::Mutual));
        assert!(snakes.iter().all(|s| !s.alive));
    }

    #[test]
    fn test_head_into_body_kills_only_rammer() {
        let mut snakes = vec![
            snake(SnakeId::Player, &[(5, 6), (5, 7), (5, 8)]),
            // Player head lands on the AI's tail; the AI head is clear
            snake(SnakeId::Ai, &[(4, 5), (5, 5), (5, 6)]),
        ];

        let deaths = resolve_collisions(&mut snakes);

        assert_eq!(
            deaths,
            vec![Death {
                id: SnakeId::Player,
                cause: DeathCause::Collision
            }]
        );
        assert!(snakes[1].alive);
    }

    #[test]
    fn test_self_collided_snake_excluded_from_later_passes() {
        // AI bites itself and the player's head lands on the AI body in the
        // same tick; the dead AI no longer blocks the player
        let mut snakes = vec![
            snake(SnakeId::Player, &[(2, 3), (1, 3)]),
            snake(SnakeId::Ai, &[(2, 2), (2, 3), (3, 3), (3, 2), (2, 2)]),
        ];

        let deaths = resolve_collisions(&mut snakes);

        assert_eq!(
            deaths,
            vec![Death {
                id: SnakeId::Ai,
                cause: DeathCause::SelfBite
            }]
        );
        assert!(snakes[0].alive);
    }

    #[test]
    fn test_dead_snakes_are_ignored() {
        let mut snakes = vec![
            snake(SnakeId::Player, &[(5, 5), (4, 5)]),
            snake(SnakeId::Ai, &[(5, 5), (6, 5)]),
        ];
        snakes[1].alive = false;

        assert!(resolve_collisions(&mut snakes).is_empty());
        assert!(snakes[0].alive);
    }
}
