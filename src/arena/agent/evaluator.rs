use tracing::trace;

use crate::arena::{
    action::Action,
    game_state::{AgentId, GameState},
};
use crate::core::Position;

/// Reward for being close to food.
pub const FOOD_WEIGHT: f64 = 10.0;
/// Reward for being close to a capsule.
pub const CAPSULE_WEIGHT: f64 = 50.0;
/// Penalty for each defending enemy closer than [`ENEMY_THRESHOLD`].
pub const ENEMY_WEIGHT: f64 = 100.0;
/// Penalty per step between a defending agent and the nearest invader.
pub const INVADER_WEIGHT: f64 = 2.0;
/// Defending enemies at this maze distance or further are ignored.
pub const ENEMY_THRESHOLD: u32 = 3;

/// The individual terms of an evaluation.
///
/// A term is `None` when it was omitted, which is different from a term that
/// was computed and came out as zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeatureBreakdown {
    /// The successor's raw score.
    pub base: f64,
    pub food: Option<f64>,
    pub capsule: Option<f64>,
    pub enemy: Option<f64>,
    pub invader: Option<f64>,
}

impl FeatureBreakdown {
    pub fn total(&self) -> f64 {
        self.base
            + self.food.unwrap_or(0.0)
            + self.capsule.unwrap_or(0.0)
            + self.enemy.unwrap_or(0.0)
            + self.invader.unwrap_or(0.0)
    }
}

/// Scores successor states for one agent.
///
/// Higher is better. The weights are ordered so that
/// escaping a nearby defender outranks grabbing a capsule, which outranks
/// chasing an invader, which outranks food.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluator {
    index: AgentId,
}

impl Evaluator {
    pub fn new(index: AgentId) -> Self {
        Self { index }
    }

    pub fn index(&self) -> AgentId {
        self.index
    }

    pub fn evaluate<G: GameState>(&self, successor: &G, action: Action) -> f64 {
        self.features(successor, action).total()
    }

    pub fn features<G: GameState>(&self, successor: &G, action: Action) -> FeatureBreakdown {
        let mut features = FeatureBreakdown {
            base: successor.score(),
            ..FeatureBreakdown::default()
        };

        // Without our own position no distance can be measured.
        let Some(position) = successor.agent_position(self.index) else {
            trace!(index = self.index, %action, "own position unknown, scoring base only");
            return features;
        };
        let distance_to = |target: Position| successor.maze_distance(position, target);

        features.food = closest(successor.food(self.index), distance_to)
            .map(|distance| FOOD_WEIGHT / (f64::from(distance) + 1.0));

        features.capsule = closest(successor.capsules(self.index), distance_to)
            .map(|distance| CAPSULE_WEIGHT / (f64::from(distance) + 1.0));

        let (invaders, defenders): (Vec<_>, Vec<_>) = successor
            .opponents(self.index)
            .into_iter()
            .filter_map(|opponent| {
                successor
                    .agent_position(opponent)
                    .map(|position| (position, successor.is_pacman(opponent)))
            })
            .partition(|(_, is_pacman)| *is_pacman);

        if !defenders.is_empty() {
            features.enemy = Some(
                defenders
                    .iter()
                    .map(|(enemy, _)| distance_to(*enemy))
                    .filter(|distance| *distance < ENEMY_THRESHOLD)
                    .map(|distance| -ENEMY_WEIGHT / (f64::from(distance) + 1.0))
                    .sum(),
            );
        }

        if !successor.is_pacman(self.index) {
            features.invader = closest(invaders.into_iter().map(|(p, _)| p), distance_to)
                .map(|distance| -INVADER_WEIGHT * f64::from(distance));
        }

        trace!(index = self.index, %action, ?features, "evaluated successor");
        features
    }
}

fn closest(
    targets: impl IntoIterator<Item = Position>,
    distance_to: impl Fn(Position) -> u32,
) -> Option<u32> {
    targets.into_iter().map(distance_to).min()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::arena::test_util::ScriptedState;

    fn at(x: u16, y: u16) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn test_food_at_distance_one() {
        let state = ScriptedState::new()
            .with_agent(0, at(0, 0))
            .with_food(at(1, 0));
        let features = Evaluator::new(0).features(&state, Action::East);

        assert_relative_eq!(features.food.unwrap(), 5.0);
        assert_eq!(features.capsule, None);
        assert_eq!(features.enemy, None);
        assert_eq!(features.invader, None);
        assert_relative_eq!(features.total(), 5.0);
    }

    #[test]
    fn test_base_score_is_added() {
        let state = ScriptedState::new()
            .with_agent(0, at(0, 0))
            .with_food(at(1, 0))
            .with_score(3.0);
        assert_relative_eq!(Evaluator::new(0).evaluate(&state, Action::Stop), 8.0);
    }

    #[test]
    fn test_closest_food_wins() {
        let state = ScriptedState::new()
            .with_agent(0, at(0, 0))
            .with_food(at(9, 0))
            .with_food(at(0, 3));
        let features = Evaluator::new(0).features(&state, Action::Stop);
        assert_relative_eq!(features.food.unwrap(), 10.0 / 4.0);
    }

    #[test]
    fn test_capsule_term() {
        let state = ScriptedState::new()
            .with_agent(0, at(2, 2))
            .with_capsule(at(2, 2))
            .with_capsule(at(5, 5));
        let features = Evaluator::new(0).features(&state, Action::Stop);
        assert_relative_eq!(features.capsule.unwrap(), 50.0);
        assert_eq!(features.food, None);
    }

    #[test]
    fn test_defending_enemy_at_distance_two() {
        let state = ScriptedState::new()
            .with_agent(0, at(0, 0))
            .with_pacman(0)
            .with_agent(1, at(2, 0));
        let features = Evaluator::new(0).features(&state, Action::Stop);

        assert_relative_eq!(features.enemy.unwrap(), -100.0 / 3.0);
        assert_eq!(features.food, None);
        assert_eq!(features.capsule, None);
        assert_eq!(features.invader, None);
        assert_relative_eq!(features.total(), -33.333_333, epsilon = 1e-5);
    }

    #[test]
    fn test_enemy_penalties_sum() {
        let state = ScriptedState::new()
            .with_agent(0, at(5, 5))
            .with_pacman(0)
            .with_agent(1, at(5, 5))
            .with_agent(3, at(6, 5));
        let features = Evaluator::new(0).features(&state, Action::Stop);
        assert_relative_eq!(features.enemy.unwrap(), -100.0 - 50.0);
    }

    #[test]
    fn test_far_hidden_and_invading_enemies_are_not_threats() {
        let far = ScriptedState::new()
            .with_agent(0, at(0, 0))
            .with_pacman(0)
            .with_agent(1, at(3, 0));
        let features = Evaluator::new(0).features(&far, Action::Stop);
        assert_relative_eq!(features.enemy.unwrap(), 0.0);

        let hidden = ScriptedState::new()
            .with_agent(0, at(0, 0))
            .with_pacman(0)
            .with_hidden_agent(1);
        assert_eq!(Evaluator::new(0).features(&hidden, Action::Stop).enemy, None);

        let invading = ScriptedState::new()
            .with_agent(0, at(0, 0))
            .with_pacman(0)
            .with_agent(1, at(1, 0))
            .with_pacman(1);
        assert_eq!(
            Evaluator::new(0).features(&invading, Action::Stop).enemy,
            None
        );
    }

    #[test]
    fn test_invader_at_distance_four() {
        let state = ScriptedState::new()
            .with_agent(0, at(0, 0))
            .with_agent(1, at(4, 0))
            .with_pacman(1);
        let features = Evaluator::new(0).features(&state, Action::Stop);

        assert_relative_eq!(features.invader.unwrap(), -8.0);
        assert_eq!(features.enemy, None);
        assert_relative_eq!(features.total(), -8.0);
    }

    #[test]
    fn test_invader_term_uses_closest_and_skips_pacman_self() {
        let state = ScriptedState::new()
            .with_agent(0, at(0, 0))
            .with_agent(1, at(4, 0))
            .with_pacman(1)
            .with_agent(3, at(0, 2))
            .with_pacman(3);
        let features = Evaluator::new(0).features(&state, Action::Stop);
        assert_relative_eq!(features.invader.unwrap(), -4.0);

        let attacking = state.with_pacman(0);
        assert_eq!(
            Evaluator::new(0).features(&attacking, Action::Stop).invader,
            None
        );
    }

    #[test]
    fn test_terms_never_reward_worse_positions() {
        let food = |d: u16| {
            let state = ScriptedState::new()
                .with_agent(0, at(0, 0))
                .with_food(at(d, 0));
            Evaluator::new(0).features(&state, Action::Stop).food.unwrap()
        };
        let capsule = |d: u16| {
            let state = ScriptedState::new()
                .with_agent(0, at(0, 0))
                .with_capsule(at(d, 0));
            Evaluator::new(0).features(&state, Action::Stop).capsule.unwrap()
        };
        let enemy = |d: u16| {
            let state = ScriptedState::new()
                .with_agent(0, at(0, 0))
                .with_pacman(0)
                .with_agent(1, at(d, 0));
            Evaluator::new(0).features(&state, Action::Stop).enemy.unwrap()
        };
        let invader = |d: u16| {
            let state = ScriptedState::new()
                .with_agent(0, at(0, 0))
                .with_agent(1, at(d, 0))
                .with_pacman(1);
            Evaluator::new(0).features(&state, Action::Stop).invader.unwrap()
        };

        for d in 0..6 {
            assert!(food(d) >= food(d + 1));
            assert!(capsule(d) >= capsule(d + 1));
            // Approaching a defender is never better than keeping away.
            assert!(enemy(d) <= enemy(d + 1));
            // Approaching an invader is never worse than falling behind.
            assert!(invader(d) >= invader(d + 1));
        }
    }

    #[test]
    fn test_unknown_own_position_scores_base_only() {
        let state = ScriptedState::new()
            .with_hidden_agent(0)
            .with_food(at(1, 0))
            .with_agent(1, at(1, 1))
            .with_score(-2.0);
        let features = Evaluator::new(0).features(&state, Action::Stop);
        assert_eq!(
            features,
            FeatureBreakdown {
                base: -2.0,
                ..FeatureBreakdown::default()
            }
        );
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let state = ScriptedState::new()
            .with_agent(0, at(3, 3))
            .with_food(at(1, 1))
            .with_capsule(at(6, 2))
            .with_agent(1, at(4, 3))
            .with_agent(3, at(0, 0))
            .with_pacman(3);
        let evaluator = Evaluator::new(0);
        assert_eq!(evaluator.index(), 0);
        let first = evaluator.evaluate(&state, Action::West);
        for _ in 0..10 {
            assert_eq!(evaluator.evaluate(&state, Action::West), first);
        }
    }
}
