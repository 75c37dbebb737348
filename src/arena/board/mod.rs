//! A small capture the flag board.
//!
//! This is not a full engine. It implements just enough of the game for the
//! agents to be exercised: walls, team sides, food and capsules that can be
//! eaten, captures on contact, and hidden positions. Scoring is simplified to
//! one point per food eaten, credited immediately.
mod distancer;
mod layout;

use std::{collections::BTreeSet, fmt, sync::Arc};

use tracing::trace;

use crate::arena::{
    action::Action,
    errors::{BoardError, TransitionError},
    game_state::{is_red, AgentId, GameState},
};
use crate::core::Position;

pub use distancer::Distancer;
pub use layout::Layout;

#[derive(Debug, Clone)]
pub struct BoardState {
    layout: Arc<Layout>,
    distancer: Arc<Distancer>,
    positions: Vec<Position>,
    hidden: Vec<bool>,
    food: BTreeSet<Position>,
    capsules: BTreeSet<Position>,
    // Red minus blue
    score: f64,
}

impl BoardState {
    pub fn new(layout: Layout) -> Self {
        let distancer = Distancer::new(&layout);
        let positions: Vec<Position> = (0..layout.num_agents())
            .filter_map(|id| layout.start(id))
            .collect();
        Self {
            hidden: vec![false; positions.len()],
            positions,
            food: layout.food().iter().copied().collect(),
            capsules: layout.capsules().iter().copied().collect(),
            score: 0.0,
            distancer: Arc::new(distancer),
            layout: Arc::new(layout),
        }
    }

    pub fn from_layout_str(text: &str) -> Result<Self, BoardError> {
        Ok(Self::new(Layout::parse(text)?))
    }

    /// Hide `id` so that its position reads as unknown.
    pub fn with_hidden(mut self, id: AgentId) -> Self {
        if let Some(hidden) = self.hidden.get_mut(id) {
            *hidden = true;
        }
        self
    }

    /// Place `id` on a cell, bypassing the movement rules.
    pub fn with_position(mut self, id: AgentId, position: Position) -> Self {
        if let Some(current) = self.positions.get_mut(id) {
            *current = position;
        }
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    pub fn without_food(mut self) -> Self {
        self.food.clear();
        self
    }

    pub fn without_capsules(mut self) -> Self {
        self.capsules.clear();
        self
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn num_agents(&self) -> usize {
        self.positions.len()
    }

    /// Total food left on the board, for both teams.
    pub fn food_remaining(&self) -> usize {
        self.food.len()
    }

    /// Whether the cell belongs to the opponents of `id`.
    fn is_enemy_side(&self, id: AgentId, position: Position) -> bool {
        self.layout.is_red_side(position) != is_red(id)
    }

    fn side_items(&self, id: AgentId, items: &BTreeSet<Position>) -> Vec<Position> {
        items
            .iter()
            .copied()
            .filter(|position| self.is_enemy_side(id, *position))
            .collect()
    }

    fn respawn(&mut self, id: AgentId) {
        if let Some(start) = self.layout.start(id) {
            trace!(id, %start, "agent captured");
            self.positions[id] = start;
        }
    }

    fn target(&self, from: Position, action: Action) -> Option<Position> {
        let (dx, dy) = action.vector();
        from.offset(dx, dy)
            .filter(|target| !self.layout.is_wall(*target))
    }
}

impl GameState for BoardState {
    fn legal_actions(&self, id: AgentId) -> Vec<Action> {
        let Some(from) = self.positions.get(id).copied() else {
            return Vec::new();
        };
        Action::ALL
            .into_iter()
            .filter(|action| self.target(from, *action).is_some())
            .collect()
    }

    fn generate_successor(&self, id: AgentId, action: Action) -> Result<Self, TransitionError> {
        let from = *self
            .positions
            .get(id)
            .ok_or(TransitionError::UnknownAgent(id))?;
        let target = self
            .target(from, action)
            .ok_or(TransitionError::Blocked { from, action })?;

        let mut next = self.clone();
        next.positions[id] = target;

        if next.is_pacman(id) {
            let gain = if is_red(id) { 1.0 } else { -1.0 };
            if next.food.remove(&target) {
                next.score += gain;
            }
            next.capsules.remove(&target);
        }

        for opponent in self.opponents(id) {
            if next.positions[opponent] != target {
                continue;
            }
            if next.is_pacman(id) && !next.is_pacman(opponent) {
                next.respawn(id);
            } else if !next.is_pacman(id) && next.is_pacman(opponent) {
                next.respawn(opponent);
            }
        }

        Ok(next)
    }

    fn agent_position(&self, id: AgentId) -> Option<Position> {
        if self.hidden.get(id).copied().unwrap_or(true) {
            None
        } else {
            self.positions.get(id).copied()
        }
    }

    fn is_pacman(&self, id: AgentId) -> bool {
        self.positions
            .get(id)
            .is_some_and(|position| self.is_enemy_side(id, *position))
    }

    fn score(&self) -> f64 {
        self.score
    }

    fn food(&self, id: AgentId) -> Vec<Position> {
        self.side_items(id, &self.food)
    }

    fn capsules(&self, id: AgentId) -> Vec<Position> {
        self.side_items(id, &self.capsules)
    }

    fn opponents(&self, id: AgentId) -> Vec<AgentId> {
        (0..self.num_agents())
            .filter(|other| is_red(*other) != is_red(id))
            .collect()
    }

    fn maze_distance(&self, a: Position, b: Position) -> u32 {
        self.distancer.get_distance(a, b)
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.layout.height() {
            for x in 0..self.layout.width() {
                let position = Position::new(x, y);
                let ch = if let Some(id) = self.positions.iter().position(|p| *p == position) {
                    char::from(b'1' + id as u8)
                } else if self.layout.is_wall(position) {
                    '%'
                } else if self.food.contains(&position) {
                    '.'
                } else if self.capsules.contains(&position) {
                    'o'
                } else {
                    ' '
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        write!(f, "score: {}", self.score)
    }
}
