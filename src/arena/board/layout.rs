use crate::arena::errors::BoardError;
use crate::core::Position;

const WALL: char = '%';
const FOOD: char = '.';
const CAPSULE: char = 'o';
const OPEN: char = ' ';

/// The fixed parts of a board: walls, the initial food and capsules, and
/// where each agent starts.
///
/// Layouts are written as text, one row per line:
///
/// - `%` wall
/// - `.` food
/// - `o` capsule
/// - `1`..`4` the start of agent 0..3
/// - space, an open cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    width: u16,
    height: u16,
    walls: Vec<bool>,
    food: Vec<Position>,
    capsules: Vec<Position>,
    starts: Vec<Position>,
}

impl Layout {
    pub fn parse(text: &str) -> Result<Self, BoardError> {
        let rows: Vec<Vec<char>> = text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.is_empty())
            .map(|line| line.chars().collect())
            .collect();

        let expected = rows.first().ok_or(BoardError::EmptyLayout)?.len();
        let width = u16::try_from(expected).map_err(|_| BoardError::TooLarge)?;
        let height = u16::try_from(rows.len()).map_err(|_| BoardError::TooLarge)?;

        let mut walls = Vec::with_capacity(expected * rows.len());
        let mut food = Vec::new();
        let mut capsules = Vec::new();
        let mut starts: [Option<Position>; 4] = [None; 4];

        for (y, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(BoardError::RaggedRow {
                    row: y,
                    expected,
                    actual: row.len(),
                });
            }
            for (x, &ch) in row.iter().enumerate() {
                // Both fit, width and height were checked above.
                let position = Position::new(x as u16, y as u16);
                walls.push(ch == WALL);
                match ch {
                    WALL | OPEN => {}
                    FOOD => food.push(position),
                    CAPSULE => capsules.push(position),
                    '1'..='4' => {
                        let id = ch as usize - '1' as usize;
                        if starts[id].replace(position).is_some() {
                            return Err(BoardError::DuplicateStart(id));
                        }
                    }
                    _ => return Err(BoardError::UnknownCell { ch, position }),
                }
            }
        }

        // Agents must be numbered without gaps and there must be at
        // least one per team.
        let num_agents = starts.iter().rposition(Option::is_some).map_or(0, |i| i + 1);
        let expected_agents = num_agents.max(2);
        let starts = (0..expected_agents)
            .map(|id| {
                starts[id].ok_or(BoardError::MissingStart {
                    expected: expected_agents,
                    missing: id + 1,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            width,
            height,
            walls,
            food,
            capsules,
            starts,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn num_agents(&self) -> usize {
        self.starts.len()
    }

    pub fn start(&self, id: usize) -> Option<Position> {
        self.starts.get(id).copied()
    }

    pub fn food(&self) -> &[Position] {
        &self.food
    }

    pub fn capsules(&self) -> &[Position] {
        &self.capsules
    }

    /// Row major index of a cell, `None` when it is off the board.
    pub fn index(&self, position: Position) -> Option<usize> {
        if position.x < self.width && position.y < self.height {
            Some(usize::from(position.y) * usize::from(self.width) + usize::from(position.x))
        } else {
            None
        }
    }

    /// Cells off the board count as walls.
    pub fn is_wall(&self, position: Position) -> bool {
        self.index(position).is_none_or(|idx| self.walls[idx])
    }

    /// The red team defends the western half of the board.
    pub fn is_red_side(&self, position: Position) -> bool {
        position.x < self.width / 2
    }

    pub fn num_cells(&self) -> usize {
        self.walls.len()
    }

    pub(crate) fn position_of(&self, index: usize) -> Position {
        let width = usize::from(self.width);
        Position::new((index % width) as u16, (index / width) as u16)
    }
}
