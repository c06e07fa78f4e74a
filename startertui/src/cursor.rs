//! Two-level cursor: the generation list and the species grid beside it

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::InvalidAction;

pub const GENERATION_COUNT: usize = 5;
pub const GRID_COLUMNS: usize = 9;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum NavCursor {
    /// Picking a generation. `resume` is where the grid cursor re-enters.
    GenList { generation: usize, resume: usize },
    SpeciesGrid { generation: usize, index: usize },
}

impl Default for NavCursor {
    fn default() -> Self {
        NavCursor::GenList {
            generation: 0,
            resume: 0,
        }
    }
}

/// What a successful step did, so the caller knows whether a species is now
/// hovered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorMove {
    Generation(usize),
    EnterGrid { generation: usize, index: usize },
    Species { generation: usize, index: usize },
    LeaveGrid { generation: usize },
}

impl NavCursor {
    pub fn generation(&self) -> usize {
        match *self {
            NavCursor::GenList { generation, .. } | NavCursor::SpeciesGrid { generation, .. } => {
                generation
            }
        }
    }

    /// Hovered grid position, if the grid has focus.
    pub fn species(&self) -> Option<(usize, usize)> {
        match *self {
            NavCursor::SpeciesGrid { generation, index } => Some((generation, index)),
            NavCursor::GenList { .. } => None,
        }
    }

    pub fn in_grid(&self) -> bool {
        matches!(self, NavCursor::SpeciesGrid { .. })
    }

    /// Moves one step. `species_in` reports how many species a generation has.
    /// A rejected step leaves the cursor untouched.
    pub fn step(
        &mut self,
        direction: Direction,
        species_in: impl Fn(usize) -> usize,
    ) -> Result<CursorMove, InvalidAction> {
        let (next, moved) = match *self {
            NavCursor::GenList { generation, resume } => {
                Self::step_gen_list(generation, resume, direction, &species_in)?
            }
            NavCursor::SpeciesGrid { generation, index } => {
                Self::step_grid(generation, index, direction, species_in(generation))?
            }
        };
        *self = next;
        Ok(moved)
    }

    fn step_gen_list(
        generation: usize,
        resume: usize,
        direction: Direction,
        species_in: &impl Fn(usize) -> usize,
    ) -> Result<(NavCursor, CursorMove), InvalidAction> {
        let generation = match direction {
            Direction::Up if generation > 0 => generation - 1,
            Direction::Down if generation + 1 < GENERATION_COUNT => generation + 1,
            Direction::Right => {
                let count = species_in(generation);
                if count == 0 {
                    return Err(InvalidAction::EmptyGeneration);
                }
                let index = if resume < count { resume } else { 0 };
                return Ok((
                    NavCursor::SpeciesGrid { generation, index },
                    CursorMove::EnterGrid { generation, index },
                ));
            }
            _ => return Err(InvalidAction::CursorBlocked),
        };
        Ok((
            NavCursor::GenList {
                generation,
                resume: 0,
            },
            CursorMove::Generation(generation),
        ))
    }

    fn step_grid(
        generation: usize,
        index: usize,
        direction: Direction,
        count: usize,
    ) -> Result<(NavCursor, CursorMove), InvalidAction> {
        let column = index % GRID_COLUMNS;
        let index = match direction {
            Direction::Up if index >= GRID_COLUMNS => index - GRID_COLUMNS,
            Direction::Down if index + GRID_COLUMNS < count => index + GRID_COLUMNS,
            Direction::Left if column == 0 => {
                return Ok((
                    NavCursor::GenList {
                        generation,
                        resume: index,
                    },
                    CursorMove::LeaveGrid { generation },
                ));
            }
            Direction::Left => index - 1,
            Direction::Right if column + 1 < GRID_COLUMNS && index + 1 < count => index + 1,
            _ => return Err(InvalidAction::CursorBlocked),
        };
        Ok((
            NavCursor::SpeciesGrid { generation, index },
            CursorMove::Species { generation, index },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(per_gen: [usize; GENERATION_COUNT]) -> impl Fn(usize) -> usize {
        move |generation| per_gen.get(generation).copied().unwrap_or(0)
    }

    #[test]
    fn gen_list_clamps_without_wrapping() {
        let species_in = counts([3; GENERATION_COUNT]);
        let mut cursor = NavCursor::default();

        assert_eq!(
            cursor.step(Direction::Up, &species_in),
            Err(InvalidAction::CursorBlocked)
        );
        for _ in 0..4 {
            cursor.step(Direction::Down, &species_in).expect("move down");
        }
        assert_eq!(cursor.generation(), 4);
        assert_eq!(
            cursor.step(Direction::Down, &species_in),
            Err(InvalidAction::CursorBlocked)
        );
        assert_eq!(
            cursor.step(Direction::Left, &species_in),
            Err(InvalidAction::CursorBlocked)
        );
    }

    #[test]
    fn ten_species_generation_edges() {
        let species_in = counts([10, 0, 0, 0, 0]);
        let mut cursor = NavCursor::SpeciesGrid {
            generation: 0,
            index: 9,
        };

        assert_eq!(
            cursor.step(Direction::Right, &species_in),
            Err(InvalidAction::CursorBlocked)
        );
        assert_eq!(
            cursor.step(Direction::Down, &species_in),
            Err(InvalidAction::CursorBlocked)
        );
        assert_eq!(
            cursor.step(Direction::Up, &species_in),
            Ok(CursorMove::Species {
                generation: 0,
                index: 0
            })
        );
    }

    #[test]
    fn ragged_last_row_blocks_right_and_down() {
        // Two rows: 9 + 3.
        let species_in = counts([12, 0, 0, 0, 0]);
        let mut cursor = NavCursor::SpeciesGrid {
            generation: 0,
            index: 11,
        };
        assert_eq!(
            cursor.step(Direction::Right, &species_in),
            Err(InvalidAction::CursorBlocked)
        );

        let mut cursor = NavCursor::SpeciesGrid {
            generation: 0,
            index: 4,
        };
        assert_eq!(
            cursor.step(Direction::Down, &species_in),
            Err(InvalidAction::CursorBlocked)
        );
        let mut cursor = NavCursor::SpeciesGrid {
            generation: 0,
            index: 2,
        };
        assert_eq!(
            cursor.step(Direction::Down, &species_in),
            Ok(CursorMove::Species {
                generation: 0,
                index: 11
            })
        );
    }

    #[test]
    fn single_row_never_moves_vertically() {
        let species_in = counts([4, 0, 0, 0, 0]);
        let mut cursor = NavCursor::SpeciesGrid {
            generation: 0,
            index: 1,
        };
        assert!(cursor.step(Direction::Down, &species_in).is_err());
        assert!(cursor.step(Direction::Up, &species_in).is_err());
        assert_eq!(cursor.species(), Some((0, 1)));
    }

    #[test]
    fn leaving_and_reentering_grid_resumes_index() {
        let species_in = counts([20, 5, 0, 0, 0]);
        let mut cursor = NavCursor::SpeciesGrid {
            generation: 0,
            index: 9,
        };

        assert_eq!(
            cursor.step(Direction::Left, &species_in),
            Ok(CursorMove::LeaveGrid { generation: 0 })
        );
        assert_eq!(
            cursor.step(Direction::Right, &species_in),
            Ok(CursorMove::EnterGrid {
                generation: 0,
                index: 9
            })
        );

        cursor.step(Direction::Left, &species_in).expect("leave");
        cursor.step(Direction::Down, &species_in).expect("next generation");
        assert_eq!(
            cursor.step(Direction::Right, &species_in),
            Ok(CursorMove::EnterGrid {
                generation: 1,
                index: 0
            })
        );
    }

    #[test]
    fn empty_generation_cannot_be_entered() {
        let species_in = counts([3, 0, 0, 0, 0]);
        let mut cursor = NavCursor::GenList {
            generation: 1,
            resume: 0,
        };
        assert_eq!(
            cursor.step(Direction::Right, &species_in),
            Err(InvalidAction::EmptyGeneration)
        );
        assert!(!cursor.in_grid());
    }
}
