//! Rejected transitions and shell-level errors

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::unlock::UnlockAxis;

/// A player input the screen refused. None of these mutate state; the caller
/// only gives feedback (error tone, flash).
#[derive(
    thiserror::Error, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
pub enum InvalidAction {
    #[error("can't move that way")]
    CursorBlocked,
    #[error("no POKéMON in this generation")]
    EmptyGeneration,
    #[error("this POKéMON hasn't been unlocked")]
    NotUnlocked,
    #[error("already in your party")]
    DuplicatePick,
    #[error("your party is full")]
    RosterFull,
    #[error("nothing to undo")]
    RosterEmpty,
    #[error("no other {0} unlocked")]
    AxisLocked(UnlockAxis),
}

#[derive(thiserror::Error, Debug)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Ron {
        path: String,
        source: ron::error::SpannedError,
    },
    #[error("failed to encode party: {0}")]
    Json(#[from] serde_json::Error),
}
