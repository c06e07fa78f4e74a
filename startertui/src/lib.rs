//! Starter party selection screen built on tui-dispatch
//!
//! The library exposes the screen's modules for the binary and for tests.

pub mod action;
pub mod api;
pub mod assets;
pub mod audio;
pub mod controller;
pub mod cursor;
pub mod data;
pub mod dex;
pub mod effect;
pub mod error;
pub mod reducer;
pub mod roster;
pub mod species;
pub mod sprite;
pub mod state;
pub mod ui;
pub mod unlock;
pub mod variant;
