//! Core of the admissions comparison viewer: loading the admissions table and
//! university metadata, resolving cascading selections, and extracting the
//! three-year series for a program unit.
//!
//! Everything here is synchronous and free of UI concerns; the egui front end
//! in the binary holds the selection state and calls into these modules.

pub mod config;
pub mod data;
pub mod logo;
