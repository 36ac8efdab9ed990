//! Domain logic for the content-production tracker.
//!
//! This crate has zero internal dependencies so it can be used by the
//! repository layer, the API, and any future CLI tooling. It owns the
//! stage vocabulary (kinds, closed status sets, assignability), the
//! `StageState` / `ProductionItem` value objects and their mutation
//! rules, period grouping for the weekly view, and the defaults used
//! by bulk generation.

pub mod error;
pub mod generation;
pub mod item;
pub mod period;
pub mod stage;
pub mod types;
