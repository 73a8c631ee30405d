//! Engine modules: turn a selection into host changes.
//!
//! The engine layer sits between the resolved selection (which services the
//! user wants) and the host (what actually changes). `plan` merges services
//! into an ordered, deduplicated plan; `executor` applies it.

pub mod executor;
pub mod plan;
