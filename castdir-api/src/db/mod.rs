//! Database access layer for castdir-api

pub mod actors;

pub use actors::{Actor, ActorPatch, NewActor, UpdateOutcome};
