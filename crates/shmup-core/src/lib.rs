//! Core types and definitions for the SHMUP session orchestrator.
//!
//! This crate defines the vocabulary shared across the other crates:
//! components, configuration, the weapon registry, commands, events,
//! snapshots, and constants. It has no dependency on any runtime.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;
pub mod weapons;
