//! Crossmix Core - Synchronized two-slot playback and crossfade mapping
//!
//! The library is split the same way the player uses it:
//! - `player`: the handle interface and the rack both slots are attached to
//! - `sync`: the bounded-retry start protocol and its async driver
//! - `crossfade`: pure fader → volume/opacity/width mapping
//! - `session`: mix state, slot readiness and the label auto-hide timer
//! - `controller`: ties session, rack and coordinator together
//! - `store`, `source`, `auth`: narrow collaborator interfaces

pub mod auth;
pub mod config;
pub mod controller;
pub mod crossfade;
pub mod player;
pub mod session;
pub mod source;
pub mod store;
pub mod sync;
pub mod types;

pub use types::*;
