//! Client-side core of the ScholarShare application.
//!
//! The interesting parts are the verification state machine
//! ([`usecase::verification`]) and the optimistic mutation controller
//! ([`usecase::board`]); everything else is ports and thin adapters over
//! the REST API, the email provider, and the realtime bus.

pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod state;
pub mod usecase;
