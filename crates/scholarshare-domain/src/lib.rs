//! Domain types shared across the ScholarShare client crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/`.

pub mod id;
pub mod idea;
pub mod report;
pub mod user;
