//! Test doubles and fixture builders shared by the client crate tests.

pub mod clock;
pub mod fixture;
