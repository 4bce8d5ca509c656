//! Eligibility and benefit-estimation engine for household public-assistance screening.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
