//! Personality profile persistence and re-estimation.

pub mod estimator;
pub mod repository;
