//! trigrade-core: item generation, grading, rubric scoring and analytics.
//!
//! This crate holds the data model and every rule of the triangle unit
//! assessment. The report and CLI crates only read from a [`session::Session`].

pub mod config;
pub mod error;
pub mod generator;
pub mod grading;
pub mod model;
pub mod roster;
pub mod rubric;
pub mod session;
pub mod snapshot;
pub mod statistics;
