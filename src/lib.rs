//! Adaptive poker-scenario trainer: graded ELO ratings, filtered puzzle
//! selection with a fallback ladder, and an HTTP service around them.

pub mod config;
pub mod constants;
pub mod corpus;
pub mod extractors;
pub mod logging;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;
pub mod store;
pub mod trainer;
pub mod validation;
