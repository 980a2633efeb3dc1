//! Rating, selection and the per-player session loop built on top of them.

pub mod config;
pub mod engine;
pub mod filter;
pub mod grade;
pub mod ranks;
pub mod rating;
pub mod selector;
