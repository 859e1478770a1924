//! squill: billing analytics dashboard, invoice documents, usage pricing and
//! deployment helpers for the Squill billing platform.

pub mod api;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod deploy;
pub mod events;
pub mod invoice;
pub mod model;
pub mod pricing;
pub mod utils;
pub mod web;
