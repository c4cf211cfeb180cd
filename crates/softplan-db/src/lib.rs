//! Data model and local persistence for softplan.

pub mod clock;
pub mod config;
pub mod models;
pub mod queries;
pub mod seed;
pub mod storage;
