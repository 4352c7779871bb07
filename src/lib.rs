//! Cleaning, filtering and aggregation pipeline behind the listings
//! explorer, plus its configuration.

pub mod config;
pub mod data;
