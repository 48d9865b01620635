// src/types/mod.rs

pub mod common;

pub use common::{BreweryType, SortOrder};
