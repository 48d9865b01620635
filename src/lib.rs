pub mod brewery;
pub mod cli;
pub mod client;
pub mod config;
pub mod coordinate;
pub mod error;
pub mod export;
pub mod query;
mod requests;
pub mod types;

pub use brewery::{Address, Brewery, FlatBrewery, RawBrewery};
pub use client::BreweryClient;
pub use config::ClientConfig;
pub use coordinate::Coordinate;
pub use error::BreweryError;
pub use query::{SearchQuery, SearchQueryBuilder};
pub use types::{BreweryType, SortOrder};
