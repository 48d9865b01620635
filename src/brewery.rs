// src/brewery.rs

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::coordinate::Coordinate;
use crate::error::BreweryError;

/// A brewery record exactly as the directory API returns it.
pub type RawBrewery = Map<String, Value>;

/// Postal address of a brewery.
///
/// `coordinate` is `None` whenever the record's latitude/longitude are
/// missing, unparsable or out of range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Address {
    pub address_one: Option<String>,
    pub address_two: Option<String>,
    pub address_three: Option<String>,
    pub street: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: Option<String>,
    pub country: String,
    pub coordinate: Option<Coordinate>,
}

impl Address {
    /// Builds an `Address` from the flat API record.
    ///
    /// Every address key must be present, but any of them may be `null`.
    /// Coordinate failures are absorbed and leave `coordinate` empty.
    pub fn from_fields(raw: &RawBrewery) -> Result<Self, BreweryError> {
        let coordinate = match Coordinate::from_fields(raw.get("latitude"), raw.get("longitude")) {
            Ok(coordinate) => Some(coordinate),
            Err(e) => {
                log::debug!("Dropping coordinate for record {:?}: {}", raw.get("id"), e);
                None
            }
        };

        Ok(Address {
            address_one: nullable_str(raw, "address_1")?,
            address_two: nullable_str(raw, "address_2")?,
            address_three: nullable_str(raw, "address_3")?,
            street: nullable_str(raw, "street")?,
            city: text_str(raw, "city")?,
            state: text_str(raw, "state")?,
            postal_code: nullable_str(raw, "postal_code")?,
            country: text_str(raw, "country")?,
            coordinate,
        })
    }

    /// Single-line rendering, skipping empty parts.
    pub fn one_line(&self) -> String {
        let region = match self.postal_code.as_deref() {
            Some(postal) if !postal.is_empty() => format!("{} {}", self.state, postal),
            _ => self.state.clone(),
        };
        [&self.address_one, &self.address_two, &self.address_three]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .chain([self.city.as_str(), region.as_str(), self.country.as_str()])
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A brewery from the directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Brewery {
    pub id: String,
    pub name: String,
    pub brewery_type: String,
    pub address: Address,
    pub phone: Option<String>,
    pub website_url: Option<String>,
}

impl Brewery {
    /// Builds a `Brewery` from one API record.
    ///
    /// Brewery and address fields share the same flat record. An absent key
    /// fails with `MissingField`; a `null` value never does.
    pub fn from_fields(raw: &RawBrewery) -> Result<Self, BreweryError> {
        let id = text_str(raw, "id")?;
        let name = text_str(raw, "name")?;
        let brewery_type = text_str(raw, "brewery_type")?;
        let phone = nullable_str(raw, "phone")?;
        let website_url = nullable_str(raw, "website_url")?;
        let address = Address::from_fields(raw)?;

        Ok(Brewery {
            id,
            name,
            brewery_type,
            address,
            phone,
            website_url,
        })
    }

    /// Flattens the brewery and its address into one record for tabular
    /// export.
    pub fn to_flat(&self) -> FlatBrewery {
        let address = &self.address;
        FlatBrewery {
            id: self.id.clone(),
            name: self.name.clone(),
            brewery_type: self.brewery_type.clone(),
            address_one: address.address_one.clone(),
            address_two: address.address_two.clone(),
            address_three: address.address_three.clone(),
            street: address.street.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            postal_code: address.postal_code.clone(),
            country: address.country.clone(),
            latitude: address.coordinate.map(|c| c.latitude()),
            longitude: address.coordinate.map(|c| c.longitude()),
            phone: self.phone.clone(),
            website_url: self.website_url.clone(),
        }
    }
}

impl fmt::Display for Brewery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.brewery_type)?;
        write!(f, "\n  {}", self.address.one_line())?;
        if let Some(coordinate) = &self.address.coordinate {
            write!(f, "\n  Location: {}", coordinate)?;
        }
        if let Some(phone) = &self.phone {
            write!(f, "\n  Phone: {}", phone)?;
        }
        if let Some(website_url) = &self.website_url {
            write!(f, "\n  Website: {}", website_url)?;
        }
        Ok(())
    }
}

/// Column names of a [`FlatBrewery`], in field order.
pub const FLAT_COLUMNS: [&str; 15] = [
    "id",
    "name",
    "brewery_type",
    "address_one",
    "address_two",
    "address_three",
    "street",
    "city",
    "state",
    "postal_code",
    "country",
    "latitude",
    "longitude",
    "phone",
    "website_url",
];

/// Single-level view of a `Brewery`. Field order is the column order of
/// CSV exports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatBrewery {
    pub id: String,
    pub name: String,
    pub brewery_type: String,
    pub address_one: Option<String>,
    pub address_two: Option<String>,
    pub address_three: Option<String>,
    pub street: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: Option<String>,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub phone: Option<String>,
    pub website_url: Option<String>,
}

// Text column with no separate "unknown" state; `null` reads as empty.
fn text_str(raw: &RawBrewery, key: &str) -> Result<String, BreweryError> {
    Ok(nullable_str(raw, key)?.unwrap_or_default())
}

// Key must exist; a `null` value is allowed.
fn nullable_str(raw: &RawBrewery, key: &str) -> Result<Option<String>, BreweryError> {
    match raw.get(key) {
        None => Err(BreweryError::MissingField(key.to_string())),
        Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(BreweryError::UnexpectedType {
            field: key.to_string(),
            found: other.to_string(),
        }),
    }
}
