// src/coordinate.rs

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::error::BreweryError;

const MAX_MAGNITUDE: f64 = 180.0;

/// A geographical point in signed decimal degrees.
///
/// Both components are limited to `[-180, 180]`. The directory API sends them
/// as strings, so construction from raw JSON accepts numbers and numeric
/// strings alike.
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Creates a new `Coordinate` from already-parsed values.
    ///
    /// # Errors
    /// `RangeViolation` if either magnitude exceeds 180, `ValueParsing` if a
    /// value is NaN.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, BreweryError> {
        Ok(Coordinate {
            latitude: check_range("latitude", latitude)?,
            longitude: check_range("longitude", longitude)?,
        })
    }

    /// Builds a `Coordinate` from the raw `latitude`/`longitude` values of an
    /// API record.
    ///
    /// A missing or `null` value fails with `TypeConversion`, a value that is
    /// not a float fails with `ValueParsing`, and an out-of-range value fails
    /// with `RangeViolation`. Latitude is checked before longitude.
    pub fn from_fields(
        latitude: Option<&Value>,
        longitude: Option<&Value>,
    ) -> Result<Self, BreweryError> {
        let latitude = check_range("latitude", parse_component("latitude", latitude)?)?;
        let longitude = check_range("longitude", parse_component("longitude", longitude)?)?;
        Ok(Coordinate {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

fn parse_component(field: &str, raw: Option<&Value>) -> Result<f64, BreweryError> {
    let value = match raw {
        None | Some(Value::Null) => {
            return Err(BreweryError::TypeConversion {
                field: field.to_string(),
            })
        }
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match value {
        Some(v) if !v.is_nan() => Ok(v),
        _ => Err(BreweryError::ValueParsing {
            field: field.to_string(),
            // `raw` is Some here; render it the way it appeared on the wire.
            value: raw.map(Value::to_string).unwrap_or_default(),
        }),
    }
}

fn check_range(field: &str, value: f64) -> Result<f64, BreweryError> {
    if value.is_nan() {
        return Err(BreweryError::ValueParsing {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    if value.abs() > MAX_MAGNITUDE {
        return Err(BreweryError::RangeViolation {
            field: field.to_string(),
            value,
        });
    }
    Ok(value)
}

/// Renders `"<latitude>,<longitude>"`, the format of the `by_dist` search
/// parameter.
/// Formats as `"<latitude>,<longitude>"`. Whole degrees keep one decimal
/// place (`100.0`), other values use the shortest plain decimal.
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_degrees(f, self.latitude)?;
        f.write_str(",")?;
        write_degrees(f, self.longitude)
    }
}

fn write_degrees(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value.fract() == 0.0 {
        write!(f, "{:.1}", value)
    } else {
        write!(f, "{}", value)
    }
}

/// Parses `"<latitude>,<longitude>"`.
impl FromStr for Coordinate {
    type Err = BreweryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (latitude, longitude) = match s.split_once(',') {
            Some((lat, lon)) => (lat, Some(lon)),
            None => (s, None),
        };
        let latitude = Value::String(latitude.to_string());
        let longitude = longitude.map(|lon| Value::String(lon.to_string()));
        Coordinate::from_fields(Some(&latitude), longitude.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_fields_accepts_numeric_strings() {
        let coord =
            Coordinate::from_fields(Some(&json!("42.90907804")), Some(&json!("-85.76493039")))
                .unwrap();
        assert_eq!(coord.latitude(), 42.90907804);
        assert_eq!(coord.longitude(), -85.76493039);
    }

    #[test]
    fn from_fields_accepts_numbers() {
        let coord = Coordinate::from_fields(Some(&json!(100)), Some(&json!(-100.5))).unwrap();
        assert_eq!(coord.latitude(), 100.0);
        assert_eq!(coord.longitude(), -100.5);
    }

    #[test]
    fn from_fields_rejects_unparsable_values() {
        let err = Coordinate::from_fields(Some(&json!("56.78")), Some(&json!("abc"))).unwrap_err();
        match err {
            BreweryError::ValueParsing { field, value } => {
                assert_eq!(field, "longitude");
                assert_eq!(value, "\"abc\"");
            }
            other => panic!("expected ValueParsing, got {:?}", other),
        }

        let err = Coordinate::from_fields(Some(&json!(true)), Some(&json!("1"))).unwrap_err();
        assert!(matches!(err, BreweryError::ValueParsing { ref field, .. } if field == "latitude"));

        let err = Coordinate::from_fields(Some(&json!("NaN")), Some(&json!("1"))).unwrap_err();
        assert!(matches!(err, BreweryError::ValueParsing { .. }));
    }

    #[test]
    fn from_fields_rejects_out_of_range_values() {
        for (lat, lon) in [(181.0, 100.0), (-181.0, -100.0), (100.0, -181.0), (100.0, 181.0)] {
            let err = Coordinate::from_fields(Some(&json!(lat)), Some(&json!(lon))).unwrap_err();
            assert!(
                matches!(err, BreweryError::RangeViolation { .. }),
                "({}, {}) should be out of range, got {:?}",
                lat,
                lon,
                err
            );
        }
    }

    #[test]
    fn from_fields_accepts_boundaries() {
        let coord = Coordinate::from_fields(Some(&json!(-180)), Some(&json!("180"))).unwrap();
        assert_eq!(coord.latitude(), -180.0);
        assert_eq!(coord.longitude(), 180.0);
    }

    #[test]
    fn from_fields_rejects_absent_values() {
        let err = Coordinate::from_fields(None, Some(&json!("123"))).unwrap_err();
        assert!(matches!(err, BreweryError::TypeConversion { ref field } if field == "latitude"));

        let err = Coordinate::from_fields(Some(&json!("123")), Some(&Value::Null)).unwrap_err();
        assert!(matches!(err, BreweryError::TypeConversion { ref field } if field == "longitude"));
    }

    #[test]
    fn display_puts_latitude_first() {
        let coord = Coordinate::new(-93.4567, 45.1234).unwrap();
        assert_eq!(coord.to_string(), "-93.4567,45.1234");
    }

    #[test]
    fn display_keeps_decimal_point_on_whole_degrees() {
        let cases = [
            (json!("42.5"), json!("-85.25"), "42.5,-85.25"),
            (json!("0"), json!("0"), "0.0,0.0"),
            (json!("-180"), json!("179.999"), "-180.0,179.999"),
            (json!(100), json!(100.0), "100.0,100.0"),
            (json!("0.00001"), json!(12), "0.00001,12.0"),
        ];
        for (lat, lon, expected) in cases {
            let coord = Coordinate::from_fields(Some(&lat), Some(&lon)).unwrap();
            assert_eq!(coord.to_string(), expected);
        }
    }

    #[test]
    fn parses_lat_lon_strings() {
        let coord: Coordinate = "42.9, -85.7".parse().unwrap();
        assert_eq!(coord, Coordinate::new(42.9, -85.7).unwrap());

        assert!(matches!(
            "42.9".parse::<Coordinate>(),
            Err(BreweryError::TypeConversion { .. })
        ));
        assert!(matches!(
            "north,west".parse::<Coordinate>(),
            Err(BreweryError::ValueParsing { .. })
        ));
    }
}
