//! # Help Locations
//!
//! A small directory of places a caller can be pointed to (police, hospitals,
//! shelters, ...) and the position query used to pick the nearest one.
//!
//! The directory is fixture data. Distances are great-circle distances on a
//! spherical Earth, which is plenty for "0.4 km away".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Position used when no position is available (Cape Town city centre).
pub const DEFAULT_POSITION: Position = Position {
    latitude: -33.9249,
    longitude: 18.4241,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Haversine distance to `other` in kilometres.
    pub fn distance_km(&self, other: &Position) -> f64 {
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lng = (other.longitude - self.longitude).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (d_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceKind {
    Police,
    Hospital,
    SafeHouse,
    Counseling,
    LegalAid,
}

impl PlaceKind {
    pub const ALL: [PlaceKind; 5] = [
        PlaceKind::Police,
        PlaceKind::Hospital,
        PlaceKind::SafeHouse,
        PlaceKind::Counseling,
        PlaceKind::LegalAid,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PlaceKind::Police => "police",
            PlaceKind::Hospital => "hospital",
            PlaceKind::SafeHouse => "safe_house",
            PlaceKind::Counseling => "counseling",
            PlaceKind::LegalAid => "legal_aid",
        }
    }
}

impl FromStr for PlaceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlaceKind::ALL
            .into_iter()
            .find(|kind| kind.label() == s)
            .ok_or_else(|| format!("unknown place kind '{s}'"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub kind: PlaceKind,
    pub position: Position,
    pub phone: String,
}

/// A place together with its distance from the query position.
#[derive(Debug, Clone, Copy)]
pub struct NearbyPlace<'a> {
    pub place: &'a Place,
    pub distance_km: f64,
}

impl fmt::Display for NearbyPlace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1} km)", self.place.name, self.distance_km)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlaceDirectory {
    places: Vec<Place>,
}

impl PlaceDirectory {
    pub fn new(places: Vec<Place>) -> Self {
        Self { places }
    }

    /// The fixture directory shipped with the app.
    pub fn builtin() -> Self {
        let place = |name: &str, kind, lat, lng, phone: &str| Place {
            name: name.to_string(),
            kind,
            position: Position::new(lat, lng),
            phone: phone.to_string(),
        };
        Self::new(vec![
            place(
                "Cape Town Central Hospital",
                PlaceKind::Hospital,
                -33.9249,
                18.4241,
                "+27215041911",
            ),
            place(
                "Cape Town Central Police Station",
                PlaceKind::Police,
                -33.9212,
                18.4193,
                "+27214007000",
            ),
            place(
                "Women's Shelter Cape Town",
                PlaceKind::SafeHouse,
                -33.9304,
                18.4298,
                "+27214485080",
            ),
            place(
                "Rape Crisis Centre",
                PlaceKind::Counseling,
                -33.9356,
                18.4734,
                "+27214479762",
            ),
            place(
                "Legal Aid South Africa",
                PlaceKind::LegalAid,
                -33.9258,
                18.4232,
                "+27214268282",
            ),
        ])
    }

    /// Closest place of the given kind, if the directory has one.
    pub fn nearest(&self, from: &Position, kind: PlaceKind) -> Option<NearbyPlace<'_>> {
        self.places
            .iter()
            .filter(|p| p.kind == kind)
            .map(|place| NearbyPlace {
                place,
                distance_km: from.distance_km(&place.position),
            })
            .min_by(|a, b| a.distance_km.total_cmp(&b.distance_km))
    }
}

/// Answers "where is the caller right now?".
///
/// `None` means the position is unavailable; callers fall back to
/// [`DEFAULT_POSITION`].
pub trait LocationProvider: Send {
    fn current_position(&self) -> Option<Position>;
}

/// A provider that always reports the same position (or none).
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation(pub Option<Position>);

impl LocationProvider for FixedLocation {
    fn current_position(&self) -> Option<Position> {
        self.0
    }
}
