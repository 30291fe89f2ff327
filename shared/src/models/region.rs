//! Region profile: season and region type derived from coordinates

use serde::{Deserialize, Serialize};

/// Climatic season, as it affects soiling
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Monsoon,
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Season::Winter => write!(f, "winter"),
            Season::Spring => write!(f, "spring"),
            Season::Summer => write!(f, "summer"),
            Season::Monsoon => write!(f, "monsoon"),
        }
    }
}

impl std::str::FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "winter" => Ok(Season::Winter),
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "monsoon" => Ok(Season::Monsoon),
            other => Err(format!("unknown season: {}", other)),
        }
    }
}

/// Land-use class, as it affects the base soiling rate
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RegionType {
    Urban,
    Rural,
    Desert,
}

impl std::fmt::Display for RegionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionType::Urban => write!(f, "urban"),
            RegionType::Rural => write!(f, "rural"),
            RegionType::Desert => write!(f, "desert"),
        }
    }
}

impl std::str::FromStr for RegionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "urban" => Ok(RegionType::Urban),
            "rural" => Ok(RegionType::Rural),
            "desert" => Ok(RegionType::Desert),
            other => Err(format!("unknown region type: {}", other)),
        }
    }
}

/// Season and region type for a location at a point in the year
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegionProfile {
    pub season: Season,
    pub region_type: RegionType,
}

impl RegionProfile {
    /// Resolve the profile for coordinates and a calendar month (1-12)
    pub fn resolve(latitude: f64, longitude: f64, month: u32) -> Self {
        Self {
            season: resolve_season(latitude, month),
            region_type: resolve_region_type(latitude, longitude),
        }
    }
}

/// Latitude/longitude rectangle, bounds inclusive
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub name: &'static str,
    pub lat_min: f64,
    pub lat_max: f64,
    pub lng_min: f64,
    pub lng_max: f64,
}

impl BoundingBox {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.lat_min..=self.lat_max).contains(&latitude)
            && (self.lng_min..=self.lng_max).contains(&longitude)
    }
}

/// Major arid and semi-arid zones, checked in order
pub const DESERT_REGIONS: [BoundingBox; 5] = [
    BoundingBox {
        name: "Arabian Peninsula",
        lat_min: 15.0,
        lat_max: 35.0,
        lng_min: 35.0,
        lng_max: 60.0,
    },
    BoundingBox {
        name: "Thar / Balochistan",
        lat_min: 20.0,
        lat_max: 32.0,
        lng_min: 60.0,
        lng_max: 75.0,
    },
    BoundingBox {
        name: "Sahara",
        lat_min: 15.0,
        lat_max: 35.0,
        lng_min: -15.0,
        lng_max: 35.0,
    },
    BoundingBox {
        name: "Australian Outback",
        lat_min: -35.0,
        lat_max: -20.0,
        lng_min: 120.0,
        lng_max: 150.0,
    },
    BoundingBox {
        name: "Rajasthan",
        lat_min: 24.0,
        lat_max: 30.0,
        lng_min: 68.0,
        lng_max: 76.0,
    },
];

/// Poleward of this latitude, non-desert land is treated as rural
const RURAL_LATITUDE: f64 = 40.0;

/// Below this latitude the northern Jun-Sep window is monsoon rather than summer
const MONSOON_LATITUDE: f64 = 35.0;

/// Season for a latitude in a given calendar month (1-12)
pub fn resolve_season(latitude: f64, month: u32) -> Season {
    if latitude >= 0.0 {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=9 if latitude.abs() < MONSOON_LATITUDE => Season::Monsoon,
            6..=9 => Season::Summer,
            _ => Season::Spring,
        }
    } else {
        match month {
            6..=8 => Season::Winter,
            9..=11 => Season::Spring,
            12 | 1..=3 => Season::Summer,
            _ => Season::Spring,
        }
    }
}

/// Region type from the desert table, then the latitude-based rural fallback
pub fn resolve_region_type(latitude: f64, longitude: f64) -> RegionType {
    if DESERT_REGIONS
        .iter()
        .any(|region| region.contains(latitude, longitude))
    {
        RegionType::Desert
    } else if latitude.abs() > RURAL_LATITUDE {
        RegionType::Rural
    } else {
        RegionType::Urban
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_northern_seasons() {
        assert_eq!(resolve_season(31.5, 1), Season::Winter);
        assert_eq!(resolve_season(31.5, 12), Season::Winter);
        assert_eq!(resolve_season(31.5, 4), Season::Spring);
        assert_eq!(resolve_season(31.5, 7), Season::Monsoon);
        assert_eq!(resolve_season(31.5, 10), Season::Spring);
        assert_eq!(resolve_season(31.5, 11), Season::Spring);
    }

    #[test]
    fn test_high_latitude_summer() {
        assert_eq!(resolve_season(51.5, 7), Season::Summer);
        assert_eq!(resolve_season(35.0, 9), Season::Summer);
        assert_eq!(resolve_season(34.9, 9), Season::Monsoon);
    }

    #[test]
    fn test_southern_seasons() {
        assert_eq!(resolve_season(-33.9, 7), Season::Winter);
        assert_eq!(resolve_season(-33.9, 10), Season::Spring);
        assert_eq!(resolve_season(-33.9, 1), Season::Summer);
        assert_eq!(resolve_season(-33.9, 3), Season::Summer);
        assert_eq!(resolve_season(-33.9, 4), Season::Spring);
        assert_eq!(resolve_season(-33.9, 5), Season::Spring);
    }

    #[test]
    fn test_equator_uses_northern_table() {
        assert_eq!(resolve_season(0.0, 7), Season::Monsoon);
    }

    #[test]
    fn test_desert_regions() {
        // Riyadh
        assert_eq!(resolve_region_type(24.7, 46.7), RegionType::Desert);
        // Quetta
        assert_eq!(resolve_region_type(30.2, 67.0), RegionType::Desert);
        // Cairo
        assert_eq!(resolve_region_type(30.0, 31.2), RegionType::Desert);
        // Alice Springs
        assert_eq!(resolve_region_type(-23.7, 133.9), RegionType::Desert);
        // Bikaner, outside Thar box longitude
        assert_eq!(resolve_region_type(28.0, 75.5), RegionType::Desert);
    }

    #[test]
    fn test_box_edges_are_inclusive() {
        assert_eq!(resolve_region_type(15.0, 35.0), RegionType::Desert);
        assert_eq!(resolve_region_type(-35.0, 150.0), RegionType::Desert);
    }

    #[test]
    fn test_rural_and_urban_fallback() {
        // Berlin
        assert_eq!(resolve_region_type(52.5, 13.4), RegionType::Rural);
        // Buenos Aires region, south but below 40
        assert_eq!(resolve_region_type(-34.6, -58.4), RegionType::Urban);
        // Lahore
        assert_eq!(resolve_region_type(31.5, 74.3), RegionType::Desert);
        // Islamabad
        assert_eq!(resolve_region_type(33.7, 73.0), RegionType::Urban);
        // Wellington
        assert_eq!(resolve_region_type(-41.3, 174.8), RegionType::Rural);
    }

    #[test]
    fn test_resolve_profile() {
        let profile = RegionProfile::resolve(24.7, 46.7, 4);
        assert_eq!(profile.season, Season::Spring);
        assert_eq!(profile.region_type, RegionType::Desert);
    }

    #[test]
    fn test_parse_round_trip_names() {
        assert_eq!("Monsoon".parse::<Season>().unwrap(), Season::Monsoon);
        assert_eq!("desert".parse::<RegionType>().unwrap(), RegionType::Desert);
        assert!("tundra".parse::<RegionType>().is_err());
    }
}
