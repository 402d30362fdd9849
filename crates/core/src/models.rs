use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Amenity names the engine and ranker match on. Matching is by exact name.
pub const AMENITY_ACCESSIBLE: &str = "Accessible";
pub const AMENITY_BABY_CHANGING: &str = "Baby Changing";
pub const AMENITY_GENDER_NEUTRAL: &str = "Gender Neutral";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestroomType {
    Public,
    GasStation,
    Restaurant,
    Cafe,
    Mall,
    Hotel,
    Other,
}

#[derive(Debug, Error)]
#[error("unknown restroom kind: {0}")]
pub struct ParseRestroomTypeError(String);

impl RestroomType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Public => "Public",
            Self::GasStation => "Gas Station",
            Self::Restaurant => "Restaurant",
            Self::Cafe => "Cafe",
            Self::Mall => "Mall",
            Self::Hotel => "Hotel",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for RestroomType {
    type Err = ParseRestroomTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "gas station" | "gas_station" | "gas-station" => Ok(Self::GasStation),
            "restaurant" => Ok(Self::Restaurant),
            "cafe" => Ok(Self::Cafe),
            "mall" => Ok(Self::Mall),
            "hotel" => Ok(Self::Hotel),
            "other" => Ok(Self::Other),
            _ => Err(ParseRestroomTypeError(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amenity {
    pub id: String,
    pub name: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub user_name: String,
    pub rating: f64,
    pub comment: String,
    pub date: String,
    pub helpful: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hours {
    pub open: String,
    pub close: String,
    /// Precomputed by whoever built the record; the response engine only
    /// reads it and never derives open/closed from the clock.
    pub is_open: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restroom {
    pub id: String,
    pub name: String,
    pub address: String,
    pub location: Coordinates,
    pub kind: RestroomType,
    pub cleanliness: f64,
    pub last_reported: String,
    pub amenities: Vec<Amenity>,
    pub reviews: Vec<Review>,
    pub hours: Option<Hours>,
    /// Human-readable distance, attached by the caller before ranking or
    /// chat. The response engine never computes distance itself.
    pub distance_label: Option<String>,
    pub partner: bool,
}

impl Restroom {
    pub fn has_amenity(&self, name: &str) -> bool {
        self.amenities.iter().any(|amenity| amenity.name == name)
    }

    /// First comma-delimited segment of the address, used as the area name.
    pub fn area(&self) -> &str {
        self.address.split(',').next().unwrap_or(&self.address).trim()
    }

    pub fn distance_text(&self) -> &str {
        self.distance_label.as_deref().unwrap_or("distance unknown")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub accessibility: bool,
    pub baby_changing: bool,
    pub gender_neutral: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    pub kinds: Vec<RestroomType>,
    pub min_cleanliness: Option<f64>,
    pub max_distance: Option<f64>,
    pub amenity_ids: Vec<String>,
    pub open_now: bool,
}

/// One variant per rule in the response cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    NoData,
    Greeting,
    AreaLookup,
    LocationSearch,
    SelfLocation,
    BareFacility,
    Cleanliness,
    Accessibility,
    BabyChanging,
    OpeningHours,
    Help,
    VenueDetail,
    Thanks,
    Fallback,
}

impl IntentKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::NoData => "no_data",
            Self::Greeting => "greeting",
            Self::AreaLookup => "area_lookup",
            Self::LocationSearch => "location_search",
            Self::SelfLocation => "self_location",
            Self::BareFacility => "bare_facility",
            Self::Cleanliness => "cleanliness",
            Self::Accessibility => "accessibility",
            Self::BabyChanging => "baby_changing",
            Self::OpeningHours => "opening_hours",
            Self::Help => "help",
            Self::VenueDetail => "venue_detail",
            Self::Thanks => "thanks",
            Self::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatInput {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantReply {
    pub reply_text: String,
    pub intent: IntentKind,
    pub suggested_queries: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_restroom_kinds() {
        assert_eq!(
            "Gas Station".parse::<RestroomType>().unwrap(),
            RestroomType::GasStation
        );
        assert_eq!("cafe".parse::<RestroomType>().unwrap(), RestroomType::Cafe);
        assert!("bus stop".parse::<RestroomType>().is_err());
    }

    #[test]
    fn area_is_first_address_segment() {
        let restroom = Restroom {
            id: "r-1".to_string(),
            name: "Gandipuram Public Toilet".to_string(),
            address: "Gandipuram, Coimbatore".to_string(),
            location: Coordinates { lat: 11.0, lng: 76.9 },
            kind: RestroomType::Public,
            cleanliness: 4.2,
            last_reported: "Just now".to_string(),
            amenities: Vec::new(),
            reviews: Vec::new(),
            hours: None,
            distance_label: None,
            partner: false,
        };

        assert_eq!(restroom.area(), "Gandipuram");
        assert_eq!(restroom.distance_text(), "distance unknown");
    }
}
