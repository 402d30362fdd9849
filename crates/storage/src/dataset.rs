use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use reststop_core::{
    distance_km, format_distance, Amenity, Coordinates, Hours, Restroom, RestroomType, Review,
    UnitSystem, AMENITY_ACCESSIBLE, AMENITY_BABY_CHANGING, AMENITY_GENDER_NEUTRAL,
};

pub const COIMBATORE_CENTER: Coordinates = Coordinates {
    lat: 11.0168,
    lng: 76.9558,
};

/// Coordinate jitter around the city center, in degrees (~2 km).
const COORDINATE_SPREAD: f64 = 0.04;
const PARTNER_EVERY: usize = 10;

/// Everything the generator needs is explicit, so the same config always
/// produces the same dataset.
#[derive(Debug, Clone, Copy)]
pub struct DatasetConfig {
    pub seed: u64,
    pub user_location: Coordinates,
    /// Hour of day (0-23) used to precompute each venue's `is_open` flag.
    pub now_hour: u32,
    pub units: UnitSystem,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            seed: 7,
            user_location: COIMBATORE_CENTER,
            now_hour: 12,
            units: UnitSystem::Metric,
        }
    }
}

struct SourceRecord {
    name: &'static str,
    address: &'static str,
    kind: RestroomType,
    cleanliness: f64,
    accessible: bool,
    review: &'static str,
}

const SOURCE_RECORDS: &[SourceRecord] = &[
    SourceRecord {
        name: "Gandipuram Public Toilet",
        address: "Gandipuram, Coimbatore",
        kind: RestroomType::Public,
        cleanliness: 4.2,
        accessible: true,
        review: "Clean and well maintained facility",
    },
    SourceRecord {
        name: "RS Puram Restroom",
        address: "R.S. Puram, Coimbatore",
        kind: RestroomType::Public,
        cleanliness: 3.8,
        accessible: true,
        review: "Decent facility with regular maintenance",
    },
    SourceRecord {
        name: "Saibaba Colony Toilet",
        address: "Saibaba Colony, Coimbatore",
        kind: RestroomType::Public,
        cleanliness: 4.0,
        accessible: true,
        review: "Clean restroom with good facilities",
    },
    SourceRecord {
        name: "Peelamedu Rest Stop",
        address: "Peelamedu, Coimbatore",
        kind: RestroomType::GasStation,
        cleanliness: 3.5,
        accessible: false,
        review: "Average cleanliness but convenient location",
    },
    SourceRecord {
        name: "Race Course Road Toilet",
        address: "Race Course, Coimbatore",
        kind: RestroomType::Restaurant,
        cleanliness: 4.5,
        accessible: true,
        review: "Very clean with excellent maintenance",
    },
];

const POSITIVE_COMMENTS: &[&str] = &[
    "Clean and well maintained.",
    "Very satisfactory experience!",
    "Would definitely use again.",
];
const MIXED_COMMENTS: &[&str] = &[
    "Adequate but could be better.",
    "Acceptable for emergency use.",
    "Not bad, not great.",
];
const NEGATIVE_COMMENTS: &[&str] = &[
    "Avoid if possible.",
    "Needs serious improvement.",
    "Unhygienic conditions.",
];

/// Build the sample venue list, sorted ascending by distance from the
/// configured user location with distance labels already attached.
pub fn sample_restrooms(config: &DatasetConfig) -> Vec<Restroom> {
    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut with_distance = SOURCE_RECORDS
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let restroom = build_restroom(index, record, config, &mut rng);
            let distance = distance_km(config.user_location, restroom.location);
            (distance, restroom)
        })
        .collect::<Vec<_>>();

    with_distance.sort_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    with_distance
        .into_iter()
        .map(|(_, restroom)| restroom)
        .collect()
}

fn build_restroom(
    index: usize,
    record: &SourceRecord,
    config: &DatasetConfig,
    rng: &mut StdRng,
) -> Restroom {
    let location = Coordinates {
        lat: COIMBATORE_CENTER.lat + (rng.random::<f64>() - 0.5) * COORDINATE_SPREAD,
        lng: COIMBATORE_CENTER.lng + (rng.random::<f64>() - 0.5) * COORDINATE_SPREAD,
    };

    let open_hour = 6 + rng.random_range(0..3u32);
    let close_hour = 19 + rng.random_range(0..4u32);
    let hours = Hours {
        open: format!("{open_hour:02}:00"),
        close: format!("{close_hour:02}:00"),
        is_open: config.now_hour >= open_hour && config.now_hour < close_hour,
    };

    let reported_hours_ago = rng.random_range(0..48u32);
    let last_reported = match reported_hours_ago {
        0 => "Just now".to_string(),
        1 => "1 hour ago".to_string(),
        n => format!("{n} hours ago"),
    };

    let distance = distance_km(config.user_location, location);

    Restroom {
        id: format!("restroom-{}", index + 1),
        name: record.name.to_string(),
        address: record.address.to_string(),
        location,
        kind: record.kind,
        cleanliness: record.cleanliness,
        last_reported,
        amenities: build_amenities(index, record, rng),
        reviews: build_reviews(index, record, rng),
        hours: Some(hours),
        distance_label: Some(format_distance(distance, config.units)),
        partner: index % PARTNER_EVERY == 0,
    }
}

fn build_amenities(index: usize, record: &SourceRecord, rng: &mut StdRng) -> Vec<Amenity> {
    let mut amenities = vec![Amenity {
        id: format!("amenity-toilet-{index}"),
        name: "Toilet".to_string(),
        icon: "toilet".to_string(),
    }];

    if record.accessible {
        amenities.push(Amenity {
            id: format!("amenity-accessible-{index}"),
            name: AMENITY_ACCESSIBLE.to_string(),
            icon: "wheelchair".to_string(),
        });
    }

    // Better kept venues tend to carry more amenities.
    if record.cleanliness >= 3.5 {
        amenities.push(Amenity {
            id: format!("amenity-washing-{index}"),
            name: "Hand Washing".to_string(),
            icon: "droplets".to_string(),
        });

        if record.cleanliness >= 4.0 {
            amenities.push(Amenity {
                id: format!("amenity-changing-{index}"),
                name: AMENITY_BABY_CHANGING.to_string(),
                icon: "baby".to_string(),
            });
        }

        if record.cleanliness >= 4.5 && rng.random::<bool>() {
            amenities.push(Amenity {
                id: format!("amenity-gender-{index}"),
                name: AMENITY_GENDER_NEUTRAL.to_string(),
                icon: "users".to_string(),
            });
        }
    }

    amenities
}

fn build_reviews(index: usize, record: &SourceRecord, rng: &mut StdRng) -> Vec<Review> {
    let review_count = 1 + rng.random_range(0..3u32) as usize;

    let mut reviews = vec![Review {
        id: format!("review-main-{index}"),
        user_name: format!("User{}", 100 + rng.random_range(0..900u32)),
        rating: record.cleanliness,
        comment: record.review.to_string(),
        date: format!("{} days ago", rng.random_range(1..=10u32)),
        helpful: rng.random_range(0..10u32),
    }];

    for extra in 1..review_count {
        let rating = (record.cleanliness + (rng.random::<f64>() - 0.5) * 1.5).clamp(1.0, 5.0);
        let pool = if rating >= 4.0 {
            POSITIVE_COMMENTS
        } else if rating >= 2.5 {
            MIXED_COMMENTS
        } else {
            NEGATIVE_COMMENTS
        };

        reviews.push(Review {
            id: format!("review-{index}-{extra}"),
            user_name: format!("User{}", 100 + rng.random_range(0..900u32)),
            rating,
            comment: pool[rng.random_range(0..pool.len())].to_string(),
            date: format!("{} days ago", rng.random_range(1..=30u32)),
            helpful: rng.random_range(0..5u32),
        });
    }

    reviews
}
