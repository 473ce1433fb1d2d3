//! Real Mekong delta provincial centres used as hubs.
//!
//! Coordinates are city-centre approximations from OpenStreetMap.

use hub_routing::traits::Location;

/// A named location with coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Hub {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Hub {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn location(&self) -> Location {
        Location::new(self.name.to_lowercase().replace(' ', "-"), self.name, self.lat, self.lng)
    }
}

// ============================================================================
// Departer (origin) hubs
// ============================================================================

pub const CAN_THO: Hub = Hub::new("Hub Can Tho", 10.0341, 105.7880);

// ============================================================================
// Destination hubs
// ============================================================================

pub const DESTINATIONS: &[Hub] = &[
    Hub::new("Vinh Long", 10.2537, 105.9722),
    Hub::new("Long Xuyen", 10.3860, 105.4352),
    Hub::new("Soc Trang", 9.6025, 105.9739),
    Hub::new("Rach Gia", 10.0125, 105.0809),
    Hub::new("Ca Mau", 9.1769, 105.1524),
    Hub::new("Bac Lieu", 9.2941, 105.7278),
    Hub::new("Tra Vinh", 9.9347, 106.3455),
    Hub::new("Ben Tre", 10.2415, 106.3759),
    Hub::new("My Tho", 10.3600, 106.3600),
    Hub::new("Cao Lanh", 10.4600, 105.6330),
    Hub::new("Vi Thanh", 9.7845, 105.4701),
    Hub::new("Sa Dec", 10.2920, 105.7600),
    Hub::new("Chau Doc", 10.7000, 105.1167),
];

pub fn destinations(count: usize) -> Vec<Location> {
    DESTINATIONS.iter().take(count).map(Hub::location).collect()
}
