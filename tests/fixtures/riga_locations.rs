//! Riga locations for realistic test fixtures.
//!
//! Approximate coordinates of well-known landmarks, all routable within the
//! OSRM Latvia extract.

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

pub const CITY_CENTRE: &[Location] = &[
    Location::new("Central Station", 56.9466, 24.1206),
    Location::new("Dome Cathedral", 56.9490, 24.1048),
    Location::new("Freedom Monument", 56.9514, 24.1133),
    Location::new("Central Market", 56.9440, 24.1140),
    Location::new("National Library", 56.9418, 24.0958),
    Location::new("Spikeri Quarter", 56.9424, 24.1209),
];

pub const OUTSKIRTS: &[Location] = &[
    Location::new("Mezaparks", 57.0000, 24.1450),
    Location::new("Imanta", 56.9580, 23.9890),
    Location::new("Purvciems", 56.9560, 24.2020),
    Location::new("Plavnieki", 56.9350, 24.2150),
];
