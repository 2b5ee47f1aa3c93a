//! Country reference data: coordinates and regions
//!
//! Countries are keyed by the exact name the World Bank API publishes
//! (`"Korea, Rep."`, `"Egypt, Arab Rep."`, ...). A country missing from
//! this table is not map-eligible and is left out of every geo and
//! clustering output.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Built-in table: (World Bank name, latitude, longitude, region)
const BUILTIN: &[(&str, f64, f64, &str)] = &[
    // North America
    ("United States", 37.0902, -95.7129, "North America"),
    ("Canada", 56.1304, -106.3468, "North America"),
    ("Mexico", 23.6345, -102.5528, "North America"),
    ("Guatemala", 15.7835, -90.2308, "North America"),
    ("Costa Rica", 9.7489, -83.7534, "North America"),
    ("Jamaica", 18.1096, -77.2975, "North America"),
    // South America
    ("Brazil", -14.2350, -51.9253, "South America"),
    ("Argentina", -38.4161, -63.6167, "South America"),
    ("Chile", -35.6751, -71.5430, "South America"),
    ("Colombia", 4.5709, -74.2973, "South America"),
    ("Peru", -9.1900, -75.0152, "South America"),
    ("Ecuador", -1.8312, -78.1834, "South America"),
    ("Bolivia", -16.2902, -63.5887, "South America"),
    ("Paraguay", -23.4425, -58.4438, "South America"),
    ("Uruguay", -32.5228, -55.7658, "South America"),
    ("Venezuela, RB", 6.4238, -66.5897, "South America"),
    // Europe
    ("United Kingdom", 55.3781, -3.4360, "Europe"),
    ("Germany", 51.1657, 10.4515, "Europe"),
    ("France", 46.2276, 2.2137, "Europe"),
    ("Italy", 41.8719, 12.5674, "Europe"),
    ("Spain", 40.4637, -3.7492, "Europe"),
    ("Portugal", 39.3999, -8.2245, "Europe"),
    ("Netherlands", 52.1326, 5.2913, "Europe"),
    ("Belgium", 50.5039, 4.4699, "Europe"),
    ("Switzerland", 46.8182, 8.2275, "Europe"),
    ("Austria", 47.5162, 14.5501, "Europe"),
    ("Ireland", 53.4129, -8.2439, "Europe"),
    ("Sweden", 60.1282, 18.6435, "Europe"),
    ("Norway", 60.4720, 8.4689, "Europe"),
    ("Denmark", 56.2639, 9.5018, "Europe"),
    ("Finland", 61.9241, 25.7482, "Europe"),
    ("Poland", 51.9194, 19.1451, "Europe"),
    ("Czechia", 49.8175, 15.4730, "Europe"),
    ("Hungary", 47.1625, 19.5033, "Europe"),
    ("Romania", 45.9432, 24.9668, "Europe"),
    ("Greece", 39.0742, 21.8243, "Europe"),
    ("Turkiye", 38.9637, 35.2433, "Europe"),
    ("Russian Federation", 61.5240, 105.3188, "Europe"),
    ("Ukraine", 48.3794, 31.1656, "Europe"),
    // Asia
    ("China", 35.8617, 104.1954, "Asia"),
    ("Japan", 36.2048, 138.2529, "Asia"),
    ("India", 20.5937, 78.9629, "Asia"),
    ("Korea, Rep.", 35.9078, 127.7669, "Asia"),
    ("Indonesia", -0.7893, 113.9213, "Asia"),
    ("Thailand", 15.8700, 100.9925, "Asia"),
    ("Malaysia", 4.2105, 101.9758, "Asia"),
    ("Philippines", 12.8797, 121.7740, "Asia"),
    ("Viet Nam", 14.0583, 108.2772, "Asia"),
    ("Singapore", 1.3521, 103.8198, "Asia"),
    ("Pakistan", 30.3753, 69.3451, "Asia"),
    ("Bangladesh", 23.6850, 90.3563, "Asia"),
    ("Sri Lanka", 7.8731, 80.7718, "Asia"),
    ("Kazakhstan", 48.0196, 66.9237, "Asia"),
    // Middle East
    ("Saudi Arabia", 23.8859, 45.0792, "Middle East"),
    ("United Arab Emirates", 23.4241, 53.8478, "Middle East"),
    ("Israel", 31.0461, 34.8516, "Middle East"),
    ("Iran, Islamic Rep.", 32.4279, 53.6880, "Middle East"),
    ("Iraq", 33.2232, 43.6793, "Middle East"),
    ("Jordan", 30.5852, 36.2384, "Middle East"),
    ("Lebanon", 33.8547, 35.8623, "Middle East"),
    ("Qatar", 25.3548, 51.1839, "Middle East"),
    // Africa
    ("Egypt, Arab Rep.", 26.8206, 30.8025, "Africa"),
    ("Nigeria", 9.0820, 8.6753, "Africa"),
    ("South Africa", -30.5595, 22.9375, "Africa"),
    ("Kenya", -0.0236, 37.9062, "Africa"),
    ("Ethiopia", 9.1450, 40.4897, "Africa"),
    ("Ghana", 7.9465, -1.0232, "Africa"),
    ("Morocco", 31.7917, -7.0926, "Africa"),
    ("Algeria", 28.0339, 1.6596, "Africa"),
    ("Angola", -11.2027, 17.8739, "Africa"),
    ("Tanzania", -6.3690, 34.8888, "Africa"),
    ("Zimbabwe", -19.0154, 29.1549, "Africa"),
    ("Sudan", 12.8628, 30.2176, "Africa"),
    // Oceania
    ("Australia", -25.2744, 133.7751, "Oceania"),
    ("New Zealand", -40.9006, 174.8860, "Oceania"),
    ("Papua New Guinea", -6.3150, 143.9555, "Oceania"),
    ("Fiji", -17.7134, 178.0650, "Oceania"),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// One row of the reference table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryInfo {
    pub name: String,
    #[serde(flatten)]
    pub coordinates: Coordinates,
    pub region: String,
}

#[derive(Debug, Deserialize)]
struct ReferenceFile {
    #[serde(default)]
    country: Vec<CountryInfo>,
}

/// Immutable lookup from country name to coordinates and region
#[derive(Debug, Clone, PartialEq)]
pub struct CountryReference {
    countries: BTreeMap<String, CountryInfo>,
}

impl CountryReference {
    /// The table compiled into the binary
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN.iter().map(|&(name, lat, lon, region)| CountryInfo {
            name: name.to_string(),
            coordinates: Coordinates { lat, lon },
            region: region.to_string(),
        }))
    }

    /// Build from arbitrary entries; later duplicates replace earlier ones
    pub fn from_entries(entries: impl IntoIterator<Item = CountryInfo>) -> Self {
        let countries = entries
            .into_iter()
            .map(|info| (info.name.clone(), info))
            .collect();
        Self { countries }
    }

    /// Parse a `[[country]]` TOML table
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ReferenceFile = toml::from_str(content)?;
        if file.country.is_empty() {
            return Err(Error::Config(
                "reference table has no [[country]] entries".into(),
            ));
        }
        for info in &file.country {
            if !(-90.0..=90.0).contains(&info.coordinates.lat)
                || !(-180.0..=180.0).contains(&info.coordinates.lon)
            {
                return Err(Error::Config(format!(
                    "coordinates out of range for {}",
                    info.name
                )));
            }
        }
        Ok(Self::from_entries(file.country))
    }

    /// Load a reference table from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let reference = Self::from_toml_str(&content)?;
        debug!(
            path = %path.display(),
            countries = reference.len(),
            "Loaded country reference"
        );
        Ok(reference)
    }

    pub fn get(&self, country: &str) -> Option<&CountryInfo> {
        self.countries.get(country)
    }

    pub fn coordinates(&self, country: &str) -> Option<Coordinates> {
        self.countries.get(country).map(|c| c.coordinates)
    }

    pub fn region(&self, country: &str) -> Option<&str> {
        self.countries.get(country).map(|c| c.region.as_str())
    }

    pub fn contains(&self, country: &str) -> bool {
        self.countries.contains_key(country)
    }

    /// Sorted distinct region names
    pub fn regions(&self) -> Vec<String> {
        self.countries
            .values()
            .map(|c| c.region.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Country names, alphabetically
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.countries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

impl Default for CountryReference {
    fn default() -> Self {
        Self::builtin()
    }
}
