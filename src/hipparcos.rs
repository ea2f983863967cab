//! # Hipparcos data and catalog reading
//!
//! The Hipparcos catalog is available as 'hipparcos-voidmain.csv';
//! this module reads it into a [Catalog], as an alternative entry
//! point to the fixed-width loader in [crate::catalog::loader] for
//! callers who already have the Hipparcos CSV distribution on hand.
//!
//! This also provides a small `HIP_ALIASES` constant mapping some
//! Hipparcos identifiers to common star names.

//a Imports
#[cfg(feature = "csv")]
use crate::{Catalog, Star};

//ti Record
/// Fields read from the Hipparcos main CSV file; only the columns
/// this crate needs are named, the rest are ignored by `csv`'s
/// flexible deserialization.
///
/// light years = 3.26156 / parallax in arc-seconds
#[cfg(feature = "csv")]
#[derive(Debug, serde::Deserialize)]
struct Record {
    #[serde(rename = "HIP")]
    hip: Option<usize>,
    /// Right ascension in degrees
    #[serde(rename = "RAdeg")]
    ra: Option<f64>,
    /// Declination in degrees
    #[serde(rename = "DEdeg")]
    de: Option<f64>,
    /// Parallax, in milliarcseconds
    #[serde(rename = "Plx")]
    plx: Option<f32>,
    /// Visual magnitude
    #[serde(rename = "Vmag")]
    mag: Option<f32>,
    /// Blue-violet luminance delta
    #[serde(rename = "B-V")]
    b_v: Option<f32>,
}

//fp read_to_catalog
/// Read stars from a Hipparcos CSV file (or anything that supports
/// `std::io::Read`) and add them to a [Catalog]
///
/// Only includes records with a visual magnitude brighter than
/// `max_mag`, and skips any record missing a required field -
/// mirroring the fixed-width loader's silent-skip behavior for
/// non-stellar rows.
///
/// Requires the `csv` feature.
#[cfg(feature = "csv")]
pub fn read_to_catalog<R: std::io::Read>(
    catalog: &mut Catalog,
    reader: R,
    max_mag: f32,
) -> Result<(), csv::Error> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    for result in csv_reader.deserialize() {
        let record: Record = result?;
        if record.hip.is_some()
            && record.ra.is_some()
            && record.de.is_some()
            && record.plx.is_some()
            && record.mag.is_some()
            && record.b_v.is_some()
        {
            let mag = record.mag.unwrap();
            if mag > max_mag {
                continue;
            }
            let hip = record.hip.unwrap();
            let ra = record.ra.unwrap().to_radians();
            let de = record.de.unwrap().to_radians();
            let ly = 3.26156E3 / record.plx.unwrap();
            let ly = if ly.is_normal() { ly } else { 0.0 };
            let b_v = record.b_v.unwrap();
            let star = Star::new(hip, ra, de, ly, mag, b_v);
            catalog.add_star(star);
        }
    }
    Ok(())
}

//cp HIP_ALIASES
/// Aliases of HIP identifiers to common names of stars
pub const HIP_ALIASES: &[(usize, &str)] = &[
    (677, "Alpheratz"),
    (746, "Caph"),
    (1067, "Algenib"),
    (2081, "Ankaa"),
    (3179, "Shedir"),
    (3419, "Diphda"),
    (5447, "Mirach"),
    (7588, "Achernar"),
    (9640, "Almaak"),
    (9884, "Hamal"),
    (10826, "Mira"),
    (11767, "Polaris"),
    (13847, "Acamar"),
    (14135, "Menkar"),
    (14576, "Algol"),
    (15863, "Mirphak"),
    (17702, "Alcyone"),
    (21421, "Aldebaran"),
    (24436, "Rigel"),
    (24608, "Capella"),
    (25336, "Bellatrix"),
    (25930, "Mintaka"),
    (26311, "Alnilam"),
    (26727, "Alnitak"),
    (27366, "Saiph"),
    (27989, "Betelgeuse"),
    (30438, "Canopus"),
    (32349, "Sirius"),
    (33579, "Adhara"),
    (36850, "Castor"),
    (37279, "Procyon"),
    (37826, "Pollux"),
    (49669, "Regulus"),
    (54061, "Dubhe"),
    (57632, "Denebola"),
    (58001, "Phad"),
    (59774, "Megrez"),
    (60718, "Acrux"),
    (62956, "Alioth"),
    (65378, "Mizar"),
    (65474, "Spica"),
    (67301, "Alkaid"),
    (68702, "Hadar"),
    (69673, "Arcturus"),
    (71683, "Rigil Kent"),
    (76267, "Alphekka"),
    (80763, "Antares"),
    (85927, "Shaula"),
    (86032, "Rasalhague"),
    (87937, "Barnard's star"),
    (90185, "Kaus Australis"),
    (91262, "Vega"),
    (97649, "Altair"),
    (102098, "Deneb"),
    (109268, "Alnair"),
    (113368, "Fomalhaut"),
];
