//! Fixed-width catalog text parser
//!
//! Reads a catalog in the classic fixed-column layout (as used by the
//! Yale Bright Star Catalog and similar): one line per object, with
//! name, cross-reference number, position and magnitude at fixed
//! 1-indexed inclusive byte offsets. Lines describing non-stellar
//! objects (nebulae, clusters, galaxies) leave the numeric fields
//! blank; such lines are silently skipped rather than treated as an
//! error, exactly as blank required fields are skipped here.

//a Imports
use std::io::{BufRead, BufReader, Read};

use crate::{Catalog, Error, Star};

//a Byte offsets (1-indexed, inclusive, per line)
mod offsets {
    pub const NAME: (usize, usize) = (5, 14);
    pub const HD_NUMBER: (usize, usize) = (26, 31);
    pub const RA_H: (usize, usize) = (76, 77);
    pub const RA_M: (usize, usize) = (78, 79);
    pub const RA_S: (usize, usize) = (80, 83);
    pub const DE_SIGN: (usize, usize) = (84, 84);
    pub const DE_D: (usize, usize) = (85, 86);
    pub const DE_M: (usize, usize) = (87, 88);
    pub const DE_S: (usize, usize) = (89, 90);
    pub const VMAG: (usize, usize) = (103, 107);
}

//fi field
/// Extract a 1-indexed, inclusive byte range from a line, returning
/// `None` if the line is too short to contain it
fn field(line: &str, range: (usize, usize)) -> Option<&str> {
    let bytes = line.as_bytes();
    let (start, end) = (range.0 - 1, range.1);
    if bytes.len() < end {
        return None;
    }
    std::str::from_utf8(&bytes[start..end]).ok()
}

//fi canonicalize_whitespace
/// Collapse runs of internal whitespace in a name to single spaces
fn canonicalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

//fi parse_line
/// Parse a single catalog line into a `(name, ra_rad, de_rad, vmag)`
/// tuple, or `None` if any required numeric field fails to parse
/// (the signal that this line describes a non-stellar object)
fn parse_line(line: &str) -> Option<(String, f64, f64, f32)> {
    let ra_h: f64 = field(line, offsets::RA_H)?.trim().parse().ok()?;
    let ra_m: f64 = field(line, offsets::RA_M)?.trim().parse().ok()?;
    let ra_s: f64 = field(line, offsets::RA_S)?.trim().parse().ok()?;

    let de_sign_str = field(line, offsets::DE_SIGN)?;
    let de_sign = if de_sign_str.trim() == "-" { -1.0 } else { 1.0 };
    let de_d: f64 = field(line, offsets::DE_D)?.trim().parse().ok()?;
    let de_m: f64 = field(line, offsets::DE_M)?.trim().parse().ok()?;
    let de_s: f64 = field(line, offsets::DE_S)?.trim().parse().ok()?;

    let vmag: f32 = field(line, offsets::VMAG)?.trim().parse().ok()?;

    let ra_hours = ra_h + ra_m / 60.0 + ra_s / 3600.0;
    let ra_rad = ra_hours * 15.0_f64.to_radians();
    let de_deg = de_sign * (de_d + de_m / 60.0 + de_s / 3600.0);
    let de_rad = de_deg.to_radians();

    let name = field(line, offsets::NAME)
        .map(str::trim)
        .map(canonicalize_whitespace)
        .filter(|s| !s.is_empty());
    let name = match name {
        Some(name) => name,
        None => {
            let hd: u32 = field(line, offsets::HD_NUMBER)?.trim().parse().ok()?;
            format!("HD{hd}")
        }
    };
    Some((name, ra_rad, de_rad, vmag))
}

//fp read_to_catalog
/// Read a fixed-width catalog from any `Read` source, adding every
/// star that parses to `catalog` and returning the `(id, name)`
/// pairs for every parsed line, in file order; returns only on I/O
/// failure. Names are not attached to the catalog here: [Catalog::add_names]
/// requires the catalog to be sorted first, which is the caller's call to make.
pub fn read_to_catalog<R: Read>(
    catalog: &mut Catalog,
    reader: R,
) -> Result<Vec<(usize, String)>, Error> {
    let reader = BufReader::new(reader);
    let mut id = 0usize;
    let mut names = vec![];
    for line in reader.lines() {
        let line = line?;
        if let Some((name, ra, de, vmag)) = parse_line(&line) {
            let star = Star::new(id, ra, de, 0.0, vmag, 0.0);
            catalog.add_star(star);
            names.push((id, name));
            id += 1;
        }
    }
    Ok(names)
}

//fp load_fixed_width
/// Load a fixed-width catalog file from disk into a new, sorted and
/// named [Catalog]
pub fn load_fixed_width<P: AsRef<std::path::Path>>(path: P) -> Result<Catalog, Error> {
    let f = std::fs::File::open(path)?;
    let mut catalog = Catalog::default();
    let names = read_to_catalog(&mut catalog, f)?;
    catalog.sort();
    catalog.add_names(&names, true)?;
    Ok(catalog)
}
