#![cfg(feature = "csv")]

use std::error::Error;
use std::io::Cursor;

use star_tracker::{hipparcos, Catalog};

const SAMPLE_CSV: &str = "\
HIP,RAdeg,DEdeg,Plx,Vmag,B-V
11767,37.9529,89.2642,7.56,1.97,0.64
32349,101.2875,-16.7161,379.21,-1.46,0.00
49669,152.0929,11.9672,41.13,1.35,-0.09
999999,200.0,5.0,,9.9,1.0
";

#[test]
fn reads_csv_and_skips_incomplete_records() -> Result<(), Box<dyn Error>> {
    let mut catalog = Catalog::default();
    hipparcos::read_to_catalog(&mut catalog, Cursor::new(SAMPLE_CSV), 6.0)?;
    // the fourth row is missing its parallax and is silently skipped
    assert_eq!(catalog.len(), 3);
    Ok(())
}

#[test]
fn magnitude_limit_is_applied() -> Result<(), Box<dyn Error>> {
    let mut catalog = Catalog::default();
    hipparcos::read_to_catalog(&mut catalog, Cursor::new(SAMPLE_CSV), 1.5)?;
    // only Polaris (1.97) is fainter than 1.5 and is dropped
    assert_eq!(catalog.len(), 2);
    Ok(())
}

#[test]
fn aliases_resolve_against_a_loaded_catalog() -> Result<(), Box<dyn Error>> {
    let mut catalog = Catalog::default();
    hipparcos::read_to_catalog(&mut catalog, Cursor::new(SAMPLE_CSV), 6.0)?;
    catalog.sort();
    catalog.add_names(hipparcos::HIP_ALIASES, true)?;
    let polaris = catalog.find_name("Polaris").expect("Polaris should resolve");
    assert_eq!(catalog[polaris].id(), 11767);
    Ok(())
}
