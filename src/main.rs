use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgMatches, Command};
use geo_nd::Vector;

use star_tracker::{Catalog, FrameOutcome, PairData, PairTable, Star, TrackerConfig};

mod cmdline;

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let cmd = Command::new("star-tracker")
        .about("Lost-in-space star tracker: catalog preprocessing and frame identification")
        .version(env!("CARGO_PKG_VERSION"));

    let mut has_csv = false;
    #[cfg(feature = "csv")]
    {
        has_csv = true;
    }
    let mut has_image = false;
    #[cfg(feature = "image")]
    {
        has_image = true;
    }

    let list_subcmd = Command::new("list").about("Lists the stars in the catalog");
    let find_subcmd = Command::new("find").about("Find stars in the catalog and display them");
    let find_subcmd = cmdline::add_stars_arg(find_subcmd);
    let write_subcmd = Command::new("write").about("Write out the catalog as JSON");
    let write_subcmd = cmdline::add_output_arg(write_subcmd);

    let build_pairs_subcmd = Command::new("build-pairs")
        .about("Phase A: build and persist the pair/neighbor table for a field of view");
    let build_pairs_subcmd = cmdline::add_fov_arg(build_pairs_subcmd);
    let build_pairs_subcmd = cmdline::add_output_arg(build_pairs_subcmd);

    let identify_subcmd =
        Command::new("identify").about("Phase B: identify a captured frame against a pair table");
    let identify_subcmd = cmdline::add_pairs_arg(identify_subcmd);
    let identify_subcmd = cmdline::add_frame_arg(identify_subcmd);
    let identify_subcmd = cmdline::add_fov_arg(identify_subcmd);
    let identify_subcmd = cmdline::add_tolerance_arg(identify_subcmd);
    let identify_subcmd = cmdline::add_seed_arg(identify_subcmd);

    let cmd = cmdline::add_catalog_arg(cmd);
    let cmd = cmdline::add_magnitude_arg(cmd);
    let cmd = cmdline::add_names_arg(cmd);
    let cmd = cmdline::add_right_ascension_arg(cmd);
    let cmd = cmdline::add_declination_arg(cmd);
    let cmd = cmdline::add_angle_arg(cmd);

    let cmd = cmd.subcommand(list_subcmd);
    let cmd = cmd.subcommand(find_subcmd);
    let cmd = cmd.subcommand(write_subcmd);
    let cmd = cmd.subcommand(build_pairs_subcmd);
    let cmd = {
        if has_image {
            cmd.subcommand(identify_subcmd)
        } else {
            cmd
        }
    };

    let matches = cmd.get_matches();

    let magnitude = cmdline::magnitude(&matches);
    let catalog_filename: PathBuf = cmdline::catalog(&matches).into();

    let mut catalog = {
        match catalog_filename.extension().and_then(|x| x.to_str()) {
            Some("json") => {
                let s = std::fs::read_to_string(&catalog_filename)?;
                let mut catalog: Catalog = serde_json::from_str(&s)?;
                // inclusive cutoff: a star at exactly `magnitude` is kept
                catalog.retain(|s| s.mag() <= magnitude);
                Ok(catalog)
            }
            Some("csv") => {
                if has_csv {
                    let mut catalog = Catalog::default();
                    #[cfg(feature = "csv")]
                    {
                        let f = std::fs::File::open(&catalog_filename)?;
                        star_tracker::hipparcos::read_to_catalog(&mut catalog, &f, magnitude)?;
                    }
                    Ok(catalog)
                } else {
                    Err(anyhow!(
                        "CSV support not provided; star-tracker must be compiled with feature 'csv'"
                    ))
                }
            }
            Some(_) | None => {
                let mut catalog = star_tracker::catalog::loader::load_fixed_width(&catalog_filename)?;
                // inclusive cutoff: a star at exactly `magnitude` is kept
                catalog.retain(|s| s.mag() <= magnitude);
                Ok(catalog)
            }
        }
    }?;

    catalog.sort();
    let angle = cmdline::angle(&matches);
    if angle > 0. {
        catalog.derive_data();
        let mut ids: Vec<usize> = vec![];
        let v = Star::vec_of_ra_de(
            cmdline::right_ascension(&matches),
            cmdline::declination(&matches),
        );
        let cos_angle = angle.cos();
        for s in catalog.iter_stars() {
            if s.vector().dot(&v) >= cos_angle {
                ids.push(s.id());
            }
        }
        catalog.retain(|s| ids.binary_search(&s.id()).is_ok());
        catalog.sort();
    }

    if let Some(names_filename) = cmdline::names(&matches) {
        let s = std::fs::read_to_string(names_filename)?;
        let id_names: Vec<(usize, String)> = serde_json::from_str(&s)?;
        catalog.add_names(&id_names, true)?;
    }

    match matches.subcommand() {
        Some(("list", sub_matches)) => {
            list(catalog, sub_matches)?;
        }
        Some(("find", sub_matches)) => {
            find(catalog, sub_matches)?;
        }
        Some(("write", sub_matches)) => {
            write(catalog, sub_matches)?;
        }
        Some(("build-pairs", sub_matches)) => {
            build_pairs(catalog, sub_matches)?;
        }
        Some(("identify", sub_matches)) => {
            identify(sub_matches)?;
        }
        _ => {
            println!("Catalog has {} stars", catalog.len());
        }
    }
    Ok(())
}

fn display_star(s: &Star) {
    let id = s.id();
    let ra = s.ra().to_degrees();
    let de = s.de().to_degrees();
    let ly = s.light_years();
    let mag = s.mag();
    println!("{id:8} : {ra}, {de} : {ly} : {mag}");
}

fn find(catalog: Catalog, matches: &ArgMatches) -> Result<(), anyhow::Error> {
    if let Some(stars) = cmdline::stars(matches) {
        for s in stars {
            match s.parse::<usize>() {
                Err(_) => {
                    if let Some(s) = catalog.find_name(s) {
                        display_star(&catalog[s]);
                    } else {
                        eprintln!("Could not find star with name {s}");
                    }
                }
                Ok(id) => {
                    if let Some(s) = catalog.find_sorted(id) {
                        display_star(&catalog[s]);
                    } else {
                        eprintln!("Could not find star with id {id}");
                    }
                }
            }
        }
    }
    Ok(())
}

fn list(catalog: Catalog, _matches: &ArgMatches) -> Result<(), anyhow::Error> {
    for s in catalog.iter_stars() {
        display_star(s);
    }
    Ok(())
}

fn write(catalog: Catalog, matches: &ArgMatches) -> Result<(), anyhow::Error> {
    use std::io::Write;
    let output_filename: PathBuf = cmdline::output(matches).into();
    let mut f = std::fs::File::create(output_filename)?;
    let s = serde_json::to_string_pretty(&catalog)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

fn build_pairs(mut catalog: Catalog, matches: &ArgMatches) -> Result<(), anyhow::Error> {
    let fov = cmdline::fov(matches);
    let mut config = TrackerConfig {
        field_of_view_deg: fov,
        ..TrackerConfig::default()
    };
    config.pair_angle_bounds_deg = (fov / 1000.0, fov);
    let config = config.validate()?;

    catalog.sort();
    let pair_table = PairTable::build(&catalog, &config);
    let data = PairData::build(pair_table);

    let output_filename: PathBuf = cmdline::output(matches).into();
    match output_filename.extension().and_then(|x| x.to_str()) {
        Some("json") => data.save_json(&output_filename)?,
        _ => {
            #[cfg(feature = "postcard")]
            {
                data.save_postcard(&output_filename)?;
            }
            #[cfg(not(feature = "postcard"))]
            {
                data.save_json(&output_filename)?;
            }
        }
    }
    println!(
        "wrote {} pairs to {}",
        data.pair_table.len(),
        output_filename.display()
    );
    Ok(())
}

#[cfg(feature = "image")]
fn identify(matches: &ArgMatches) -> Result<(), anyhow::Error> {
    let pairs_filename: PathBuf = cmdline::pairs(matches).into();
    let data = match pairs_filename.extension().and_then(|x| x.to_str()) {
        Some("json") => PairData::load_json(&pairs_filename)?,
        #[cfg(feature = "postcard")]
        _ => PairData::load_postcard(&pairs_filename)?,
        #[cfg(not(feature = "postcard"))]
        _ => return Err(anyhow!("pair table is not JSON and 'postcard' feature is disabled")),
    };
    let neighbors = star_tracker::NeighborTable::build(&data.pair_table);

    let catalog_filename: PathBuf = cmdline::catalog(matches).into();
    let s = std::fs::read_to_string(&catalog_filename)?;
    let mut catalog: Catalog = serde_json::from_str(&s)?;
    catalog.sort();

    let fov = cmdline::fov(matches);
    let mut config = TrackerConfig {
        field_of_view_deg: fov,
        match_tolerance_deg: cmdline::tolerance(matches),
        rng_seed: cmdline::seed(matches),
        ..TrackerConfig::default()
    };
    config.pair_angle_bounds_deg = (fov / 1000.0, fov);
    let config = config.validate()?;

    let frame_filename: PathBuf = cmdline::frame(matches).into();
    let (width, height, bytes) = star_tracker::imager::Frame::load_image(&frame_filename)?;
    let frame = star_tracker::imager::Frame::new(width, height, &bytes);

    match star_tracker::identify_frame(&frame, &catalog, &data.pair_table, &neighbors, &config) {
        FrameOutcome::Identified {
            catalog_ids,
            ra_deg,
            dec_deg,
            ..
        } => {
            println!("identified stars {catalog_ids:?}");
            println!("pointing: ra={ra_deg:.4} deg, dec={dec_deg:.4} deg");
        }
        FrameOutcome::Unidentified { reason } => {
            println!("unidentified: {reason}");
        }
    }
    Ok(())
}

#[cfg(not(feature = "image"))]
fn identify(_matches: &ArgMatches) -> Result<(), anyhow::Error> {
    Err(anyhow!(
        "frame identification requires star-tracker to be compiled with feature 'image'"
    ))
}
