use clap::{parser::ValuesRef, value_parser, Arg, ArgAction, ArgMatches, Command};

//fp add_catalog_arg
pub fn add_catalog_arg(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("catalog")
            .long("catalog")
            .short('c')
            .required(true)
            .help("Which star catalog to load (.json, .csv or fixed-width .txt)")
            .action(ArgAction::Set),
    )
}
pub fn catalog(matches: &ArgMatches) -> String {
    matches.get_one::<String>("catalog").unwrap().to_string()
}

//fp add_magnitude_arg
pub fn add_magnitude_arg(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("magnitude")
            .long("magnitude")
            .short('m')
            .help("Maximum visual magnitude to retain")
            .value_parser(value_parser!(f32))
            .action(ArgAction::Set),
    )
}
pub fn magnitude(matches: &ArgMatches) -> f32 {
    *matches.get_one::<f32>("magnitude").unwrap_or(&6.0)
}

//fp add_right_ascension_arg
pub fn add_right_ascension_arg(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("right_ascension")
            .long("right_ascension")
            .short('r')
            .help("Right ascension, in degrees")
            .value_parser(value_parser!(f64))
            .action(ArgAction::Set),
    )
}
pub fn right_ascension(matches: &ArgMatches) -> f64 {
    matches
        .get_one::<f64>("right_ascension")
        .map(|x| x.to_radians())
        .unwrap_or(0.0)
}

//fp add_declination_arg
pub fn add_declination_arg(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("declination")
            .long("declination")
            .short('d')
            .help("Declination, in degrees")
            .value_parser(value_parser!(f64))
            .action(ArgAction::Set),
    )
}
pub fn declination(matches: &ArgMatches) -> f64 {
    matches
        .get_one::<f64>("declination")
        .map(|x| x.to_radians())
        .unwrap_or(0.0)
}

//fp add_angle_arg
pub fn add_angle_arg(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("angle")
            .long("angle")
            .short('a')
            .help("Angle, in degrees")
            .value_parser(value_parser!(f64))
            .action(ArgAction::Set),
    )
}
pub fn angle(matches: &ArgMatches) -> f64 {
    matches
        .get_one::<f64>("angle")
        .map(|x| x.to_radians())
        .unwrap_or(0.0)
}

//fp add_fov_arg
pub fn add_fov_arg(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("fov")
            .long("fov")
            .short('f')
            .help("Camera field of view, in degrees")
            .value_parser(value_parser!(f64))
            .action(ArgAction::Set),
    )
}
pub fn fov(matches: &ArgMatches) -> f64 {
    *matches.get_one::<f64>("fov").unwrap_or(&17.0)
}

//fp add_tolerance_arg
pub fn add_tolerance_arg(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("tolerance")
            .long("tolerance")
            .short('t')
            .help("Match tolerance, in degrees")
            .value_parser(value_parser!(f64))
            .action(ArgAction::Set),
    )
}
pub fn tolerance(matches: &ArgMatches) -> f64 {
    *matches.get_one::<f64>("tolerance").unwrap_or(&0.1)
}

//fp add_seed_arg
pub fn add_seed_arg(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("seed")
            .long("seed")
            .help("Seed the quadruple builder's RNG for reproducible runs")
            .value_parser(value_parser!(u64))
            .action(ArgAction::Set),
    )
}
pub fn seed(matches: &ArgMatches) -> Option<u64> {
    matches.get_one::<u64>("seed").copied()
}

//fp add_names_arg
pub fn add_names_arg(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("names")
            .long("names")
            .short('n')
            .help("File containing names of id")
            .action(ArgAction::Set),
    )
}
pub fn names(matches: &ArgMatches) -> Option<String> {
    matches.get_one::<String>("names").map(|s| s.to_string())
}

//fp add_output_arg
pub fn add_output_arg(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("output")
            .long("output")
            .short('o')
            .required(true)
            .help("Output file to write")
            .action(ArgAction::Set),
    )
}
pub fn output(matches: &ArgMatches) -> String {
    matches.get_one::<String>("output").unwrap().to_string()
}

//fp add_pairs_arg
pub fn add_pairs_arg(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("pairs")
            .long("pairs")
            .short('p')
            .required(true)
            .help("Persisted pair/neighbor table (.json or .postcard) to load")
            .action(ArgAction::Set),
    )
}
pub fn pairs(matches: &ArgMatches) -> String {
    matches.get_one::<String>("pairs").unwrap().to_string()
}

//fp add_frame_arg
pub fn add_frame_arg(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("frame")
            .long("frame")
            .required(true)
            .help("Frame image to identify (requires the 'image' feature)")
            .action(ArgAction::Set),
    )
}
pub fn frame(matches: &ArgMatches) -> String {
    matches.get_one::<String>("frame").unwrap().to_string()
}

//fp add_stars_arg
pub fn add_stars_arg(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("stars")
            .help("Stars to interrogate, by id or name")
            .action(ArgAction::Append),
    )
}
pub fn stars(matches: &ArgMatches) -> Option<ValuesRef<'_, String>> {
    matches.get_many::<String>("stars")
}
