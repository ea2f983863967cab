use std::error::Error;

use star_tracker::{Catalog, Star, Subcube};

fn deg(d: f64) -> f64 {
    d.to_radians()
}

/// Builds a small synthetic catalog of stars at known angular
/// separations from a reference star at (RA 0, Dec 0), so
/// `find_star_triangles` can be checked without depending on an
/// external catalog fixture.
fn triangle_catalog() -> Catalog {
    let mut catalog = Catalog::default();
    catalog.add_star(Star::new(0, deg(0.0), deg(0.0), 0.0, 2.0, 0.0));
    catalog.add_star(Star::new(1, deg(10.0), deg(0.0), 0.0, 2.0, 0.0));
    catalog.add_star(Star::new(2, deg(0.0), deg(6.0), 0.0, 2.0, 0.0));
    // an unrelated faint star far away, to make sure it is never matched in
    catalog.add_star(Star::new(3, deg(90.0), deg(-45.0), 0.0, 2.0, 0.0));
    catalog.sort();
    catalog.derive_data();
    catalog
}

#[test]
fn find_star_triangles_recovers_known_angles() -> Result<(), Box<dyn Error>> {
    let catalog = triangle_catalog();

    let a01 = catalog.find_sorted(0).unwrap();
    let a01 = catalog[a01].cos_angle_between(&catalog[catalog.find_sorted(1).unwrap()]).acos();
    let a02 = catalog[catalog.find_sorted(0).unwrap()]
        .cos_angle_between(&catalog[catalog.find_sorted(2).unwrap()])
        .acos();
    let a12 = catalog[catalog.find_sorted(1).unwrap()]
        .cos_angle_between(&catalog[catalog.find_sorted(2).unwrap()])
        .acos();

    let angles_to_find = [a01, a02, a12];
    let max_angle_delta = deg(0.01);

    let subcube_iter = Subcube::iter_all();
    let triangles = catalog.find_star_triangles(subcube_iter, &angles_to_find, max_angle_delta);

    let mut found = false;
    for (a, b, c) in &triangles {
        let ids = [catalog[*a].id(), catalog[*b].id(), catalog[*c].id()];
        if ids.contains(&0) && ids.contains(&1) && ids.contains(&2) {
            found = true;
        }
    }
    assert!(found, "expected triangle (0, 1, 2) among {:?}", triangles.len());
    Ok(())
}

#[test]
fn closest_to_finds_the_nearest_catalog_star() -> Result<(), Box<dyn Error>> {
    let catalog = triangle_catalog();
    let (cos_angle, index) = catalog.closest_to(deg(0.2), deg(0.1)).expect("some star nearby");
    assert_eq!(catalog[index].id(), 0);
    assert!(cos_angle > 0.999);
    Ok(())
}
