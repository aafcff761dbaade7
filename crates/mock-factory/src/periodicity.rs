use nalgebra::Point3;
use units::Length;

/// Wraps one coordinate into `[0, box_size)`
pub fn wrap_coordinate(x: f64, box_size: f64) -> f64 {
    let wrapped = x.rem_euclid(box_size);
    // rem_euclid rounds tiny negative inputs up to box_size itself
    if wrapped >= box_size { 0.0 } else { wrapped }
}

/// Wraps every position into the periodic box, coordinate by coordinate.
///
/// Idempotent: positions already inside the box are left unchanged.
pub fn enforce_periodicity(positions: &mut [Point3<f64>], box_size: Length) {
    let size = box_size.to_mpc();
    for x in positions.iter_mut().flat_map(|p| p.coords.iter_mut()) {
        *x = wrap_coordinate(*x, size);
    }
}
