/// Split total spin into (back spin, side spin) using the spin axis.
///
/// Only applies when the export has no explicit components (both zero) and a
/// positive total spin; otherwise the given components are returned as-is.
/// Axis is in degrees, positive tilted right, so a right-tilted axis gives
/// positive side spin.
pub fn decompose_spin(spin_rate: f64, spin_axis: f64, back_spin: f64, side_spin: f64) -> (f64, f64) {
    if spin_rate > 0.0 && back_spin == 0.0 && side_spin == 0.0 {
        let axis = spin_axis.to_radians();
        (spin_rate * axis.cos(), spin_rate * axis.sin())
    } else {
        (back_spin, side_spin)
    }
}
