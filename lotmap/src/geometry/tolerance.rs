// Tolerances for comparing geographic coordinates (degrees)

pub const EPS_DEG: f64 = 1e-9;         // coincidence threshold for positions/offsets
pub const EPS_CENTROID: f64 = 1e-7;    // drift allowed after a chain of translations

#[inline] pub fn near_zero(x: f64, eps: f64) -> bool { x.abs() <= eps }
#[inline] pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool { (a - b).abs() <= eps }
