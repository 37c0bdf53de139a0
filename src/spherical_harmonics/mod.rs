/// The count of spherical harmonics coefficients
pub const SH_COUNT_MAX: usize = (SH_DEGREE_MAX as usize + 1).pow(2);

/// The maximum degree of spherical harmonics
pub const SH_DEGREE_MAX: u32 = 2;

/// The real coefficients of orthonormalized spherical harmonics from degree 0 to 2
///
/// They are rounded to 6 decimal places and carry no Condon-Shortley phase.
///
/// ## Examples
///
/// ```rust
/// use irradiance_envmap::spherical_harmonics::SH_COEF;
/// use std::f64::consts::PI;
///
/// assert_eq!(SH_COEF.0[0], 0.282095);
/// assert_eq!(SH_COEF.2[2 + 2], 0.546274);
///
/// assert!((SH_COEF.0[0] - (1.0 / 4.0 / PI).sqrt()).abs() < 1e-6);
/// assert!((SH_COEF.1[1] - (3.0 / 4.0 / PI).sqrt()).abs() < 1e-6);
/// assert!((SH_COEF.2[0] - (15.0 / 4.0 / PI).sqrt()).abs() < 1e-6);
/// assert!((SH_COEF.2[2] - (5.0 / 16.0 / PI).sqrt()).abs() < 1e-6);
/// assert!((SH_COEF.2[4] - (15.0 / 16.0 / PI).sqrt()).abs() < 1e-6);
/// ```
#[allow(clippy::type_complexity)]
pub const SH_COEF: ([f64; 1], [f64; 3], [f64; 5]) = (
    [0.282095],
    [0.488603, 0.488603, 0.488603],
    [1.092548, 1.092548, 0.315392, 1.092548, 0.546274],
);

/// Evaluating the 9 real SH bases at a unit `direction`.
///
/// The order is `[Y00, Y1-1, Y10, Y11, Y2-2, Y2-1, Y20, Y21, Y22]`,
/// i.e., `[1, y, z, x, xy, yz, 3z^2 - 1, xz, x^2 - y^2]` up to the constants.
#[inline]
pub fn sh_bases(direction: &[f64; 3]) -> [f64; SH_COUNT_MAX] {
    let [x, y, z] = *direction;
    let (c0, c1, c2) = SH_COEF;
    [
        c0[0],
        c1[0] * y,
        c1[1] * z,
        c1[2] * x,
        c2[0] * x * y,
        c2[1] * y * z,
        c2[2] * (3.0 * z * z - 1.0),
        c2[3] * x * z,
        c2[4] * (x * x - y * y),
    ]
}
