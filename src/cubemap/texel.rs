//! Texel directions and solid angles.

use super::CubeFace;

/// The sampling attributes of one texel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TexelAttribute {
    /// Unit direction from the cube center through the texel center.
    pub direction: [f64; 3],
    /// Solid angle subtended by the texel on the unit sphere.
    pub solid_angle: f64,
}

impl TexelAttribute {
    /// Sampling the texel of `face` centered at (`u`, `v`).
    ///
    /// - `u` and `v` range from `-1.0` to `1.0`.
    /// - `texel_size` is the half width of a texel in that range, i.e., `1 / R`.
    #[inline]
    pub fn new(
        face: CubeFace,
        u: f64,
        v: f64,
        texel_size: f64,
    ) -> Self {
        Self {
            direction: texel_direction(face, u, v),
            solid_angle: texel_solid_angle(u, v, texel_size),
        }
    }
}

/// The unit direction through (`u`, `v`) on `face`.
///
/// `v` grows downward as image rows do.
pub fn texel_direction(
    face: CubeFace,
    u: f64,
    v: f64,
) -> [f64; 3] {
    let [x, y, z] = match face {
        CubeFace::PositiveX => [1.0, -v, -u],
        CubeFace::NegativeX => [-1.0, -v, u],
        CubeFace::PositiveY => [u, 1.0, v],
        CubeFace::NegativeY => [u, -1.0, -v],
        CubeFace::PositiveZ => [u, -v, 1.0],
        CubeFace::NegativeZ => [-u, -v, -1.0],
    };
    let norm = (x * x + y * y + z * z).sqrt();

    [x / norm, y / norm, z / norm]
}

/// The solid angle of the square texel centered at (`u`, `v`)
/// with half width `texel_size`, projected onto the unit sphere.
pub fn texel_solid_angle(
    u: f64,
    v: f64,
    texel_size: f64,
) -> f64 {
    let x0 = u - texel_size;
    let y0 = v - texel_size;
    let x1 = u + texel_size;
    let y1 = v + texel_size;

    (area(x0, y0) + area(x1, y1)) - (area(x0, y1) + area(x1, y0))
}

/// Solid angle of the region from the face center to (`x`, `y`), signed.
#[inline]
fn area(
    x: f64,
    y: f64,
) -> f64 {
    (x * y).atan2((x * x + y * y + 1.0).sqrt())
}
