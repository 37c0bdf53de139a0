//! Prefiltering cubemaps into irradiance matrices.
//!
//! The pipeline is `project -> normalize -> IrradianceMatrices::from_coefficients`.

pub mod accumulator;

pub use accumulator::*;

use crate::{
    cubemap::{CubeFace, CubeFaceImage, Cubemap, TexelAttribute},
    error::Error,
    irradiance::IrradianceMatrices,
    spherical_harmonics::SH_COUNT_MAX,
};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use std::{
    f64::consts::PI,
    time::{Duration, Instant},
};

/// Options of [`prefilter`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrefilterOptions {
    /// Projecting face rows on the rayon thread pool.
    ///
    /// The summation order then varies across runs,
    /// so the outputs may differ in the last bits.
    pub is_parallel: bool,
}

/// The normalized SH coefficients, `[channel][basis]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShCoefficients(pub [[f32; SH_COUNT_MAX]; 3]);

#[derive(Clone, Debug, PartialEq)]
pub struct PrefilterOutput {
    pub coefficients: ShCoefficients,
    /// Time spent in [`prefilter`].
    pub duration: Duration,
    pub matrices: IrradianceMatrices,
    /// The measured sum of texel solid angles.
    pub solid_angle_total: f64,
}

/// Computing the irradiance matrices of `cubemap`.
pub fn prefilter(
    cubemap: &Cubemap,
    options: &PrefilterOptions,
) -> Result<PrefilterOutput, Error> {
    let duration = Instant::now();

    log::debug!(
        target: "irradiance_envmap::prefilter",
        "start ({0}x{0} x 6, {1} channels, {2})",
        cubemap.resolution(),
        cubemap.channel_count(),
        cubemap.size_readable(),
    );

    let accumulator = if options.is_parallel {
        project_parallel(cubemap)
    } else {
        project(cubemap)
    };

    log::debug!(
        target: "irradiance_envmap::prefilter",
        "project (solid_angle_total: {})",
        accumulator.solid_angle_total,
    );

    let coefficients = normalize(&accumulator)?;
    let matrices = IrradianceMatrices::from_coefficients(&coefficients);
    let duration = duration.elapsed();

    log::info!(
        target: "irradiance_envmap::prefilter",
        "done in {duration:?}",
    );

    Ok(PrefilterOutput {
        coefficients,
        duration,
        matrices,
        solid_angle_total: accumulator.solid_angle_total,
    })
}

/// Projecting every texel of `cubemap` onto the SH bases.
///
/// The faces are visited in [`CubeFace::ALL`] order, then rows, then columns.
pub fn project(cubemap: &Cubemap) -> ShAccumulator {
    let mut accumulator = ShAccumulator::default();

    for face in CubeFace::ALL {
        let image = cubemap.face(face);
        for row in 0..image.resolution() {
            project_row(image, face, row, &mut accumulator);
        }
    }

    accumulator
}

/// Projecting like [`project`], with one partial sum per rayon job.
pub fn project_parallel(cubemap: &Cubemap) -> ShAccumulator {
    let resolution = cubemap.resolution();

    (0..CubeFace::ALL.len() * resolution)
        .into_par_iter()
        .fold(ShAccumulator::default, |mut accumulator, index| {
            let face = CubeFace::ALL[index / resolution];
            let row = index % resolution;
            project_row(cubemap.face(face), face, row, &mut accumulator);
            accumulator
        })
        .reduce(ShAccumulator::default, |lhs, rhs| lhs + rhs)
}

/// Scaling the accumulated coefficients by `2 * PI / solid_angle_total`.
pub fn normalize(accumulator: &ShAccumulator) -> Result<ShCoefficients, Error> {
    let solid_angle_total = accumulator.solid_angle_total;
    if !(solid_angle_total.is_finite() && solid_angle_total > 0.0) {
        return Err(Error::DegenerateSolidAngle(solid_angle_total));
    }

    let scale = 2.0 * PI / solid_angle_total;

    Ok(ShCoefficients(accumulator.coefficients.map(|coefficients| {
        coefficients.map(|coefficient| (coefficient * scale) as f32)
    })))
}

fn project_row(
    image: &CubeFaceImage,
    face: CubeFace,
    row: usize,
    accumulator: &mut ShAccumulator,
) {
    const BYTE_MAX: f64 = u8::MAX as f64;

    let resolution = image.resolution();
    let texel_size = 1.0 / resolution as f64;
    let v = 2.0 * (row as f64 + 0.5) * texel_size - 1.0;

    for col in 0..resolution {
        let u = 2.0 * (col as f64 + 0.5) * texel_size - 1.0;
        let texel = TexelAttribute::new(face, u, v, texel_size);
        let pixel = image.pixel(row, col);
        let radiance = [
            pixel[0] as f64 / BYTE_MAX,
            pixel[1] as f64 / BYTE_MAX,
            pixel[2] as f64 / BYTE_MAX,
        ];

        accumulator.add_texel(&texel, radiance);
    }
}

impl PrefilterOptions {
    #[inline]
    pub const fn new() -> Self {
        Self { is_parallel: false }
    }

    #[inline]
    pub const fn with_is_parallel(
        mut self,
        is_parallel: bool,
    ) -> Self {
        self.is_parallel = is_parallel;
        self
    }
}

impl Default for PrefilterOptions {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::irradiance::{IrradianceMatrix, IRRADIANCE_C4};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn random_cubemap(
        seed: u64,
        resolution: usize,
        channel_count: usize,
    ) -> Cubemap {
        let mut rng = StdRng::seed_from_u64(seed);
        let faces = std::array::from_fn(|_| {
            let mut data = vec![0u8; resolution * resolution * channel_count];
            rng.fill(&mut data[..]);
            CubeFaceImage::new(resolution, channel_count, data).unwrap()
        });
        Cubemap::new(faces).unwrap()
    }

    fn abs_max(matrix: &IrradianceMatrix) -> f32 {
        matrix.0.iter().flatten().fold(0.0_f32, |max, value| max.max(value.abs()))
    }

    #[test]
    fn solid_angle_total_approaches_full_sphere() {
        let target = 4.0 * PI;

        for resolution in [1, 2, 3, 4, 16, 64] {
            let cubemap = Cubemap::filled(resolution, &[0, 0, 0]).unwrap();
            let output = project(&cubemap).solid_angle_total;
            assert!(
                (output - target).abs() < 1e-9,
                "resolution {resolution}: {output} != {target}"
            );
        }
    }

    #[test]
    fn uniform_environment() {
        let cubemap = Cubemap::filled(8, &[255, 128, 0]).unwrap();
        let output = prefilter(&cubemap, &Default::default()).unwrap();

        let radiances = [1.0, 128.0 / 255.0, 0.0];
        for (channel, radiance) in radiances.into_iter().enumerate() {
            let coefficients = output.coefficients.0[channel];
            let l0 = (2.0 * PI * 0.282095 * radiance) as f32;
            assert!((coefficients[0] - l0).abs() < 1e-5, "{coefficients:?}");
            coefficients[1..].iter().for_each(|coefficient| {
                assert!(coefficient.abs() < 1e-6, "{coefficients:?}");
            });

            let matrix = output.matrices[channel];
            let target = IRRADIANCE_C4 * l0;
            assert!((matrix.0[3][3] - target).abs() < 1e-5, "{matrix:?}");
            (0..16)
                .filter(|&index| index != 15)
                .for_each(|index| {
                    assert!(matrix.to_array()[index].abs() < 1e-6, "{matrix:?}");
                });
        }
    }

    #[test]
    fn pure_red_from_every_direction() {
        let cubemap = Cubemap::filled(4, &[255, 0, 0]).unwrap();
        let output = prefilter(&cubemap, &Default::default()).unwrap();

        let red = output.matrices[0];
        assert!(red.0[3][3] > 0.0, "{red:?}");
        assert_eq!(abs_max(&red), red.0[3][3]);

        assert_eq!(abs_max(&output.matrices[1]), 0.0);
        assert_eq!(abs_max(&output.matrices[2]), 0.0);

        let output = output.matrices.irradiance(&[0.0, 0.0, -1.0]);
        assert!((output[0] - std::f32::consts::FRAC_PI_2).abs() < 1e-3, "{output:?}");
    }

    #[test]
    fn light_from_positive_y() {
        let black = CubeFaceImage::filled(16, &[0, 0, 0]).unwrap();
        let white = CubeFaceImage::filled(16, &[255, 255, 255]).unwrap();
        let mut faces = std::array::from_fn(|_| black.to_owned());
        faces[CubeFace::PositiveY.index()] = white;
        let cubemap = Cubemap::new(faces).unwrap();

        let output = prefilter(&cubemap, &Default::default()).unwrap();

        for matrix in output.matrices.0 {
            assert!(matrix.0[1][3] > 0.0, "{matrix:?}");
            assert!(matrix.0[0][3].abs() < 1e-6, "{matrix:?}");
            assert!(matrix.0[2][3].abs() < 1e-6, "{matrix:?}");

            let up = matrix.irradiance(&[0.0, 1.0, 0.0]);
            let down = matrix.irradiance(&[0.0, -1.0, 0.0]);
            let side = matrix.irradiance(&[1.0, 0.0, 0.0]);
            assert!(up > side && side > down, "{up} {side} {down}");
        }
    }

    #[test]
    fn single_texel_off_center_on_negative_faces() {
        let lit_cubemap = |face: CubeFace, row: usize, col: usize| {
            let black = CubeFaceImage::filled(4, &[0, 0, 0]).unwrap();
            let mut faces = std::array::from_fn(|_| black.to_owned());
            let mut data = black.data().to_owned();
            data[(row * 4 + col) * 3] = 255;
            faces[face.index()] = CubeFaceImage::new(4, 3, data).unwrap();
            Cubemap::new(faces).unwrap()
        };

        // (u, v) = (0.75, -0.75) looks toward (-1, 0.75, 0.75)
        let cubemap = lit_cubemap(CubeFace::NegativeX, 0, 3);
        let output = prefilter(&cubemap, &Default::default()).unwrap();
        let l = output.coefficients.0[0];
        assert!(l[0] > 0.0, "{l:?}");
        assert!(l[1] > 0.0, "{l:?}");
        assert!(l[2] > 0.0, "{l:?}");
        assert!(l[3] < 0.0, "{l:?}");
        assert_eq!(output.coefficients.0[1], [0.0; SH_COUNT_MAX]);

        // (u, v) = (-0.75, 0.75) looks toward (-0.75, -1, -0.75)
        let cubemap = lit_cubemap(CubeFace::NegativeY, 3, 0);
        let output = prefilter(&cubemap, &Default::default()).unwrap();
        let l = output.coefficients.0[0];
        assert!(l[0] > 0.0, "{l:?}");
        assert!(l[1] < 0.0, "{l:?}");
        assert!(l[2] < 0.0, "{l:?}");
        assert!(l[3] < 0.0, "{l:?}");

        let matrix = output.matrices[0];
        assert!(matrix.0[1][3] < 0.0, "{matrix:?}");
        assert!(
            matrix.irradiance(&[0.0, -1.0, 0.0]) > matrix.irradiance(&[0.0, 1.0, 0.0])
        );
    }

    #[test]
    fn symmetric_matrices() {
        for (seed, resolution, channel_count) in [(1, 5, 3), (2, 7, 4), (3, 1, 3)] {
            let cubemap = random_cubemap(seed, resolution, channel_count);
            let output = prefilter(&cubemap, &Default::default()).unwrap();

            output.matrices.0.iter().for_each(|matrix| {
                assert!(matrix.is_symmetric(), "{matrix:?}");
            });
        }
    }

    #[test]
    fn linear_in_radiance() {
        let source = random_cubemap(0x5EED, 6, 3);
        let halved = Cubemap::new(source.faces().to_owned().map(|image| {
            let data = image.data().iter().map(|value| value / 2).collect();
            CubeFaceImage::new(image.resolution(), image.channel_count(), data)
                .unwrap()
        }))
        .unwrap();
        let doubled = Cubemap::new(halved.faces().to_owned().map(|image| {
            let data = image.data().iter().map(|value| value * 2).collect();
            CubeFaceImage::new(image.resolution(), image.channel_count(), data)
                .unwrap()
        }))
        .unwrap();

        let options = PrefilterOptions::default();
        let halved = prefilter(&halved, &options).unwrap().matrices;
        let doubled = prefilter(&doubled, &options).unwrap().matrices;

        halved.0.iter().zip(&doubled.0).for_each(|(halved, doubled)| {
            let tolerance = abs_max(doubled) * 1e-5;
            halved
                .to_array()
                .iter()
                .zip(doubled.to_array())
                .for_each(|(halved, doubled)| {
                    assert!(
                        (halved * 2.0 - doubled).abs() <= tolerance,
                        "{halved} * 2 != {doubled}"
                    );
                });
        });
    }

    #[test]
    fn alpha_is_ignored() {
        let rgba = random_cubemap(0xA1FA, 4, 4);
        let rgb = Cubemap::new(rgba.faces().to_owned().map(|image| {
            let data = image
                .data()
                .chunks_exact(4)
                .flat_map(|pixel| &pixel[..3])
                .copied()
                .collect();
            CubeFaceImage::new(image.resolution(), 3, data).unwrap()
        }))
        .unwrap();

        let options = PrefilterOptions::default();
        let output = prefilter(&rgba, &options).unwrap();
        let target = prefilter(&rgb, &options).unwrap();

        assert_eq!(output.coefficients, target.coefficients);
        assert_eq!(output.matrices, target.matrices);
    }

    #[test]
    fn deterministic_sequential_runs() {
        let cubemap = random_cubemap(0xD1CE, 9, 3);
        let options = PrefilterOptions::new();

        let output = prefilter(&cubemap, &options).unwrap();
        let target = prefilter(&cubemap, &options).unwrap();

        assert_eq!(output.solid_angle_total.to_bits(), target.solid_angle_total.to_bits());
        assert_eq!(output.coefficients, target.coefficients);
        assert_eq!(output.matrices.as_bytes(), target.matrices.as_bytes());
    }

    #[test]
    fn parallel_matches_sequential() {
        let cubemap = random_cubemap(0x9A7, 12, 4);

        let target = prefilter(&cubemap, &PrefilterOptions::new()).unwrap();
        let output =
            prefilter(&cubemap, &PrefilterOptions::new().with_is_parallel(true))
                .unwrap();

        assert!((output.solid_angle_total - target.solid_angle_total).abs() < 1e-9);
        output
            .coefficients
            .0
            .iter()
            .flatten()
            .zip(target.coefficients.0.iter().flatten())
            .for_each(|(output, target)| {
                assert!((output - target).abs() < 1e-5, "{output} != {target}");
            });
    }

    #[test]
    fn normalize_by_measured_solid_angle() {
        let mut accumulator = ShAccumulator {
            solid_angle_total: 4.0 * PI,
            ..Default::default()
        };
        accumulator.coefficients[1][6] = 3.0;

        let output = normalize(&accumulator).unwrap();
        assert_eq!(output.0[1][6], 1.5);
        assert_eq!(output.0[0], [0.0; SH_COUNT_MAX]);

        accumulator.solid_angle_total = 2.0 * PI;
        let output = normalize(&accumulator).unwrap();
        assert_eq!(output.0[1][6], 3.0);
    }

    #[test]
    fn normalize_degenerate_solid_angle() {
        let output = normalize(&ShAccumulator::default()).unwrap_err();
        assert!(matches!(output, Error::DegenerateSolidAngle(_)), "{output:?}");

        let accumulator = ShAccumulator {
            solid_angle_total: f64::NAN,
            ..Default::default()
        };
        let output = normalize(&accumulator).unwrap_err();
        assert!(matches!(output, Error::DegenerateSolidAngle(_)), "{output:?}");
    }
}
