use crate::{
    cubemap::TexelAttribute,
    spherical_harmonics::{sh_bases, SH_COUNT_MAX},
};
use std::ops;

/// The running sums of SH projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShAccumulator {
    /// `[3, 9]`, i.e., `[channel][basis]`.
    pub coefficients: [[f64; SH_COUNT_MAX]; 3],
    /// The sum of all sampled solid angles.
    pub solid_angle_total: f64,
}

impl ShAccumulator {
    /// Accumulating one texel whose RGB `radiance` ranges from `0.0` to `1.0`.
    #[inline]
    pub fn add_texel(
        &mut self,
        texel: &TexelAttribute,
        radiance: [f64; 3],
    ) -> &mut Self {
        let bases = sh_bases(&texel.direction);

        self.solid_angle_total += texel.solid_angle;
        self.coefficients
            .iter_mut()
            .zip(radiance)
            .for_each(|(coefficients, radiance)| {
                let lambda = radiance * texel.solid_angle;
                coefficients
                    .iter_mut()
                    .zip(bases)
                    .for_each(|(coefficient, basis)| *coefficient += lambda * basis);
            });

        self
    }
}

impl Default for ShAccumulator {
    #[inline]
    fn default() -> Self {
        Self {
            coefficients: [[0.0; SH_COUNT_MAX]; 3],
            solid_angle_total: 0.0,
        }
    }
}

impl ops::AddAssign for ShAccumulator {
    fn add_assign(
        &mut self,
        rhs: Self,
    ) {
        self.solid_angle_total += rhs.solid_angle_total;
        self.coefficients
            .iter_mut()
            .flatten()
            .zip(rhs.coefficients.iter().flatten())
            .for_each(|(lhs, rhs)| *lhs += rhs);
    }
}

impl ops::Add for ShAccumulator {
    type Output = Self;

    #[inline]
    fn add(
        mut self,
        rhs: Self,
    ) -> Self::Output {
        self += rhs;
        self
    }
}
