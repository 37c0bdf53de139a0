//! Irradiance matrices from spherical harmonics coefficients.
//!
//! Each matrix `M` encodes the irradiance of one color channel as a quadratic form,
//! i.e., `E(n) = [n, 1]^T * M * [n, 1]` for a unit normal `n`.

pub use crate::prefilter::ShCoefficients;

use bytemuck::{bytes_of, Pod, Zeroable};
use std::ops;

/// `c1`
pub const IRRADIANCE_C1: f32 = 0.429043;
/// `c2`
pub const IRRADIANCE_C2: f32 = 0.511664;
/// `c3`
pub const IRRADIANCE_C3: f32 = 0.743125;
/// `c4`
pub const IRRADIANCE_C4: f32 = 0.886227;
/// `c5`
pub const IRRADIANCE_C5: f32 = 0.247708;

/// A symmetric irradiance matrix of one color channel.
///
/// It is in **row-major order**, i.e., `M[row][col]`.
/// Since it is symmetric, it reads the same in column-major order.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct IrradianceMatrix(pub [[f32; 4]; 4]);

/// The irradiance matrices of red, green and blue channels.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct IrradianceMatrices(pub [IrradianceMatrix; 3]);

impl IrradianceMatrix {
    /// Building the matrix from the 9 coefficients `L0..L8` of one channel.
    ///
    /// # Format
    ///
    /// ```plaintext
    /// [c1 L8 | c1 L4  | c1 L7 | c2 L3        ]
    /// [c1 L4 | -c1 L8 | c1 L5 | c2 L1        ]
    /// [c1 L7 | c1 L5  | c3 L6 | c2 L2        ]
    /// [c2 L3 | c2 L1  | c2 L2 | c4 L0 - c5 L6]
    /// ```
    pub fn from_coefficients(l: &[f32; 9]) -> Self {
        let (c1, c2, c3, c4, c5) = (
            IRRADIANCE_C1,
            IRRADIANCE_C2,
            IRRADIANCE_C3,
            IRRADIANCE_C4,
            IRRADIANCE_C5,
        );

        Self([
            [c1 * l[8], c1 * l[4], c1 * l[7], c2 * l[3]],
            [c1 * l[4], -c1 * l[8], c1 * l[5], c2 * l[1]],
            [c1 * l[7], c1 * l[5], c3 * l[6], c2 * l[2]],
            [c2 * l[3], c2 * l[1], c2 * l[2], c4 * l[0] - c5 * l[6]],
        ])
    }

    /// Evaluating the irradiance at a unit `normal`.
    pub fn irradiance(
        &self,
        normal: &[f32; 3],
    ) -> f32 {
        let n = [normal[0], normal[1], normal[2], 1.0];
        (0..4)
            .map(|row| {
                (0..4)
                    .map(|col| n[row] * self.0[row][col] * n[col])
                    .sum::<f32>()
            })
            .sum()
    }

    /// Whether `M[i][j] == M[j][i]` for all `i` and `j`.
    pub fn is_symmetric(&self) -> bool {
        (0..4).all(|row| (0..row).all(|col| self.0[row][col] == self.0[col][row]))
    }

    /// The 16 entries in row-major order.
    #[inline]
    pub fn to_array(&self) -> [f32; 16] {
        bytemuck::cast(self.0)
    }
}

impl IrradianceMatrices {
    /// Building one matrix per channel.
    pub fn from_coefficients(coefficients: &ShCoefficients) -> Self {
        Self(coefficients.0.each_ref().map(IrradianceMatrix::from_coefficients))
    }

    /// The bytes for uploading, i.e., 3 blocks of 16 `f32`.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytes_of(self)
    }

    /// Evaluating the RGB irradiance at a unit `normal`.
    #[inline]
    pub fn irradiance(
        &self,
        normal: &[f32; 3],
    ) -> [f32; 3] {
        self.0.map(|matrix| matrix.irradiance(normal))
    }

    /// The 16 entries of each channel in row-major order.
    #[inline]
    pub fn to_arrays(&self) -> [[f32; 16]; 3] {
        self.0.map(|matrix| matrix.to_array())
    }
}

impl ops::Index<usize> for IrradianceMatrices {
    type Output = IrradianceMatrix;

    #[inline]
    fn index(
        &self,
        channel: usize,
    ) -> &Self::Output {
        &self.0[channel]
    }
}
