#![allow(clippy::excessive_precision)]
#![allow(missing_docs)]

pub mod cubemap;
pub mod error;
pub mod irradiance;
pub mod prefilter;
pub mod spherical_harmonics;

pub use cubemap::{face_paths, CubeFace, CubeFaceImage, Cubemap};
pub use error::Error;
pub use irradiance::{IrradianceMatrices, IrradianceMatrix};
pub use prefilter::{prefilter, PrefilterOptions, PrefilterOutput, ShCoefficients};
