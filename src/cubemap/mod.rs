//! Cubemap faces supplied by an image loader.

pub mod texel;

pub use crate::error::Error;
pub use texel::*;

use humansize::{format_size, BINARY};
use std::fmt;

/// One of the six principal directions of a cubemap.
///
/// The discriminants follow the face order of a cubemap,
/// i.e., `+X, -X, +Y, -Y, +Z, -Z`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CubeFace {
    PositiveX = 0,
    NegativeX = 1,
    PositiveY = 2,
    NegativeY = 3,
    PositiveZ = 4,
    NegativeZ = 5,
}

impl CubeFace {
    /// All faces in cubemap order.
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    /// The index in cubemap order.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The conventional file name part, e.g., `"posx"` or `"negz"`.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            CubeFace::PositiveX => "posx",
            CubeFace::NegativeX => "negx",
            CubeFace::PositiveY => "posy",
            CubeFace::NegativeY => "negy",
            CubeFace::PositiveZ => "posz",
            CubeFace::NegativeZ => "negz",
        }
    }
}

/// Resolving the six face paths from a wildcard `pattern`.
///
/// The last `*` in `pattern` is replaced with [`CubeFace::name`].
///
/// ## Examples
///
/// ```rust
/// use irradiance_envmap::cubemap::face_paths;
///
/// let paths = face_paths("textures/grace_*.png").unwrap();
/// assert_eq!(paths[0], "textures/grace_posx.png");
/// assert_eq!(paths[5], "textures/grace_negz.png");
///
/// assert!(face_paths("textures/grace.png").is_err());
/// ```
pub fn face_paths(pattern: &str) -> Result<[String; 6], Error> {
    let (head, tail) = pattern
        .rsplit_once('*')
        .ok_or_else(|| Error::MissingWildcard(pattern.to_owned()))?;

    Ok(CubeFace::ALL.map(|face| [head, face.name(), tail].concat()))
}

/// A decoded 8-bit face image.
///
/// The pixels are stored row by row from top to bottom,
/// with interleaved channels in `R, G, B, [A]` order.
#[derive(Clone, PartialEq)]
pub struct CubeFaceImage {
    channel_count: usize,
    data: Vec<u8>,
    resolution: usize,
}

impl CubeFaceImage {
    /// Creating a face image of `resolution x resolution` pixels.
    ///
    /// `channel_count` should be 3 (RGB) or 4 (RGBA),
    /// and `data` should hold `resolution * resolution * channel_count` bytes.
    pub fn new(
        resolution: usize,
        channel_count: usize,
        data: Vec<u8>,
    ) -> Result<Self, Error> {
        if resolution == 0 {
            return Err(Error::Validation(
                "resolution".into(),
                "positive".into(),
            ));
        }
        if !matches!(channel_count, 3 | 4) {
            return Err(Error::Validation(
                format!("channel_count ({channel_count})"),
                "3 or 4".into(),
            ));
        }

        let data_len = resolution
            .checked_mul(resolution)
            .and_then(|pixel_count| pixel_count.checked_mul(channel_count))
            .ok_or_else(|| {
                Error::Validation(
                    format!("resolution ({resolution})"),
                    "small enough to address its bytes".into(),
                )
            })?;
        if data.len() != data_len {
            return Err(Error::Validation(
                format!("data.len() ({})", data.len()),
                data_len.to_string(),
            ));
        }

        Ok(Self {
            channel_count,
            data,
            resolution,
        })
    }

    /// Creating a face image filled with one `color`.
    ///
    /// The channel count is the length of `color`.
    pub fn filled(
        resolution: usize,
        color: &[u8],
    ) -> Result<Self, Error> {
        let data = color.repeat(resolution * resolution);
        Self::new(resolution, color.len(), data)
    }

    /// Number of interleaved channels per pixel.
    #[inline]
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    /// The raw bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixels per edge.
    #[inline]
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// The bytes of the pixel at (`row`, `col`).
    ///
    /// The slice has [`Self::channel_count`] elements.
    #[inline]
    pub fn pixel(
        &self,
        row: usize,
        col: usize,
    ) -> &[u8] {
        let start = (row * self.resolution + col) * self.channel_count;
        &self.data[start..start + self.channel_count]
    }
}

impl fmt::Debug for CubeFaceImage {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("CubeFaceImage")
            .field("channel_count", &self.channel_count)
            .field("data.len()", &self.data.len())
            .field("resolution", &self.resolution)
            .finish()
    }
}

/// Six face images sharing one resolution and channel count.
#[derive(Clone, Debug, PartialEq)]
pub struct Cubemap {
    faces: [CubeFaceImage; 6],
}

impl Cubemap {
    /// Creating a cubemap from `faces` in [`CubeFace::ALL`] order.
    pub fn new(faces: [CubeFaceImage; 6]) -> Result<Self, Error> {
        let resolution = faces[0].resolution();
        let channel_count = faces[0].channel_count();

        for (face, image) in CubeFace::ALL.into_iter().zip(&faces).skip(1) {
            if image.resolution() != resolution {
                return Err(Error::MismatchedCubeFace {
                    face,
                    field: "resolution",
                    expected: resolution,
                    actual: image.resolution(),
                });
            }
            if image.channel_count() != channel_count {
                return Err(Error::MismatchedCubeFace {
                    face,
                    field: "channel_count",
                    expected: channel_count,
                    actual: image.channel_count(),
                });
            }
        }

        Ok(Self { faces })
    }

    /// Creating a cubemap whose faces are all filled with one `color`.
    pub fn filled(
        resolution: usize,
        color: &[u8],
    ) -> Result<Self, Error> {
        let face = CubeFaceImage::filled(resolution, color)?;
        Self::new(std::array::from_fn(|_| face.to_owned()))
    }

    /// Number of interleaved channels per pixel.
    #[inline]
    pub fn channel_count(&self) -> usize {
        self.faces[0].channel_count()
    }

    /// The image of `face`.
    #[inline]
    pub fn face(
        &self,
        face: CubeFace,
    ) -> &CubeFaceImage {
        &self.faces[face.index()]
    }

    /// All face images in [`CubeFace::ALL`] order.
    #[inline]
    pub fn faces(&self) -> &[CubeFaceImage; 6] {
        &self.faces
    }

    /// Pixels per edge of every face.
    #[inline]
    pub fn resolution(&self) -> usize {
        self.faces[0].resolution()
    }

    /// Size of the pixel data in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.faces.iter().map(|image| image.data().len()).sum()
    }

    /// Readable size of the pixel data.
    #[inline]
    pub fn size_readable(&self) -> String {
        format_size(self.size(), BINARY.decimal_places(1))
    }
}
