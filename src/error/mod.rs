use crate::cubemap::CubeFace;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Degenerate Error: total solid angle {0} cannot normalize coefficients")]
    DegenerateSolidAngle(f64),

    #[error(
        "Mismatched Cube Face: {face:?} has {field} {actual}, \
        but {expected} is expected as on PositiveX"
    )]
    MismatchedCubeFace {
        face: CubeFace,
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Missing Wildcard: {0:?} should contain '*'")]
    MissingWildcard(String),

    #[error("Validation Error: {0} should be {1}")]
    Validation(String, String),
}
