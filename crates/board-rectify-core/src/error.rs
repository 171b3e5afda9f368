/// Errors returned while rectifying a board image.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RectifyError {
    #[error("expected exactly 4 board corners, got {got}")]
    InvalidCornerCount { got: usize },
    #[error("board diagonals do not intersect (degenerate or self-intersecting quadrilateral)")]
    DegenerateQuadrilateral,
    #[error("perspective transform is singular or ill-conditioned")]
    SingularTransform,
    #[error("invalid output canvas (width={width}, height={height})")]
    InvalidCanvas { width: usize, height: usize },
    #[error("invalid image buffer (expected {expected} bytes, got {got})")]
    InvalidImage { expected: usize, got: usize },
}
