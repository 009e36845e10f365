use thiserror::Error;
#[derive(Debug, Error)]
pub enum MotionError {
    #[error("buffer capacity must be greater than zero")]
    InvalidCapacity,
    #[error("invalid channel groups: {0}")]
    InvalidGroups(String),
    #[error("motion source unavailable: {0}")]
    Unavailable(String),
    #[error("motion delivery failed: {0}")]
    Delivery(String),
    #[error("malformed capture line {line}: {source}")]
    Replay {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to render plot: {0}")]
    Plot(String),
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for MotionError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        MotionError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for MotionError {
    fn from(value: image::ImageError) -> Self {
        MotionError::Plot(value.to_string())
    }
}
