use crate::stencil::FieldVector;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SpincurvError>;

/// Error taxonomy of the crate. Configuration errors are detected eagerly and
/// abort the whole call; eigensolver failures are tied to a single field point
/// and are isolated per trajectory index by the sweep driver.
#[derive(Error, Debug)]
pub enum SpincurvError {
    #[error("configuration error: {message}")]
    Configuration { message: String },

    #[error("eigensolver failed to converge at B = {field}")]
    Eigensolver {
        field: FieldVector,
        #[source]
        source: ndarray_linalg::error::LinalgError,
    },
}

impl SpincurvError {
    pub fn configuration(message: impl Into<String>) -> Self {
        SpincurvError::Configuration {
            message: message.into(),
        }
    }
}
