use thiserror::Error;

use backend_domain::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("no prizes left at {location_id}")]
    NoInventory { location_id: String },
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl AppError {
    pub fn no_inventory(location_id: impl Into<String>) -> Self {
        AppError::NoInventory {
            location_id: location_id.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Persistence(err.to_string())
    }
}
