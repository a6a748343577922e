use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdvisorError>;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Scan error: {0}")]
    ScanError(#[from] lens_scanner::ScanError),

    #[error("Store error: {0}")]
    StoreError(#[from] lens_store::StoreError),
}
