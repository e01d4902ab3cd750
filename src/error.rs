use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReorderError {
    #[error("No model rows found to reorder")]
    NoRowsFound,

    #[error("Start of the model block not found")]
    StartMarkerMissing,

    #[error("End of the model block not found")]
    EndMarkerMissing,

    #[error("Unknown vehicle type '{vehicle_type}' for model {brand} {model}")]
    UnknownVehicleType {
        brand: String,
        model: String,
        vehicle_type: String,
    },
}
