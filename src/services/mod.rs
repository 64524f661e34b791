use thiserror::Error;

use crate::models::parking_spot::{UnsupportedVehicleType, VehicleType};

pub mod fare_calculator;
pub mod parking_service;

/// Everything that can abort a single parking operation. None of these are
/// fatal to the process; callers report them and keep serving.
#[derive(Debug, Error)]
pub enum ParkingError {
    #[error("out time is missing or earlier than in time")]
    InvalidInterval,
    #[error(transparent)]
    UnsupportedVehicleType(#[from] UnsupportedVehicleType),
    #[error("invalid vehicle type selection: {0}")]
    InvalidSelection(i32),
    #[error("no available {0} spot at the moment")]
    NoAvailableSpot(VehicleType),
    #[error("vehicle registration number must not be empty")]
    EmptyIdentifier,
    #[error("no open ticket found for vehicle number: {0}")]
    TicketNotFound(String),
    #[error("persistence failure: {0}")]
    Persistence(anyhow::Error),
}
