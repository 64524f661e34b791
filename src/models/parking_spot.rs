use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("unsupported vehicle type: {0}")]
pub struct UnsupportedVehicleType(pub String);

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum VehicleType {
    Car,
    Bike,
}

impl VehicleType {
    /// Maps the operator menu selection to a vehicle type. Anything outside
    /// 1 and 2 is rejected by the caller as an invalid selection.
    pub fn from_selection(selection: i32) -> Option<Self> {
        match selection {
            1 => Some(Self::Car),
            2 => Some(Self::Bike),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Car => "CAR",
            Self::Bike => "BIKE",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleType {
    type Err = UnsupportedVehicleType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CAR" => Ok(Self::Car),
            "BIKE" => Ok(Self::Bike),
            other => Err(UnsupportedVehicleType(other.to_string())),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParkingSpot {
    pub spot_number: i32,
    pub spot_type: VehicleType,
    pub available: bool,
}
