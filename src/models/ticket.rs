use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::parking_spot::ParkingSpot;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Ticket {
    pub id: i32,
    pub parking_spot: ParkingSpot,
    pub vehicle_reg_number: String,
    pub price: f64,
    pub in_time: OffsetDateTime,
    pub out_time: Option<OffsetDateTime>,
}
