use time::OffsetDateTime;

use crate::models::parking_spot::VehicleType;
use crate::services::ParkingError;

pub const CAR_RATE_PER_HOUR: f64 = 1.5;
pub const BIKE_RATE_PER_HOUR: f64 = 1.0;
/// Stays at or under this duration are free of charge.
pub const FREE_PARKING_DURATION_HOURS: f64 = 0.5;
pub const REGULAR_USER_DISCOUNT: f64 = 0.95;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

#[derive(Default)]
pub struct FareCalculatorService;

impl FareCalculatorService {
    pub fn new() -> Self {
        Self
    }

    /// Computes the fare for one stay; the caller writes the result into the
    /// ticket.
    pub fn calculate_fare(
        &self,
        in_time: OffsetDateTime,
        out_time: Option<OffsetDateTime>,
        vehicle_type: VehicleType,
        discount: bool,
    ) -> Result<f64, ParkingError> {
        let out_time = out_time.ok_or(ParkingError::InvalidInterval)?;
        if out_time < in_time {
            return Err(ParkingError::InvalidInterval);
        }

        let duration_in_hours =
            (out_time - in_time).whole_milliseconds() as f64 / MILLIS_PER_HOUR;

        let mut price = if duration_in_hours <= FREE_PARKING_DURATION_HOURS {
            0.0
        } else {
            let rate = match vehicle_type {
                VehicleType::Car => CAR_RATE_PER_HOUR,
                VehicleType::Bike => BIKE_RATE_PER_HOUR,
            };
            duration_in_hours * rate
        };
        if discount {
            price *= REGULAR_USER_DISCOUNT;
        }
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;
    use time::Duration;

    use super::*;

    fn in_time() -> OffsetDateTime {
        datetime!(2023-09-12 10:00 UTC)
    }

    fn fare_for(duration: Duration, vehicle_type: VehicleType, discount: bool) -> f64 {
        FareCalculatorService::new()
            .calculate_fare(in_time(), Some(in_time() + duration), vehicle_type, discount)
            .unwrap()
    }

    #[test]
    fn one_hour_car_stay_is_charged_at_car_rate() {
        let price = fare_for(Duration::hours(1), VehicleType::Car, false);
        assert!((price - 1.5).abs() < 1e-9);
    }

    #[test]
    fn one_hour_bike_stay_is_charged_at_bike_rate() {
        let price = fare_for(Duration::hours(1), VehicleType::Bike, false);
        assert!((price - 1.0).abs() < 1e-9);
    }

    #[test]
    fn partial_hours_are_charged_proportionally() {
        let price = fare_for(Duration::minutes(45), VehicleType::Car, false);
        assert!((price - 1.125).abs() < 1e-9);

        let price = fare_for(Duration::minutes(90), VehicleType::Bike, false);
        assert!((price - 1.5).abs() < 1e-9);
    }

    #[test]
    fn stay_within_grace_period_is_free() {
        let price = fare_for(Duration::minutes(20), VehicleType::Car, false);
        assert_eq!(price, 0.0);
    }

    #[test]
    fn grace_period_boundary_is_still_free() {
        let price = fare_for(Duration::minutes(30), VehicleType::Bike, false);
        assert_eq!(price, 0.0);
    }

    #[test]
    fn first_minute_past_grace_period_is_charged() {
        let price = fare_for(Duration::minutes(31), VehicleType::Car, false);
        assert!((price - 0.775).abs() < 1e-9);
    }

    #[test]
    fn regular_user_discount_takes_five_percent_off() {
        let price = fare_for(Duration::hours(1), VehicleType::Car, true);
        assert!((price - 1.425).abs() < 1e-9);
    }

    #[test]
    fn discounted_free_stay_stays_at_zero() {
        let price = fare_for(Duration::minutes(20), VehicleType::Bike, true);
        assert_eq!(price, 0.0);
        assert!(price >= 0.0);
    }

    #[test]
    fn fare_grows_with_duration() {
        let one = fare_for(Duration::hours(1), VehicleType::Car, false);
        let two = fare_for(Duration::hours(2), VehicleType::Car, false);
        let three = fare_for(Duration::hours(3), VehicleType::Car, false);
        assert!(one < two && two < three);
    }

    #[test]
    fn duration_keeps_millisecond_precision() {
        let price = fare_for(
            Duration::hours(1) + Duration::milliseconds(36_000),
            VehicleType::Bike,
            false,
        );
        assert!((price - 1.01).abs() < 1e-9);
    }

    #[test]
    fn missing_out_time_is_rejected() {
        let result = FareCalculatorService::new().calculate_fare(
            in_time(),
            None,
            VehicleType::Car,
            false,
        );
        assert!(matches!(result, Err(ParkingError::InvalidInterval)));
    }

    #[test]
    fn out_time_before_in_time_is_rejected() {
        let result = FareCalculatorService::new().calculate_fare(
            in_time(),
            Some(in_time() - Duration::minutes(5)),
            VehicleType::Car,
            false,
        );
        assert!(matches!(result, Err(ParkingError::InvalidInterval)));
    }
}
