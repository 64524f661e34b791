use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::models::parking_spot::{ParkingSpot, VehicleType};
use crate::models::ticket::Ticket;
use crate::services::fare_calculator::FareCalculatorService;
use crate::services::ParkingError;

/// Spot rows as the workflow sees them. Implemented by the persistence layer.
#[async_trait]
pub trait SpotStore: Send + Sync {
    async fn next_available_spot(&self, vehicle_type: VehicleType)
        -> anyhow::Result<Option<i32>>;
    async fn update_spot(&self, spot: &ParkingSpot) -> anyhow::Result<bool>;
}

/// Ticket rows as the workflow sees them. Saves and updates report `false`
/// when the store rejects the row (duplicate open ticket, no matching row).
#[async_trait]
pub trait TicketStore: Send + Sync {
    async fn save_ticket(&self, ticket: &Ticket) -> anyhow::Result<bool>;
    async fn get_open_ticket(&self, vehicle_reg_number: &str) -> anyhow::Result<Option<Ticket>>;
    async fn update_ticket(&self, ticket: &Ticket) -> anyhow::Result<bool>;
    async fn count_completed_stays(&self, vehicle_reg_number: &str) -> anyhow::Result<i64>;
}

/// Where the operator's answers come from: the console in shell mode, the
/// request body in server mode.
pub trait InputSource: Send + Sync {
    fn read_selection(&self) -> i32;
    fn read_vehicle_id(&self) -> String;
}

#[derive(Serialize, Clone, Debug)]
pub struct EntryReceipt {
    pub spot_number: i32,
    pub vehicle_reg_number: String,
    pub in_time: OffsetDateTime,
    pub regular_user: bool,
}

#[derive(Serialize, Clone, Debug)]
pub struct ExitReceipt {
    pub spot_number: i32,
    pub vehicle_reg_number: String,
    pub price: f64,
    pub out_time: OffsetDateTime,
    pub discount_applied: bool,
}

pub struct ParkingService {
    input: Arc<dyn InputSource>,
    spot_store: Arc<dyn SpotStore>,
    ticket_store: Arc<dyn TicketStore>,
    fare_calculator: FareCalculatorService,
}

impl ParkingService {
    pub fn new(
        input: Arc<dyn InputSource>,
        spot_store: Arc<dyn SpotStore>,
        ticket_store: Arc<dyn TicketStore>,
    ) -> Self {
        Self {
            input,
            spot_store,
            ticket_store,
            fare_calculator: FareCalculatorService::new(),
        }
    }

    pub async fn process_incoming_vehicle(&self) -> Result<EntryReceipt, ParkingError> {
        let selection = self.input.read_selection();
        let vehicle_type = VehicleType::from_selection(selection)
            .ok_or(ParkingError::InvalidSelection(selection))?;

        let spot = ParkingSpot {
            available: false,
            ..self.next_available_spot(vehicle_type).await?
        };
        let vehicle_reg_number = self.read_vehicle_reg_number()?;

        self.reserve_spot(&spot).await?;
        let regular_user = self.completed_stays(&vehicle_reg_number).await > 0;

        let ticket = Ticket {
            id: 0,
            parking_spot: spot,
            vehicle_reg_number,
            price: 0.0,
            in_time: OffsetDateTime::now_utc(),
            out_time: None,
        };
        match self.ticket_store.save_ticket(&ticket).await {
            Ok(true) => {}
            // The spot was already reserved; hand it back before reporting
            // the failed save.
            Ok(false) => {
                self.release_spot_after_abort(&spot).await;
                return Err(ParkingError::Persistence(anyhow!(
                    "ticket store rejected the ticket for vehicle number: {}",
                    ticket.vehicle_reg_number
                )));
            }
            Err(e) => {
                self.release_spot_after_abort(&spot).await;
                return Err(ParkingError::Persistence(e));
            }
        }

        info!(
            "Vehicle number: {} parked in spot: {}",
            ticket.vehicle_reg_number, spot.spot_number
        );
        Ok(EntryReceipt {
            spot_number: spot.spot_number,
            vehicle_reg_number: ticket.vehicle_reg_number,
            in_time: ticket.in_time,
            regular_user,
        })
    }

    pub async fn process_exiting_vehicle(&self) -> Result<ExitReceipt, ParkingError> {
        let vehicle_reg_number = self.read_vehicle_reg_number()?;
        let mut ticket = self
            .ticket_store
            .get_open_ticket(&vehicle_reg_number)
            .await
            .map_err(ParkingError::Persistence)?
            .ok_or_else(|| ParkingError::TicketNotFound(vehicle_reg_number.clone()))?;

        let out_time = OffsetDateTime::now_utc();
        let discount_applied = self.completed_stays(&vehicle_reg_number).await > 0;
        let price = self.fare_calculator.calculate_fare(
            ticket.in_time,
            Some(out_time),
            ticket.parking_spot.spot_type,
            discount_applied,
        )?;
        ticket.price = price;
        ticket.out_time = Some(out_time);

        // The spot stays reserved unless the closed ticket actually landed in
        // the store.
        match self.ticket_store.update_ticket(&ticket).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(ParkingError::Persistence(anyhow!(
                    "ticket store did not update the ticket for vehicle number: {}",
                    ticket.vehicle_reg_number
                )))
            }
            Err(e) => return Err(ParkingError::Persistence(e)),
        }
        self.release_spot(&ticket.parking_spot).await?;

        info!(
            "Vehicle number: {} left spot: {} owing a fare of: {:.2}",
            ticket.vehicle_reg_number, ticket.parking_spot.spot_number, price
        );
        Ok(ExitReceipt {
            spot_number: ticket.parking_spot.spot_number,
            vehicle_reg_number: ticket.vehicle_reg_number,
            price,
            out_time,
            discount_applied,
        })
    }

    pub async fn next_available_spot(
        &self,
        vehicle_type: VehicleType,
    ) -> Result<ParkingSpot, ParkingError> {
        let spot_number = self
            .spot_store
            .next_available_spot(vehicle_type)
            .await
            .map_err(ParkingError::Persistence)?
            .ok_or(ParkingError::NoAvailableSpot(vehicle_type))?;
        Ok(ParkingSpot {
            spot_number,
            spot_type: vehicle_type,
            available: true,
        })
    }

    pub async fn reserve_spot(&self, spot: &ParkingSpot) -> Result<(), ParkingError> {
        self.update_spot_availability(spot, false).await
    }

    pub async fn release_spot(&self, spot: &ParkingSpot) -> Result<(), ParkingError> {
        self.update_spot_availability(spot, true).await
    }

    async fn update_spot_availability(
        &self,
        spot: &ParkingSpot,
        available: bool,
    ) -> Result<(), ParkingError> {
        let updated = ParkingSpot { available, ..*spot };
        match self.spot_store.update_spot(&updated).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(ParkingError::Persistence(anyhow!(
                "spot: {} was not updated in the store",
                spot.spot_number
            ))),
            Err(e) => Err(ParkingError::Persistence(e)),
        }
    }

    async fn release_spot_after_abort(&self, spot: &ParkingSpot) {
        if let Err(e) = self.release_spot(spot).await {
            warn!(
                "Failed to hand back spot: {} after an aborted entry, due to: {}",
                spot.spot_number, e
            );
        }
    }

    async fn completed_stays(&self, vehicle_reg_number: &str) -> i64 {
        match self
            .ticket_store
            .count_completed_stays(vehicle_reg_number)
            .await
        {
            Ok(count) => count,
            Err(e) => {
                warn!(
                    "Failed to count completed stays for vehicle number: {}, due to: {}",
                    vehicle_reg_number, e
                );
                0
            }
        }
    }

    fn read_vehicle_reg_number(&self) -> Result<String, ParkingError> {
        let vehicle_reg_number = self.input.read_vehicle_id();
        let vehicle_reg_number = vehicle_reg_number.trim();
        if vehicle_reg_number.is_empty() {
            return Err(ParkingError::EmptyIdentifier);
        }
        Ok(vehicle_reg_number.to_string())
    }
}
