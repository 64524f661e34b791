use std::str::FromStr;

use anyhow::anyhow;
use async_trait::async_trait;
use bb8_postgres::bb8::{Pool, PooledConnection};
use bb8_postgres::tokio_postgres::{NoTls, Row};
use bb8_postgres::PostgresConnectionManager;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::warn;

use crate::models::parking_spot::{ParkingSpot, VehicleType};
use crate::models::ticket::Ticket;
use crate::services::parking_service::{SpotStore, TicketStore};

pub const RETRY_LIMIT: usize = 5;

pub struct PostgresConnectionRepo {
    postgres_connection: Pool<PostgresConnectionManager<NoTls>>,
}

impl PostgresConnectionRepo {
    pub fn new(postgres_connection: Pool<PostgresConnectionManager<NoTls>>) -> Self {
        Self {
            postgres_connection,
        }
    }

    async fn get_postgres_connection(
        &self,
    ) -> anyhow::Result<PooledConnection<PostgresConnectionManager<NoTls>>> {
        for _ in 0..RETRY_LIMIT {
            match self.postgres_connection.get().await {
                Ok(conn) => return Ok(conn),
                Err(e) => {
                    warn!(
                        "Failed to retrieve postgres connection due to: {}, retrying in 3s",
                        e
                    );
                    tokio::time::sleep(tokio::time::Duration::from_secs(3)).await;
                    continue;
                }
            }
        }

        Err(anyhow!(
            "Failed to retrieve a valid connection from postgres pool, BAILING"
        ))
    }
}

#[async_trait]
impl SpotStore for PostgresConnectionRepo {
    async fn next_available_spot(
        &self,
        vehicle_type: VehicleType,
    ) -> anyhow::Result<Option<i32>> {
        let conn = self.get_postgres_connection().await?;
        let stmt = format!(
            "SELECT spot_number FROM parking_spots WHERE available = true AND spot_type = '{}' \
             ORDER BY spot_number ASC LIMIT 1;",
            vehicle_type
        );

        match conn.query(&stmt, &[]).await {
            Ok(rows) => Ok(rows.first().map(|row| row.get("spot_number"))),
            Err(e) => {
                warn!(
                    "Failed to look up an available {} spot due to: {}",
                    vehicle_type, e
                );
                Err(e.into())
            }
        }
    }

    async fn update_spot(&self, spot: &ParkingSpot) -> anyhow::Result<bool> {
        let conn = self.get_postgres_connection().await?;
        let stmt = format!(
            "UPDATE parking_spots SET available = {} WHERE spot_number = {};",
            spot.available, spot.spot_number
        );

        match conn.execute(&stmt, &[]).await {
            Ok(rows) => Ok(rows == 1),
            Err(e) => {
                warn!(
                    "Failed to update parking spot: {} due to: {}",
                    spot.spot_number, e
                );
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl TicketStore for PostgresConnectionRepo {
    async fn save_ticket(&self, ticket: &Ticket) -> anyhow::Result<bool> {
        let conn = self.get_postgres_connection().await?;
        let out_time = match ticket.out_time {
            Some(out_time) => format!("'{}'", fmt_timestamp(out_time)),
            None => String::from("NULL"),
        };
        // The partial unique index on open tickets turns a second open ticket
        // for the same vehicle into a conflict, reported through the
        // affected-rows count.
        let stmt = format!(
            "INSERT INTO tickets (spot_number, vehicle_reg_number, price, in_time, out_time) \
             VALUES ({}, '{}', {}, '{}', {}) \
             ON CONFLICT (vehicle_reg_number) WHERE out_time IS NULL DO NOTHING;",
            ticket.parking_spot.spot_number,
            ticket.vehicle_reg_number,
            ticket.price,
            fmt_timestamp(ticket.in_time),
            out_time,
        );

        match conn.execute(&stmt, &[]).await {
            Ok(rows) => Ok(rows == 1),
            Err(e) => {
                warn!(
                    "Failed to save ticket for vehicle number: {} due to: {}",
                    ticket.vehicle_reg_number, e
                );
                Err(e.into())
            }
        }
    }

    async fn get_open_ticket(&self, vehicle_reg_number: &str) -> anyhow::Result<Option<Ticket>> {
        let conn = self.get_postgres_connection().await?;
        let stmt = format!(
            "SELECT t.id, t.spot_number, p.spot_type, p.available, t.vehicle_reg_number, \
             t.price, t.in_time, t.out_time \
             FROM tickets t JOIN parking_spots p ON p.spot_number = t.spot_number \
             WHERE t.vehicle_reg_number = '{}' AND t.out_time IS NULL \
             ORDER BY t.in_time DESC LIMIT 1;",
            vehicle_reg_number
        );

        match conn.query(&stmt, &[]).await {
            Ok(rows) => match rows.into_iter().next() {
                Some(row) => Ok(Some(parse_row_into_ticket(row)?)),
                None => Ok(None),
            },
            Err(e) => {
                warn!(
                    "Failed to retrieve the open ticket for vehicle number: {} due to: {}",
                    vehicle_reg_number, e
                );
                Err(e.into())
            }
        }
    }

    async fn update_ticket(&self, ticket: &Ticket) -> anyhow::Result<bool> {
        let out_time = ticket
            .out_time
            .ok_or_else(|| anyhow!("Refusing to close a ticket without an out time"))?;
        let conn = self.get_postgres_connection().await?;
        let stmt = format!(
            "UPDATE tickets SET price = {}, out_time = '{}' WHERE id = {} AND out_time IS NULL;",
            ticket.price,
            fmt_timestamp(out_time),
            ticket.id
        );

        match conn.execute(&stmt, &[]).await {
            Ok(rows) => Ok(rows == 1),
            Err(e) => {
                warn!(
                    "Failed to update ticket: {} for vehicle number: {} due to: {}",
                    ticket.id, ticket.vehicle_reg_number, e
                );
                Err(e.into())
            }
        }
    }

    async fn count_completed_stays(&self, vehicle_reg_number: &str) -> anyhow::Result<i64> {
        let conn = self.get_postgres_connection().await?;
        let stmt = format!(
            "SELECT COUNT(*) FROM tickets WHERE vehicle_reg_number = '{}' AND out_time IS NOT NULL;",
            vehicle_reg_number
        );

        match conn.query(&stmt, &[]).await {
            Ok(rows) => Ok(rows.first().map(|row| row.get(0)).unwrap_or(0)),
            Err(e) => {
                warn!(
                    "Failed to count completed stays for vehicle number: {} due to: {}",
                    vehicle_reg_number, e
                );
                Err(e.into())
            }
        }
    }
}

fn fmt_timestamp(timestamp: OffsetDateTime) -> String {
    let format = format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3] \
         [offset_hour sign:mandatory]:[offset_minute]"
    );
    timestamp
        .format(&format)
        .unwrap_or_else(|_| timestamp.to_string())
}

fn parse_row_into_ticket(row: Row) -> anyhow::Result<Ticket> {
    let spot_type: String = row.get("spot_type");
    Ok(Ticket {
        id: row.get("id"),
        parking_spot: ParkingSpot {
            spot_number: row.get("spot_number"),
            spot_type: VehicleType::from_str(&spot_type)?,
            available: row.get("available"),
        },
        vehicle_reg_number: row.get("vehicle_reg_number"),
        price: row.get("price"),
        in_time: row.get("in_time"),
        out_time: row.get("out_time"),
    })
}
