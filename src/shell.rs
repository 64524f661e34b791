use std::io;
use std::sync::Arc;

use bb8_postgres::bb8::Pool;
use bb8_postgres::tokio_postgres::NoTls;
use bb8_postgres::PostgresConnectionManager;
use tracing::warn;

use crate::helpers::input_reader::ConsoleInput;
use crate::repositories::postgres_repo::PostgresConnectionRepo;
use crate::services::parking_service::ParkingService;

/// Interactive operator loop, one parking action per iteration.
pub async fn run(
    postgres_connection: Pool<PostgresConnectionManager<NoTls>>,
) -> anyhow::Result<()> {
    let postgres_repo = Arc::new(PostgresConnectionRepo::new(postgres_connection));
    let parking_service = ParkingService::new(
        Arc::new(ConsoleInput),
        postgres_repo.clone(),
        postgres_repo,
    );

    println!("Welcome to the parking system!");
    loop {
        println!("Please select an option. Simply enter the number to choose an action");
        println!("1 New vehicle entering - allocate parking space");
        println!("2 Vehicle exiting - generate ticket price");
        println!("3 Shutdown system");

        match read_menu_selection() {
            1 => match parking_service.process_incoming_vehicle().await {
                Ok(receipt) => {
                    if receipt.regular_user {
                        println!(
                            "Happy to see you again! As a regular user of our parking, \
                             you will receive a 5% discount on exit"
                        );
                    }
                    println!("Generated ticket and saved in the database");
                    println!(
                        "Please park your vehicle in spot number: {}",
                        receipt.spot_number
                    );
                    println!(
                        "Recorded in-time for vehicle number: {} is: {}",
                        receipt.vehicle_reg_number, receipt.in_time
                    );
                }
                Err(e) => {
                    warn!("Unable to process incoming vehicle due to: {}", e);
                    println!("Unable to process incoming vehicle: {}", e);
                }
            },
            2 => match parking_service.process_exiting_vehicle().await {
                Ok(receipt) => {
                    if receipt.discount_applied {
                        println!("A 5% regular user discount has been applied to the fare");
                    }
                    println!("Please pay the parking fare: {:.2}", receipt.price);
                    println!(
                        "Recorded out-time for vehicle number: {} is: {}",
                        receipt.vehicle_reg_number, receipt.out_time
                    );
                }
                Err(e) => {
                    warn!("Unable to process exiting vehicle due to: {}", e);
                    println!("Unable to process exiting vehicle: {}", e);
                }
            },
            3 => {
                println!("Exiting from the system!");
                break;
            }
            _ => println!("Unsupported option. Please enter a number from the menu"),
        }
    }
    Ok(())
}

fn read_menu_selection() -> i32 {
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return -1;
    }
    line.trim().parse().unwrap_or(-1)
}
