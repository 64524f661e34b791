use std::sync::Arc;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::controller::AppState;
use crate::helpers::input_reader::RequestInput;
use crate::models::parking_spot::VehicleType;
use crate::repositories::postgres_repo::PostgresConnectionRepo;
use crate::services::parking_service::{ParkingService, SpotStore};

pub fn router(app_state: AppState) -> Router {
    let postgres_repo = Arc::new(PostgresConnectionRepo::new(app_state.postgres_connection));

    Router::new()
        .route("/entry", post(vehicle_entry))
        .route("/exit", post(vehicle_exit))
        .route("/availability", get(next_available_spot))
        .route_layer(Extension(postgres_repo))
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct VehicleEntry {
    pub vehicle_type: i32,
    pub vehicle_reg_number: String,
}

pub async fn vehicle_entry(
    Extension(postgres_repo): Extension<Arc<PostgresConnectionRepo>>,
    Json(body): Json<VehicleEntry>,
) -> impl IntoResponse {
    let input = RequestInput::new(body.vehicle_type, body.vehicle_reg_number);
    let parking_service = ParkingService::new(
        Arc::new(input),
        postgres_repo.clone(),
        postgres_repo.clone(),
    );

    return match parking_service.process_incoming_vehicle().await {
        Ok(receipt) => (StatusCode::OK, json!(receipt).to_string()).into_response(),
        Err(e) => {
            warn!(
                "Something went wrong processing the incoming vehicle due to: {}",
                e
            );
            (
                StatusCode::BAD_REQUEST,
                format!("Failed to process incoming vehicle: {}", e),
            )
                .into_response()
        }
    };
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct VehicleExit {
    pub vehicle_reg_number: String,
}

pub async fn vehicle_exit(
    Extension(postgres_repo): Extension<Arc<PostgresConnectionRepo>>,
    Json(body): Json<VehicleExit>,
) -> impl IntoResponse {
    let input = RequestInput::new(0, body.vehicle_reg_number);
    let parking_service = ParkingService::new(
        Arc::new(input),
        postgres_repo.clone(),
        postgres_repo.clone(),
    );

    return match parking_service.process_exiting_vehicle().await {
        Ok(receipt) => (StatusCode::OK, json!(receipt).to_string()).into_response(),
        Err(e) => {
            warn!(
                "Something went wrong processing the exiting vehicle due to: {}",
                e
            );
            (
                StatusCode::BAD_REQUEST,
                format!("Failed to process exiting vehicle: {}", e),
            )
                .into_response()
        }
    };
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AvailabilityQuery {
    pub vehicle_type: i32,
}

pub async fn next_available_spot(
    Extension(postgres_repo): Extension<Arc<PostgresConnectionRepo>>,
    Query(query): Query<AvailabilityQuery>,
) -> impl IntoResponse {
    let Some(vehicle_type) = VehicleType::from_selection(query.vehicle_type) else {
        return (
            StatusCode::BAD_REQUEST,
            "Unknown vehicle type, please select 1 for CAR or 2 for BIKE",
        )
            .into_response();
    };

    return match postgres_repo.next_available_spot(vehicle_type).await {
        Ok(spot_number) => (
            StatusCode::OK,
            json!({ "vehicle_type": vehicle_type, "spot_number": spot_number }).to_string(),
        )
            .into_response(),
        Err(e) => {
            warn!(
                "Something went wrong looking up spot availability due to: {}",
                e
            );
            (
                StatusCode::BAD_REQUEST,
                "Failed to look up spot availability, please try again.",
            )
                .into_response()
        }
    };
}
