//! Simple REST API server example for the reservation engine.
//!
//! Run with: `cargo run --example server`
//!
//! ## Endpoints
//!
//! - `POST /reservations` - Book a seat (1-based row and column)
//! - `DELETE /reservations/:id` - Cancel a reservation
//! - `GET /reservations/:id` - Get a reservation by ID
//! - `GET /dashboard` - Counts, sales, seat maps and the reservation list
//! - `GET /prices` - The 12x4 price matrix
//!
//! ## Example Usage
//!
//! ```bash
//! # Book the front-left window seat
//! curl -X POST http://localhost:3000/reservations \
//!   -H "Content-Type: application/json" \
//!   -d '{"passenger_name": "Bob Smith", "row": 1, "column": 1}'
//!
//! # Cancel it
//! curl -X DELETE http://localhost:3000/reservations/1
//!
//! # Dashboard
//! curl http://localhost:3000/dashboard
//! ```

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bus_reservation_rs::{
    Cancellation, DashboardSnapshot, PriceTable, Reservation, ReservationEngine, ReservationError,
    ReservationId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;

// === Request/Response DTOs ===

/// Request body for booking a seat.
#[derive(Debug, Deserialize)]
pub struct BookingRequest {
    pub passenger_name: String,
    pub row: i64,
    pub column: i64,
}

/// Response body for a successful booking.
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub reservation_id: ReservationId,
    pub e_ticket_number: String,
    pub price: Decimal,
}

/// Response body for errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// === Application State ===

/// Shared application state containing the reservation engine.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ReservationEngine>,
}

// === Error Handling ===

/// Wrapper for converting `ReservationError` into HTTP responses.
pub struct AppError(ReservationError);

impl From<ReservationError> for AppError {
    fn from(err: ReservationError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            ReservationError::InvalidName => (StatusCode::BAD_REQUEST, "INVALID_NAME"),
            ReservationError::OutOfRange { .. } => (StatusCode::BAD_REQUEST, "OUT_OF_RANGE"),
            ReservationError::SeatTaken { .. } => (StatusCode::CONFLICT, "SEAT_TAKEN"),
            ReservationError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ReservationError::StorageFailure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_FAILURE")
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

// === Handlers ===

/// POST /reservations - Book a seat.
async fn book(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let booking = state
        .engine
        .book(&request.passenger_name, request.row, request.column)?;

    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            reservation_id: booking.reservation_id(),
            e_ticket_number: booking.e_ticket_number().to_string(),
            price: booking.price,
        }),
    ))
}

/// DELETE /reservations/:id - Cancel a reservation.
async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Cancellation>, AppError> {
    Ok(Json(state.engine.cancel(ReservationId(id))?))
}

/// GET /reservations/:id - Get a reservation by ID.
async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Reservation>, AppError> {
    let id = ReservationId(id);
    state
        .engine
        .reservation(id)?
        .map(Json)
        .ok_or(AppError(ReservationError::NotFound(id)))
}

/// GET /dashboard - Consistent snapshot of the trip.
async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardSnapshot>, AppError> {
    Ok(Json(state.engine.dashboard_snapshot()?))
}

/// GET /prices - Price matrix, rows then columns.
async fn prices() -> Json<Vec<Vec<Decimal>>> {
    Json(
        PriceTable::matrix()
            .iter()
            .map(|row| row.to_vec())
            .collect(),
    )
}

// === Router ===

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/reservations", post(book))
        .route("/reservations/{id}", get(get_reservation).delete(cancel))
        .route("/dashboard", get(dashboard))
        .route("/prices", get(prices))
        .with_state(state)
}

// === Main ===

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let state = AppState {
        engine: Arc::new(ReservationEngine::new()),
    };

    let app = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:3000").await.unwrap();
    println!("Bus reservation API server running on http://127.0.0.1:3000");
    println!();
    println!("Endpoints:");
    println!("  POST   /reservations      - Book a seat");
    println!("  GET    /reservations/:id  - Get reservation by ID");
    println!("  DELETE /reservations/:id  - Cancel a reservation");
    println!("  GET    /dashboard         - Dashboard snapshot");
    println!("  GET    /prices            - Price matrix");

    axum::serve(listener, app).await.unwrap();
}
