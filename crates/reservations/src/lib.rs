//! Reservations domain module: claims on offered quantity, the pickup
//! lifecycle, and confirmation codes.
//!
//! This crate contains business rules only (no IO, no HTTP, no storage).

pub mod code;
pub mod pickup;
pub mod reservation;

pub use code::{CodeGenerator, ConfirmationCode, RandomCodeGenerator, SequentialCodeGenerator};
pub use pickup::{NewPickup, Pickup};
pub use reservation::{validate_pickup_window, NewReservation, Reservation, ReservationStatus};
