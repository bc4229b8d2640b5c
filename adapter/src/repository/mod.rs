pub mod booking;
pub mod health;
pub mod schedule;
