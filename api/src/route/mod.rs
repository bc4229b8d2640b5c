pub mod activity;
pub mod booking;
pub mod health;
pub mod mentor;
pub mod schedule;
pub mod time_slot;
pub mod v1;
