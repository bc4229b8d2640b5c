pub mod activity;
pub mod availability;
pub mod booking;
pub mod schedule;
pub mod time_slot;
