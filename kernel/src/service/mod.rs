pub mod availability;
pub mod booking_ledger;
pub mod mentor_activity;
pub mod schedule_store;
