pub mod booking;
pub mod id;
pub mod role;
pub mod schedule;
pub mod time_slot;
