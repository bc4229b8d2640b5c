pub mod database;
pub mod gateway;
pub mod memory;
pub mod repository;
