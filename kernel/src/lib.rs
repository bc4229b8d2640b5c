pub mod gateway;
pub mod model;
pub mod repository;
pub mod service;
