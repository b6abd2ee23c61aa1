pub mod config;
pub mod dtos;
pub mod handlers;
pub mod mapper;
pub mod models;
pub mod services;
pub mod startup;
