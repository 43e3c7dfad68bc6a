//! Application layer: action stages, the dispatcher, DTOs and services.

pub mod actions;
pub mod dispatcher;
pub mod dto;
pub mod services;
