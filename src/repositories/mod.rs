//! Repositorios de acceso a datos
//!
//! Este módulo contiene los repositorios que encapsulan las queries SQL
//! de cada entidad.

pub mod booking_repository;
pub mod car_repository;
pub mod dealership_repository;
pub mod user_repository;
