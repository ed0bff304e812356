pub mod admin_routes;
pub mod booking_routes;
pub mod car_routes;
pub mod settings_routes;
