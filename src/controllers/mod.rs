pub mod booking_controller;
pub mod car_controller;
pub mod dashboard_controller;
pub mod settings_controller;
