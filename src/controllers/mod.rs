pub mod solar_controller;
pub mod system_controller;
pub mod weather_controller;
