pub mod location;
pub mod solar;
pub mod weather;
