pub mod history_synthesizer;
pub mod sizing_calculator;
pub mod weather_service;
pub mod yield_estimator;
