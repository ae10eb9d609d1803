pub mod advice;
pub mod impact;
pub mod interpretation;
pub mod openweather;
pub mod profiles;
pub mod trend;
