//! API endpoint handlers. One module per control on the page.

pub mod analyze;
pub mod appointment;
pub mod health;
pub mod page;
