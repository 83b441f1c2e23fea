pub mod traits;
pub mod web;

#[cfg(test)]
pub mod mock;

pub use traits::{BrowserDriver, DriverResult};
pub use web::{WebDriver, WebDriverConfig};
