//! Canvas buffer and driver-side I/O helpers.
mod f64;
pub mod io;

pub use self::f64::ImageF64;
