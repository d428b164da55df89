pub mod kinds;
pub mod message;
pub mod names;
pub mod pretty;

pub use driver::{Driver, Outcome};

mod driver;
