pub mod controller;
pub mod observable;
pub mod task;

pub use controller::SessionController;
pub use observable::{Estimate, ValueCell};
pub use task::TaskHandle;
