pub mod events;
pub use events::*;

pub mod factory;
pub use factory::*;
