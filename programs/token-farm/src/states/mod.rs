pub mod events;
pub use events::*;

pub mod farm;
pub use farm::*;

pub mod staker_info;
pub use staker_info::*;

pub mod staker_registry;
pub use staker_registry::*;
