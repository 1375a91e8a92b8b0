pub mod initialize_factory;
pub use initialize_factory::*;

pub mod create_farm;
pub use create_farm::*;
