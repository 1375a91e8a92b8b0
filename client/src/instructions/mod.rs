pub mod factory_instructions;
pub mod farm_instructions;
pub mod rpc;
pub mod token_instructions;
pub mod utils;
