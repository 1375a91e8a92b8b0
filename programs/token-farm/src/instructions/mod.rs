pub mod initialize;
pub use initialize::*;

pub mod deposit;
pub use deposit::*;

pub mod withdraw;
pub use withdraw::*;

pub mod claim_rewards;
pub use claim_rewards::*;

pub mod distribute_rewards_all;
pub use distribute_rewards_all::*;
