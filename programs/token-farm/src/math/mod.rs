pub mod accrual;
pub use accrual::*;
