//! External provider clients used by the checkout pipeline.

pub mod email;
pub mod payment;
