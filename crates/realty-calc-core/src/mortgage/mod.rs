pub mod amortization;
pub mod balloon;
pub mod payment;
