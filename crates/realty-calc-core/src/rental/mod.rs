pub mod cash_flow;
pub mod criteria;
pub mod strategy;
