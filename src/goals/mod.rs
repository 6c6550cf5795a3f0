//! Stock [`Goal`](crate::Goal) implementations.

mod fact_goal;
mod need_reduction;

pub use fact_goal::FactGoal;
pub use need_reduction::NeedReductionGoal;
