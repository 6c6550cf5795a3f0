//! Stock [`Action`](crate::Action) implementations.

mod move_to;
mod need_reduction;
mod timed;

pub use move_to::MoveToAction;
pub use need_reduction::NeedReductionAction;
pub use timed::TimedAction;
