pub mod copy;
pub mod restructure;

pub use copy::{stage_working_copy, working_copy_path};
pub use restructure::{execute_restructure, plan_restructure, FsOp, RestructurePlan};
