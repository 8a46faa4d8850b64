pub mod rel_error;
pub mod grad_check;
pub mod problem;
pub mod check_config;
pub mod report;

pub use rel_error::{rel_error, matrix_rel_error};
pub use grad_check::{numerical_gradient, grad_check_sparse, GradCheckSample};
pub use problem::SoftmaxProblem;
pub use check_config::CheckConfig;
pub use report::{run_check, CheckReport, StrategyRun};
