pub mod error;
pub mod math;
pub mod softmax;
pub mod check;

// Convenience re-exports
pub use error::{Result, SoftmaxError};
pub use math::matrix::Matrix;
pub use softmax::{
    softmax_loss, softmax_loss_naive, softmax_loss_vectorized, softmax_loss_vectorized_array,
    class_probabilities, predict, Strategy,
};
pub use check::{run_check, CheckConfig, CheckReport, SoftmaxProblem};
