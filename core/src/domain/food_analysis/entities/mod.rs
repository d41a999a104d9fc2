pub mod category;
pub mod health_verdict;
pub mod report;

pub use category::*;
pub use health_verdict::*;
pub use report::*;
