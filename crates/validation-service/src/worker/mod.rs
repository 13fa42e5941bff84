//! 后台 Worker

pub mod operator_refresh;

pub use operator_refresh::OperatorRefreshWorker;
