pub mod assess;
pub mod batch;
pub mod clean;
pub mod curves;
pub mod infer;
pub mod rules;
pub mod serve;
