#![forbid(unsafe_code)]

//! Status-convergence engine: folds a stream of per-resource status events
//! into a snapshot and decides when a watch over a fixed set of cluster
//! resources should stop.

pub mod aggregate;
pub mod cancel;
pub mod config;
pub mod deadline;
pub mod engine;
pub mod error;
pub mod ids;
pub mod model;
pub mod policy;
pub mod session;
pub mod sink;
pub mod source;
pub mod store;
pub mod time;

pub use aggregate::*;
pub use cancel::*;
pub use config::*;
pub use deadline::*;
pub use engine::*;
pub use error::*;
pub use ids::*;
pub use model::*;
pub use policy::*;
pub use session::*;
pub use sink::*;
pub use source::*;
pub use store::*;
pub use time::*;
