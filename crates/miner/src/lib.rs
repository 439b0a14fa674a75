pub mod worker;

pub use worker::{spawn, WorkerHandle};
