pub mod codec;
pub mod pipeline;
pub mod runner;
pub mod transforms;
pub mod validator;

pub use crate::domain::model::{Record, ValidatedDocument};
pub use crate::domain::ports::{Pipeline, Sink, Source, Transform};
pub use crate::utils::error::Result;
