use crate::domain::model::{InputDocument, OutputDocument, Record, ValidatedDocument};
use crate::utils::error::Result;

/// Where raw input bytes come from.
pub trait Source {
    fn describe(&self) -> String;
    fn read_all(&mut self) -> Result<Vec<u8>>;
}

/// Where serialized output bytes go. Called at most once per run, with the
/// whole document.
pub trait Sink {
    fn describe(&self) -> String;
    fn write_all(&mut self, data: &[u8]) -> Result<()>;
}

impl<T: Source + ?Sized> Source for Box<T> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn read_all(&mut self) -> Result<Vec<u8>> {
        (**self).read_all()
    }
}

impl<T: Sink + ?Sized> Sink for Box<T> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        (**self).write_all(data)
    }
}

/// One record-level transform step. Pure: no I/O.
///
/// The error is a human-readable reason; the pipeline attaches the step
/// name and record index.
pub trait Transform {
    fn name(&self) -> &str;
    fn apply(&self, record: Record) -> std::result::Result<Record, String>;
}

pub trait Pipeline {
    fn load(&mut self) -> Result<InputDocument>;
    fn validate(&self, document: InputDocument) -> Result<ValidatedDocument>;
    fn transform(&self, document: ValidatedDocument) -> Result<OutputDocument>;
    /// Returns a description of the destination written to.
    fn emit(&mut self, document: OutputDocument) -> Result<String>;
}
