// Adapters layer: concrete sources and sinks for files and standard streams.

pub mod io;

pub use io::{FileSink, FileSource, ReaderSource, WriterSink};
