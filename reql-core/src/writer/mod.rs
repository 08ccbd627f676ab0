mod backtrace;
mod context;
mod term_writer;

pub use backtrace::*;
pub use context::*;
pub use term_writer::*;
