mod connection;
mod cursor;
mod error;
mod response;
mod term;
mod term_type;
mod util;
mod value;
pub mod writer;

pub use ::anyhow::Context;
pub use connection::*;
pub use cursor::*;
pub use error::*;
pub use response::*;
pub use term::*;
pub use term_type::*;
pub use value::*;
pub use writer::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
