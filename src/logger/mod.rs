//! Line logger over any `ufmt` sink.
//!
//! Output errors are dropped: there is nowhere to report them.
//! Never log from interrupt context.

use ufmt::{uDisplay, uWrite, uwrite};

pub struct Logger<W> {
    sink: W,
}

impl<W: uWrite> Logger<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn info(&mut self, msg: &str) {
        uwrite!(&mut self.sink, "[INF] {}\r\n", msg).ok();
    }

    pub fn debug<T: uDisplay>(&mut self, msg: &str, value: T) {
        uwrite!(&mut self.sink, "[DBG] {}: {}\r\n", msg, value).ok();
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }
}

/// Discards everything
pub struct NullSink;

impl uWrite for NullSink {
    type Error = core::convert::Infallible;

    fn write_str(&mut self, _s: &str) -> Result<(), Self::Error> {
        Ok(())
    }
}
