//! The current output sink.
//!
//! Report output goes to a per-thread sink that defaults to stdout.
//! [`redirect_output`] swaps in another writer for the duration of a
//! closure. The previous sink is restored when the closure returns,
//! whether it returned an error or panicked.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

thread_local! {
    static SINK: RefCell<Option<Box<dyn Write>>> = const { RefCell::new(None) };
}

/// Run `f` against the current sink (stdout unless redirected).
///
/// Must not be nested inside another `with_output` call on the same thread.
pub fn with_output<F, R>(f: F) -> R
where
    F: FnOnce(&mut dyn Write) -> R,
{
    SINK.with(|sink| match sink.borrow_mut().as_mut() {
        Some(writer) => f(&mut **writer),
        None => f(&mut io::stdout().lock()),
    })
}

/// Send all sink output produced by `f` to `sink`.
pub fn redirect_output<W, F, R>(sink: W, f: F) -> R
where
    W: Write + 'static,
    F: FnOnce() -> R,
{
    let previous = SINK.with(|current| current.replace(Some(Box::new(sink))));
    let _restore = RestoreSink {
        previous: Some(previous),
    };
    f()
}

struct RestoreSink {
    previous: Option<Option<Box<dyn Write>>>,
}

impl Drop for RestoreSink {
    fn drop(&mut self) {
        let previous = self.previous.take().flatten();
        SINK.with(|current| {
            if let Ok(mut current) = current.try_borrow_mut() {
                if let Some(writer) = current.as_mut() {
                    let _ = writer.flush();
                }
                *current = previous;
            }
        });
    }
}

/// Cloneable in-memory writer for capturing redirected output.
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    bytes: Rc<RefCell<Vec<u8>>>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.borrow()).into_owned()
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
