//! Tracing output to the browser console.

use std::io::{self, Write};
use std::sync::Once;

use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriter;
use wasm_bindgen::JsValue;

static INSTALLED: Once = Once::new();

/// Installs the panic hook and a console tracing subscriber (idempotent).
pub fn init() {
    INSTALLED.call_once(|| {
        console_error_panic_hook::set_once();
        let result = tracing_subscriber::fmt()
            .with_writer(ConsoleWriter)
            .without_time()
            .with_target(false)
            .with_max_level(Level::INFO)
            .try_init();
        if result.is_err() {
            web_sys::console::warn_1(&JsValue::from_str(
                "ember: a tracing subscriber was already installed",
            ));
        }
    });
}

struct ConsoleWriter;

impl<'a> MakeWriter<'a> for ConsoleWriter {
    type Writer = ConsoleLine;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleLine {
            buffer: Vec::with_capacity(128),
        }
    }
}

/// One formatted event, emitted to the console when dropped.
struct ConsoleLine {
    buffer: Vec<u8>,
}

impl Write for ConsoleLine {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleLine {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buffer);
        let line = line.trim_end();
        if !line.is_empty() {
            web_sys::console::log_1(&JsValue::from_str(line));
        }
    }
}
