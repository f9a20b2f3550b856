//! Fixed-shape JSON line strategy.
//!
//! Every request becomes one line:
//!
//! ```text
//! {"type": "HTTP_REQUEST", "method": "GET", "path": "/x", "duration": "48.572µs", "status": 200}
//! ```
//!
//! Lines for status >= 500 go to the error stream and then, again, to the
//! output stream. Consumers tailing only stdout still see every request.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::observability::emit::{log_fn, LogFn, RequestInfo};

/// Render one log line, newline included.
pub fn format_line(req: &RequestInfo, elapsed: Duration, status: u16) -> String {
    format!(
        "{{\"type\": \"HTTP_REQUEST\", \"method\": {}, \"path\": {}, \"duration\": {}, \"status\": {}}}\n",
        quote(req.method.as_str()),
        quote(&req.path),
        quote(&format!("{:?}", elapsed)),
        status,
    )
}

fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

fn write_line<W: Write>(writer: &Mutex<W>, line: &str) -> io::Result<()> {
    let mut w = writer.lock().unwrap_or_else(PoisonError::into_inner);
    w.write_all(line.as_bytes())?;
    w.flush()
}

/// JSON strategy over an output and an error writer.
pub fn json<O, E>(out: O, err: E) -> LogFn
where
    O: Write + Send + 'static,
    E: Write + Send + 'static,
{
    let out = Arc::new(Mutex::new(out));
    let err = Arc::new(Mutex::new(err));

    log_fn(move |req, elapsed, status| {
        let line = format_line(req, elapsed, status);

        if status >= 500 {
            if let Err(e) = write_line(&err, &line) {
                tracing::warn!(
                    target: "httplog",
                    stream = "stderr",
                    error = %e,
                    "Failed to write request log"
                );
            }
        }
        if let Err(e) = write_line(&out, &line) {
            tracing::warn!(
                target: "httplog",
                stream = "stdout",
                error = %e,
                "Failed to write request log"
            );
        }
    })
}

/// JSON strategy on the process stdout/stderr.
pub fn json_stdio() -> LogFn {
    json(io::stdout(), io::stderr())
}
