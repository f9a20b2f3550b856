//! Request logging around writer-style handlers.

use std::time::Instant;

use axum::{body::Bytes, http::Request};

use crate::http::handler::Handler;
use crate::http::responder::{ResponseWriter, StatusRecorder};
use crate::observability::emit::{select, LogFn, RequestInfo};

/// A handler that logs every request it serves.
pub struct Logged<H> {
    handler: H,
    log: LogFn,
}

/// Wrap `handler` so each request is timed and logged.
///
/// With no `log_fns` the request is logged as a JSON line on stdout (and
/// stderr for server errors); with several, each runs in order.
pub fn wrap<H: Handler>(handler: H, log_fns: Vec<LogFn>) -> Logged<H> {
    Logged {
        handler,
        log: select(log_fns),
    }
}

impl<H> Logged<H> {
    pub fn get_ref(&self) -> &H {
        &self.handler
    }
}

impl<H: Handler> Handler for Logged<H> {
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request<Bytes>) {
        let info = RequestInfo::from_request(req);
        let mut record = StatusRecorder::new(w);

        let start = Instant::now();
        self.handler.serve(&mut record, req);
        let elapsed = start.elapsed();

        (self.log)(&info, elapsed, record.status());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::handler::handler_fn;
    use crate::http::responder::ResponseBuffer;
    use crate::observability::{json, log_fn, STATUS_UNSET};
    use crate::test_util::SharedBuffer;
    use axum::http::StatusCode;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    type Seen = Arc<Mutex<Vec<(String, Duration, u16)>>>;

    fn seen_by(seen: Seen) -> LogFn {
        log_fn(move |req, elapsed, status| {
            seen.lock().unwrap().push((req.path.clone(), elapsed, status));
        })
    }

    fn get(path: &str) -> Request<Bytes> {
        Request::builder().uri(path).body(Bytes::new()).unwrap()
    }

    #[test]
    fn test_greeting_logged_as_json_line() {
        let out = SharedBuffer::new();
        let err = SharedBuffer::new();
        let greeting = handler_fn(|w, _req| {
            w.write_header(StatusCode::OK);
            let _ = w.write(b"Hello, world!");
        });
        let logged = wrap(greeting, vec![json(out.clone(), err.clone())]);

        let mut buffer = ResponseBuffer::new();
        logged.serve(&mut buffer, &get("/greeting"));

        assert_eq!(buffer.body(), b"Hello, world!");
        let lines = out.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with(
            "{\"type\": \"HTTP_REQUEST\", \"method\": \"GET\", \"path\": \"/greeting\", \"duration\": \""
        ));
        assert!(lines[0].ends_with("\"status\": 200}"));
        assert!(err.contents().is_empty());
    }

    #[test]
    fn test_server_error_logged_to_both_streams() {
        let out = SharedBuffer::new();
        let err = SharedBuffer::new();
        let failing = handler_fn(|w, _req| w.write_header(StatusCode::SERVICE_UNAVAILABLE));
        let logged = wrap(failing, vec![json(out.clone(), err.clone())]);

        logged.serve(&mut ResponseBuffer::new(), &get("/down"));

        assert_eq!(err.lines().len(), 1);
        assert_eq!(out.lines(), err.lines());
    }

    #[test]
    fn test_silent_handler_reports_unset_status() {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let logged = wrap(handler_fn(|_w, _req| {}), vec![seen_by(seen.clone())]);

        logged.serve(&mut ResponseBuffer::new(), &get("/quiet"));

        assert_eq!(seen.lock().unwrap()[0].2, STATUS_UNSET);
    }

    #[test]
    fn test_implicit_ok_on_first_write() {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let logged = wrap(
            handler_fn(|w, _req| {
                let _ = w.write(b"body only");
            }),
            vec![seen_by(seen.clone())],
        );

        logged.serve(&mut ResponseBuffer::new(), &get("/implicit"));

        assert_eq!(seen.lock().unwrap()[0].2, 200);
    }

    #[test]
    fn test_elapsed_covers_handler_time() {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let slow = handler_fn(|w, _req| {
            std::thread::sleep(Duration::from_millis(20));
            w.write_header(StatusCode::OK);
        });
        let logged = wrap(slow, vec![seen_by(seen.clone())]);

        logged.serve(&mut ResponseBuffer::new(), &get("/slow"));

        assert!(seen.lock().unwrap()[0].1 >= Duration::from_millis(20));
    }

    #[test]
    fn test_fan_out_sees_identical_arguments() {
        let first: Seen = Arc::new(Mutex::new(Vec::new()));
        let second: Seen = Arc::new(Mutex::new(Vec::new()));
        let ok = handler_fn(|w, _req| w.write_header(StatusCode::OK));
        let logged = wrap(ok, vec![seen_by(first.clone()), seen_by(second.clone())]);

        logged.serve(&mut ResponseBuffer::new(), &get("/x"));

        let first = first.lock().unwrap();
        let second = second.lock().unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(*first, *second);
        assert_eq!(first[0].0, "/x");
        assert_eq!(first[0].2, 200);
    }

    #[test]
    fn test_one_log_per_request() {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let logged = wrap(
            handler_fn(|w, _req| w.write_header(StatusCode::OK)),
            vec![seen_by(seen.clone())],
        );

        for _ in 0..3 {
            logged.serve(&mut ResponseBuffer::new(), &get("/again"));
        }

        assert_eq!(seen.lock().unwrap().len(), 3);
    }
}
