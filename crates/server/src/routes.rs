use std::fmt;

use bytes::{BufMut, BytesMut};
use tcp_http::handler::{Handler, HandlerError, make_handler};
use tcp_http::protocol::Request;

fn route(w: &mut BytesMut, request: &Request) -> Result<(), HandlerError> {
    match request.target() {
        "/yourproblem" => Err(HandlerError::bad_request("Your problem is not my problem\n")),
        "/myproblem" => Err(HandlerError::internal_server_error("Whoopsie, my bad\n")),
        _ => {
            w.put_slice(b"All good, frfr\n");
            Ok(())
        }
    }
}

/// The handler served by `httpserver`.
pub fn demo_handler() -> impl Handler + 'static {
    make_handler(route)
}

/// Renders a parsed request for printing: request line, headers sorted by
/// name, then the body.
pub fn describe_request(request: &Request) -> RequestReport<'_> {
    RequestReport(request)
}

/// [`Display`](fmt::Display) adapter returned by [`describe_request`].
#[derive(Debug, Clone, Copy)]
pub struct RequestReport<'a>(&'a Request);

impl fmt::Display for RequestReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let request = self.0;
        writeln!(f, "Request line:")?;
        writeln!(f, "- Method: {}", request.method())?;
        writeln!(f, "- Target: {}", request.target())?;
        writeln!(f, "- Version: {}", request.version())?;

        let mut headers = request.headers().iter().collect::<Vec<_>>();
        headers.sort_unstable_by_key(|&(name, _)| name.as_str());
        writeln!(f, "Headers:")?;
        for (name, value) in headers {
            writeln!(f, "- {name}: {}", String::from_utf8_lossy(value.as_bytes()))?;
        }

        writeln!(f, "Body:")?;
        write!(f, "{}", String::from_utf8_lossy(request.body()))
    }
}
