use crate::{AssessQuery, AssessQueryError, ScreeningService};
use fuzzdx_screen::{Flags, normalize_column};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Read and write timeout applied to every accepted connection.
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    pub bind: SocketAddr,
    pub io_timeout: Duration,
}

impl HttpServerConfig {
    pub fn new(bind: SocketAddr) -> Self {
        Self {
            bind,
            io_timeout: DEFAULT_IO_TIMEOUT,
        }
    }
}

#[derive(Debug, Error)]
pub enum HttpServeError {
    #[error("bind failed: {0}")]
    Bind(std::io::Error),
    #[error("accept failed: {0}")]
    Accept(std::io::Error),
}

#[derive(Debug, Clone, PartialEq)]
struct HttpResponse {
    status: u16,
    body: Value,
}

#[derive(Debug, Clone, PartialEq)]
enum Route {
    Healthz,
    Index,
    Config,
    Assess(AssessQuery),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
enum RouteError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
}

const AGE_PARAM: &str = "AGE";

/// Serve until the listener fails. Connections are handled on scoped
/// threads that all borrow the same service.
pub fn serve_screening_api(
    config: HttpServerConfig,
    service: &ScreeningService,
) -> Result<(), HttpServeError> {
    let listener = TcpListener::bind(config.bind).map_err(HttpServeError::Bind)?;
    tracing::info!(bind = %config.bind, digest = service.digest(), "screening api listening");
    serve_listener(listener, service, None, config.io_timeout)
}

fn serve_listener(
    listener: TcpListener,
    service: &ScreeningService,
    max_requests: Option<usize>,
    io_timeout: Duration,
) -> Result<(), HttpServeError> {
    thread::scope(|scope| {
        let mut served = 0usize;
        for stream in listener.incoming() {
            match stream {
                Ok(mut stream) => {
                    if let Err(err) = stream
                        .set_read_timeout(Some(io_timeout))
                        .and_then(|()| stream.set_write_timeout(Some(io_timeout)))
                    {
                        tracing::warn!(error = %err, "failed to set connection timeout");
                        continue;
                    }
                    scope.spawn(move || {
                        if let Err(err) = handle_connection(&mut stream, service) {
                            tracing::warn!(error = %err, "request failed");
                            let _ = write_json_response(
                                &mut stream,
                                HttpResponse {
                                    status: 500,
                                    body: json!({ "error": format!("internal server error: {err}") }),
                                },
                            );
                        }
                    });
                    served += 1;
                }
                Err(err) => return Err(HttpServeError::Accept(err)),
            }

            if let Some(limit) = max_requests
                && served >= limit
            {
                break;
            }
        }
        Ok(())
    })
}

fn handle_connection(stream: &mut TcpStream, service: &ScreeningService) -> Result<(), String> {
    let response = match read_request_line(stream) {
        Ok((method, target)) => {
            let response = respond(service, &method, &target);
            tracing::info!(%method, %target, status = response.status, "request served");
            response
        }
        Err(err) => error_response(400, err.to_string()),
    };
    write_json_response(stream, response).map_err(|e| e.to_string())
}

fn respond(service: &ScreeningService, method: &str, target: &str) -> HttpResponse {
    if method != "GET" {
        return error_response(405, "method not allowed; use GET");
    }
    match parse_route_target(target) {
        Ok(route) => execute_route(service, route),
        Err(RouteError::BadRequest(msg)) => error_response(400, msg),
        Err(RouteError::NotFound(msg)) => error_response(404, msg),
    }
}

fn read_request_line(stream: &mut TcpStream) -> Result<(String, String), RouteError> {
    let mut buf = [0u8; 8192];
    let n = stream
        .read(&mut buf)
        .map_err(|e| RouteError::BadRequest(format!("failed to read request: {e}")))?;
    if n == 0 {
        return Err(RouteError::BadRequest("empty request".to_string()));
    }
    let req = String::from_utf8_lossy(&buf[..n]);
    let line = req
        .lines()
        .next()
        .ok_or_else(|| RouteError::BadRequest("missing request line".to_string()))?;
    parse_request_line(line)
}

fn parse_request_line(line: &str) -> Result<(String, String), RouteError> {
    let mut parts = line.split_whitespace();
    let method = parts
        .next()
        .ok_or_else(|| RouteError::BadRequest("missing method".to_string()))?;
    let target = parts
        .next()
        .ok_or_else(|| RouteError::BadRequest("missing target".to_string()))?;
    Ok((method.to_string(), target.to_string()))
}

fn parse_route_target(target: &str) -> Result<Route, RouteError> {
    let (path, query) = split_target(target);

    match path {
        "/" => Ok(Route::Index),
        "/healthz" => Ok(Route::Healthz),
        "/config" => Ok(Route::Config),
        "/assess" => parse_assess_query(parse_query_params(query)).map(Route::Assess),
        _ => Err(RouteError::NotFound(format!("unknown route: {path}"))),
    }
}

/// `AGE` is required; every other parameter is an indicator flag. Keys are
/// matched the way dataset columns are, so `yellow fingers` works too.
fn parse_assess_query(params: BTreeMap<String, String>) -> Result<AssessQuery, RouteError> {
    let mut age = None;
    let mut flags = Flags::new();
    for (key, value) in params {
        let key = normalize_column(&key);
        let value = value.trim();
        if key == AGE_PARAM {
            let parsed = value.parse::<f64>().ok().filter(|v| v.is_finite());
            age = Some(parsed.ok_or_else(|| {
                RouteError::BadRequest(format!("AGE must be a finite number, got `{value}`"))
            })?);
        } else {
            let flag = value.parse::<i64>().map_err(|_| {
                RouteError::BadRequest(format!("{key} must be 0 or 1, got `{value}`"))
            })?;
            flags.insert(key, flag);
        }
    }
    let age = age.ok_or_else(|| {
        RouteError::BadRequest("missing AGE (use /assess?AGE=<years>&COUGHING=1...)".to_string())
    })?;
    Ok(AssessQuery { age, flags })
}

fn split_target(target: &str) -> (&str, &str) {
    match target.split_once('?') {
        Some((path, query)) => (path, query),
        None => (target, ""),
    }
}

fn parse_query_params(query: &str) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (k, v) = match pair.split_once('=') {
            Some((k, v)) => (k, v),
            None => (pair, ""),
        };
        let key = percent_decode(k);
        if key.is_empty() {
            continue;
        }
        out.insert(key, percent_decode(v));
    }
    out
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                if let (Some(h), Some(l)) = (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
                    out.push(h * 16 + l);
                    i += 3;
                } else {
                    out.push(b'%');
                    i += 1;
                }
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_val(ch: u8) -> Option<u8> {
    match ch {
        b'0'..=b'9' => Some(ch - b'0'),
        b'a'..=b'f' => Some(ch - b'a' + 10),
        b'A'..=b'F' => Some(ch - b'A' + 10),
        _ => None,
    }
}

fn execute_route(service: &ScreeningService, route: Route) -> HttpResponse {
    match route {
        Route::Healthz => HttpResponse {
            status: 200,
            body: json!({ "ok": true }),
        },
        Route::Index => HttpResponse {
            status: 200,
            body: json!({
                "service": "fuzzdx.screen.v1",
                "routes": [
                    "/healthz",
                    "/config",
                    "/assess?AGE=<years>&<INDICATOR>=0|1..."
                ]
            }),
        },
        Route::Config => match service.config_json() {
            Ok(body) => HttpResponse { status: 200, body },
            Err(err) => query_error_response(err),
        },
        Route::Assess(query) => match service.assess_json(&query) {
            Ok(body) => HttpResponse { status: 200, body },
            Err(err) => query_error_response(err),
        },
    }
}

fn query_error_response(err: AssessQueryError) -> HttpResponse {
    match err {
        AssessQueryError::Invalid(msg) => error_response(400, msg),
        AssessQueryError::Indeterminate(msg) => HttpResponse {
            status: 422,
            body: json!({ "error": msg, "indeterminate": true }),
        },
        AssessQueryError::Engine(msg) | AssessQueryError::Serialization(msg) => {
            error_response(500, msg)
        }
    }
}

fn error_response(status: u16, message: impl Into<String>) -> HttpResponse {
    HttpResponse {
        status,
        body: json!({ "error": message.into() }),
    }
}

fn write_json_response(stream: &mut TcpStream, response: HttpResponse) -> std::io::Result<()> {
    let body = serde_json::to_vec_pretty(&response.body)?;
    let status_text = reason_phrase(response.status);
    let header = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nAccess-Control-Allow-Origin: *\r\nAccess-Control-Allow-Methods: GET\r\nConnection: close\r\n\r\n",
        response.status,
        status_text,
        body.len()
    );
    stream.write_all(header.as_bytes())?;
    stream.write_all(&body)?;
    stream.flush()
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
