//! Embedded web server for founders-truth.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - The server-rendered single page (form or result view)
//! - Form endpoints driving the view controller (`/evaluate`, `/reset`)
//! - JSON API endpoints (`/api/evaluate`, `/api/health`)
//!
//! Launched via `founders-truth serve` (default: `http://127.0.0.1:9747`).

mod api;

use std::io::Cursor;

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::analytics::logger::EventLog;
use crate::evaluation::StartupInput;
use crate::llm::{Evaluator, run_evaluation};
use crate::render::render_page;
use crate::view::ViewController;

// ---------------------------------------------------------------------------
// Server state
// ---------------------------------------------------------------------------

/// Everything a request handler can touch.
///
/// Owned by the server loop; requests are handled one at a time, so the view
/// controller needs no locking.
pub struct AppContext {
    pub evaluator: Box<dyn Evaluator + Send>,
    pub log: EventLog,
    pub view: ViewController,
    /// Whether the evaluator has a credential, reported by `/api/health`.
    pub api_key_configured: bool,
}

impl AppContext {
    pub fn new(evaluator: Box<dyn Evaluator + Send>, log: EventLog, api_key_configured: bool) -> Self {
        Self {
            evaluator,
            log,
            view: ViewController::new(),
            api_key_configured,
        }
    }
}

/// A handler's answer, converted to a `tiny_http` response at the edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub location: Option<&'static str>,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn html(body: String) -> Self {
        Self {
            status: 200,
            content_type: Some(CONTENT_TYPE_HTML),
            location: None,
            body: body.into_bytes(),
        }
    }

    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self {
            status,
            content_type: Some(CONTENT_TYPE_JSON),
            location: None,
            body: value.to_string().into_bytes(),
        }
    }

    /// `303 See Other`, so a refresh after a POST does not resubmit.
    pub fn see_other(location: &'static str) -> Self {
        Self {
            status: 303,
            content_type: None,
            location: Some(location),
            body: Vec::new(),
        }
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    fn into_response(self) -> Response<Cursor<Vec<u8>>> {
        let mut resp = Response::from_data(self.body).with_status_code(StatusCode(self.status));
        if let Some(content_type) = self.content_type {
            resp = resp.with_header(header("Content-Type", content_type));
        }
        if let Some(location) = self.location {
            resp = resp.with_header(header("Location", location));
        }
        resp
    }
}

const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";
const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";

fn header(name: &str, value: &str) -> Header {
    Header::from_bytes(name, value).expect("static header names and values are valid")
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Bind the HTTP listener.
pub fn bind(addr: &str) -> Result<Server> {
    Server::http(addr).map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))
}

/// Start the server on `addr` and block forever.
pub fn serve(addr: &str, ctx: AppContext, open: bool) -> Result<()> {
    let server = bind(addr)?;

    println!("founders-truth running at http://{addr}");
    println!("Press Ctrl+C to stop.\n");

    if open {
        let _ = open_browser(&format!("http://{addr}"));
    }

    run(&server, ctx);
    Ok(())
}

/// Handle requests sequentially until the listener closes.
///
/// Errors are handled per request without stopping the loop.
pub fn run(server: &Server, mut ctx: AppContext) {
    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let body = if matches!(method, Method::Post | Method::Put) {
            let mut buf = String::new();
            let _ = request.as_reader().read_to_string(&mut buf);
            Some(buf)
        } else {
            None
        };

        let reply = dispatch(&mut ctx, &method, &url, body.as_deref()).unwrap_or_else(|e| {
            eprintln!("{method} {url} failed: {e:#}");
            Reply::json(500, &serde_json::json!({ "error": e.to_string() }))
        });
        let status = reply.status;

        let _ = request.respond(reply.into_response());

        println!(
            "{} {} {} {}",
            chrono::Local::now().format("%H:%M:%S"),
            method,
            url,
            status
        );
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch a request to its handler.
pub fn dispatch(ctx: &mut AppContext, method: &Method, url: &str, body: Option<&str>) -> Result<Reply> {
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        (&Method::Get, "/") | (&Method::Get, "/index.html") => Ok(Reply::html(render_page(&ctx.view))),
        (&Method::Post, "/evaluate") => post_evaluate(ctx, body.unwrap_or("")),
        (&Method::Post, "/reset") => {
            ctx.view.reset();
            Ok(Reply::see_other("/"))
        }

        (&Method::Post, "/api/evaluate") => api::post_evaluate(ctx, body.unwrap_or("")),
        (&Method::Get, "/api/health") => Ok(api::get_health(ctx)),

        _ => Ok(Reply::json(404, &serde_json::json!({ "error": "not found" }))),
    }
}

/// `POST /evaluate` — form submission driving the view controller.
///
/// Rejections (blank field, evaluation in flight) are recorded on the
/// controller and shown on the next render; the reply is always a redirect.
fn post_evaluate(ctx: &mut AppContext, body: &str) -> Result<Reply> {
    let input = decode_form(body)?;
    let AppContext {
        evaluator, log, view, ..
    } = ctx;

    if let Err(rejection) = view.run(input, |input| run_evaluation(&**evaluator, input, log)) {
        eprintln!("submission rejected: {rejection}");
    }

    Ok(Reply::see_other("/"))
}

/// Decode an `application/x-www-form-urlencoded` body.
pub fn decode_form(body: &str) -> Result<StartupInput> {
    serde_qs::from_str(body.trim()).context("invalid form submission")
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
