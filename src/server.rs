//! HTTP delivery of rendered pages.
//!
//! One request at a time: each GET loads the page's dataset, composes the
//! document and answers with HTML. Routing is a pure function
//! ([`respond`]) so it can be exercised without a socket.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::HtmlRenderer;
use crate::page::{Document, Page, Selection};
use std::net::SocketAddr;
use std::time::Instant;
use tiny_http::{Header, Method, Request, Response};
use tracing::{debug, info, warn};

const HTML: &str = "text/html; charset=utf-8";

/// A response ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header value.
    pub content_type: &'static str,
    /// Response body.
    pub body: String,
}

impl Reply {
    fn html(status: u16, body: String) -> Self {
        Self { status, content_type: HTML, body }
    }
}

/// Answer one request.
///
/// | Outcome | Status |
/// |---------|--------|
/// | page rendered | 200 |
/// | malformed selector query | 400 |
/// | unknown path | 404 |
/// | method other than GET/HEAD | 405 |
/// | load or render failure | 500 |
#[must_use]
pub fn respond(config: &Config, method: &Method, url: &str) -> Reply {
    if !matches!(method, Method::Get | Method::Head) {
        return Reply { status: 405, content_type: "text/plain; charset=utf-8", body: "Method Not Allowed".into() };
    }

    let (path, query) = split_url(url);
    let page = match Page::from_route(&path) {
        Ok(page) => page,
        Err(e) => {
            debug!(path = %path, "no such page");
            return Reply::html(404, HtmlRenderer::new().error_page("Page not found", &e.to_string()));
        }
    };

    let renderer = HtmlRenderer::new().current(page).download_links(config.render.download_links);
    let selection = match Selection::from_query(query.as_deref().unwrap_or("")) {
        Ok(selection) => selection,
        Err(e) => return Reply::html(400, renderer.error_page("Bad request", &e.to_string())),
    };

    document_reply(&renderer, page, page.render(&config.page_context(selection)))
}

/// 200 with the rendered page, or 500 when composing or rendering it failed.
fn document_reply(renderer: &HtmlRenderer, page: Page, doc: Result<Document>) -> Reply {
    match doc.and_then(|doc| renderer.render(&doc)) {
        Ok(html) => Reply::html(200, html),
        Err(e) => {
            warn!(page = page.slug(), error = %e, "page render failed");
            Reply::html(500, renderer.error_page(page.title(), &e.to_string()))
        }
    }
}

/// Path and raw query of a request target.
fn split_url(target: &str) -> (String, Option<String>) {
    match url::Url::parse("http://localhost").and_then(|base| base.join(target)) {
        Ok(parsed) => (parsed.path().to_string(), parsed.query().map(str::to_string)),
        Err(_) => (target.to_string(), None),
    }
}

/// Blocking page server.
pub struct Server {
    config: Config,
    http: tiny_http::Server,
}

impl Server {
    /// Bind the configured address.
    ///
    /// # Errors
    ///
    /// [`Error::Server`] when the address cannot be bound.
    pub fn bind(config: Config) -> Result<Self> {
        let http = tiny_http::Server::http(config.server.addr.as_str())
            .map_err(|e| Error::Server(format!("cannot bind {}: {e}", config.server.addr)))?;
        Ok(Self { config, http })
    }

    /// Bound socket address (useful with port 0).
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.http.server_addr().to_ip()
    }

    /// Serve requests until the listener closes.
    pub fn run(&self) {
        info!(addr = ?self.local_addr(), "serving dashboard");
        for request in self.http.incoming_requests() {
            self.handle(request);
        }
    }

    /// Serve exactly one request; returns `false` once the listener is closed.
    pub fn handle_next(&self) -> bool {
        match self.http.recv() {
            Ok(request) => {
                self.handle(request);
                true
            }
            Err(e) => {
                warn!(error = %e, "listener closed");
                false
            }
        }
    }

    fn handle(&self, request: Request) {
        let started = Instant::now();
        let method = request.method().clone();
        let url = request.url().to_string();
        let reply = respond(&self.config, &method, &url);

        info!(
            method = %method,
            url = %url,
            status = reply.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request"
        );

        let mut response = Response::from_string(reply.body).with_status_code(reply.status);
        if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes()) {
            response = response.with_header(header);
        }
        if let Err(e) = request.respond(response) {
            warn!(error = %e, "failed to send response");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartSpec;
    use crate::dataset::{Column, Table};
    use crate::page::Block;
    use std::io::{Read, Write};
    use std::net::TcpStream;
    use std::path::Path;

    const CLEANED: &str = "\
,kidsdriv,age,yoj,income,gender,car_use,clm_amt,clm_freq,car_type,education,mstatus
0,0,25,4,30000,M,Private,1000,2,SUV,PhD,Yes
1,0,35,7,50000,F,Commercial,0,0,Minivan,Bachelors,No
2,1,45,12,80000,F,Private,500,1,SUV,Masters,Yes
3,0,55,18,60000,M,Commercial,0,0,Pickup,PhD,No
";

    const RAW: &str = "ID,KIDSDRIV,AGE\n1,0,60\n2,1,43\n";

    fn config(dir: &Path) -> Config {
        let cleaned = dir.join("cleaned_df.csv");
        let raw = dir.join("car_insurance_claim.csv");
        std::fs::write(&cleaned, CLEANED).unwrap();
        std::fs::write(&raw, RAW).unwrap();
        let mut config = Config::new();
        config.data.cleaned = cleaned;
        config.data.raw = raw;
        config
    }

    #[test]
    fn test_split_url() {
        assert_eq!(split_url("/univariate?mode=Categorical"), ("/univariate".into(), Some("mode=Categorical".into())));
        assert_eq!(split_url("/"), ("/".into(), None));
    }

    #[test]
    fn test_every_page_renders() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        for page in Page::ALL {
            let reply = respond(&config, &Method::Get, page.route());
            assert_eq!(reply.status, 200, "{page}: {}", reply.body);
            assert_eq!(reply.content_type, HTML);
            assert!(reply.body.contains("<!DOCTYPE html>"));
        }
    }

    #[test]
    fn test_selector_query() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let reply = respond(&config, &Method::Get, "/univariate?mode=Categorical&column=car_type");
        assert_eq!(reply.status, 200);
        assert!(reply.body.contains("Distribution of car_type"));

        let bad = respond(&config, &Method::Get, "/univariate?mode=Bivariate");
        assert_eq!(bad.status, 400);
    }

    #[test]
    fn test_unknown_page_and_method() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        assert_eq!(respond(&config, &Method::Get, "/nope").status, 404);
        assert_eq!(respond(&config, &Method::Post, "/").status, 405);
    }

    #[test]
    fn test_render_failure_is_500() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path());
        config.data.cleaned = dir.path().join("missing.csv");
        let reply = respond(&config, &Method::Get, "/");
        assert_eq!(reply.status, 500);
        assert!(reply.body.contains("I/O error"));
    }

    #[test]
    fn test_broken_chart_is_500() {
        let table = Table::from_columns(vec![Column::numeric("age", vec![25.0, 35.0])]).unwrap();
        let mut doc = Document::new("Univariate Analysis");
        doc.push(Block::chart(ChartSpec::histogram(table, "no_such_column")));
        doc.push(Block::text("after the chart"));

        let renderer = HtmlRenderer::new().current(Page::Univariate);
        let reply = document_reply(&renderer, Page::Univariate, Ok(doc));
        assert_eq!(reply.status, 500);
        assert!(reply.body.contains("no_such_column"));
        assert!(!reply.body.contains("after the chart"));
    }

    #[test]
    fn test_serves_over_tcp() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path());
        config.server.addr = "127.0.0.1:0".into();
        let server = Server::bind(config).unwrap();
        let addr = server.local_addr().unwrap();

        let client = std::thread::spawn(move || {
            let mut stream = TcpStream::connect(addr).unwrap();
            stream.write_all(b"GET /nope HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n").unwrap();
            let mut response = String::new();
            stream.read_to_string(&mut response).unwrap();
            response
        });

        assert!(server.handle_next());
        let response = client.join().unwrap();
        assert!(response.starts_with("HTTP/1.1 404"));
        assert!(response.contains("text/html; charset=utf-8"));
    }
}
