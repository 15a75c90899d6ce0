//! Read-only HTTP dashboard over the service registry

use crate::notifier::format_timestamp;
use crate::registry::{RegistrySnapshot, ServiceRegistry};
use crate::service::Service;
use actix_web::dev::Server;
use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt::Write;
use std::sync::Arc;
use tracing::info;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

#[derive(Serialize)]
struct ServicesResponse<'a> {
    updated: Option<DateTime<Local>>,
    services: &'a [Service],
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/api/services", web::get().to(list_services))
        .route("/health", web::get().to(health_check));
}

/// Bind the dashboard on all interfaces. The returned server must be awaited.
pub fn bind(registry: Arc<ServiceRegistry>, port: u16) -> std::io::Result<Server> {
    let data = web::Data::new(registry);

    let server = HttpServer::new(move || App::new().app_data(data.clone()).configure(routes))
        .bind(("0.0.0.0", port))?
        .run();

    info!("Dashboard listening on 0.0.0.0:{}", port);
    Ok(server)
}

async fn index(registry: web::Data<Arc<ServiceRegistry>>) -> impl Responder {
    let snapshot = registry.snapshot().await;

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(render_page(&snapshot))
}

async fn list_services(registry: web::Data<Arc<ServiceRegistry>>) -> impl Responder {
    let snapshot = registry.snapshot().await;

    HttpResponse::Ok().json(ServicesResponse {
        updated: snapshot.last_check,
        services: &snapshot.services,
    })
}

async fn health_check() -> impl Responder {
    web::Json(HealthResponse {
        status: "OK".into(),
    })
}

pub fn render_page(snapshot: &RegistrySnapshot) -> String {
    let updated = snapshot
        .last_check
        .as_ref()
        .map(format_timestamp)
        .unwrap_or_else(|| "never".to_string());

    let mut rows = String::new();
    for service in &snapshot.services {
        let _ = writeln!(
            rows,
            "<tr class=\"{status}\"><td>{name}</td><td><a href=\"{url}\">{url}</a></td><td>{status}</td></tr>",
            name = escape_html(&service.name),
            url = escape_html(&service.url),
            status = service.status,
        );
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Web Monitor</title>\n\
         <style>\n\
         body {{ font-family: sans-serif; margin: 2em; }}\n\
         table {{ border-collapse: collapse; }}\n\
         td, th {{ padding: 0.4em 1em; border-bottom: 1px solid #ddd; text-align: left; }}\n\
         tr.up td:last-child {{ color: #2e7d32; }}\n\
         tr.down td:last-child {{ color: #c62828; }}\n\
         tr.unknown td:last-child {{ color: #777; }}\n\
         </style>\n</head>\n<body>\n<h1>Web Monitor</h1>\n\
         <table>\n<tr><th>Service</th><th>URL</th><th>Status</th></tr>\n{rows}</table>\n\
         <p>Last updated: {updated}</p>\n</body>\n</html>\n",
        rows = rows,
        updated = escape_html(&updated),
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
