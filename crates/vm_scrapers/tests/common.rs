// Shared helpers for the integration tests: a local axum server standing in
// for the outlets, and a config whose endpoints all point at it.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use vm_core::{ArticleReference, ScraperConfig};
use vm_scrapers::ScraperManager;
use vm_storage::MemoryStorage;

pub const EL_TIEMPO: &str = "/eltiempo";
pub const VIAFOURA: &str = "/viafoura";
pub const EL_ESPECTADOR: &str = "/elespectador";
pub const VANGUARDIA: &str = "/vanguardia";
pub const GDELT: &str = "/gdelt";

pub const VIAFOURA_SECTION: &str = "00000000-0000-4000-8000-9c5d48314ca1";

/// Serves `router` on an ephemeral port and returns its base URL.
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Base URL of a port nothing listens on.
pub async fn unreachable_base() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn config_for(base: &str) -> ScraperConfig {
    let mut config = ScraperConfig {
        timeout_secs: 2,
        ..ScraperConfig::default()
    };
    config.endpoints.el_tiempo = format!("{}{}", base, EL_TIEMPO);
    config.endpoints.el_tiempo_comments = format!("{}{}", base, VIAFOURA);
    config.endpoints.el_espectador = format!("{}{}", base, EL_ESPECTADOR);
    config.endpoints.vanguardia = format!("{}{}", base, VANGUARDIA);
    config.endpoints.gdelt = format!("{}{}", base, GDELT);
    config
}

pub fn manager_for(base: &str) -> ScraperManager {
    ScraperManager::new(Arc::new(MemoryStorage::new()), config_for(base)).unwrap()
}

pub fn reference(base: &str, path: &str, domain: &str) -> ArticleReference {
    ArticleReference::new(format!("{}{}", base, path), "Nota de prueba", "2024-07-19", domain)
}

pub const SHORT_TIMEOUT: Duration = Duration::from_millis(300);

pub fn el_tiempo_page(paragraphs: &[&str], article_number: &str, tags: &str) -> String {
    let body: String = paragraphs
        .iter()
        .map(|p| format!(r#"<div class="paragraph">{}</div>"#, p))
        .collect();
    format!(
        r#"<html><head>
        <script type="application/ld+json">{{"@id":"https://www.eltiempo.com/mundo/venezuela/nota#article-{}","@type":"NewsArticle"}}</script>
        </head><body>
        <script>let tagsArticle = '{}';</script>
        {}
        </body></html>"#,
        article_number, tags, body
    )
}

pub fn el_espectador_page(body: &str, id: &str) -> String {
    format!(
        r#"<html><head>
        <script type="application/ld+json">{{"@type":"WebSite","name":"El Espectador"}}</script>
        <script type="application/ld+json">{{"@type":"NewsArticle","articleBody":"{}"}}</script>
        </head><body>
        <script>window.Fusion={{"globalContent":{{"_id":"{}","type":"story"}}}};</script>
        </body></html>"#,
        body, id
    )
}

pub fn vanguardia_page(body: &str) -> String {
    format!(
        r#"<html><head><script type="application/ld+json">{{"@type":"NewsArticle","articleBody":"{}"}}</script></head><body></body></html>"#,
        body
    )
}
