//! HTTP server for the precomputed dashboard page.

use axum::body::Bytes;
use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

/// Single-route router; every request gets the same page.
pub fn router(page: Bytes) -> Router {
    Router::new().route("/", get(index)).with_state(page)
}

/// Serve the page until the listener fails.
pub async fn serve(listener: TcpListener, page: impl Into<Bytes>) -> std::io::Result<()> {
    let app = router(page.into());
    axum::serve(listener, app).await
}

async fn index(State(page): State<Bytes>) -> Html<Bytes> {
    Html(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    const PAGE: &str = "<!DOCTYPE html><html><body><svg></svg></body></html>";

    async fn request(path: &str) -> String {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve(listener, PAGE));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        let req = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
        stream.write_all(req.as_bytes()).await.unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn index_handler_returns_html() {
        let response = index(State(Bytes::from_static(PAGE.as_bytes())))
            .await
            .into_response();

        assert_eq!(response.status(), axum::http::StatusCode::OK);
        let content_type = response.headers()["content-type"].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
    }

    #[tokio::test]
    async fn serves_page_on_root() {
        let response = request("/").await;

        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.to_ascii_lowercase().contains("content-type: text/html"));
        assert!(response.ends_with(PAGE));
    }

    #[tokio::test]
    async fn other_paths_are_not_found() {
        let response = request("/_dash-layout").await;
        assert!(response.starts_with("HTTP/1.1 404"));
    }
}
