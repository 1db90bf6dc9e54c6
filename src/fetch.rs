//! Bounded page fetching and response validation.
//!
//! One outbound GET per scrape, nothing else: a hard 10 second deadline
//! (reqwest aborts the in-flight request when it fires, so a slow host
//! cannot leak sockets), an identifying user-agent, redirects followed.
//! The response is validated before any markup scanning happens —
//! status first, then content type — and the body is transcoded to
//! UTF-8 honoring the header charset over in-document declarations.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::debug;
use url::Url;

use crate::encoding::transcode_to_utf8;
use crate::error::{Result, ScrapeError};
use crate::url_utils::is_absolute_url;

/// Hard deadline for one page fetch, connection through body.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Identifying user-agent sent with every request.
const USER_AGENT: &str =
    "Mozilla/5.0 (compatible; vidscrape/0.1; +https://github.com/Murrough-Foley/vidscrape)";

/// Accept header preferring HTML.
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml;q=0.9,*/*;q=0.1";

/// Content types we are willing to scan.
const HTML_CONTENT_TYPES: [&str; 2] = ["text/html", "application/xhtml+xml"];

/// A fetched, validated page.
#[derive(Debug)]
pub(crate) struct FetchedPage {
    /// Final URL after redirects; the resolution base for every collector.
    pub final_url: Url,

    /// Response body as UTF-8 text.
    pub body: String,
}

/// Fetch and validate a product page.
///
/// Fails with `InvalidUrl` before any network activity if the input is
/// not an absolute http(s) URL; with `Timeout`/`FetchFailure` on
/// transport problems; with `HttpError` on a non-success status; with
/// `UnsupportedContentType` when the response is not an HTML document.
pub(crate) async fn fetch_page(url: &str) -> Result<FetchedPage> {
    let (_, parsed) = is_absolute_url(url);
    let Some(page_url) = parsed else {
        return Err(ScrapeError::InvalidUrl(url.trim().to_string()));
    };

    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|err| ScrapeError::FetchFailure {
            url: page_url.to_string(),
            message: err.to_string(),
        })?;

    debug!(url = %page_url, "fetching product page");

    let response = client
        .get(page_url.clone())
        .header(ACCEPT, ACCEPT_HTML)
        .send()
        .await
        .map_err(|err| classify_transport_error(&page_url, &err))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::HttpError(status.as_u16()));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_lowercase();

    let media_type = content_type.split(';').next().unwrap_or_default().trim();
    if !HTML_CONTENT_TYPES.contains(&media_type) {
        let shown = if media_type.is_empty() { "none" } else { media_type };
        return Err(ScrapeError::UnsupportedContentType(shown.to_string()));
    }

    let header_charset = charset_param(&content_type);
    let final_url = response.url().clone();

    let bytes = response
        .bytes()
        .await
        .map_err(|err| classify_transport_error(&final_url, &err))?;

    debug!(url = %final_url, bytes = bytes.len(), "fetched page body");

    Ok(FetchedPage {
        final_url,
        body: transcode_to_utf8(&bytes, header_charset.as_deref()),
    })
}

/// Map a reqwest error onto the scrape taxonomy.
fn classify_transport_error(url: &Url, error: &reqwest::Error) -> ScrapeError {
    if error.is_timeout() {
        ScrapeError::Timeout(url.to_string())
    } else {
        ScrapeError::FetchFailure {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

/// Extract the charset parameter from a Content-Type value, if any.
fn charset_param(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        param
            .trim()
            .strip_prefix("charset=")
            .map(|charset| charset.trim_matches('"').to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_relative_and_garbage_urls() {
        for input in ["/relative/path", "not a url", "", "ftp://example.com/x"] {
            match fetch_page(input).await {
                Err(ScrapeError::InvalidUrl(_)) => {}
                other => panic!("expected InvalidUrl for {input:?}, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn accepts_html_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/p")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body("<title>ok</title>")
            .create_async()
            .await;

        let page = match fetch_page(&format!("{}/p", server.url())).await {
            Ok(page) => page,
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        };

        assert!(page.body.contains("<title>ok</title>"));
        assert!(page.final_url.as_str().ends_with("/p"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_maps_to_http_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing")
            .with_status(404)
            .with_header("content-type", "text/html")
            .create_async()
            .await;

        match fetch_page(&format!("{}/missing", server.url())).await {
            Err(ScrapeError::HttpError(404)) => {}
            other => panic!("expected HttpError(404), got {other:?}"),
        }
    }

    #[tokio::test]
    async fn json_content_type_is_rejected_before_scanning() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"not":"html"}"#)
            .create_async()
            .await;

        match fetch_page(&format!("{}/api", server.url())).await {
            Err(ScrapeError::UnsupportedContentType(kind)) => {
                assert_eq!(kind, "application/json");
            }
            other => panic!("expected UnsupportedContentType, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_content_type_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/untyped")
            .with_status(200)
            .with_body("<html></html>")
            .create_async()
            .await;

        match fetch_page(&format!("{}/untyped", server.url())).await {
            Err(ScrapeError::UnsupportedContentType(_)) => {}
            other => panic!("expected UnsupportedContentType, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn xhtml_content_type_is_accepted() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/x")
            .with_status(200)
            .with_header("content-type", "application/xhtml+xml")
            .with_body("<html/>")
            .create_async()
            .await;

        assert!(fetch_page(&format!("{}/x", server.url())).await.is_ok());
    }

    #[test]
    fn charset_param_parsing() {
        assert_eq!(
            charset_param("text/html; charset=iso-8859-1"),
            Some("iso-8859-1".to_string())
        );
        assert_eq!(
            charset_param("text/html; charset=\"utf-8\""),
            Some("utf-8".to_string())
        );
        assert_eq!(charset_param("text/html"), None);
    }
}
