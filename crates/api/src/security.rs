use axum::{
    extract::Request,
    http::{header, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

/// Headers that keep balances out of browser and proxy caches
pub const NO_CACHE_HEADERS: [(HeaderName, &str); 3] = [
    (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate"),
    (header::PRAGMA, "no-cache"),
    (header::EXPIRES, "0"),
];

/// Security headers middleware
pub async fn security_headers_middleware(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;

    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::X_FRAME_OPTIONS,
        HeaderValue::from_static("DENY"),
    );
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=15552000; includeSubDomains"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("no-referrer"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(
            "default-src 'self'; img-src 'self' data:; style-src 'self' 'unsafe-inline'; object-src 'none'; frame-ancestors 'none'",
        ),
    );

    response
}

pub const BALANCE_PATH_PREFIX: &str = "/api/balance/";

/// Marks every balance response non-cacheable, including rejections from
/// layers that run before the handler
pub async fn balance_no_cache_middleware(req: Request, next: Next) -> Response {
    let is_balance = req.uri().path().starts_with(BALANCE_PATH_PREFIX);
    let mut response = next.run(req).await;

    if is_balance {
        let headers = response.headers_mut();
        for (name, value) in NO_CACHE_HEADERS {
            headers.insert(name, HeaderValue::from_static(value));
        }
    }

    response
}
