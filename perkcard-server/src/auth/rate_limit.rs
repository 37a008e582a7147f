//! Per-client rate limits on code issuance and confirmation
//!
//! Clients are keyed by the TCP peer address. `X-Forwarded-For` is consulted
//! only when the peer is a configured trusted proxy; the client is then the
//! right-most entry that is not itself a trusted proxy.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::error::{AppError, ErrorCode};
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::state::AppState;

const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitedRoute {
    Issue,
    Confirm,
}

struct Window {
    hits: u32,
    opened: Instant,
}

#[derive(Clone)]
pub struct RateLimiter {
    window: Duration,
    trusted_proxies: Arc<[IpAddr]>,
    windows: Arc<Mutex<HashMap<(LimitedRoute, IpAddr), Window>>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW, Vec::new())
    }
}

impl RateLimiter {
    pub fn new(window: Duration, trusted_proxies: Vec<IpAddr>) -> Self {
        Self {
            window,
            trusted_proxies: trusted_proxies.into(),
            windows: Arc::default(),
        }
    }

    /// Count one hit; `false` once `client` has used up `max` in the current window
    pub async fn allow(&self, route: LimitedRoute, client: IpAddr, max: u32) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        let window = windows.entry((route, client)).or_insert(Window {
            hits: 0,
            opened: now,
        });

        if now.duration_since(window.opened) >= self.window {
            window.hits = 0;
            window.opened = now;
        }

        window.hits = window.hits.saturating_add(1);
        window.hits <= max
    }

    /// Drop windows that have already closed
    pub async fn cleanup(&self) {
        let now = Instant::now();
        self.windows
            .lock()
            .await
            .retain(|_, w| now.duration_since(w.opened) < self.window);
    }

    fn is_trusted(&self, ip: &IpAddr) -> bool {
        self.trusted_proxies.contains(ip)
    }

    /// Address a request is counted against
    pub fn client_ip(&self, request: &Request) -> IpAddr {
        // In-process callers without a socket share one bucket
        let Some(peer) = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ci| ci.0.ip())
        else {
            return IpAddr::V4(Ipv4Addr::UNSPECIFIED);
        };
        if !self.is_trusted(&peer) {
            return peer;
        }

        let hops: Vec<&str> = request
            .headers()
            .get_all("x-forwarded-for")
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .collect();

        for hop in hops.into_iter().rev() {
            match hop.trim().parse::<IpAddr>() {
                Ok(ip) if self.is_trusted(&ip) => continue,
                Ok(ip) => return ip,
                Err(_) => break,
            }
        }
        peer
    }
}

fn too_many_requests() -> Response {
    AppError::new(ErrorCode::TooManyRequests).into_response()
}

async fn enforce(
    state: &AppState,
    route: LimitedRoute,
    max: u32,
    request: Request,
    next: Next,
) -> Response {
    let client = state.rate_limiter.client_ip(&request);
    if !state.rate_limiter.allow(route, client, max).await {
        tracing::warn!(client = %client, ?route, "Rate limit hit");
        return too_many_requests();
    }
    next.run(request).await
}

/// Limit on code issuance (`ISSUE_RATE_LIMIT` per client per window)
pub async fn issue_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let max = state.issue_rate_limit;
    enforce(&state, LimitedRoute::Issue, max, request, next).await
}

/// Limit on code confirmation (`CONFIRM_RATE_LIMIT` per client per window)
pub async fn confirm_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let max = state.confirm_rate_limit;
    enforce(&state, LimitedRoute::Confirm, max, request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    fn request(peer: Option<&str>, forwarded: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/redeem/new");
        if let Some(xff) = forwarded {
            builder = builder.header("x-forwarded-for", xff);
        }
        let mut request = builder.body(Body::empty()).unwrap();
        if let Some(peer) = peer {
            let addr = SocketAddr::new(ip(peer), 40_000);
            request.extensions_mut().insert(ConnectInfo(addr));
        }
        request
    }

    #[tokio::test]
    async fn test_limit_per_route_and_client() {
        let limiter = RateLimiter::default();
        let a = ip("203.0.113.1");
        for _ in 0..3 {
            assert!(limiter.allow(LimitedRoute::Issue, a, 3).await);
        }
        assert!(!limiter.allow(LimitedRoute::Issue, a, 3).await);
        assert!(limiter.allow(LimitedRoute::Issue, ip("203.0.113.2"), 3).await);
        assert!(limiter.allow(LimitedRoute::Confirm, a, 3).await);
    }

    #[test]
    fn test_forwarded_header_ignored_from_untrusted_peer() {
        let limiter = RateLimiter::default();
        for spoof in ["1.1.1.1", "2.2.2.2, 3.3.3.3", "garbage"] {
            let req = request(Some("198.51.100.7"), Some(spoof));
            assert_eq!(limiter.client_ip(&req), ip("198.51.100.7"));
        }
    }

    #[test]
    fn test_forwarded_header_from_trusted_proxy() {
        let limiter = RateLimiter::new(DEFAULT_WINDOW, vec![ip("10.0.0.1"), ip("10.0.0.2")]);

        let req = request(Some("10.0.0.1"), Some("192.0.2.9, 10.0.0.2"));
        assert_eq!(limiter.client_ip(&req), ip("192.0.2.9"));

        // Left-most entries are client supplied; the proxy's own hop wins
        let req = request(Some("10.0.0.1"), Some("6.6.6.6, 192.0.2.9"));
        assert_eq!(limiter.client_ip(&req), ip("192.0.2.9"));

        let req = request(Some("10.0.0.1"), Some("not-an-ip"));
        assert_eq!(limiter.client_ip(&req), ip("10.0.0.1"));

        let req = request(Some("10.0.0.1"), None);
        assert_eq!(limiter.client_ip(&req), ip("10.0.0.1"));
    }

    #[test]
    fn test_missing_peer_shares_bucket() {
        let limiter = RateLimiter::default();
        let req = request(None, Some("1.1.1.1"));
        assert_eq!(limiter.client_ip(&req), IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }

    #[tokio::test]
    async fn test_spoofed_header_does_not_reset_count() {
        let limiter = RateLimiter::default();
        for (i, spoof) in ["1.1.1.1", "2.2.2.2", "3.3.3.3"].iter().enumerate() {
            let client = limiter.client_ip(&request(Some("198.51.100.7"), Some(spoof)));
            assert_eq!(limiter.allow(LimitedRoute::Confirm, client, 2).await, i < 2);
        }
    }

    #[tokio::test]
    async fn test_cleanup_drops_closed_windows() {
        let limiter = RateLimiter::new(Duration::from_millis(20), Vec::new());
        let a = ip("203.0.113.1");
        assert!(limiter.allow(LimitedRoute::Issue, a, 1).await);

        limiter.cleanup().await;
        assert!(!limiter.allow(LimitedRoute::Issue, a, 1).await);

        tokio::time::sleep(Duration::from_millis(30)).await;
        limiter.cleanup().await;
        assert!(limiter.windows.lock().await.is_empty());
        assert!(limiter.allow(LimitedRoute::Issue, a, 1).await);
    }
}
