//! Prometheus metrics for HTTP traffic and order placement.

use std::{sync::OnceLock, time::Duration};

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
    core::Collector,
};
use salvo::{
    Request, Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use tracing::error;

const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// How an order was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CheckoutMode {
    SingleItem,
    Cart,
}

impl CheckoutMode {
    fn label(self) -> &'static str {
        match self {
            Self::SingleItem => "single_item",
            Self::Cart => "cart",
        }
    }
}

#[derive(Debug)]
struct StorefrontMetrics {
    registry: Registry,
    http_requests: IntCounterVec,
    http_latency: HistogramVec,
    http_in_flight: IntGauge,
    placements: IntCounterVec,
    placement_latency: HistogramVec,
}

static METRICS: OnceLock<Option<StorefrontMetrics>> = OnceLock::new();

fn metrics() -> Option<&'static StorefrontMetrics> {
    METRICS.get_or_init(StorefrontMetrics::build).as_ref()
}

/// Registers a freshly created collector, logging and discarding it on failure.
fn register<C>(
    registry: &Registry,
    name: &str,
    created: Result<C, prometheus::Error>,
) -> Option<C>
where
    C: Collector + Clone + 'static,
{
    let collector = created
        .inspect_err(|source| error!(metric = name, "failed to create metric: {source}"))
        .ok()?;

    registry
        .register(Box::new(collector.clone()))
        .inspect_err(|source| error!(metric = name, "failed to register metric: {source}"))
        .ok()?;

    Some(collector)
}

impl StorefrontMetrics {
    fn build() -> Option<Self> {
        let registry = Registry::new();

        let http_requests = register(
            &registry,
            "http_requests_total",
            IntCounterVec::new(
                Opts::new(
                    "storefront_json_http_requests_total",
                    "HTTP requests by method, route and status.",
                ),
                &["method", "route", "status_class", "status_code"],
            ),
        )?;

        let http_latency = register(
            &registry,
            "http_request_duration_seconds",
            HistogramVec::new(
                HistogramOpts::new(
                    "storefront_json_http_request_duration_seconds",
                    "HTTP request latency by method and route.",
                )
                .buckets(LATENCY_BUCKETS.to_vec()),
                &["method", "route"],
            ),
        )?;

        let http_in_flight = register(
            &registry,
            "http_requests_in_flight",
            IntGauge::new(
                "storefront_json_http_requests_in_flight",
                "HTTP requests currently being served.",
            ),
        )?;

        let placements = register(
            &registry,
            "orders_total",
            IntCounterVec::new(
                Opts::new(
                    "storefront_json_orders_total",
                    "Order placement attempts by checkout mode and outcome.",
                ),
                &["mode", "outcome"],
            ),
        )?;

        let placement_latency = register(
            &registry,
            "order_placement_duration_seconds",
            HistogramVec::new(
                HistogramOpts::new(
                    "storefront_json_order_placement_duration_seconds",
                    "Time spent placing an order, reservations and persistence included.",
                )
                .buckets(LATENCY_BUCKETS.to_vec()),
                &["mode"],
            ),
        )?;

        Some(Self {
            registry,
            http_requests,
            http_latency,
            http_in_flight,
            placements,
            placement_latency,
        })
    }
}

/// Keeps the in-flight gauge raised for as long as it lives.
#[derive(Debug)]
pub(super) struct InFlightRequestGuard(Option<&'static IntGauge>);

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        let gauge = metrics().map(|metrics| &metrics.http_in_flight);

        if let Some(gauge) = gauge {
            gauge.inc();
        }

        Self(gauge)
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if let Some(gauge) = self.0 {
            gauge.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status_code: u16, duration_seconds: f64) {
    let Some(metrics) = metrics() else {
        return;
    };

    let code = status_code.to_string();

    metrics
        .http_requests
        .with_label_values(&[method, route, status_class(status_code), code.as_str()])
        .inc();

    metrics
        .http_latency
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

/// Record one placement attempt with its outcome label and duration.
pub(crate) fn observe_placement(mode: CheckoutMode, outcome: &str, elapsed: Duration) {
    let Some(metrics) = metrics() else {
        return;
    };

    metrics
        .placements
        .with_label_values(&[mode.label(), outcome])
        .inc();

    metrics
        .placement_latency
        .with_label_values(&[mode.label()])
        .observe(elapsed.as_secs_f64());
}

#[handler]
pub(crate) async fn metrics_handler(_req: &mut Request, res: &mut Response) {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        return;
    };

    let encoder = TextEncoder::new();
    let mut body = Vec::new();

    if let Err(source) = encoder.encode(&metrics.registry.gather(), &mut body) {
        error!("failed to encode metrics: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    let Ok(content_type) = HeaderValue::from_str(encoder.format_type()) else {
        error!("metrics encoder produced an invalid content type");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    };

    res.headers_mut().insert(CONTENT_TYPE, content_type);
    res.render(String::from_utf8_lossy(&body).into_owned());
}

fn status_class(status_code: u16) -> &'static str {
    match status_code {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use salvo::{
        Router, Service,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use super::*;

    async fn scrape() -> TestResult<String> {
        let service =
            Service::new(Router::new().push(Router::with_path("metrics").get(metrics_handler)));

        Ok(TestClient::get("http://example.com/metrics")
            .send(&service)
            .await
            .take_string()
            .await?)
    }

    #[tokio::test]
    async fn exposes_http_metrics() -> TestResult {
        observe_request("GET", "/orders", 200, 0.042);

        let guard = InFlightRequestGuard::track();
        let body = scrape().await?;
        drop(guard);

        assert!(
            body.contains(
                "storefront_json_http_requests_total{method=\"GET\",route=\"/orders\",status_class=\"2xx\",status_code=\"200\"}"
            ),
            "expected request counter in {body}"
        );
        assert!(
            body.contains("storefront_json_http_request_duration_seconds_bucket"),
            "expected latency histogram in {body}"
        );
        assert!(
            body.contains("storefront_json_http_requests_in_flight"),
            "expected in-flight gauge in {body}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn exposes_placement_metrics_per_mode() -> TestResult {
        observe_placement(CheckoutMode::SingleItem, "placed", Duration::from_millis(12));
        observe_placement(CheckoutMode::Cart, "insufficient_stock", Duration::from_millis(3));

        let body = scrape().await?;

        assert!(
            body.contains("storefront_json_orders_total{mode=\"single_item\",outcome=\"placed\"}"),
            "expected single item placement in {body}"
        );
        assert!(
            body.contains("storefront_json_orders_total{mode=\"cart\",outcome=\"insufficient_stock\"}"),
            "expected cart placement in {body}"
        );
        assert!(
            body.contains("storefront_json_order_placement_duration_seconds_count{mode=\"cart\"}"),
            "expected placement latency in {body}"
        );

        Ok(())
    }

    #[test]
    fn status_codes_are_grouped_by_class() {
        assert_eq!(status_class(201), "2xx");
        assert_eq!(status_class(409), "4xx");
        assert_eq!(status_class(503), "5xx");
        assert_eq!(status_class(42), "other");
    }
}
