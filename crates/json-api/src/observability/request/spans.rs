//! HTTP span helpers.

use uuid::Uuid;

#[derive(Debug, Clone)]
pub(super) struct RequestSpanName {
    /// Path with identifiers collapsed, safe to use as a metric label.
    pub(super) route: String,
    pub(super) span_name: String,
}

pub(super) fn request_span_name(method: &str, path: &str) -> RequestSpanName {
    let route = normalise_path(path);
    let span_name = format!("{method} {route}");

    RequestSpanName { route, span_name }
}

fn normalise_path(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let mut normalised = String::from("/");

    for (index, segment) in path.trim_start_matches('/').split('/').enumerate() {
        if index > 0 {
            normalised.push('/');
        }

        if Uuid::parse_str(segment).is_ok() {
            normalised.push_str("{uuid}");
        } else {
            normalised.push_str(segment);
        }
    }

    normalised
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_uuids_are_collapsed_in_routes() {
        let names = request_span_name("GET", "/orders/0190a4f0-7c1e-7000-8000-000000000001");

        assert_eq!(names.route, "/orders/{uuid}");
        assert_eq!(names.span_name, "GET /orders/{uuid}");
    }

    #[test]
    fn static_routes_are_kept() {
        assert_eq!(request_span_name("POST", "/orders/checkout").route, "/orders/checkout");
        assert_eq!(request_span_name("GET", "/").route, "/");
    }
}
