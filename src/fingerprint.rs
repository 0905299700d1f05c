use std::collections::BTreeMap;

/// Deterministic key for a logical request. Parameters are iterated in sorted
/// order, so two queries with the same key/value set always collide, whatever
/// order they were built in. Used for cache lookup, coalescing and rate-limit
/// scoping.
pub fn fingerprint(operation: &str, params: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(operation.len() + params.len() * 16);
    out.push_str(operation);
    for (key, value) in params {
        out.push('|');
        out.push_str(key);
        out.push('=');
        out.push_str(value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::types::FeedQuery;

    #[test]
    fn fingerprint_is_order_independent() {
        let a = FeedQuery::new("safetyAlerts")
            .with_param("location", "Bangkok, Thailand")
            .with_param("limit", "10");
        let b = FeedQuery::new("safetyAlerts")
            .with_param("limit", "10")
            .with_param("location", "Bangkok, Thailand");
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn fingerprint_distinguishes_operations_and_values() {
        let base = FeedQuery::new("news").with_param("location", "Lima");
        assert_ne!(
            base.fingerprint(),
            FeedQuery::new("events").with_param("location", "Lima").fingerprint()
        );
        assert_ne!(
            base.fingerprint(),
            FeedQuery::new("news").with_param("location", "Quito").fingerprint()
        );
    }

    #[test]
    fn fingerprint_with_no_params_is_the_operation() {
        let mut params = BTreeMap::new();
        assert_eq!(fingerprint("news", &params), "news");
        params.insert("q".to_string(), "storm".to_string());
        assert_eq!(fingerprint("news", &params), "news|q=storm");
    }
}
