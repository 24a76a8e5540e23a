use moka::sync::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Rendered public pages keyed by request path (query string included).
///
/// Mutations invalidate by route: `/posts/abc` drops `/posts/abc` and every
/// `/posts/abc?...` variant. Every invalidation bumps `generation`, so a
/// render that started before it is never stored.
#[derive(Clone)]
pub struct RenderCache {
    pages: Cache<String, String>,
    generation: Arc<AtomicU64>,
}

impl RenderCache {
    pub fn new(capacity: u64, time_to_live: Duration) -> Self {
        let pages = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(time_to_live)
            .build();
        RenderCache {
            pages,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.pages.get(key)
    }

    pub fn insert(&self, key: String, html: String) {
        self.pages.insert(key, html);
    }

    /// Returns the cached page or renders, stores and returns it. Failed
    /// renders are not cached.
    pub fn get_or_render<E>(
        &self,
        key: &str,
        render: impl FnOnce() -> Result<String, E>,
    ) -> Result<String, E> {
        if let Some(html) = self.pages.get(key) {
            log::debug!("Render cache hit for {}", key);
            return Ok(html);
        }
        let started_at = self.generation.load(Ordering::Acquire);
        let html = render()?;
        if self.generation.load(Ordering::Acquire) == started_at {
            self.pages.insert(key.to_string(), html.clone());
        } else {
            log::debug!("Skipped caching {}: invalidated while rendering", key);
        }
        Ok(html)
    }

    pub fn invalidate_route(&self, route: &str) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        let query_prefix = format!("{}?", route);
        let stale: Vec<String> = self
            .pages
            .iter()
            .filter(|(key, _)| key.as_str() == route || key.starts_with(&query_prefix))
            .map(|(key, _)| key.to_string())
            .collect();
        for key in &stale {
            self.pages.invalidate(key);
        }
        log::debug!("Invalidated {} cached render(s) of {}", stale.len(), route);
    }

    /// Drops the post list and the detail page of each slug.
    pub fn invalidate_post_routes<'a>(&self, slugs: impl IntoIterator<Item = &'a str>) {
        self.invalidate_route("/");
        for slug in slugs {
            self.invalidate_route(&post_route(slug));
        }
    }
}

pub fn post_route(slug: &str) -> String {
    format!("/posts/{}", slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> RenderCache {
        RenderCache::new(100, Duration::from_secs(60))
    }

    #[test]
    fn renders_once_then_serves_from_cache() {
        let cache = cache();
        let mut renders = 0;
        for _ in 0..3 {
            let html = cache
                .get_or_render::<()>("/", || {
                    renders += 1;
                    Ok("<html>list</html>".to_string())
                })
                .unwrap();
            assert_eq!(html, "<html>list</html>");
        }
        assert_eq!(renders, 1);
    }

    #[test]
    fn failed_renders_are_not_cached() {
        let cache = cache();
        let result = cache.get_or_render("/", || Err::<String, _>("template missing"));
        assert!(result.is_err());
        assert!(cache.get("/").is_none());
    }

    #[test]
    fn render_overtaken_by_invalidation_is_served_but_not_cached() {
        let cache = cache();
        let html = cache
            .get_or_render::<()>("/", || {
                cache.invalidate_post_routes(["gangnam"]);
                Ok("old list".to_string())
            })
            .unwrap();
        assert_eq!(html, "old list");
        assert!(cache.get("/").is_none());

        let html = cache.get_or_render::<()>("/", || Ok("new list".to_string())).unwrap();
        assert_eq!(html, "new list");
        assert_eq!(cache.get("/").as_deref(), Some("new list"));
    }

    #[test]
    fn clones_share_invalidations() {
        let cache = cache();
        let handle = cache.clone();
        cache
            .get_or_render::<()>("/posts/gangnam", || {
                handle.invalidate_route("/posts/gangnam");
                Ok("stale post".to_string())
            })
            .unwrap();
        assert!(handle.get("/posts/gangnam").is_none());
    }

    #[test]
    fn route_invalidation_covers_query_variants_only_of_that_route() {
        let cache = cache();
        cache.insert("/".to_string(), "list".to_string());
        cache.insert("/?page=2".to_string(), "list p2".to_string());
        cache.insert("/posts/gangnam".to_string(), "post".to_string());
        cache.insert("/posts/gangnam-r".to_string(), "other post".to_string());

        cache.invalidate_post_routes(["gangnam"]);

        assert!(cache.get("/").is_none());
        assert!(cache.get("/?page=2").is_none());
        assert!(cache.get("/posts/gangnam").is_none());
        assert_eq!(cache.get("/posts/gangnam-r").as_deref(), Some("other post"));
    }
}
