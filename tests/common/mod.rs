#![allow(dead_code)]

use redb::Database;
use spotlight_backend::config::{Config, WebConfig};
use spotlight_backend::helper::render_cache::RenderCache;
use spotlight_backend::models::{Category, CommentInput, PostInput, StoreInput};
use spotlight_backend::setup::db_setup;
use std::time::Duration;
use tempfile::TempDir;
use uuid::Uuid;

/// A freshly set up database in a temporary folder. Keep the `TempDir`
/// alive for as long as the database is used.
pub fn test_db() -> (TempDir, Database) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let db_path = dir.path().join("spotlight").join("spotlight.db");
    let db = db_setup::create_spotlight_db(&db_path).expect("create spotlight db");
    (dir, db)
}

pub fn test_cache() -> RenderCache {
    RenderCache::new(100, Duration::from_secs(60))
}

pub fn test_config(admin_allowed_ips: &str) -> Config {
    test_config_behind_proxy(admin_allowed_ips, "")
}

pub fn test_config_behind_proxy(admin_allowed_ips: &str, trusted_proxies: &str) -> Config {
    Config {
        web: WebConfig { host: "127.0.0.1".to_string(), port: 0 },
        database_path: "/tmp/spotlight-test".to_string(),
        allowed_origins: String::new(),
        log_level: "debug".to_string(),
        admin_allowed_ips: admin_allowed_ips.to_string(),
        trusted_proxies: trusted_proxies.to_string(),
        render_cache_ttl_secs: 60,
        render_cache_capacity: 100,
    }
}

pub fn store_input(name: &str, address: &str, store_id: &str) -> StoreInput {
    StoreInput {
        name: name.to_string(),
        address: address.to_string(),
        location: "Seoul".to_string(),
        store_id: store_id.to_string(),
        coordinates: None,
        parking: String::new(),
        opening_date: None,
        phone: String::new(),
        tags: Vec::new(),
        images: Vec::new(),
    }
}

pub fn post_input(title: &str, category: Category, published: bool, store: Option<Uuid>) -> PostInput {
    PostInput {
        title: title.to_string(),
        slug: None,
        category,
        description: format!("All about **{}**.", title),
        image: None,
        store,
        published,
    }
}

pub fn comment_input(author: &str, content: &str) -> CommentInput {
    CommentInput {
        author: author.to_string(),
        content: content.to_string(),
        email: None,
    }
}
