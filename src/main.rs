use actix_cors::Cors;
use actix_web::{
    http::header,
    middleware::{DefaultHeaders, Logger},
    web, App, HttpServer,
};
use clap::Parser;
use redb::Database;
use spotlight_backend::{config::Config, helper::render_cache::RenderCache, routes};
use std::path::PathBuf;
use std::time::Duration;
use tera::Tera;

#[derive(Parser, Debug)]
#[command(name = "spotlight_server", author, version, about = "Starts the Store Spotlight web server.")]
struct Cli {
    /// Path to the .env configuration file.
    #[arg(long, required = true, value_name = "FILE")]
    env_file: PathBuf,
}

fn build_cors(allowed_origins: &str) -> Cors {
    let cors = if allowed_origins.trim() == "*" {
        Cors::default().allow_any_origin()
    } else {
        allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };
    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    // Load configuration first
    let config = Config::from_env(&cli.env_file)
        .expect("FATAL: Failed to load or parse configuration.");

    env_logger::init_from_env(env_logger::Env::new().default_filter_or(&config.log_level));

    let tera = Tera::new("templates/**/*.html").expect("Tera initialization failed");

    let db_path = config.spotlight_db_path();
    let db = web::Data::new(Database::open(&db_path).unwrap_or_else(|e| {
        panic!(
            "FATAL: could not open '{}' ({}). Run 'setup_cli --env-file <path> db setup'",
            db_path.display(),
            e
        )
    }));

    let render_cache = web::Data::new(RenderCache::new(
        config.render_cache_capacity,
        Duration::from_secs(config.render_cache_ttl_secs),
    ));

    let server_address = format!("{}:{}", config.web.host, config.web.port);
    log::info!("Server starting at http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&config.allowed_origins))
            .wrap(Logger::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("X-Frame-Options", "DENY"))
                    .add(("X-XSS-Protection", "1; mode=block")),
            )
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(tera.clone()))
            .app_data(db.clone())
            .app_data(render_cache.clone())
            .configure(routes::config_app)
    })
    .bind(server_address)?
    .run()
    .await
}
