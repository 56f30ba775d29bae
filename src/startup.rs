use std::net::TcpListener;

use actix_web::{dev::Server, error::InternalError, http::StatusCode, web, App, HttpServer};
use anyhow::Context;
use diesel::{r2d2::ConnectionManager, PgConnection};
use r2d2::Pool;
use tracing_actix_web::TracingLogger;

use crate::{configuration::{DatabaseSettings, Settings}, routes::{get_customer_list, get_order_list, get_product_list, health_check, post_customer, post_order, post_product}, telemetry::spawn_blocking_with_tracing, utils::{json_error_response, run_migrations, DbPool}};

pub struct Application{
    pub host: String,
    pub port: u16,
    pub server: Server
}

impl Application {
    /// Connects to the database, brings its schema up to date and binds the
    /// listener. Port `0` picks a free port, reported back in `port`.
    pub async fn new(settings: Settings) -> Result<Self, anyhow::Error>{
        let pool = get_connection_pool(&settings.database);

        let migration_pool = pool.clone();
        spawn_blocking_with_tracing(move || {
            let mut conn = migration_pool.get()
                .context("Failed to get connection from pool")?;

            run_migrations(&mut conn)
        })
        .await
        .context("Failed due to threadpool error")??;

        let listener = TcpListener::bind((settings.application.host.as_str(), settings.application.port))
            .context("Failed to bind address")?;
        let port = listener.local_addr()?.port();

        let server = run(listener, pool)?;

        Ok(Application{
            host: settings.application.host,
            port,
            server
        })
    }
}

pub fn get_connection_pool(settings: &DatabaseSettings) -> DbPool{
    let manager = ConnectionManager::<PgConnection>::new(settings.get_database_table_url());

    Pool::builder()
        .max_size(settings.max_connections.max(1))
        .build_unchecked(manager)
}

fn json_config() -> web::JsonConfig{
    web::JsonConfig::default()
        .error_handler(|err, _req| {
            let response = json_error_response(StatusCode::BAD_REQUEST, &err);
            InternalError::from_response(err, response).into()
        })
}

pub fn run(listener: TcpListener, pool: DbPool) -> Result<Server, anyhow::Error>{
    let pool = web::Data::new(pool);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(json_config())
            .app_data(pool.clone())
            .route("/health", web::get().to(health_check))
            .route("/customers", web::post().to(post_customer))
            .route("/customers", web::get().to(get_customer_list))
            .route("/products", web::post().to(post_product))
            .route("/products", web::get().to(get_product_list))
            .route("/orders", web::post().to(post_order))
            .route("/orders", web::get().to(get_order_list))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
