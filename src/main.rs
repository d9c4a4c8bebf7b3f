use std::sync::Arc;

use axum_server::tls_rustls::RustlsConfig;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use cfc_hello::config::Config;
use cfc_hello::endpoints::{self, AppState};
use cfc_hello::registry::Registry;

#[tokio::main]
async fn main() {
    let config = Config::load();

    // Begin logging, at the configured level if the configuration could be read
    let level = config
        .as_ref()
        .ok()
        .and_then(|f| f.level().ok())
        .unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Could not install logger: {e}");
        return;
    }

    let config = match config.and_then(|f| f.level().map(|_| f)) {
        Ok(config) => config.with_default_functions(),
        Err(e) => {
            error!("{e}");
            return;
        }
    };

    // Every configured function must point at a registered handler
    let registry = Registry::builtin();
    info!("Registered handlers: {}", registry.names().join(", "));
    if let Err(e) = config.validate(&registry) {
        error!("{e}");
        return;
    }

    let addr = match config.socket_addr() {
        Ok(addr) => addr,
        Err(e) => {
            error!("{e}");
            return;
        }
    };

    for function in &config.functions {
        info!(
            "Function {} -> {} (timeout {}s, {} MB)",
            function.name, function.handler, function.timeout, function.memory_size
        );
    }

    let tls = config.tls.clone();
    let state = Arc::new(AppState { registry, config });
    let app = endpoints::router(state);

    let served = match tls {
        Some(tls) => {
            // axum-server is built without a default provider
            let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

            let rustls_config =
                match RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path).await {
                    Ok(c) => c,
                    Err(e) => {
                        error!("Could not load certificate: {e}");
                        return;
                    }
                };

            info!("Serving HTTPS on {addr}");
            axum_server::bind_rustls(addr, rustls_config)
                .serve(app.into_make_service())
                .await
        }
        None => {
            info!("Serving HTTP on {addr}");
            axum_server::bind(addr)
                .serve(app.into_make_service())
                .await
        }
    };

    if let Err(e) = served {
        error!("Server stopped: {e}");
    }
}
