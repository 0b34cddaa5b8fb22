//! Server entry-point – Axum + Leptos SSR.

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use axum::Router;
    use leptos::prelude::*;
    use leptos_axum::{generate_route_list, LeptosRoutes};
    use std::path::PathBuf;
    use tower_http::services::ServeDir;

    use earnings_common::config::{self, Config};
    use earnings_web::app::{shell, App, AppState};
    use earnings_web::server::data::CalendarData;

    // ── Tracing ──────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "earnings_web=info,earnings_common=info,tower_http=info".into()),
        )
        .init();

    // ── Configuration ────────────────────────────────────────────────────
    let conf = get_configuration(None).context("Cannot read Leptos configuration")?;
    let leptos_options = conf.leptos_options;
    let addr = leptos_options.site_addr;
    let site_root = leptos_options.site_root.clone();

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("EARNINGS_CONFIG").ok())
        .unwrap_or_else(|| Config::default_path().to_string());
    let config = config::load_or_default(&PathBuf::from(&config_path)).context("Config load failed")?;

    match &config.data_url {
        Some(url) => tracing::info!("Report source: {:?} from {url}", config.source),
        None => tracing::info!(
            "Report source: {:?} from {}",
            config.source,
            config.data_dir.display()
        ),
    }
    let data_dir = config.data_dir.clone();

    let state = AppState {
        data: CalendarData::new(config),
        leptos_options: leptos_options.clone(),
    };

    // ── Routes ───────────────────────────────────────────────────────────
    let routes = generate_route_list(App);

    let app = Router::new()
        .leptos_routes_with_context(
            &leptos_options,
            routes,
            {
                let state = state.clone();
                move || provide_context(state.clone())
            },
            {
                let options = leptos_options.clone();
                move || shell(options.clone())
            },
        )
        // Serve static assets (WASM bundle, CSS, images, etc.)
        .nest_service("/pkg", ServeDir::new(format!("{site_root}/pkg")))
        // Serve the monthly calendar_YYYYMM.json files as-is
        .nest_service("/data", ServeDir::new(data_dir))
        .fallback(fallback_handler)
        .with_state(leptos_options);

    tracing::info!("Earnings calendar listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Cannot bind {addr}"))?;
    axum::serve(listener, app.into_make_service())
        .await
        .context("HTTP server error")?;

    Ok(())
}

/// Fallback: try to serve a static file, otherwise return 404.
#[cfg(feature = "ssr")]
async fn fallback_handler(
    axum::extract::State(options): axum::extract::State<leptos::prelude::LeptosOptions>,
    req: axum::http::Request<axum::body::Body>,
) -> axum::response::Response {
    use axum::response::IntoResponse;

    let root = options.site_root.clone();
    let (parts, _body) = req.into_parts();
    let path = format!("{}{}", root, parts.uri.path());

    // Try serving a static file
    if let Ok(meta) = tokio::fs::metadata(&path).await {
        if meta.is_file() {
            if let Ok(bytes) = tokio::fs::read(&path).await {
                return (
                    axum::http::StatusCode::OK,
                    [(axum::http::header::CONTENT_TYPE, mime_for(&path))],
                    bytes,
                )
                    .into_response();
            }
        }
    }

    // Otherwise 404
    (axum::http::StatusCode::NOT_FOUND, "Not Found").into_response()
}

#[cfg(feature = "ssr")]
fn mime_for(path: &str) -> &'static str {
    match path.rsplit('.').next().unwrap_or("") {
        "html" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" => "application/javascript",
        "wasm" => "application/wasm",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "ico" => "image/x-icon",
        "json" => "application/json",
        _ => "application/octet-stream",
    }
}

#[cfg(not(feature = "ssr"))]
fn main() {
    // This binary is only built with the `ssr` feature.
    // The WASM entry point is `lib::hydrate()`.
}
