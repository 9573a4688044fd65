/// HTTP serving for Frege's Habilitationsschrift.
///
/// The library implements routing, state, etc. for the plotting server;
/// the binary starts up a runtime and axum server to handle requests.
///
/// All dynamic paths take query parameters:
/// - function: Index of the function in the menu. Defaults to 0 (x+b).
/// - n: Deepest iterate to plot, 0 through 10. Defaults to 5.
/// - a, b, c, d: Function parameters. Each defaults to 1.
/// - res: Width & height in pixels of raster output. Defaults to 800.
///
/// Dynamic paths are:
/// - `/`: HTML interface view. Controls are filled by query params.
/// - `/chart`: The chart alone, as an HTML fragment with inline SVG.
/// - `/render.png`: The chart as a PNG image.
/// - `/traces`: The sampled traces, as JSON.
///
/// Static paths are:
/// - `/static/style.css`, `/static/app.js`: the page's stylesheet and script.
use std::sync::Arc;

use axum::{
    extract::Query,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use fh_core::{Function, Params, RenderRequest, Size};
use fh_render::RenderServer;
use tower_http::trace::TraceLayer;

mod chart;
mod interface;
mod render;

pub fn root_routes(render_server: RenderServer) -> Router {
    let srv = Arc::new(render_server);
    Router::new()
        .route(
            "/",
            get({
                let srv = srv.clone();
                |Query(params): Query<PlotParams>| async move {
                    interface::interface(&srv, params).await
                }
            }),
        )
        .route(
            "/chart",
            get({
                let srv = srv.clone();
                |Query(params): Query<PlotParams>| async move { chart::chart(&srv, params).await }
            }),
        )
        .route(
            "/render.png",
            get({
                let srv = srv.clone();
                |Query(params): Query<PlotParams>| async move {
                    let request = params.to_request()?;
                    render::render(&srv, request).await
                }
            }),
        )
        .route(
            "/traces",
            get(|Query(params): Query<PlotParams>| async move {
                let request = params.to_request()?;
                render::traces(&srv, request).await
            }),
        )
        .route(
            "/static/style.css",
            get(|| async { static_file("text/css", include_str!("static/style.css")) }),
        )
        .route(
            "/static/app.js",
            get(|| async { static_file("text/javascript", include_str!("static/app.js")) }),
        )
        .layer(TraceLayer::new_for_http())
}

fn static_file(content_type: &'static str, body: &'static str) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "max-age=300"),
        ],
        body,
    )
}

/// Control values, as carried in the query string.
#[derive(serde::Deserialize, serde::Serialize, Clone, Debug, PartialEq)]
struct PlotParams {
    #[serde(default)]
    function: usize,
    #[serde(default = "PlotParams::default_n")]
    n: usize,

    #[serde(default = "PlotParams::default_param")]
    a: f64,
    #[serde(default = "PlotParams::default_param")]
    b: f64,
    #[serde(default = "PlotParams::default_param")]
    c: f64,
    #[serde(default = "PlotParams::default_param")]
    d: f64,

    #[serde(default = "PlotParams::default_res")]
    res: usize,
}

impl Default for PlotParams {
    fn default() -> Self {
        PlotParams {
            function: 0,
            n: Self::default_n(),
            a: Self::default_param(),
            b: Self::default_param(),
            c: Self::default_param(),
            d: Self::default_param(),
            res: Self::default_res(),
        }
    }
}

impl PlotParams {
    fn default_n() -> usize {
        5
    }
    fn default_param() -> f64 {
        1.0
    }
    fn default_res() -> usize {
        800
    }

    fn params(&self) -> Params {
        Params {
            a: self.a,
            b: self.b,
            c: self.c,
            d: self.d,
        }
    }

    /// Convert to a render request, checking bounds.
    fn to_request(&self) -> Result<RenderRequest, (StatusCode, String)> {
        let bad_request = |err: String| {
            tracing::error!("invalid parameters {:?}: {}", self, err);
            (StatusCode::BAD_REQUEST, err)
        };
        let function = Function::from_index(self.function).map_err(bad_request)?;
        let request = RenderRequest {
            function,
            params: self.params(),
            depth: self.n,
            size: Size::square(self.res),
        };
        request.validate().map_err(bad_request)?;
        Ok(request)
    }

    /// Canonical query string for these parameters.
    fn query_string(&self) -> String {
        serde_urlencoded::to_string(self).unwrap_or_default()
    }
}

/// Map a render-server failure to an HTTP status.
fn status(err: &fh_render::Error) -> StatusCode {
    match err {
        fh_render::Error::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        fh_render::Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
