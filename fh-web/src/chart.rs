//! The chart region: the traces drawn as an inline SVG chart.

use axum::{http::StatusCode, response::Result};
use fh_core::{image::Renderer, trace::TraceSet, Size};
use fh_render::RenderServer;
use maud::{html, Markup, PreEscaped};

use crate::PlotParams;

/// Size of the SVG coordinate system; the stylesheet scales it to fit.
const CANVAS: Size = Size::square(600);

/// Render the chart fragment, recomputing the traces.
pub(crate) async fn chart(server: &RenderServer, params: PlotParams) -> Result<Markup> {
    let request = params.to_request()?;
    let traces = server.traces(request).await.map_err(|err| {
        tracing::error!("request error: {:?}", err);
        crate::status(&err)
    })?;
    chart_body(&traces).map_err(|err| {
        tracing::error!("chart error: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR.into()
    })
}

pub(crate) fn chart_body(traces: &TraceSet) -> Result<Markup, String> {
    let svg = Renderer::default().render_svg(CANVAS, traces)?;
    Ok(html! {
        div class="chart" {
            (PreEscaped(svg))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fh_core::{trace, Function, Params};

    #[test]
    fn caption_and_legend() {
        let traces = trace::compute(Function::Affine, Params::default(), 4);
        let body = chart_body(&traces).unwrap().into_string();
        assert!(body.starts_with("<div class=\"chart\"><svg"), "{}", body);
        assert!(body.contains("f(x) = a(1 − b) + b·x"));
        for trace in &traces.traces {
            assert!(body.contains(&trace.label), "missing {}", trace.label);
        }
        assert!(body.to_lowercase().contains("#ff0000"));
    }

    #[test]
    fn pole_renders() {
        // 1 / (1 + x) has its pole at x = -1, a sample point.
        let params = Params {
            a: 1.0,
            b: 0.0,
            c: 1.0,
            d: 1.0,
        };
        let traces = trace::compute(Function::Rational, params, 1);
        let body = chart_body(&traces).unwrap().into_string();
        assert!(body.contains("f^1 = f(x)"));
        assert!(!body.contains("NaN"));
    }

    #[tokio::test]
    async fn invalid_params_are_rejected() {
        let server = RenderServer::with_threads(1).unwrap();
        let params = PlotParams {
            function: 9,
            ..PlotParams::default()
        };
        assert!(chart(&server, params).await.is_err());
    }
}
