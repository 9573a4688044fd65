/// User-interface rendering for Frege's Habilitationsschrift.
use axum::{http::StatusCode, response::Result};
use fh_core::{function, MAX_DEPTH};
use fh_render::RenderServer;
use maud::{html, Markup, DOCTYPE};

use crate::{chart, PlotParams};

/// Render the user interface.
pub(crate) async fn interface(server: &RenderServer, query: PlotParams) -> Result<Markup> {
    let request = query.to_request()?;
    let traces = server.traces(request).await.map_err(|err| {
        tracing::error!("request error: {:?}", err);
        crate::status(&err)
    })?;
    let plot = chart::chart_body(&traces).map_err(|err| {
        tracing::error!("chart error: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(html! {
        (DOCTYPE)
        head {
            meta charset="utf-8";
            title { "Frege's Habilitationsschrift" }
            link rel="stylesheet" href="/static/style.css";
            script src="/static/app.js" async {}
        }
        body {
            div class="layout" {
                div class="controls" {
                    (controls(&query))
                }
                div id="chart-region" class="chart-region" {
                    (plot)
                }
            }
        }
    })
}

fn controls(query: &PlotParams) -> Markup {
    let exports = query.query_string();
    html! {
        p class="heading" { "Frege's Habilitationsschrift" }
        form id="form-controls" action="/" autocomplete="off" class="parameters" {
            label for="input-function" { "Function:" }
            select id="input-function" name="function" {
                @for f in function::all() {
                    option value=(f.index()) selected[f.index() == query.function] {
                        "f(x) = " (f.formula())
                    }
                }
            }

            (slider("n", "n:", 0.0, MAX_DEPTH as f64, 1.0, query.n as f64))
            (slider("b", "b:", 0.0, 5.0, 0.01, query.b))
            (slider("a", "a:", 0.0, 5.0, 0.01, query.a))
            (slider("c", "c:", 0.0, 5.0, 0.01, query.c))
            (slider("d", "d:", 0.0, 5.0, 0.01, query.d))

            input type="hidden" name="res" value=(query.res);
            noscript {
                input type="submit" value="Plot";
            }
        }
        p {
            a href="/" { "Reset" }
            " "
            a id="link-png" href=(format!("/render.png?{}", exports)) { "PNG" }
            " "
            a id="link-traces" href=(format!("/traces?{}", exports)) { "JSON" }
        }
    }
}

fn slider(name: &str, text: &str, min: f64, max: f64, step: f64, value: f64) -> Markup {
    let id = format!("input-{}", name);
    html! {
        div class="slider" {
            label for=(id) { (text) }
            input id=(id) name=(name) type="range"
                min=(min.to_string()) max=(max.to_string()) step=(step.to_string()) value=(value.to_string());
            output for=(id) { (value.to_string()) }
        }
    }
}
