use axum::{
    http::{
        header::{CACHE_CONTROL, CONTENT_TYPE},
        StatusCode,
    },
    response::IntoResponse,
    Json,
};
use fh_core::RenderRequest;

/// Render the chart with the provided params, as a PNG.
pub(crate) async fn render(
    server: &fh_render::RenderServer,
    request: RenderRequest,
) -> axum::response::Result<impl IntoResponse> {
    let image = server.render(request).await.map_err(|err| {
        tracing::error!("request error: {:?}", err);
        crate::status(&err)
    })?;

    let mut buffer = std::io::Cursor::new(Vec::<u8>::new());
    image
        .write_to(&mut buffer, image::ImageOutputFormat::Png)
        .map_err(|err| {
            tracing::error!("image serialization error: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    // Charts are a pure function of the query, so they can be cached.
    Ok((
        StatusCode::OK,
        [(CONTENT_TYPE, "image/png")],
        [(CACHE_CONTROL, "max-age=3600")],
        buffer.into_inner(),
    ))
}

/// The sampled traces for the provided params, as JSON.
pub(crate) async fn traces(
    server: &fh_render::RenderServer,
    request: RenderRequest,
) -> axum::response::Result<impl IntoResponse> {
    let traces = server.traces(request).await.map_err(|err| {
        tracing::error!("request error: {:?}", err);
        crate::status(&err)
    })?;
    Ok(Json(traces))
}
