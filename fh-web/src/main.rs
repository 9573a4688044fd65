use std::net::SocketAddr;

use clap::Parser;
use fh_render::RenderServer;
use fh_web::root_routes;
use tracing_subscriber::EnvFilter;

/// Serve the interactive iterate plotter.
#[derive(Debug, Parser)]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:3000")]
    listen: SocketAddr,

    /// Render threads; defaults to one per core.
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let render_server = match args.threads {
        Some(threads) => RenderServer::with_threads(threads),
        None => RenderServer::new(),
    }?;

    let web_rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let server = async {
        let app = root_routes(render_server);
        let listener = tokio::net::TcpListener::bind(args.listen).await?;
        tracing::info!("listening on http://{}", args.listen);
        axum::serve(listener, app).await
    };
    web_rt.block_on(server)?;
    Ok(())
}
