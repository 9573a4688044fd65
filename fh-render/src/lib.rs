//! Render server for Frege's Habilitationsschrift.
//!
//! Recomputing a chart is a short synchronous batch; the render server keeps it
//! off the async runtime by running it in its own thread-pool.
//!
//! Requests flow as:
//! -   The caller queues a job and gets back a future for its completion.
//! -   A dispatch thread hands each job to the pool in FIFO order.
//! -   A pool thread recomputes the traces from scratch (and rasterizes them, for
//!     image jobs) and completes the future.

use std::{future::Future, sync::mpsc::Receiver};

use fh_core::{image::Renderer, trace, trace::TraceSet, RenderRequest};
use tokio::sync::oneshot;

pub struct RenderServer {
    queue: std::sync::mpsc::Sender<Job>,
}

enum Job {
    Traces {
        request: RenderRequest,
        result: oneshot::Sender<Result<TraceSet, Error>>,
    },
    Image {
        request: RenderRequest,
        result: oneshot::Sender<Completion>,
    },
}

/// Errors that can occur during execution.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    InvalidArgument(String),
    Internal(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            Error::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

pub type Completion = Result<image::DynamicImage, Error>;

impl RenderServer {
    pub fn new() -> Result<Self, String> {
        Self::with_threads(rayon::current_num_threads())
    }

    pub fn with_threads(threads: usize) -> Result<Self, String> {
        if threads < 1 {
            return Err("must provide >=1 thread".to_string());
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("fh-render-{}", i))
            .build()
            .map_err(|v| format!("error creating thread pool: {}", v))?;

        let (queue, recv) = std::sync::mpsc::channel();
        // The dispatch thread is free-running. It shuts down when the input queue closes.
        std::thread::spawn(move || dispatch(pool, recv));

        Ok(RenderServer { queue })
    }

    /// Compute the trace set for the request.
    pub fn traces(&self, request: RenderRequest) -> impl Future<Output = Result<TraceSet, Error>> {
        let (result, recv) = oneshot::channel();
        self.submit(Job::Traces { request, result });
        completion(recv)
    }

    /// Compute the trace set for the request and rasterize it.
    pub fn render(&self, request: RenderRequest) -> impl Future<Output = Completion> {
        let (result, recv) = oneshot::channel();
        self.submit(Job::Image { request, result });
        completion(recv)
    }

    fn submit(&self, job: Job) {
        // If the dispatcher is gone, the job (and its sender) is dropped here,
        // which the receiving future reports as an internal error.
        if let Err(std::sync::mpsc::SendError(_)) = self.queue.send(job) {
            tracing::error!("rendering server has terminated");
        }
    }
}

async fn completion<T>(recv: oneshot::Receiver<Result<T, Error>>) -> Result<T, Error> {
    match recv.await {
        Ok(v) => v,
        Err(e) => Err(Error::Internal(format!("rendering server hung up: {}", e))),
    }
}

fn dispatch(pool: rayon::ThreadPool, receiver: Receiver<Job>) {
    let span = tracing::info_span!("dispatch thread");
    let _guard = span.enter();

    for job in receiver.iter() {
        // spawn_fifo so that charts complete in ~the same order as requested;
        // a slider drag should not finish out of order.
        pool.spawn_fifo(|| run(job));
    }
}

fn run(job: Job) {
    match job {
        Job::Traces { request, result } => {
            if result.is_closed() {
                tracing::debug!("traces request cancelled");
                return;
            }
            let _ = result.send(compute(&request));
        }
        Job::Image { request, result } => {
            if result.is_closed() {
                tracing::debug!("image request cancelled");
                return;
            }
            let _ = result.send(compute(&request).and_then(|traces| rasterize(&request, &traces)));
        }
    }
}

fn compute(request: &RenderRequest) -> Result<TraceSet, Error> {
    request.validate().map_err(|err| {
        tracing::error!("invalid request {:?}: {}", request, err);
        Error::InvalidArgument(err)
    })?;
    tracing::info!(
        "computing {} traces of {}",
        request.depth + 1,
        request.function
    );
    let span = tracing::info_span!("compute", function = %request.function);
    let _guard = span.enter();
    Ok(trace::compute(request.function, request.params, request.depth))
}

fn rasterize(request: &RenderRequest, traces: &TraceSet) -> Completion {
    let span = tracing::info_span!("rasterize", function = %request.function);
    let _guard = span.enter();
    let image = Renderer::default()
        .render(request.size, traces)
        .map_err(|err| {
            tracing::error!("rendering error: for parameters {:?}: {}", request, err);
            Error::Internal(format!("rendering error: {}", err))
        })?;
    tracing::debug!("chart rendered");
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fh_core::{Function, Params, Size, MAX_DEPTH};

    fn request(function: Function, depth: usize) -> RenderRequest {
        RenderRequest {
            function,
            params: Params::default(),
            depth,
            size: Size::square(200),
        }
    }

    #[test]
    fn rejects_zero_threads() {
        assert!(RenderServer::with_threads(0).is_err());
    }

    #[tokio::test]
    async fn renders_image() {
        let server = RenderServer::with_threads(2).unwrap();
        let image = server.render(request(Function::Affine, 3)).await.unwrap();
        assert_eq!((image.width(), image.height()), (200, 200));
    }

    #[tokio::test]
    async fn computes_traces() {
        let server = RenderServer::with_threads(1).unwrap();
        let traces = server.traces(request(Function::Times, 4)).await.unwrap();
        assert_eq!(traces.traces.len(), 5);
        assert_eq!(traces.function, Function::Times);
    }

    #[tokio::test]
    async fn invalid_depth_is_invalid_argument() {
        let server = RenderServer::with_threads(1).unwrap();
        let err = server
            .render(request(Function::Plus, MAX_DEPTH + 1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn many_concurrent_requests() {
        let server = RenderServer::with_threads(4).unwrap();
        let pending: Vec<_> = fh_core::function::all()
            .map(|f| server.traces(request(f, MAX_DEPTH)))
            .collect();
        for (f, done) in fh_core::function::all().zip(pending) {
            let traces = done.await.unwrap();
            assert_eq!(traces.function, f);
        }
    }
}
