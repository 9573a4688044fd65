use clap::Parser;
use fh_core::{image::Renderer, trace, Function, Params, RenderRequest, Size, MAX_DEPTH};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Render charts of a function's iterates to PNG files.
///
/// Writes one `<function>_<depth>.png` into the output directory per depth.
#[derive(Debug, Parser)]
struct Args {
    /// Function name (plus, times, power, affine, rational) or menu index.
    function: Function,

    out_dir: PathBuf,

    /// Depths to render; each chart shows iterates 0 through the depth.
    #[arg(default_values_t = [MAX_DEPTH])]
    depths: Vec<usize>,

    #[arg(short, default_value_t = 1.0)]
    a: f64,
    #[arg(short, default_value_t = 1.0)]
    b: f64,
    #[arg(short, default_value_t = 1.0)]
    c: f64,
    #[arg(short, default_value_t = 1.0)]
    d: f64,

    /// Width and height of each image, in pixels.
    #[arg(long, default_value_t = 800)]
    res: usize,
}

impl Args {
    fn requests(&self) -> Result<Vec<RenderRequest>, String> {
        let params = Params {
            a: self.a,
            b: self.b,
            c: self.c,
            d: self.d,
        };
        self.depths
            .iter()
            .map(|depth| -> Result<RenderRequest, String> {
                let request = RenderRequest {
                    function: self.function,
                    params,
                    depth: *depth,
                    size: Size::square(self.res),
                };
                request.validate()?;
                Ok(request)
            })
            .collect()
    }
}

fn render_to(out_dir: &Path, request: &RenderRequest) -> Result<PathBuf, String> {
    let span = tracing::info_span!("render", function = %request.function, depth = request.depth);
    let _guard = span.enter();

    let traces = trace::compute(request.function, request.params, request.depth);
    let image = Renderer::default().render(request.size, &traces)?;
    let path = out_dir.join(format!("{}_{}.png", request.function, request.depth));
    image
        .save(&path)
        .map_err(|err| format!("failed to write {}: {}", path.display(), err))?;
    tracing::info!("wrote {}", path.display());
    Ok(path)
}

fn main() -> Result<(), String> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let requests = args.requests()?;
    std::fs::create_dir_all(&args.out_dir)
        .map_err(|err| format!("cannot create {}: {}", args.out_dir.display(), err))?;

    requests
        .par_iter()
        .map(|request| render_to(&args.out_dir, request).map(|_| ()))
        .collect::<Result<(), String>>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_function_by_name_or_index() {
        let args = Args::try_parse_from(["fh-plot", "affine", "out", "1", "3", "-a", "2", "-b", "0.5"]).unwrap();
        assert_eq!(args.function, Function::Affine);
        assert_eq!(args.depths, [1, 3]);
        assert_eq!((args.a, args.b, args.c, args.d), (2.0, 0.5, 1.0, 1.0));

        let args = Args::try_parse_from(["fh-plot", "4", "out"]).unwrap();
        assert_eq!(args.function, Function::Rational);
        assert_eq!(args.depths, [MAX_DEPTH]);
        assert_eq!(args.res, 800);
    }

    #[test]
    fn rejects_unknown_function() {
        assert!(Args::try_parse_from(["fh-plot", "sine", "out"]).is_err());
    }

    #[test]
    fn rejects_deep_requests() {
        let args = Args::try_parse_from(["fh-plot", "plus", "out", "11"]).unwrap();
        assert!(args.requests().is_err());
    }

    #[test]
    fn writes_one_file_per_depth() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        let args = Args::try_parse_from([
            "fh-plot",
            "times",
            dir.to_str().unwrap(),
            "0",
            "2",
            "--res",
            "200",
        ])
        .unwrap();
        for request in args.requests().unwrap() {
            let path = render_to(dir, &request).unwrap();
            assert!(path.exists());
        }
        let written = image::open(dir.join("times_2.png")).unwrap();
        assert_eq!((written.width(), written.height()), (200, 200));
        assert!(dir.join("times_0.png").exists());
        assert!(!dir.join("times_1.png").exists());
    }
}
