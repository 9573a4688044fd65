//! Repeated function application.

/// Apply `f` to `x` exactly `n` times; `n == 0` returns `x` unchanged.
#[inline]
pub fn iterate<T, F>(x: T, f: F, n: usize) -> T
where
    F: Fn(T) -> T,
{
    let mut xi = x;
    for _ in 0..n {
        xi = f(xi);
    }
    xi
}

/// The orbit of `x` under `f`: x, f(x), f(f(x)), ...
///
/// The k-th item is bit-identical to `iterate(x, f, k)`.
pub fn orbit<T, F>(x: T, f: F) -> impl Iterator<Item = T>
where
    T: Clone,
    F: Fn(T) -> T,
{
    std::iter::successors(Some(x), move |xi| Some(f(xi.clone())))
}
