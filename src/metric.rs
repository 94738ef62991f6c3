/// A pluggable distance function over values of type `T`.
///
/// Implementations are assumed (not checked) to be non-negative,
/// `distance(a, a) == 0`, symmetric, deterministic, and finite. The triangle
/// inequality is *not* assumed — search quality degrades gracefully, but not
/// catastrophically, when it doesn't hold.
pub trait Metric<T: ?Sized> {
    fn distance(&self, a: &T, b: &T) -> f64;
}

impl<T, F> Metric<T> for F
where
    T: ?Sized,
    F: Fn(&T, &T) -> f64,
{
    fn distance(&self, a: &T, b: &T) -> f64 {
        self(a, b)
    }
}
