/// The minimal structural distinction a caller may switch on across every
/// error this workspace produces.
///
/// Individual crates define their own `thiserror` enums with richer detail
/// (`BoundJoinError` in `fedsparql-physical`, `ConsumerError` in
/// `fedsparql-update`) and report one of these kinds via a `kind()` method.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The upstream operator failed.
    Source,
    /// `evalBGP`/`evalUnion` signalled failure.
    Remote,
    /// A per-triple write in the update consumer sink failed.
    Write,
    /// Downstream unsubscribed before completion. Not necessarily user-visible.
    Cancelled,
    /// Surfaced by the error-only sink for plans that cannot run.
    Preparation,
}
