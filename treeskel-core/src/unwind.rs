use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Catch a panic raised by user-supplied code (a `Generator` or
/// `BoundFunction` call) and turn it into a `Result`, per spec.md §7.2:
/// "the owning worker task fails; the completion promise is broken with the
/// error; failures propagate up the future tree". Unlike
/// `rayon_core::unwind::AbortIfPanic` — which the teacher uses to protect
/// its *own* invariants and deliberately aborts — user code panics here are
/// recoverable: they're expected to happen (a buggy `Generator` is a normal
/// failure mode, not a broken scheduler invariant), so we propagate rather
/// than abort the process.
pub fn catch_user_code<F, R>(f: F) -> Result<R, Box<dyn Any + Send + 'static>>
where
    F: FnOnce() -> R,
{
    panic::catch_unwind(AssertUnwindSafe(f))
}
