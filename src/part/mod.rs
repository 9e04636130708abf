//! Composable request-handling parts.
//!
//! A [`Part`] receives the current [`Context`] and a [`Next`] continuation
//! standing for the rest of the pipeline. It decides whether to call `next`,
//! with which context, and returns a [`Task`] that resolves to:
//!
//! - `Some(ctx)` - the request was handled; `ctx` is the final context
//! - `None` - the part declined; an enclosing [`choose`] tries the next option
//!
//! Route misses are data, never panics or errors.
//!
//! # Lifecycle
//!
//! ```text
//! compose(a, b)(next, ctx)  =  a(|x| b(next, x), ctx)
//!
//! choose([p1, p2, p3])      p1 ──None──▶ p2 ──None──▶ p3 ──None──▶ None
//!                            │            │            │
//!                          Some         Some         Some
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use webparts::prelude::*;
//!
//! let app = choose![
//!     chain![get(), path("/"), plain_text("home")],
//!     chain![get(), path_prefix("/api"), json(&serde_json::json!({"ok": true}))],
//! ];
//! ```

mod combinators;

pub use combinators::{choose, compose, filter_p, map, Choose, Compose, Filter, Map};

use std::fmt;
use std::sync::Arc;

use futures_util::future::{self, BoxFuture};

use crate::core::Context;

/// Single-resolution asynchronous outcome of a part.
pub type Task = BoxFuture<'static, Option<Context>>;

/// Type-erased part, the form stored in collections such as [`choose`].
pub type BoxPart = Arc<dyn Part>;

/// A part: the unit of composition.
pub trait Part: Send + Sync + 'static {
    /// Handle `ctx`, calling `next` to continue the pipeline.
    fn call(&self, next: Next, ctx: Context) -> Task;
}

impl<P: Part + ?Sized> Part for Arc<P> {
    #[inline]
    fn call(&self, next: Next, ctx: Context) -> Task {
        (**self).call(next, ctx)
    }
}

impl<P: Part + ?Sized> Part for Box<P> {
    #[inline]
    fn call(&self, next: Next, ctx: Context) -> Task {
        (**self).call(next, ctx)
    }
}

/// The rest of the pipeline, as seen by a part.
#[derive(Clone)]
pub struct Next(Arc<dyn Fn(Context) -> Task + Send + Sync>);

impl Next {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Context) -> Task + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Continue with `ctx`.
    #[inline]
    pub fn run(&self, ctx: Context) -> Task {
        (self.0)(ctx)
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Next")
    }
}

/// Pre-resolved declining task.
#[inline]
pub fn fail() -> Task {
    Box::pin(future::ready(None))
}

/// Terminal continuation: accepts whatever context reaches it.
pub fn accept() -> Next {
    Next::new(|ctx| Box::pin(future::ready(Some(ctx))))
}

/// Part built from a closure.
pub struct FnPart<F>(F);

impl<F> Part for FnPart<F>
where
    F: Fn(Next, Context) -> Task + Send + Sync + 'static,
{
    #[inline]
    fn call(&self, next: Next, ctx: Context) -> Task {
        (self.0)(next, ctx)
    }
}

/// Wrap a `(next, ctx) -> task` closure as a part.
pub fn from_fn<F>(f: F) -> FnPart<F>
where
    F: Fn(Next, Context) -> Task + Send + Sync + 'static,
{
    FnPart(f)
}

/// Extension methods for parts.
pub trait PartExt: Part + Sized {
    /// Sequence: run `self`, then `other`, then the outer continuation.
    fn then<B: Part>(self, other: B) -> Compose<Self, B> {
        compose(self, other)
    }

    /// Erase the type for storage in a collection.
    fn boxed(self) -> BoxPart {
        Arc::new(self)
    }

    /// Run the part to completion against [`accept`].
    fn run(&self, ctx: Context) -> Task {
        self.call(accept(), ctx)
    }
}

impl<P: Part> PartExt for P {}

/// Fold parts left to right with [`compose`].
///
/// `chain![a, b, c]` is `compose(compose(a, b), c)`.
#[macro_export]
macro_rules! chain {
    (@fold $acc:expr; $next:expr) => {
        $crate::part::compose($acc, $next)
    };
    (@fold $acc:expr; $next:expr, $($rest:expr),+) => {
        $crate::chain!(@fold $crate::part::compose($acc, $next); $($rest),+)
    };
    ($first:expr $(,)?) => { $first };
    ($first:expr, $($rest:expr),+ $(,)?) => {
        $crate::chain!(@fold $first; $($rest),+)
    };
}

/// Ordered alternation over heterogeneous parts.
///
/// `choose![a, b]` boxes each part and calls [`choose`].
#[macro_export]
macro_rules! choose {
    ($($part:expr),* $(,)?) => {
        $crate::part::choose(vec![$($crate::part::PartExt::boxed($part)),*])
    };
}
