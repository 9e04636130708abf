//! `compose`, `choose`, `filter_p` and `map`.

use std::sync::Arc;

use crate::core::Context;

use super::{fail, BoxPart, Next, Part, Task};

/// Sequencing of two parts. See [`compose`].
pub struct Compose<A, B> {
    first: A,
    second: Arc<B>,
}

/// Run `a` with a continuation that runs `b` with the original `next`.
///
/// If `a` never calls its continuation, neither `b` nor `next` run.
pub fn compose<A: Part, B: Part>(a: A, b: B) -> Compose<A, B> {
    Compose {
        first: a,
        second: Arc::new(b),
    }
}

impl<A: Part, B: Part> Part for Compose<A, B> {
    fn call(&self, next: Next, ctx: Context) -> Task {
        let second = Arc::clone(&self.second);
        let inner = Next::new(move |x| second.call(next.clone(), x));
        self.first.call(inner, ctx)
    }
}

/// Ordered alternation. See [`choose`].
pub struct Choose {
    parts: Arc<[BoxPart]>,
}

impl Choose {
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Try `parts` in order with the same `next` and context.
///
/// The first `Some` wins and later parts are not evaluated. Each part starts
/// only after the previous one resolved.
pub fn choose(parts: Vec<BoxPart>) -> Choose {
    Choose {
        parts: parts.into(),
    }
}

impl Part for Choose {
    fn call(&self, next: Next, ctx: Context) -> Task {
        let parts = Arc::clone(&self.parts);
        Box::pin(async move {
            for part in parts.iter() {
                if let Some(done) = part.call(next.clone(), ctx.clone()).await {
                    return Some(done);
                }
            }
            None
        })
    }
}

/// Guard on a predicate. See [`filter_p`].
pub struct Filter<F> {
    predicate: F,
}

/// Continue unchanged when `predicate` holds, decline otherwise.
pub fn filter_p<F>(predicate: F) -> Filter<F>
where
    F: Fn(&Context) -> bool + Send + Sync + 'static,
{
    Filter { predicate }
}

impl<F> Part for Filter<F>
where
    F: Fn(&Context) -> bool + Send + Sync + 'static,
{
    #[inline]
    fn call(&self, next: Next, ctx: Context) -> Task {
        if (self.predicate)(&ctx) {
            next.run(ctx)
        } else {
            fail()
        }
    }
}

/// Pass-through transformer. See [`map`].
pub struct Map<F> {
    f: F,
}

/// Replace the context with `f(ctx)` and always continue.
pub fn map<F>(f: F) -> Map<F>
where
    F: Fn(Context) -> Context + Send + Sync + 'static,
{
    Map { f }
}

impl<F> Part for Map<F>
where
    F: Fn(Context) -> Context + Send + Sync + 'static,
{
    #[inline]
    fn call(&self, next: Next, ctx: Context) -> Task {
        next.run((self.f)(ctx))
    }
}
