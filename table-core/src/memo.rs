//! Dependency-array memoization
//!
//! Every derived value in a table (row models, ordered column lists, header
//! groups, per-row cells) is cached in a [`Memo`] keyed by the values it was
//! computed from. A cached value is returned as long as the dependencies
//! compare equal to the previous call; otherwise it is recomputed and replaced.
//!
//! Dependencies compare with [`PartialEq`]. Wrap a reference-counted value in
//! [`ById`] to compare it by identity instead of by content.

use std::any::Any;
use std::cell::Cell;
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;
use std::time::Instant;

/// Identity dependency: two `ById` values are equal only when they point at
/// the same allocation.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use table_core::memo::ById;
///
/// let a = Rc::new(vec![1, 2, 3]);
/// let b = Rc::new(vec![1, 2, 3]);
/// assert!(ById(a.clone()) == ById(a.clone()));
/// assert!(ById(a) != ById(b));
/// ```
#[derive(Clone)]
pub struct ById<T>(pub T);

impl<T: ?Sized> PartialEq for ById<Rc<T>> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: ?Sized> PartialEq for ById<Option<Rc<T>>> {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T> fmt::Debug for ById<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ById(..)")
    }
}

/// Instrumentation callbacks invoked around every recompute.
///
/// Hooks observe; they never change the cached value.
#[derive(Clone, Default)]
pub struct MemoHooks {
    /// Called with the memo key right before a recompute.
    pub before: Option<Rc<dyn Fn(&str)>>,
    /// Called with the memo key and the elapsed compute time.
    pub after: Option<Rc<dyn Fn(&str, Duration)>>,
}

impl MemoHooks {
    /// Creates an empty hook set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the before-compute hook.
    pub fn with_before(mut self, hook: impl Fn(&str) + 'static) -> Self {
        self.before = Some(Rc::new(hook));
        self
    }

    /// Sets the after-compute hook.
    pub fn with_after(mut self, hook: impl Fn(&str, Duration) + 'static) -> Self {
        self.after = Some(Rc::new(hook));
        self
    }
}

impl fmt::Debug for MemoHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoHooks")
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .finish()
    }
}

/// Per-memo settings.
#[derive(Debug, Clone, Default)]
pub struct MemoOptions {
    /// Name used in debug logs and passed to hooks.
    pub key: String,
    /// Log every recompute with its timing at debug level.
    pub debug: bool,
    /// Optional instrumentation callbacks.
    pub hooks: MemoHooks,
}

impl MemoOptions {
    /// Creates options for the given key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Enables or disables debug timing logs.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Sets the instrumentation hooks.
    pub fn with_hooks(mut self, hooks: MemoHooks) -> Self {
        self.hooks = hooks;
        self
    }
}

/// A single memoized value and the dependencies it was computed from.
pub struct Memo<D, R> {
    options: MemoOptions,
    cache: RefCell<Option<(D, Rc<R>)>>,
    computations: Cell<usize>,
}

impl<D: PartialEq, R> Memo<D, R> {
    /// Creates an empty memo.
    pub fn new(options: MemoOptions) -> Self {
        Self {
            options,
            cache: RefCell::new(None),
            computations: Cell::new(0),
        }
    }

    /// Returns the cached value when `deps` equal the previous dependencies,
    /// otherwise runs `compute` and caches its result.
    pub fn get(&self, deps: D, compute: impl FnOnce(&D) -> R) -> Rc<R> {
        match self.try_get::<Infallible>(deps, |deps| Ok(compute(deps))) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Fallible variant of [`Memo::get`].
    ///
    /// An error is returned to the caller and never cached; the previous
    /// entry stays in place and the next call recomputes.
    pub fn try_get<E>(&self, deps: D, compute: impl FnOnce(&D) -> Result<R, E>) -> Result<Rc<R>, E> {
        let cached = match self.cache.borrow().as_ref() {
            Some((previous, value)) if *previous == deps => Some(value.clone()),
            _ => None,
        };
        if let Some(value) = cached {
            return Ok(value);
        }

        if let Some(before) = &self.options.hooks.before {
            before(&self.options.key);
        }
        let started = Instant::now();
        let value = Rc::new(compute(&deps)?);
        let elapsed = started.elapsed();
        self.computations.set(self.computations.get() + 1);

        if self.options.debug {
            log::debug!("{}: {:.2}ms", self.options.key, elapsed.as_secs_f64() * 1000.0);
        }
        if let Some(after) = &self.options.hooks.after {
            after(&self.options.key, elapsed);
        }

        *self.cache.borrow_mut() = Some((deps, value.clone()));
        Ok(value)
    }

    /// Drops the cached value.
    pub fn reset(&self) {
        *self.cache.borrow_mut() = None;
    }

    /// Number of times `compute` has run.
    pub fn computations(&self) -> usize {
        self.computations.get()
    }

    /// Returns the memo options.
    pub fn options(&self) -> &MemoOptions {
        &self.options
    }
}

/// Wraps a dependency getter and a compute function into a memoized getter.
///
/// # Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use table_core::memo::memo;
/// use table_core::memo::MemoOptions;
///
/// let input = Rc::new(Cell::new(2));
/// let source = input.clone();
/// let doubled = memo(move || source.get(), |n: &i32| n * 2, MemoOptions::new("doubled"));
///
/// assert_eq!(*doubled(), 4);
/// input.set(5);
/// assert_eq!(*doubled(), 10);
/// ```
pub fn memo<D, R>(
    get_deps: impl Fn() -> D,
    compute: impl Fn(&D) -> R,
    options: MemoOptions,
) -> impl Fn() -> Rc<R>
where
    D: PartialEq,
{
    let cell = Memo::new(options);
    move || cell.get(get_deps(), &compute)
}

/// Keyed store of heterogeneous memos owned by an entity.
///
/// Each key holds one [`Memo`]; the dependency and result types for a key
/// are fixed by its first use.
#[derive(Default)]
pub struct MemoCache {
    cells: RefCell<HashMap<&'static str, Rc<dyn Any>>>,
}

impl MemoCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Memoized lookup for `key`, creating the memo with `options` on first use.
    pub fn get<D, R>(
        &self,
        key: &'static str,
        options: impl FnOnce() -> MemoOptions,
        deps: D,
        compute: impl FnOnce(&D) -> R,
    ) -> Rc<R>
    where
        D: PartialEq + 'static,
        R: 'static,
    {
        let cell = {
            let mut cells = self.cells.borrow_mut();
            cells
                .entry(key)
                .or_insert_with(|| Rc::new(Memo::<D, R>::new(options())) as Rc<dyn Any>)
                .clone()
        };
        match cell.downcast::<Memo<D, R>>() {
            Ok(memo) => memo.get(deps, compute),
            Err(_) => {
                log::warn!("memo key '{}' reused with different types; computing uncached", key);
                Rc::new(compute(&deps))
            }
        }
    }

    /// Drops every cached value.
    pub fn clear(&self) {
        self.cells.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_returns_cached_value_for_equal_deps() {
        let memo: Memo<(i32, String), i32> = Memo::new(MemoOptions::new("sum"));
        let first = memo.get((1, "a".to_string()), |(n, _)| n + 1);
        let second = memo.get((1, "a".to_string()), |(n, _)| n + 100);
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(*second, 2);
        assert_eq!(memo.computations(), 1);
    }

    #[test]
    fn test_recomputes_when_deps_change() {
        let memo: Memo<i32, i32> = Memo::new(MemoOptions::new("double"));
        assert_eq!(*memo.get(1, |n| n * 2), 2);
        assert_eq!(*memo.get(3, |n| n * 2), 6);
        assert_eq!(memo.computations(), 2);
    }

    #[test]
    fn test_identity_deps_ignore_content() {
        let memo: Memo<ById<Rc<Vec<i32>>>, usize> = Memo::new(MemoOptions::new("len"));
        let a = Rc::new(vec![1, 2]);
        let b = Rc::new(vec![1, 2]);
        memo.get(ById(a.clone()), |v| v.0.len());
        memo.get(ById(a), |v| v.0.len());
        assert_eq!(memo.computations(), 1);
        memo.get(ById(b), |v| v.0.len());
        assert_eq!(memo.computations(), 2);
    }

    #[test]
    fn test_failed_compute_is_not_cached() {
        let memo: Memo<i32, i32> = Memo::new(MemoOptions::new("fallible"));
        assert_eq!(*memo.try_get::<()>(1, |n| Ok(*n)).unwrap(), 1);
        assert!(memo.try_get(2, |_| Err("boom")).is_err());
        // the failure left no entry for deps = 2
        assert_eq!(*memo.try_get::<()>(2, |n| Ok(n * 10)).unwrap(), 20);
        assert_eq!(memo.computations(), 2);
    }

    #[test]
    fn test_hooks_observe_recomputes_only() {
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let hooks = MemoHooks::new().with_after(move |key, _| {
            assert_eq!(key, "hooked");
            seen.set(seen.get() + 1);
        });
        let memo: Memo<i32, i32> = Memo::new(MemoOptions::new("hooked").with_hooks(hooks));
        memo.get(1, |n| *n);
        memo.get(1, |n| *n);
        memo.get(2, |n| *n);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_reset_forces_recompute() {
        let memo: Memo<i32, i32> = Memo::new(MemoOptions::new("reset"));
        memo.get(1, |n| *n);
        memo.reset();
        memo.get(1, |n| *n);
        assert_eq!(memo.computations(), 2);
    }

    #[test]
    fn test_memo_cache_keeps_one_memo_per_key() {
        let cache = MemoCache::new();
        let a = cache.get("a", || MemoOptions::new("a"), 1, |n| n + 1);
        let b = cache.get("a", || MemoOptions::new("a"), 1, |n| n + 2);
        assert!(Rc::ptr_eq(&a, &b));
        let c = cache.get("b", || MemoOptions::new("b"), 1, |n| n + 2);
        assert_eq!(*c, 3);
    }
}
