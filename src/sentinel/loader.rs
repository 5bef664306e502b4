//! The external load-more operation.

use crate::model::LoadError;
use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use std::fmt::Display;
use std::future::Future;

/// Future returned by a load-more call.
///
/// Only its settlement matters to the controller; the resolved value has
/// already been discarded.
pub type LoadFuture = LocalBoxFuture<'static, Result<(), LoadError>>;

/// Something that can fetch more content.
///
/// Closures returning a future of `Result<V, E>` implement this directly:
///
/// ```
/// use infiniscroll::sentinel::LoadMore;
///
/// let mut loader = || async { Ok::<_, std::convert::Infallible>(vec![1, 2, 3]) };
/// let _settles = loader.load_more();
/// ```
pub trait LoadMore {
    /// Start a load. Called at most once per in-flight period.
    fn load_more(&mut self) -> LoadFuture;
}

impl<F, Fut, V, E> LoadMore for F
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<V, E>> + 'static,
    V: 'static,
    E: Display + 'static,
{
    fn load_more(&mut self) -> LoadFuture {
        (self)()
            .map(|outcome| outcome.map(drop).map_err(LoadError::failed))
            .boxed_local()
    }
}

/// Loader for hosts that supply no callback. Settles immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLoader;

impl LoadMore for NoopLoader {
    fn load_more(&mut self) -> LoadFuture {
        future::ready(Ok(())).boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn closure_value_is_discarded() {
        let mut loader = || async { Ok::<_, String>("page 2") };
        assert_eq!(block_on(loader.load_more()), Ok(()));
    }

    #[test]
    fn closure_error_becomes_load_error() {
        let mut loader = || async { Err::<(), _>("timeout") };
        assert_eq!(
            block_on(loader.load_more()),
            Err(LoadError::Failed("timeout".to_string()))
        );
    }

    #[test]
    fn noop_loader_settles_immediately() {
        assert_eq!(NoopLoader.load_more().now_or_never(), Some(Ok(())));
    }
}
