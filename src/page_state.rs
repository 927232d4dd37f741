//! 页面状态与路由存活检查
//!
//! 每次导航生成一个单调递增的代数 (`RouteToken`)。进行中的请求在完成时只有
//! 当它捕获的代数仍是当前代数时才会写回结果, 以免旧路由的响应覆盖新页面。

use serde::Serialize;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// 导航代数
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct RouteToken(u64);

#[derive(Debug, Default)]
pub struct RouteGuard {
    generation: AtomicU64,
}

impl RouteGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// 发生一次导航, 之前发出的所有代数失效
    pub fn navigate(&self) -> RouteToken {
        RouteToken(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn current(&self) -> RouteToken {
        RouteToken(self.generation.load(Ordering::SeqCst))
    }

    pub fn is_current(&self, token: RouteToken) -> bool {
        self.current() == token
    }
}

/// 页面当前可见的状态
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<T> {
    pub loading: bool,
    pub data: Option<T>,
    /// `loading` 从 true 变为 false 的次数
    pub completed_loads: usize,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            loading: true,
            data: None,
            completed_loads: 0,
        }
    }
}

/// 单个页面独占的加载状态
#[derive(Debug)]
pub struct PageState<T> {
    guard: RouteGuard,
    snapshot: Mutex<Snapshot<T>>,
}

impl<T: Clone> PageState<T> {
    pub fn new() -> Self {
        Self {
            guard: RouteGuard::new(),
            snapshot: Mutex::new(Snapshot::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Snapshot<T>> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 导航到新的路由参数, 进入加载状态
    pub fn begin(&self) -> RouteToken {
        let mut snapshot = self.lock();
        snapshot.loading = true;
        self.guard.navigate()
    }

    /// 写回加载结果; 代数已过期时丢弃并返回 false
    pub fn finish(&self, token: RouteToken, data: T) -> bool {
        let mut snapshot = self.lock();
        if !self.guard.is_current(token) {
            debug!("丢弃过期的页面结果: {:?}, 当前 {:?}", token, self.guard.current());
            return false;
        }

        snapshot.data = Some(data);
        snapshot.loading = false;
        snapshot.completed_loads += 1;
        true
    }

    /// `begin` + 等待 + `finish`
    pub async fn load<F>(&self, fut: F) -> bool
    where
        F: Future<Output = T>,
    {
        let token = self.begin();
        let data = fut.await;
        self.finish(token, data)
    }

    pub fn snapshot(&self) -> Snapshot<T> {
        self.lock().clone()
    }
}
