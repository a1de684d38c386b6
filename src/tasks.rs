//! 可取消任务原语
//!
//! - [`TaskSlot`]：单槽位，启动新任务时取消上一个（"取消旧的、启动新的"）
//! - [`TaskRegistry`]：按 key 登记的取消令牌 + TaskTracker，保证同一 key 至多一个在途任务，
//!   并在关闭时等待所有被追踪的任务结束

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// 槽位中当前任务的句柄
#[derive(Debug, Clone)]
pub struct SlotTicket {
    pub generation: u64,
    pub token: CancellationToken,
}

/// 单槽位任务：同一时间只有一个任务有效
pub struct TaskSlot {
    name: &'static str,
    current: Mutex<Option<SlotTicket>>,
    next_generation: AtomicU64,
}

impl TaskSlot {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            current: Mutex::new(None),
            next_generation: AtomicU64::new(1),
        }
    }

    /// 取消上一个任务并登记一个新的
    pub fn replace(&self) -> SlotTicket {
        let ticket = SlotTicket {
            generation: self.next_generation.fetch_add(1, Ordering::Relaxed),
            token: CancellationToken::new(),
        };
        let mut guard = self.current.lock().unwrap_or_else(|poisoned| {
            log::error!("[TaskSlot:{}] Mutex poisoned during replace! Attempting recovery", self.name);
            poisoned.into_inner()
        });
        if let Some(previous) = guard.replace(ticket.clone()) {
            previous.token.cancel();
            log::debug!(
                "[TaskSlot:{}] Cancelled generation {} (replaced by {})",
                self.name,
                previous.generation,
                ticket.generation
            );
        }
        ticket
    }

    /// 取消当前任务
    pub fn cancel(&self) -> bool {
        let mut guard = self.current.lock().unwrap_or_else(|poisoned| {
            log::error!("[TaskSlot:{}] Mutex poisoned during cancel! Attempting recovery", self.name);
            poisoned.into_inner()
        });
        match guard.take() {
            Some(ticket) => {
                ticket.token.cancel();
                log::debug!("[TaskSlot:{}] Cancelled generation {}", self.name, ticket.generation);
                true
            }
            None => false,
        }
    }

    /// 任务结束后清理槽位；只有仍是当前任务时才清理
    pub fn finish(&self, generation: u64) {
        let mut guard = self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if guard.as_ref().map(|t| t.generation) == Some(generation) {
            guard.take();
        }
    }

    /// 该 generation 是否仍是当前任务
    pub fn is_current(&self, generation: u64) -> bool {
        let guard = self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.as_ref().map(|t| t.generation) == Some(generation)
    }

    pub fn is_active(&self) -> bool {
        let guard = self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.is_some()
    }
}

/// 按 key 登记的在途任务
pub struct TaskRegistry {
    name: &'static str,
    active: Mutex<HashMap<String, CancellationToken>>,
    task_tracker: TaskTracker,
}

impl TaskRegistry {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            active: Mutex::new(HashMap::new()),
            task_tracker: TaskTracker::new(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CancellationToken>> {
        self.active.lock().unwrap_or_else(|poisoned| {
            log::error!("[TaskRegistry:{}] Mutex poisoned! Attempting recovery", self.name);
            poisoned.into_inner()
        })
    }

    /// 登记 key；已有在途任务时返回 `None`
    pub fn try_register(&self, key: &str) -> Option<CancellationToken> {
        let mut guard = self.lock();
        if guard.contains_key(key) {
            log::debug!("[TaskRegistry:{}] {} already in flight", self.name, key);
            return None;
        }
        let token = CancellationToken::new();
        guard.insert(key.to_string(), token.clone());
        Some(token)
    }

    /// 登记 key 的子令牌（父令牌取消时一并取消）
    pub fn try_register_child(&self, key: &str, parent: &CancellationToken) -> Option<CancellationToken> {
        let mut guard = self.lock();
        if guard.contains_key(key) {
            return None;
        }
        let token = parent.child_token();
        guard.insert(key.to_string(), token.clone());
        Some(token)
    }

    pub fn cancel(&self, key: &str) -> bool {
        match self.lock().remove(key) {
            Some(token) => {
                token.cancel();
                log::info!("[TaskRegistry:{}] Cancelled {}", self.name, key);
                true
            }
            None => false,
        }
    }

    /// 任务完成或出错后移除，不触发取消
    pub fn remove(&self, key: &str) {
        self.lock().remove(key);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    pub fn active_count(&self) -> usize {
        self.lock().len()
    }

    pub fn cancel_all(&self) -> usize {
        let drained: Vec<(String, CancellationToken)> = self.lock().drain().collect();
        for (_, token) in &drained {
            token.cancel();
        }
        if !drained.is_empty() {
            log::info!("[TaskRegistry:{}] Cancelled {} tasks", self.name, drained.len());
        }
        drained.len()
    }

    /// 启动被追踪的异步任务
    pub fn spawn_tracked<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.task_tracker.spawn(future)
    }

    /// 取消全部任务并等待被追踪的任务结束
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        self.cancel_all();
        self.task_tracker.close();
        if self.task_tracker.is_empty() {
            return true;
        }
        match tokio::time::timeout(timeout, self.task_tracker.wait()).await {
            Ok(()) => {
                log::info!("[TaskRegistry:{}] All tracked tasks completed", self.name);
                true
            }
            Err(_) => {
                log::warn!(
                    "[TaskRegistry:{}] Timeout waiting for tasks, {} may still be running",
                    self.name,
                    self.task_tracker.len()
                );
                false
            }
        }
    }
}
