use std::sync::{Mutex, MutexGuard, PoisonError};

use kindle_engine::{ArticleQueue, DeliveryPipeline};

/// Shared by every handler. The queue lock is never held across an await.
pub struct AppState {
    pub pipeline: DeliveryPipeline,
    queue: Mutex<ArticleQueue>,
}

impl AppState {
    pub fn new(pipeline: DeliveryPipeline) -> Self {
        Self {
            pipeline,
            queue: Mutex::new(ArticleQueue::new()),
        }
    }

    pub fn queue(&self) -> MutexGuard<'_, ArticleQueue> {
        // Queue operations cannot leave it half-updated, so a poisoned
        // lock still guards a consistent list.
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
