use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::{VitalsError, VitalsResult};

/// Handle to background work started by the session controller.
///
/// Dropping the handle detaches the work; it still runs to completion.
pub struct TaskHandle<T> {
    id: Uuid,
    cancel_token: CancellationToken,
    handle: JoinHandle<VitalsResult<T>>,
}

impl<T> TaskHandle<T> {
    pub(crate) fn new(
        id: Uuid,
        cancel_token: CancellationToken,
        handle: JoinHandle<VitalsResult<T>>,
    ) -> Self {
        Self {
            id,
            cancel_token,
            handle,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Ask the work to stop at its next checkpoint. Work that already
    /// finished is unaffected.
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub async fn join(self) -> VitalsResult<T> {
        match self.handle.await {
            Ok(result) => result,
            Err(join_err) if join_err.is_cancelled() => Err(VitalsError::Cancelled),
            Err(join_err) => Err(VitalsError::Task(join_err.to_string())),
        }
    }
}
