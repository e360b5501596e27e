use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Latest value of a vital as shown to the user.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    /// 0.0 until a measurement completes.
    pub value: f64,
    pub measured_at: Option<DateTime<Utc>>,
}

impl Estimate {
    pub fn unmeasured() -> Self {
        Self::default()
    }

    pub fn now(value: f64) -> Self {
        Self {
            value,
            measured_at: Some(Utc::now()),
        }
    }

    pub fn is_measured(&self) -> bool {
        self.measured_at.is_some()
    }
}

/// Publish-subscribe cell: writers replace the value, subscribers see the
/// latest one and are woken on change.
#[derive(Debug, Clone)]
pub struct ValueCell<T> {
    sender: std::sync::Arc<watch::Sender<T>>,
}

impl<T: Clone> ValueCell<T> {
    pub fn new(initial: T) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: std::sync::Arc::new(sender),
        }
    }

    pub fn get(&self) -> T {
        self.sender.borrow().clone()
    }

    pub fn set(&self, value: T) {
        self.sender.send_replace(value);
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }
}

impl<T: Clone + Default> Default for ValueCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
