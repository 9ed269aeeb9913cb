use std::fmt;
use std::sync::Arc;

use crate::error::DispatchError;

use super::story::Story;

type Listener = Arc<dyn Fn(&mut Story) -> Result<(), DispatchError> + Send + Sync>;

/// Well-known dispatch priorities. Higher runs first.
pub struct DispatchPriority;

impl DispatchPriority {
    pub const MESSAGE_DECORATOR: i32 = 90_000;
    pub const ROUTE: i32 = 20_000;
    pub const INVOKE_HANDLER: i32 = 0;
}

/// Ordered dispatch hooks.
///
/// Listeners run from the highest priority to the lowest; listeners sharing a
/// priority run in the order they were attached. The first error stops the run.
#[derive(Clone, Default)]
pub struct Tracker {
    listeners: Vec<(i32, Listener)>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_dispatch<F>(&mut self, priority: i32, listener: F)
    where
        F: Fn(&mut Story) -> Result<(), DispatchError> + Send + Sync + 'static,
    {
        let at = self
            .listeners
            .iter()
            .position(|(existing, _)| *existing < priority)
            .unwrap_or(self.listeners.len());

        self.listeners.insert(at, (priority, Arc::new(listener)));
    }

    pub fn dispatch(&self, story: &mut Story) -> Result<(), DispatchError> {
        for (_, listener) in &self.listeners {
            listener(story)?;
        }
        Ok(())
    }

    /// Attached priorities, in run order.
    pub fn priorities(&self) -> Vec<i32> {
        self.listeners.iter().map(|(priority, _)| *priority).collect()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("priorities", &self.priorities())
            .finish()
    }
}

/// Something that hooks into a [`Tracker`].
pub trait MessageSubscriber: Send + Sync {
    fn attach_to(self: Arc<Self>, tracker: &mut Tracker);
}
