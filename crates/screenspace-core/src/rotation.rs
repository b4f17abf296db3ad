//! Round-robin content-source rotation.
//!
//! Every source handed out by [`SourceRotation::next`] goes straight back to
//! the tail of the cycle. The rotation never shrinks, so sources are reused
//! once the cycle wraps, including sources still playing on an earlier screen.

use std::collections::VecDeque;

use crate::media::ContentSource;

/// Fixed catalog of content sources, dispensed in cycle order.
#[derive(Debug, Clone, Default)]
pub struct SourceRotation {
    queue: VecDeque<ContentSource>,
}

impl SourceRotation {
    /// Creates a rotation. The catalog order is the cycle order.
    pub fn new(catalog: impl IntoIterator<Item = ContentSource>) -> Self {
        Self {
            queue: catalog.into_iter().collect(),
        }
    }

    /// Returns the source at the front of the cycle and moves it to the back.
    ///
    /// Returns `None` for an empty rotation.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<ContentSource> {
        let source = self.queue.pop_front()?;
        self.queue.push_back(source.clone());
        Some(source)
    }

    /// The source the next call to [`next`](Self::next) will return.
    pub fn front(&self) -> Option<&ContentSource> {
        self.queue.front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Iterates the catalog in current cycle order.
    pub fn iter(&self) -> impl Iterator<Item = &ContentSource> {
        self.queue.iter()
    }
}

impl FromIterator<ContentSource> for SourceRotation {
    fn from_iter<I: IntoIterator<Item = ContentSource>>(iter: I) -> Self {
        Self::new(iter)
    }
}
