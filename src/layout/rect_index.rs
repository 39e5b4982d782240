use std::sync::Arc;

use crate::models::{RenderedSentence, ScrollOffset, SentenceRect};

/// Document-space bounds of every rendered sentence.
///
/// The whole set is recomputed on each rebuild and swapped in with a single
/// assignment, so a reader holding a [`snapshot`](Self::snapshot) never sees a
/// mix of old and new rects.
#[derive(Debug, Clone)]
pub struct SentenceRectIndex {
    rects: Arc<[SentenceRect]>,
}

impl Default for SentenceRectIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SentenceRectIndex {
    pub fn new() -> Self {
        Self {
            rects: Arc::from(Vec::new()),
        }
    }

    /// Rebuild from the renderer's viewport boxes, shifting them by the page
    /// scroll offset. Element order defines the sentence index.
    pub fn rebuild(
        &mut self,
        elements: &[RenderedSentence],
        scroll: ScrollOffset,
    ) {
        let rects: Vec<SentenceRect> = elements
            .iter()
            .enumerate()
            .map(|(index, el)| SentenceRect {
                index,
                top: el.top + scroll.y,
                bottom: el.bottom + scroll.y,
                left: el.left + scroll.x,
                right: el.right + scroll.x,
            })
            .collect();

        self.rects = Arc::from(rects);
    }

    pub fn snapshot(&self) -> Arc<[SentenceRect]> {
        Arc::clone(&self.rects)
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn clear(&mut self) {
        self.rects = Arc::from(Vec::new());
    }
}
