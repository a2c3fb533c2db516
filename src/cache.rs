//! Per-document canonical buffers with change detection.
//!
//! [`DocumentCache`] owns one wide-RGBA buffer per document id, sized to the
//! full plane and always 4 components wide. Each batch conversion is merged
//! into the canonical buffer and compared against what was there before;
//! identical data yields [`ConversionResult::Unchanged`] so the caller can
//! skip its downstream update entirely.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use alloc::vec;
use alloc::vec::Vec;

use log::{debug, trace};

use crate::{BatchWindow, ConvertError, PixelBuffer, convert_window_vec};

/// Outcome of one batch conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConversionResult {
    /// The batch matched the cached data; nothing to send downstream.
    Unchanged,
    /// The merged window: `window.size() * 4` code units, every one ≤ 255.
    Updated(Vec<u16>),
}

impl ConversionResult {
    #[inline]
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    /// The updated window, if any.
    pub fn units(&self) -> Option<&[u16]> {
        match self {
            Self::Unchanged => None,
            Self::Updated(units) => Some(units),
        }
    }

    pub fn into_units(self) -> Option<Vec<u16>> {
        match self {
            Self::Unchanged => None,
            Self::Updated(units) => Some(units),
        }
    }
}

/// Cache of canonical per-document buffers.
///
/// All methods take `&self`; an internal mutex gives each conversion
/// exclusive access from resize check through merge, so the cache can sit
/// behind an `Arc` when the boundary calls in from more than one thread.
/// The pure converter runs outside the lock.
///
/// ```
/// use rechunk::{BatchWindow, DocumentCache, PixelBuffer, SourceLayout};
///
/// let cache = DocumentCache::new();
/// let data = [10u8, 20, 30, 40, 50, 60];
/// let buf = PixelBuffer::new(&data, 3, SourceLayout::Chunky).unwrap();
///
/// let result = cache.convert_batch(1, &buf, BatchWindow::full(2), false).unwrap();
/// // Every unit is 0-255, so the window is presentable to a UTF-16
/// // consumer as a string-like value.
/// let s = String::from_utf16(result.units().unwrap()).unwrap();
/// assert_eq!(s.chars().count(), 8);
///
/// assert!(cache.convert_batch(1, &buf, BatchWindow::full(2), false).unwrap().is_unchanged());
/// ```
#[derive(Debug, Default)]
pub struct DocumentCache {
    documents: Mutex<HashMap<i64, Vec<u16>>>,
}

impl DocumentCache {
    pub fn new() -> Self {
        Self {
            documents: Mutex::new(HashMap::new()),
        }
    }

    /// Convert one batch and merge it into the document's canonical buffer.
    ///
    /// The canonical buffer is created zero-filled on first sight of
    /// `document_id` and replaced whenever the incoming plane size no longer
    /// matches (the resize / reopened-document signal). The window is always
    /// written back; the return value reports whether anything differed.
    /// `force_update` turns an otherwise unchanged batch into
    /// [`ConversionResult::Updated`].
    pub fn convert_batch(
        &self,
        document_id: i64,
        buffer: &PixelBuffer<'_>,
        window: BatchWindow,
        force_update: bool,
    ) -> Result<ConversionResult, ConvertError> {
        let fresh = convert_window_vec(buffer, window)?;
        let required = buffer.plane_size() * 4;

        let mut documents = self.lock();
        let canonical = documents.entry(document_id).or_default();
        if canonical.len() != required {
            debug!(
                "document {document_id}: canonical buffer {} -> {required} units",
                canonical.len()
            );
            *canonical = vec![0; required];
        }

        let start = window.offset() * 4;
        let slice = canonical
            .get_mut(start..start + fresh.len())
            .ok_or(ConvertError::CanonicalSizeMismatch)?;

        let changed = slice[..] != fresh[..];
        slice.copy_from_slice(&fresh);

        trace!(
            "document {document_id}: batch offset {} size {} {}",
            window.offset(),
            window.size(),
            if changed { "changed" } else { "unchanged" }
        );

        if changed || force_update {
            Ok(ConversionResult::Updated(fresh))
        } else {
            Ok(ConversionResult::Unchanged)
        }
    }

    /// Drop the canonical buffer for `document_id`. No-op when absent.
    pub fn close_document(&self, document_id: i64) {
        if self.lock().remove(&document_id).is_some() {
            debug!("document {document_id}: closed, canonical buffer dropped");
        }
    }

    /// Number of documents currently cached.
    pub fn document_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<i64, Vec<u16>>> {
        // The canonical buffers stay internally consistent across panics;
        // recover the guard rather than wedge every later conversion.
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
