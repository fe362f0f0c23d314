//! Double-buffered per-vertex colors.
//!
//! The colorizer writes into a staged copy; [`ColorBuffer::publish`] copies
//! the written ranges into the published copy in one step, so a renderer
//! reading [`ColorFrame`] never sees a half-written band.

use std::ops::Range;

use crate::color::Rgba;

/// Staged and published vertex colors with change tracking.
#[derive(Debug)]
pub struct ColorBuffer {
    staged: Vec<Rgba>,
    published: Vec<Rgba>,
    pending: Vec<Range<usize>>,
    dirty: Vec<Range<usize>>,
    generation: u64,
}

/// Read-only view of the published colors.
#[derive(Clone, Copy, Debug)]
pub struct ColorFrame<'a> {
    /// One color per vertex.
    pub colors: &'a [Rgba],
    /// Bumped by every publish that changed something.
    pub generation: u64,
    /// Vertex ranges changed by the latest publish, sorted and disjoint.
    pub dirty: &'a [Range<usize>],
}

impl ColorFrame<'_> {
    /// Colors as raw bytes for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.colors)
    }

    /// Bytes of one dirty range, for partial uploads.
    pub fn range_bytes(&self, range: &Range<usize>) -> &[u8] {
        bytemuck::cast_slice(&self.colors[range.clone()])
    }
}

impl ColorBuffer {
    /// A buffer of `len` transparent colors.
    pub fn new(len: usize) -> Self {
        Self {
            staged: vec![Rgba::TRANSPARENT; len],
            published: vec![Rgba::TRANSPARENT; len],
            pending: Vec::new(),
            dirty: Vec::new(),
            generation: 0,
        }
    }

    /// Number of colors.
    pub fn len(&self) -> usize {
        self.published.len()
    }

    /// Returns true if the buffer holds no colors.
    pub fn is_empty(&self) -> bool {
        self.published.is_empty()
    }

    /// Publish counter.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Stage a single color.
    pub fn set(&mut self, index: usize, color: Rgba) {
        self.staged[index] = color;
        self.mark(index..index + 1);
    }

    /// Stage a contiguous range and hand it out for writing.
    pub fn stage_range(&mut self, range: Range<usize>) -> &mut [Rgba] {
        self.mark(range.clone());
        &mut self.staged[range]
    }

    /// Stage every color.
    pub fn stage_all(&mut self) -> &mut [Rgba] {
        let len = self.staged.len();
        self.stage_range(0..len)
    }

    fn mark(&mut self, range: Range<usize>) {
        if !range.is_empty() {
            self.pending.push(range);
        }
    }

    /// Copy staged ranges into the published buffer.
    ///
    /// Returns `false`, leaving the previous dirty list untouched, if nothing
    /// was staged since the last publish.
    pub fn publish(&mut self) -> bool {
        if self.pending.is_empty() {
            return false;
        }
        self.dirty = coalesce(std::mem::take(&mut self.pending));
        for range in &self.dirty {
            self.published[range.clone()].copy_from_slice(&self.staged[range.clone()]);
        }
        self.generation += 1;
        true
    }

    /// The published colors.
    pub fn frame(&self) -> ColorFrame<'_> {
        ColorFrame {
            colors: &self.published,
            generation: self.generation,
            dirty: &self.dirty,
        }
    }
}

/// Sort and merge touching or overlapping ranges.
fn coalesce(mut ranges: Vec<Range<usize>>) -> Vec<Range<usize>> {
    ranges.sort_unstable_by_key(|r| r.start);
    let mut merged: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
            _ => merged.push(range),
        }
    }
    merged
}
