//! Overlapped Window Iteration

use crate::engine::SpectralEngine;
use crate::features::SpectralFeatures;

/// Hop-advanced windows over a sample buffer.
///
/// Yields `buffer[start..start + size]` for `start = 0, hop, 2*hop, ...` while
/// a full window fits. A buffer shorter than `size` yields itself once.
#[derive(Debug, Clone)]
pub struct WindowSlices<'a> {
    buffer: &'a [f64],
    size: usize,
    hop: usize,
    start: usize,
    done: bool,
}

impl<'a> WindowSlices<'a> {
    /// Windows of `size` samples, advanced by `hop` (at least 1)
    pub fn new(buffer: &'a [f64], size: usize, hop: usize) -> Self {
        Self {
            buffer,
            size,
            hop: hop.max(1),
            start: 0,
            done: false,
        }
    }
}

impl<'a> Iterator for WindowSlices<'a> {
    type Item = &'a [f64];

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if self.buffer.len() < self.size {
            self.done = true;
            return Some(self.buffer);
        }

        let end = self.start + self.size;
        if end > self.buffer.len() {
            self.done = true;
            return None;
        }

        let window = &self.buffer[self.start..end];
        self.start += self.hop;
        Some(window)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        if self.buffer.len() < self.size {
            return (1, Some(1));
        }
        let remaining = self.buffer.len() - self.size;
        let count = if self.start > remaining {
            0
        } else {
            (remaining - self.start) / self.hop + 1
        };
        (count, Some(count))
    }
}

impl ExactSizeIterator for WindowSlices<'_> {}

/// Lazy sequence of per-window spectral features
#[derive(Debug, Clone)]
pub struct OverlapWindows<'a> {
    engine: &'a SpectralEngine,
    windows: WindowSlices<'a>,
}

impl<'a> OverlapWindows<'a> {
    pub(crate) fn new(engine: &'a SpectralEngine, windows: WindowSlices<'a>) -> Self {
        Self { engine, windows }
    }
}

impl Iterator for OverlapWindows<'_> {
    type Item = SpectralFeatures;

    fn next(&mut self) -> Option<Self::Item> {
        self.windows.next().map(|window| self.engine.analyze(window))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.windows.size_hint()
    }
}

impl ExactSizeIterator for OverlapWindows<'_> {}
