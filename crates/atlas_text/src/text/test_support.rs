//! Deterministic typeface for tests
//!
//! Every covered character advances 6px and rasterizes to a solid 5x7 block
//! sitting on the baseline, independent of the requested size.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use super::{FontError, FontResult, GlyphBitmap, GlyphMetrics, LineMetrics, Typeface};

pub(crate) const ADVANCE: f32 = 6.0;
pub(crate) const INK_WIDTH: u32 = 5;
pub(crate) const INK_HEIGHT: u32 = 7;

#[derive(Debug, Default)]
struct GateState {
    open: bool,
    arrived: usize,
}

/// Holds rasterization calls until opened, so a build can be parked mid-way
#[derive(Debug, Default)]
pub(crate) struct Gate {
    state: Mutex<GateState>,
    changed: Condvar,
}

impl Gate {
    fn state(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn pass(&self) {
        let mut state = self.state();
        state.arrived += 1;
        self.changed.notify_all();
        while !state.open {
            state = self.changed.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Block until some rasterization call is waiting at the gate
    pub(crate) fn wait_for_arrival(&self) {
        let mut state = self.state();
        while state.arrived == 0 {
            state = self.changed.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
    }

    pub(crate) fn open(&self) {
        self.state().open = true;
        self.changed.notify_all();
    }
}

#[derive(Debug)]
pub(crate) struct FixedTypeface {
    line_height: f32,
    uncovered: HashSet<char>,
    broken: HashSet<char>,
    seed: u64,
    gate: Option<Arc<Gate>>,
    rasterized: AtomicUsize,
}

impl FixedTypeface {
    pub(crate) fn new() -> Self {
        Self {
            line_height: 10.0,
            uncovered: HashSet::new(),
            broken: HashSet::new(),
            seed: 1,
            gate: None,
            rasterized: AtomicUsize::new(0),
        }
    }

    pub(crate) fn shared() -> Arc<dyn Typeface> {
        Arc::new(Self::new())
    }

    /// Characters with no glyph at all
    pub(crate) fn without(mut self, chars: &str) -> Self {
        self.uncovered.extend(chars.chars());
        self
    }

    /// Characters whose metrics exist but whose rasterization fails
    pub(crate) fn broken(mut self, chars: &str) -> Self {
        self.broken.extend(chars.chars());
        self
    }

    pub(crate) fn line_height(mut self, line_height: f32) -> Self {
        self.line_height = line_height;
        self
    }

    /// Distinct seeds stand in for distinct font files
    pub(crate) fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Every rasterization waits for `gate` to open
    pub(crate) fn gated(mut self, gate: Arc<Gate>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub(crate) fn rasterized(&self) -> usize {
        self.rasterized.load(Ordering::SeqCst)
    }

    fn covers(&self, ch: char) -> bool {
        !ch.is_control() && !self.uncovered.contains(&ch)
    }
}

impl Typeface for FixedTypeface {
    fn fingerprint(&self) -> u64 {
        self.seed
    }

    fn glyph_index(&self, ch: char) -> Option<u16> {
        self.covers(ch).then(|| (u32::from(ch) % 0xFFFF) as u16 + 1)
    }

    fn glyph_metrics(&self, ch: char, _px: f32) -> Option<GlyphMetrics> {
        if !self.covers(ch) {
            return None;
        }
        let (width, height) = if ch == ' ' { (0, 0) } else { (INK_WIDTH, INK_HEIGHT) };
        Some(GlyphMetrics {
            advance_width: ADVANCE,
            width,
            height,
            xmin: 0,
            ymin: 0,
        })
    }

    fn line_metrics(&self, _px: f32) -> LineMetrics {
        LineMetrics {
            ascent: 8.0,
            descent: -2.0,
            line_gap: self.line_height - 10.0,
            line_height: self.line_height,
        }
    }

    fn rasterize(&self, ch: char, px: f32) -> FontResult<GlyphBitmap> {
        if let Some(gate) = &self.gate {
            gate.pass();
        }
        if self.broken.contains(&ch) {
            return Err(FontError::Rasterize(ch, "broken outline".to_string()));
        }
        let metrics = self
            .glyph_metrics(ch, px)
            .ok_or_else(|| FontError::Rasterize(ch, "font has no glyph".to_string()))?;
        self.rasterized.fetch_add(1, Ordering::SeqCst);
        Ok(GlyphBitmap {
            metrics,
            coverage: vec![255; (metrics.width * metrics.height) as usize],
        })
    }
}
