//! Exponential smoothing.

/// One step of an exponential moving average.
///
/// `alpha` is the weight of the newest sample: 1.0 tracks the raw signal
/// exactly, values near 0 reject more noise at the cost of lag.
#[inline]
pub fn smooth(previous: f32, raw: f32, alpha: f32) -> f32 {
    previous + alpha * (raw - previous)
}

/// Per-quantity EMA state for a channel measuring `N` quantities.
///
/// The first sample is taken verbatim so the output never ramps up from an
/// implicit zero prior.
#[derive(Debug, Clone, Copy)]
pub struct Smoother<const N: usize> {
    alpha: f32,
    state: Option<[f32; N]>,
}

impl<const N: usize> Smoother<N> {
    pub fn new(alpha: f32) -> Self {
        Self { alpha, state: None }
    }

    /// Fold a raw sample in and return the new filtered values.
    pub fn update(&mut self, raw: [f32; N]) -> [f32; N] {
        let next = match self.state {
            None => raw,
            Some(prev) => {
                let mut out = prev;
                for (o, r) in out.iter_mut().zip(raw) {
                    *o = smooth(*o, r, self.alpha);
                }
                out
            }
        };
        self.state = Some(next);
        next
    }

    pub fn value(&self) -> Option<[f32; N]> {
        self.state
    }
}
