//! Frame-rate diagnostics

use std::collections::VecDeque;

use crate::consts::FPS_HISTORY_CAPACITY;

/// Rolling window of recent FPS samples (oldest evicted first)
#[derive(Debug, Clone)]
pub struct FpsHistory {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl Default for FpsHistory {
    fn default() -> Self {
        Self::with_capacity(FPS_HISTORY_CAPACITY)
    }
}

impl FpsHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn push(&mut self, fps: f32) {
        self.samples.push_back(fps);
        if self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Record a frame interval; non-positive intervals are ignored
    pub fn push_interval(&mut self, interval_ms: f64) -> Option<f32> {
        if !(interval_ms > 0.0) {
            return None;
        }
        let fps = (1000.0 / interval_ms) as f32;
        self.push(fps);
        Some(fps)
    }

    /// Arithmetic mean of the window
    pub fn mean(&self) -> Option<f32> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f32>() / self.samples.len() as f32)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.samples.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_evicts_oldest() {
        let mut history = FpsHistory::default();
        for i in 1..=101 {
            history.push(i as f32);
        }
        assert_eq!(history.len(), 100);
        assert_eq!(history.iter().next(), Some(2.0));
        // Mean of 2..=101
        assert!((history.mean().unwrap() - 51.5).abs() < 1e-4);
    }

    #[test]
    fn test_interval_to_fps() {
        let mut history = FpsHistory::default();
        assert_eq!(history.mean(), None);
        assert_eq!(history.push_interval(0.0), None);
        assert_eq!(history.push_interval(-3.0), None);
        assert!(history.is_empty());

        assert_eq!(history.push_interval(20.0), Some(50.0));
        assert_eq!(history.push_interval(10.0), Some(100.0));
        assert_eq!(history.mean(), Some(75.0));
    }

    proptest! {
        #[test]
        fn prop_mean_of_last_100(samples in proptest::collection::vec(1.0f32..240.0, 0..400)) {
            let mut history = FpsHistory::default();
            for &s in &samples {
                history.push(s);
                prop_assert!(history.len() <= FPS_HISTORY_CAPACITY);
            }

            let tail: Vec<f32> = samples.iter().rev().take(100).rev().copied().collect();
            prop_assert_eq!(history.iter().collect::<Vec<_>>(), tail.clone());
            if !tail.is_empty() {
                let expected = tail.iter().sum::<f32>() / tail.len() as f32;
                prop_assert!((history.mean().unwrap() - expected).abs() < 1e-3);
            }
        }
    }
}
