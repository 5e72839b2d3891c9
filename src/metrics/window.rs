use std::collections::VecDeque;
use serde::{Serialize, Deserialize};

/// Running average over the most recent `size` values.
///
/// The average is only reported once at least `min_size` values have been
/// added, so early noise does not show up as a trend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunningWindow {
    values: VecDeque<f32>,
    size: usize,
    min_size: usize,
    sum: f32,
}

impl RunningWindow {
    pub fn new(size: usize, min_size: usize) -> Self {
        RunningWindow {
            values: VecDeque::with_capacity(size),
            size: size.max(1),
            min_size,
            sum: 0.0,
        }
    }

    pub fn add(&mut self, value: f32) {
        self.values.push_back(value);
        self.sum += value;
        if self.values.len() > self.size {
            if let Some(oldest) = self.values.pop_front() {
                self.sum -= oldest;
            }
        }
    }

    /// Mean of the window, or `None` while fewer than `min_size` values are held
    pub fn average(&self) -> Option<f32> {
        if self.values.is_empty() || self.values.len() < self.min_size {
            None
        } else {
            Some(self.sum / self.values.len() as f32)
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn reset(&mut self) {
        self.values.clear();
        self.sum = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_needs_min_size() {
        let mut window = RunningWindow::new(10, 3);
        window.add(1.0);
        window.add(2.0);
        assert_eq!(window.average(), None);
        window.add(3.0);
        assert_eq!(window.average(), Some(2.0));
    }

    #[test]
    fn test_oldest_values_drop_out() {
        let mut window = RunningWindow::new(2, 1);
        window.add(10.0);
        window.add(1.0);
        window.add(3.0);
        assert_eq!(window.len(), 2);
        assert_eq!(window.average(), Some(2.0));
    }

    #[test]
    fn test_reset() {
        let mut window = RunningWindow::new(4, 1);
        window.add(5.0);
        window.reset();
        assert!(window.is_empty());
        assert_eq!(window.average(), None);
    }
}
