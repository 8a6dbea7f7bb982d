use std::ops::Sub;

/// Running minimum and maximum over observed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MinMaxTracker<T> {
    bounds: Option<(T, T)>,
}

impl<T: Copy + Ord + Default> MinMaxTracker<T> {
    pub fn new() -> Self {
        Self { bounds: None }
    }

    pub fn update(&mut self, value: T) {
        self.bounds = Some(match self.bounds {
            Some((min, max)) => (min.min(value), max.max(value)),
            None => (value, value),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    pub fn min(&self) -> T {
        self.bounds.map(|(min, _)| min).unwrap_or_default()
    }

    pub fn max(&self) -> T {
        self.bounds.map(|(_, max)| max).unwrap_or_default()
    }
}

impl<T: Copy + Ord + Default + Sub<Output = T>> MinMaxTracker<T> {
    pub fn spread(&self) -> T {
        self.max() - self.min()
    }
}
