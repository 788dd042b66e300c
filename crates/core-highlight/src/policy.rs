// Error-density policy used in automatic mode: once enough words have been
// checked, a sample whose error share is above the limit switches checking
// off. Judging a sample resets the counters; an undersized sample keeps
// accumulating.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    InsufficientSample,
    Acceptable,
    TooManyErrors,
}

#[derive(Debug, Clone)]
pub struct DensityPolicy {
    min_words: u32,
    max_ratio: f64,
    checked: u32,
    errors: u32,
}

impl DensityPolicy {
    pub fn new(min_words: u32, max_ratio: f64) -> Self {
        Self {
            min_words: min_words.max(1),
            max_ratio,
            checked: 0,
            errors: 0,
        }
    }

    pub fn record(&mut self, correct: bool) {
        self.checked = self.checked.saturating_add(1);
        if !correct {
            self.errors = self.errors.saturating_add(1);
        }
    }

    pub fn checked(&self) -> u32 {
        self.checked
    }

    pub fn errors(&self) -> u32 {
        self.errors
    }

    pub fn reset(&mut self) {
        self.checked = 0;
        self.errors = 0;
    }

    pub fn evaluate(&mut self) -> Verdict {
        if self.checked < self.min_words {
            return Verdict::InsufficientSample;
        }
        let ratio = f64::from(self.errors) / f64::from(self.checked);
        self.reset();
        if ratio > self.max_ratio {
            Verdict::TooManyErrors
        } else {
            Verdict::Acceptable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(policy: &mut DensityPolicy, correct: u32, wrong: u32) {
        (0..correct).for_each(|_| policy.record(true));
        (0..wrong).for_each(|_| policy.record(false));
    }

    #[test]
    fn small_sample_is_not_judged() {
        let mut p = DensityPolicy::new(10, 0.4);
        sample(&mut p, 0, 9);
        assert_eq!(p.evaluate(), Verdict::InsufficientSample);
        assert_eq!(p.errors(), 9);
    }

    #[test]
    fn ratio_above_limit_trips_and_resets() {
        let mut p = DensityPolicy::new(10, 0.4);
        sample(&mut p, 5, 5);
        assert_eq!(p.evaluate(), Verdict::TooManyErrors);
        assert_eq!((p.checked(), p.errors()), (0, 0));
    }

    #[test]
    fn ratio_at_limit_is_acceptable() {
        let mut p = DensityPolicy::new(10, 0.4);
        sample(&mut p, 6, 4);
        assert_eq!(p.evaluate(), Verdict::Acceptable);
    }
}
