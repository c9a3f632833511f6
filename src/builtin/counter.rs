use async_trait::async_trait;

use crate::Producer;



/// Sequence policy of the generator: `start`, `start + step`, ...
///
/// Defaults to 1, 2, 3, ... Runs dry instead of wrapping once the next
/// value would leave the `i64` range.
#[derive(Debug, Clone)]
pub struct Counter {
    next: Option<i64>,
    step: i64
}

impl Counter {
    pub fn new(start: i64, step: i64) -> Self {
        Counter {
            next: Some(start),
            step
        }
    }
}

impl Default for Counter {
    fn default() -> Self {
        Counter::new(1, 1)
    }
}


#[async_trait]
impl Producer<i64> for Counter {

    async fn init(&mut self) { }

    async fn terminate(&mut self) { }

    #[inline]
    fn produce(&mut self) -> Option<i64> {
        let v = self.next?;
        self.next = v.checked_add(self.step);
        Some(v)
    }
}



#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_one() {
        let mut c = Counter::default();
        let got: Vec<i64> = (0..4).filter_map(|_| c.produce()).collect();
        assert_eq!(got, vec![1, 2, 3, 4]);
    }

    #[test]
    fn custom_step() {
        let mut c = Counter::new(10, 5);
        assert_eq!(c.produce(), Some(10));
        assert_eq!(c.produce(), Some(15));
    }

    #[test]
    fn runs_dry_at_i64_max() {
        let mut c = Counter::new(i64::MAX, 1);
        assert_eq!(c.produce(), Some(i64::MAX));
        assert_eq!(c.produce(), None);
        assert_eq!(c.produce(), None);
    }
}
