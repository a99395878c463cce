use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Wall-clock milliseconds since the UNIX epoch, as stamped on records.
pub type EpochMs = i64;

pub fn now_ms() -> EpochMs {
    since_epoch_ms(SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default())
}

/// Saturates at `i64::MAX` rather than wrapping.
fn since_epoch_ms(elapsed: Duration) -> EpochMs {
    i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_and_saturates() {
        assert_eq!(since_epoch_ms(Duration::from_millis(1_500)), 1_500);
        assert_eq!(since_epoch_ms(Duration::MAX), i64::MAX);
        assert!(now_ms() > 0);
    }
}
