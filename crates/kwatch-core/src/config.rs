use std::str::FromStr;
use std::time::Duration;

use crate::{error::ConfigError, model::Status, policy::TerminationPolicy};

/// Completion policy selector as spelled on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PollUntil {
    #[default]
    Known,
    Current,
    Deleted,
    Forever,
}

impl PollUntil {
    pub fn policy(self) -> TerminationPolicy {
        match self {
            PollUntil::Known => TerminationPolicy::AllKnown,
            PollUntil::Current => TerminationPolicy::ReachedStatus(Status::Current),
            PollUntil::Deleted => TerminationPolicy::ReachedStatus(Status::NotFound),
            PollUntil::Forever => TerminationPolicy::Forever,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PollUntil::Known => "known",
            PollUntil::Current => "current",
            PollUntil::Deleted => "deleted",
            PollUntil::Forever => "forever",
        }
    }
}

impl FromStr for PollUntil {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "known" => Ok(PollUntil::Known),
            "current" => Ok(PollUntil::Current),
            "deleted" => Ok(PollUntil::Deleted),
            "forever" => Ok(PollUntil::Forever),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Parameters of one watch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WatchConfig {
    pub poll_period: Duration,
    pub poll_until: PollUntil,
    /// `None` disables the deadline.
    pub timeout: Option<Duration>,
    pub use_cache: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_period: Duration::from_secs(2),
            poll_until: PollUntil::Known,
            timeout: None,
            use_cache: true,
        }
    }
}

impl WatchConfig {
    /// Builds a config from flag-style strings, failing fast on bad input.
    pub fn from_flags(poll_period: &str, poll_until: &str, timeout: &str) -> Result<Self, ConfigError> {
        let poll_period = parse_duration(poll_period)?;
        if poll_period.is_zero() {
            return Err(ConfigError::ZeroPollPeriod);
        }
        let timeout = parse_duration(timeout)?;
        Ok(Self {
            poll_period,
            poll_until: poll_until.parse()?,
            timeout: (!timeout.is_zero()).then_some(timeout),
            use_cache: true,
        })
    }

    pub fn policy(&self) -> TerminationPolicy {
        self.poll_until.policy()
    }
}

/// Parses `0`, or an integer followed by `ms`, `s`, `m` or `h`.
pub fn parse_duration(input: &str) -> Result<Duration, ConfigError> {
    let s = input.trim();
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    let invalid = || ConfigError::InvalidDuration(input.to_string());
    let split = s.find(|c: char| !c.is_ascii_digit()).ok_or_else(invalid)?;
    let (digits, unit) = s.split_at(split);
    if digits.is_empty() {
        return Err(invalid());
    }
    let n: u64 = digits.parse().map_err(|_| invalid())?;
    let secs = |mul: u64| n.checked_mul(mul).map(Duration::from_secs).ok_or_else(invalid);
    match unit {
        "ms" => Ok(Duration::from_millis(n)),
        "s" => secs(1),
        "m" => secs(60),
        "h" => secs(60 * 60),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_until_maps_to_policies() {
        assert_eq!("known".parse::<PollUntil>().unwrap().policy(), TerminationPolicy::AllKnown);
        assert_eq!(
            "current".parse::<PollUntil>().unwrap().policy(),
            TerminationPolicy::ReachedStatus(Status::Current)
        );
        assert_eq!(
            "deleted".parse::<PollUntil>().unwrap().policy(),
            TerminationPolicy::ReachedStatus(Status::NotFound)
        );
        assert_eq!("forever".parse::<PollUntil>().unwrap().policy(), TerminationPolicy::Forever);
    }

    #[test]
    fn unknown_policy_is_a_config_error() {
        assert_eq!(
            "ready".parse::<PollUntil>(),
            Err(ConfigError::UnknownPolicy("ready".into()))
        );
        assert!("Known".parse::<PollUntil>().is_err());
    }

    #[test]
    fn durations() {
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        for bad in ["", "s", "10", "-1s", "1.5s", "3d", "ms10"] {
            assert!(parse_duration(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn from_flags_validates_everything_up_front() {
        let cfg = WatchConfig::from_flags("2s", "current", "0").unwrap();
        assert_eq!(cfg.poll_period, Duration::from_secs(2));
        assert_eq!(cfg.timeout, None);
        assert_eq!(cfg.policy(), TerminationPolicy::ReachedStatus(Status::Current));

        let cfg = WatchConfig::from_flags("500ms", "forever", "30s").unwrap();
        assert_eq!(cfg.timeout, Some(Duration::from_secs(30)));

        assert_eq!(WatchConfig::from_flags("0", "known", "0"), Err(ConfigError::ZeroPollPeriod));
        assert!(matches!(
            WatchConfig::from_flags("2s", "sometimes", "0"),
            Err(ConfigError::UnknownPolicy(_))
        ));
        assert!(matches!(
            WatchConfig::from_flags("2s", "known", "soon"),
            Err(ConfigError::InvalidDuration(_))
        ));
    }
}
