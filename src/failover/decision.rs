//! Failover decision policy.

use crate::health::HealthState;
use serde::Serialize;

/// What to do with the listener after looking at the active pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    NoAction,
    FailoverToPassive,
}

/// Decide from the active pool's state alone.
///
/// Anything other than [`HealthState::Healthy`] fails over, `Unknown`
/// included. The passive pool is not consulted here.
pub fn decide(active: HealthState) -> Decision {
    match active {
        HealthState::Healthy => Decision::NoAction,
        HealthState::Unhealthy | HealthState::Unknown => Decision::FailoverToPassive,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decide_exhaustive() {
        assert_eq!(decide(HealthState::Healthy), Decision::NoAction);
        assert_eq!(decide(HealthState::Unhealthy), Decision::FailoverToPassive);
        assert_eq!(decide(HealthState::Unknown), Decision::FailoverToPassive);
    }

    #[test]
    fn test_decide_is_deterministic() {
        for state in [HealthState::Healthy, HealthState::Unhealthy, HealthState::Unknown] {
            let first = decide(state);
            for _ in 0..10 {
                assert_eq!(decide(state), first);
            }
        }
    }
}
