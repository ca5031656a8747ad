//! Daily play gate. Consulted before a puzzle is started or a play is recorded.
//!
//! The cap is a policy choice, so it sits behind a trait and is picked from config.

pub trait LimitGate: Send + Sync {
  /// May the player start another puzzle given how many they finished today?
  fn allows(&self, plays_today: usize) -> bool;

  /// Cap reported to the client (`None` = unlimited).
  fn max_daily(&self) -> Option<usize>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Unlimited;

impl LimitGate for Unlimited {
  fn allows(&self, _plays_today: usize) -> bool { true }
  fn max_daily(&self) -> Option<usize> { None }
}

#[derive(Clone, Copy, Debug)]
pub struct DailyCap {
  pub max: usize,
}

impl LimitGate for DailyCap {
  fn allows(&self, plays_today: usize) -> bool { plays_today < self.max }
  fn max_daily(&self) -> Option<usize> { Some(self.max) }
}

/// Build the gate from the optional configured cap.
pub fn gate_from_config(daily_cap: Option<usize>) -> Box<dyn LimitGate> {
  match daily_cap {
    Some(max) => Box::new(DailyCap { max }),
    None => Box::new(Unlimited),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cap_refuses_at_limit() {
    let g = gate_from_config(Some(5));
    assert!(g.allows(0));
    assert!(g.allows(4));
    assert!(!g.allows(5));
    assert!(!g.allows(9));
    assert_eq!(g.max_daily(), Some(5));
  }

  #[test]
  fn unlimited_never_refuses() {
    let g = gate_from_config(None);
    assert!(g.allows(10_000));
    assert_eq!(g.max_daily(), None);
  }
}
