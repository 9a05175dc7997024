//! Delivery fee tiers.
//!
//! A tier list maps a delivery distance to a flat fee. Tiers are ordered
//! ascending by their ceiling and the last tier is a catch-all with no
//! ceiling, so every distance resolves to exactly one fee.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One distance-bounded pricing bracket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeliveryTier {
    /// Upper distance bound in kilometres; `None` means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_distance_km: Option<f64>,
    /// Flat fee in whole currency units.
    pub fee: i64,
}

/// The stock tier table: up to 3 km costs 40, up to 6 km costs 60,
/// anything beyond costs 100.
pub fn default_tiers() -> Vec<DeliveryTier> {
    vec![
        DeliveryTier {
            max_distance_km: Some(3.0),
            fee: 40,
        },
        DeliveryTier {
            max_distance_km: Some(6.0),
            fee: 60,
        },
        DeliveryTier {
            max_distance_km: None,
            fee: 100,
        },
    ]
}

/// Look up the fee for a distance.
///
/// Walks the tiers in order and returns the fee of the first tier whose
/// ceiling covers `distance_km`. Negative distances behave like `0`, so
/// the first tier applies. On a malformed list where nothing matches,
/// falls back to the last tier's fee, or `0` for an empty list.
pub fn calc_fee(distance_km: f64, tiers: &[DeliveryTier]) -> i64 {
    for tier in tiers {
        match tier.max_distance_km {
            None => return tier.fee,
            Some(max) if distance_km <= max => return tier.fee,
            Some(_) => {}
        }
    }
    tiers.last().map_or(0, |tier| tier.fee)
}

/// Ways a configured tier list can be unusable.
#[derive(Debug, Error, PartialEq)]
pub enum TierConfigError {
    #[error("tier list is empty")]
    Empty,
    #[error("tier {0} has a negative fee")]
    NegativeFee(usize),
    #[error("tier ceilings must be strictly ascending (tier {0})")]
    NotAscending(usize),
    #[error("only the last tier may be unbounded (tier {0})")]
    UnboundedNotLast(usize),
    #[error("the last tier must be unbounded")]
    MissingCatchAll,
}

/// Validate the tier-list invariants: non-empty, strictly ascending
/// ceilings, fees non-negative, and an unbounded final catch-all.
pub fn validate_tiers(tiers: &[DeliveryTier]) -> Result<(), TierConfigError> {
    if tiers.is_empty() {
        return Err(TierConfigError::Empty);
    }

    let mut previous: Option<f64> = None;
    for (idx, tier) in tiers.iter().enumerate() {
        if tier.fee < 0 {
            return Err(TierConfigError::NegativeFee(idx));
        }
        match tier.max_distance_km {
            Some(max) => {
                if let Some(prev) = previous {
                    if max <= prev {
                        return Err(TierConfigError::NotAscending(idx));
                    }
                }
                previous = Some(max);
            }
            None if idx + 1 != tiers.len() => {
                return Err(TierConfigError::UnboundedNotLast(idx));
            }
            None => {}
        }
    }

    match tiers.last() {
        Some(last) if last.max_distance_km.is_none() => Ok(()),
        _ => Err(TierConfigError::MissingCatchAll),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tiers_cover_the_documented_brackets() {
        let tiers = default_tiers();
        assert_eq!(calc_fee(0.0, &tiers), 40);
        assert_eq!(calc_fee(3.0, &tiers), 40);
        assert_eq!(calc_fee(3.1, &tiers), 60);
        assert_eq!(calc_fee(6.0, &tiers), 60);
        assert_eq!(calc_fee(6.01, &tiers), 100);
        assert_eq!(calc_fee(42.0, &tiers), 100);
    }

    #[test]
    fn negative_distance_gets_the_first_tier() {
        let tiers = default_tiers();
        assert_eq!(calc_fee(-5.0, &tiers), 40);
    }

    #[test]
    fn empty_list_returns_zero() {
        assert_eq!(calc_fee(2.0, &[]), 0);
    }

    #[test]
    fn malformed_list_falls_back_to_last_fee() {
        // No catch-all, nothing matches a 10 km delivery.
        let tiers = [
            DeliveryTier {
                max_distance_km: Some(3.0),
                fee: 40,
            },
            DeliveryTier {
                max_distance_km: Some(6.0),
                fee: 60,
            },
        ];
        assert_eq!(calc_fee(10.0, &tiers), 60);
    }

    #[test]
    fn validation_accepts_default_tiers() {
        assert_eq!(validate_tiers(&default_tiers()), Ok(()));
    }

    #[test]
    fn validation_rejects_bad_lists() {
        assert_eq!(validate_tiers(&[]), Err(TierConfigError::Empty));

        let descending = [
            DeliveryTier {
                max_distance_km: Some(6.0),
                fee: 60,
            },
            DeliveryTier {
                max_distance_km: Some(3.0),
                fee: 40,
            },
            DeliveryTier {
                max_distance_km: None,
                fee: 100,
            },
        ];
        assert_eq!(
            validate_tiers(&descending),
            Err(TierConfigError::NotAscending(1))
        );

        let no_catch_all = [DeliveryTier {
            max_distance_km: Some(3.0),
            fee: 40,
        }];
        assert_eq!(
            validate_tiers(&no_catch_all),
            Err(TierConfigError::MissingCatchAll)
        );

        let unbounded_first = [
            DeliveryTier {
                max_distance_km: None,
                fee: 100,
            },
            DeliveryTier {
                max_distance_km: None,
                fee: 40,
            },
        ];
        assert_eq!(
            validate_tiers(&unbounded_first),
            Err(TierConfigError::UnboundedNotLast(0))
        );
    }
}
