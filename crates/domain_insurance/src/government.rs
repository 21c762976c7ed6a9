//! Government subsidy rules

use tracing::{debug, warn};

use core_kernel::Money;
use domain_billing::Bill;

use crate::adjudication::{Rule, RuleApplication, Split};
use crate::error::AdjudicationError;
use crate::profile::GovernmentSubsidy;

pub(crate) fn evaluate(bill: &Bill, subsidy: &GovernmentSubsidy) -> Result<Split, AdjudicationError> {
    let total = bill.grand_total();
    let Some(tier) = subsidy.applicable_tier() else {
        warn!(
            bill_id = %bill.id(),
            scheme = %subsidy.scheme,
            bracket = %subsidy.income_bracket,
            "no subsidy tier for bracket"
        );
        return Err(AdjudicationError::TierNotFound {
            bracket: subsidy.income_bracket.to_string(),
        });
    };

    if !tier.coverage_rate.is_fraction() {
        return Err(AdjudicationError::InvalidProfile(format!(
            "subsidy rate {} for bracket {} is outside 0-100%",
            tier.coverage_rate, subsidy.income_bracket
        )));
    }
    if let Some(cap) = tier.cap {
        if cap.is_negative() {
            return Err(AdjudicationError::InvalidProfile(format!(
                "subsidy cap {} for bracket {} is negative",
                cap, subsidy.income_bracket
            )));
        }
    }

    let share = tier.coverage_rate.apply(&total);
    let mut rules = vec![RuleApplication::new(
        Rule::SubsidyTier,
        share,
        format!("bracket {} at {} of {}", subsidy.income_bracket, tier.coverage_rate, total),
    )];

    let covered = match tier.cap {
        Some(cap) => {
            let capped = share.checked_min(&cap)?;
            let removed = share.checked_sub(&capped)?;
            rules.push(RuleApplication::new(
                Rule::SubsidyCap,
                removed,
                format!("capped at {cap}"),
            ));
            capped
        }
        None => share,
    };
    let payable = total.checked_sub(&covered)?;

    debug!(bill_id = %bill.id(), %share, %covered, %payable, "subsidy evaluated");

    Ok(Split {
        covered,
        payable,
        ceiling: tier.cap,
        rules,
    })
}
