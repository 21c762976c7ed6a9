//! Private policy rules
//!
//! Order is fixed: exclusion partition (by category or code prefix), then
//! co-pay on the eligible sum, then the coverage limit. With a low limit the
//! patient can end up paying more than the nominal co-pay share.

use tracing::debug;

use domain_billing::{Bill, BillLineItem};

use crate::adjudication::{Rule, RuleApplication, Split};
use crate::error::AdjudicationError;
use crate::profile::PrivatePolicy;

pub(crate) fn evaluate(bill: &Bill, policy: &PrivatePolicy) -> Result<Split, AdjudicationError> {
    if !policy.co_pay.is_fraction() {
        return Err(AdjudicationError::InvalidProfile(format!(
            "co-pay {} on policy {} is outside 0-100%",
            policy.co_pay, policy.policy_number
        )));
    }
    if policy.excluded_code_prefixes.iter().any(|p| p.trim().is_empty()) {
        return Err(AdjudicationError::InvalidProfile(format!(
            "blank excluded code prefix on policy {}",
            policy.policy_number
        )));
    }
    if policy.coverage_limit.is_negative() {
        return Err(AdjudicationError::InvalidProfile(format!(
            "coverage limit {} on policy {} is negative",
            policy.coverage_limit, policy.policy_number
        )));
    }

    let (excluded_lines, eligible_lines): (Vec<&BillLineItem>, Vec<&BillLineItem>) = bill
        .lines()
        .iter()
        .partition(|line| policy.excludes(line.category) || policy.excludes_code(&line.code));
    let excluded = bill.running_total(excluded_lines.iter().copied());
    let eligible = bill.running_total(eligible_lines.iter().copied());

    let mut rules = vec![RuleApplication::new(
        Rule::ExclusionPartition,
        excluded,
        format!(
            "{} excluded line(s), {} eligible line(s) totalling {}",
            excluded_lines.len(),
            eligible_lines.len(),
            eligible
        ),
    )];

    let co_pay = policy.co_pay.apply(&eligible);
    let insurer_share = eligible.checked_sub(&co_pay)?;
    rules.push(RuleApplication::new(
        Rule::CoPay,
        co_pay,
        format!("{} of {}", policy.co_pay, eligible),
    ));

    let covered = insurer_share.checked_min(&policy.coverage_limit)?;
    let overflow = insurer_share.checked_sub(&covered)?;
    rules.push(RuleApplication::new(
        Rule::CoverageLimit,
        overflow,
        format!("insurer share {} against limit {}", insurer_share, policy.coverage_limit),
    ));

    let payable = excluded.checked_add(&co_pay)?.checked_add(&overflow)?;

    debug!(
        bill_id = %bill.id(),
        policy = %policy.policy_number,
        %excluded,
        %eligible,
        %co_pay,
        %overflow,
        "private policy evaluated"
    );

    Ok(Split {
        covered,
        payable,
        ceiling: Some(policy.coverage_limit),
        rules,
    })
}
