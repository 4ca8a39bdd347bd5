//! Macaulay and modified duration at a given yield.

use spreadwatch_core::Date;

use crate::cashflows::CouponSchedule;
use crate::error::{BondError, BondResult};
use crate::terms::BondTerms;

use super::discount::DiscountedFlows;

fn flows_at(terms: &BondTerms, settlement: Date, yield_percent: f64) -> BondResult<DiscountedFlows> {
    terms.check_settlement(settlement)?;
    let schedule = CouponSchedule::generate(terms, settlement)?;
    let flows = DiscountedFlows::new(terms, &schedule, settlement)?;
    if !flows.in_domain(yield_percent / 100.0) {
        return Err(BondError::invalid_terms(format!(
            "yield {yield_percent}% is outside the discounting domain"
        )));
    }
    Ok(flows)
}

/// PV-weighted average time to each remaining cash flow, in years.
pub fn macaulay_duration(yield_percent: f64, terms: &BondTerms, settlement: Date) -> BondResult<f64> {
    Ok(flows_at(terms, settlement, yield_percent)?.macaulay(yield_percent / 100.0))
}

/// Macaulay duration divided by `1 + y/f`: the relative price change per
/// unit change in yield.
pub fn modified_duration(yield_percent: f64, terms: &BondTerms, settlement: Date) -> BondResult<f64> {
    let flows = flows_at(terms, settlement, yield_percent)?;
    let y = yield_percent / 100.0;
    Ok(flows.macaulay(y) / (1.0 + y / flows.periods_per_year()))
}
