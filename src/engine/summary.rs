//! Flat, display-ready view of a recalculated state for printing and CSV output

use crate::form::fields;
use crate::form::FormState;
use serde::Serialize;

/// Key carried through batch input to identify an applicant row
pub const APPLICANT_ID: &str = "applicant_id";

/// Estimate summary with every amount in its displayed form
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EstimateSummary {
    pub applicant_id: String,
    pub cost_key: String,
    pub total_cost: String,
    pub student_aid_index: String,
    pub pell_eligible: String,
    pub pell_grant: String,
    pub quality_rating: String,
    pub merit_award: String,
    pub total_awards: String,
    pub need_based_aid: String,
    pub total_gift_aid: String,
    pub work_study: String,
    pub federal_loans: String,
    pub net_price: String,
    pub net_price_low: String,
    pub net_price_high: String,
    pub cost_minus_awards: String,
}

impl EstimateSummary {
    pub fn from_state(state: &FormState) -> Self {
        Self {
            applicant_id: state.text(APPLICANT_ID),
            cost_key: state.text(fields::COA_KEY),
            total_cost: state.text(fields::TOTAL_COST),
            student_aid_index: state.text(fields::SAI),
            pell_eligible: state.text(fields::PELL_FLAG),
            pell_grant: state.text(fields::PELL_AMOUNT),
            quality_rating: state.text(fields::QUALITY_RATING),
            merit_award: state.text(fields::MERIT_AWARD),
            total_awards: state.text(fields::TOTAL_AWARDS),
            need_based_aid: state.text(fields::NEED_BASED_AID),
            total_gift_aid: state.text(fields::TOTAL_GIFT_AID),
            work_study: state.text(fields::WORK_STUDY),
            federal_loans: state.text(fields::FEDERAL_LOANS),
            net_price: state.text(fields::NET_PRICE),
            net_price_low: state.text(fields::NET_PRICE_LOW),
            net_price_high: state.text(fields::NET_PRICE_HIGH),
            cost_minus_awards: state.text(fields::COST_MINUS_AWARDS),
        }
    }

    /// Multi-line report for the terminal
    pub fn report(&self) -> String {
        let mut lines = Vec::new();
        if !self.applicant_id.is_empty() {
            lines.push(format!("Applicant:            {}", self.applicant_id));
        }
        let rows = [
            ("Cost key", &self.cost_key),
            ("Cost of attendance", &self.total_cost),
            ("Student Aid Index", &self.student_aid_index),
            ("Pell eligible", &self.pell_eligible),
            ("Pell Grant", &self.pell_grant),
            ("Quality rating", &self.quality_rating),
            ("Merit award", &self.merit_award),
            ("Total awards", &self.total_awards),
            ("Need-based aid", &self.need_based_aid),
            ("Total gift aid", &self.total_gift_aid),
            ("Work-study", &self.work_study),
            ("Federal loans", &self.federal_loans),
            ("Net price", &self.net_price),
            ("Cost minus awards", &self.cost_minus_awards),
        ];
        for (label, value) in rows {
            let shown = if value.is_empty() { "-" } else { value.as_str() };
            lines.push(format!("{:<22}{}", format!("{}:", label), shown));
        }
        if !self.net_price_low.is_empty() || !self.net_price_high.is_empty() {
            lines.push(format!(
                "{:<22}{} to {}",
                "Net price range:", self.net_price_low, self.net_price_high
            ));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_reads_display_values() {
        let mut state = FormState::new();
        state.set(APPLICANT_ID, "A-1001");
        state.set(fields::NET_PRICE, "$27,750");
        state.set(fields::QUALITY_RATING, 23u32);

        let summary = EstimateSummary::from_state(&state);
        assert_eq!(summary.applicant_id, "A-1001");
        assert_eq!(summary.net_price, "$27,750");
        assert_eq!(summary.quality_rating, "23");
        assert_eq!(summary.pell_grant, "");

        let report = summary.report();
        assert!(report.starts_with("Applicant:"));
        assert!(report.contains("Net price:            $27,750"));
        assert!(report.contains("Pell Grant:           -"));
    }
}
