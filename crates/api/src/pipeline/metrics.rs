use entity::{ProposalStatus, proposal};

use super::{board::Projectable, vocabulary::PROCESSING_ACTIVE};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PipelineMetrics {
    pub open_value_cents: i64,
    pub closed_count: u64,
    pub average_value_cents: i64,
    pub total_companies: u64,
}

/// Still being worked in sales, or open in the legacy pipeline.
pub fn is_open(proposal: &proposal::Model) -> bool {
    (proposal.sales_status.is_some() && proposal.processing_status.is_none())
        || matches!(
            proposal.status,
            ProposalStatus::Sent | ProposalStatus::Negotiation
        )
}

pub fn is_closed(proposal: &proposal::Model) -> bool {
    proposal.processing_status == Some(PROCESSING_ACTIVE) || proposal.status == ProposalStatus::Signed
}

pub fn summarize<T: Projectable>(items: &[T], total_companies: u64) -> PipelineMetrics {
    let mut metrics = PipelineMetrics {
        total_companies,
        ..PipelineMetrics::default()
    };
    let mut closed_value: i64 = 0;
    for item in items {
        let proposal = item.proposal();
        if is_open(proposal) {
            metrics.open_value_cents = metrics
                .open_value_cents
                .saturating_add(proposal.total_monthly_cents);
        }
        if is_closed(proposal) {
            metrics.closed_count += 1;
            closed_value = closed_value.saturating_add(proposal.total_monthly_cents);
        }
    }
    metrics.average_value_cents = rounded_average(closed_value, metrics.closed_count);
    metrics
}

fn rounded_average(sum: i64, count: u64) -> i64 {
    if count == 0 {
        return 0;
    }
    let count = i128::from(count);
    let sum = i128::from(sum);
    let half = count / 2;
    let rounded = if sum >= 0 {
        (sum + half) / count
    } else {
        (sum - half) / count
    };
    i64::try_from(rounded).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use entity::{ProcessingStatus, SalesStatus};
    use uuid::Uuid;

    use super::*;

    fn card(
        total: i64,
        status: ProposalStatus,
        sales: Option<SalesStatus>,
        processing: Option<ProcessingStatus>,
    ) -> proposal::Model {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap().into();
        proposal::Model {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            plan_id: None,
            seller_id: None,
            line_quantity: 1,
            price_per_line_cents: total,
            total_monthly_cents: total,
            status,
            notes: None,
            product: None,
            request_type: None,
            donor_carrier: None,
            sales_status: sales,
            processing_status: processing,
            sent_to_processing_at: None,
            operational_status: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn nothing_closed_means_zero_average() {
        let items = vec![card(500, ProposalStatus::Sent, None, None)];
        let metrics = summarize(&items, 2);
        assert_eq!(metrics.closed_count, 0);
        assert_eq!(metrics.average_value_cents, 0);
        assert_eq!(metrics.open_value_cents, 500);
        assert_eq!(metrics.total_companies, 2);
        assert_eq!(summarize::<proposal::Model>(&[], 0), PipelineMetrics::default());
    }

    #[test]
    fn open_value_counts_each_proposal_once() {
        let items = vec![
            card(100, ProposalStatus::Negotiation, Some(SalesStatus::ProposalSent), None),
            card(
                1_000,
                ProposalStatus::Qualified,
                Some(SalesStatus::SentToProcessing),
                Some(ProcessingStatus::AnaliseCredito),
            ),
            card(10, ProposalStatus::Qualified, None, None),
        ];
        assert_eq!(summarize(&items, 1).open_value_cents, 100);
    }

    #[test]
    fn closed_from_either_model_and_average_rounds() {
        let items = vec![
            card(
                100,
                ProposalStatus::Qualified,
                Some(SalesStatus::SentToProcessing),
                Some(ProcessingStatus::Ativo),
            ),
            card(201, ProposalStatus::Signed, None, None),
            card(
                50,
                ProposalStatus::Signed,
                Some(SalesStatus::SentToProcessing),
                Some(ProcessingStatus::Ativo),
            ),
        ];
        let metrics = summarize(&items, 3);
        assert_eq!(metrics.closed_count, 3);
        // 351 / 3 = 117
        assert_eq!(metrics.average_value_cents, 117);
    }

    #[test]
    fn averages_round_half_up() {
        assert_eq!(rounded_average(5, 2), 3);
        assert_eq!(rounded_average(4, 3), 1);
        assert_eq!(rounded_average(0, 0), 0);
    }
}
