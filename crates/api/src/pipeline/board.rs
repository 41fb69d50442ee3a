//! Kanban projection: proposals bucketed into state columns.

use entity::{ProcessingStatus, proposal};

use super::vocabulary::{PipelineState, ProcessingGroup};
use crate::error::PipelineError;

/// Anything that carries a proposal record can be placed on a board.
pub trait Projectable {
    fn proposal(&self) -> &proposal::Model;
}

impl Projectable for proposal::Model {
    fn proposal(&self) -> &proposal::Model {
        self
    }
}

#[derive(Clone, Debug)]
pub struct BoardColumn<S, T> {
    pub state: S,
    pub items: Vec<T>,
    pub value_cents: i64,
}

impl<S, T> BoardColumn<S, T> {
    pub fn count(&self) -> usize {
        self.items.len()
    }
}

#[derive(Clone, Debug)]
pub struct Board<S, T> {
    pub columns: Vec<BoardColumn<S, T>>,
}

impl<S: PipelineState, T> Board<S, T> {
    pub fn column(&self, state: S) -> Option<&BoardColumn<S, T>> {
        self.columns.iter().find(|column| column.state == state)
    }

    pub fn total_count(&self) -> usize {
        self.columns.iter().map(BoardColumn::count).sum()
    }

    pub fn total_value_cents(&self) -> i64 {
        self.columns.iter().map(|column| column.value_cents).sum()
    }
}

/// Buckets `items` into `columns`, in the caller's column order.
///
/// Items keep their input order inside a column. Items with no state in this
/// pipeline, or whose state has no column, are left off the board. A state
/// listed twice gets a single column at its first position.
pub fn project_board<S, T>(items: &[T], columns: &[S]) -> Board<S, T>
where
    S: PipelineState,
    T: Projectable + Clone,
{
    let mut board = Board {
        columns: Vec::with_capacity(columns.len()),
    };
    for state in columns {
        if board.column(*state).is_none() {
            board.columns.push(BoardColumn {
                state: *state,
                items: Vec::new(),
                value_cents: 0,
            });
        }
    }

    for item in items {
        let Some(state) = S::of(item.proposal()) else {
            continue;
        };
        if let Some(column) = board.columns.iter_mut().find(|c| c.state == state) {
            column.value_cents = column
                .value_cents
                .saturating_add(item.proposal().total_monthly_cents);
            column.items.push(item.clone());
        }
    }
    board
}

#[derive(Clone, Debug)]
pub struct GroupedBoard<T> {
    pub group: ProcessingGroup,
    pub board: Board<ProcessingStatus, T>,
}

/// The processing board split into its presentation groups.
pub fn processing_groups<T: Projectable + Clone>(items: &[T]) -> Vec<GroupedBoard<T>> {
    ProcessingGroup::ALL
        .into_iter()
        .map(|group| GroupedBoard {
            group,
            board: project_board(items, group.members()),
        })
        .collect()
}

/// Parses requested column keys; an empty request means the pipeline's
/// default board columns in display order.
pub fn parse_columns<S: PipelineState>(keys: &[String]) -> Result<Vec<S>, PipelineError> {
    if keys.is_empty() {
        return Ok(S::board_columns().to_vec());
    }
    keys.iter()
        .map(|key| {
            if key.trim().is_empty() {
                return Err(PipelineError::invalid("column key cannot be blank"));
            }
            S::parse(key).ok_or_else(|| {
                PipelineError::invalid(format!(
                    "unknown {} column `{}`",
                    S::PIPELINE.key(),
                    key.trim()
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use entity::{OperationalStatus, ProposalStatus, SalesStatus};
    use uuid::Uuid;

    use super::*;
    use crate::pipeline::vocabulary::{PROCESSING_ORDER, SALES_ORDER};

    fn card(
        total: i64,
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
            status: ProposalStatus::Qualified,
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
    fn empty_collection_keeps_every_requested_column() {
        let board = project_board::<SalesStatus, proposal::Model>(&[], SALES_ORDER);
        assert_eq!(board.columns.len(), 3);
        for column in &board.columns {
            assert_eq!(column.count(), 0);
            assert_eq!(column.value_cents, 0);
        }
        assert_eq!(board.total_value_cents(), 0);
    }

    #[test]
    fn columns_follow_caller_order_and_items_keep_input_order() {
        let a = card(100, Some(SalesStatus::ProposalSent), None);
        let b = card(200, Some(SalesStatus::AwaitingDocumentation), None);
        let c = card(300, Some(SalesStatus::ProposalSent), None);
        let items = vec![a.clone(), b.clone(), c.clone()];
        let board = project_board(
            &items,
            &[SalesStatus::AwaitingDocumentation, SalesStatus::ProposalSent],
        );

        assert_eq!(board.columns[0].state, SalesStatus::AwaitingDocumentation);
        assert_eq!(board.columns[0].value_cents, 200);
        let sent: Vec<_> = board.columns[1].items.iter().map(|p| p.id).collect();
        assert_eq!(sent, vec![a.id, c.id]);
        assert_eq!(board.columns[1].value_cents, 400);
    }

    #[test]
    fn proposals_outside_the_pipeline_or_columns_are_hidden() {
        let items = vec![
            card(100, None, None),
            card(200, Some(SalesStatus::SentToProcessing), Some(ProcessingStatus::Ativo)),
            card(300, Some(SalesStatus::ProposalSent), None),
        ];
        let board = project_board(&items, &[SalesStatus::ProposalSent]);
        assert_eq!(board.total_count(), 1);
        assert_eq!(board.total_value_cents(), 300);

        let processing = project_board(&items, PROCESSING_ORDER);
        assert_eq!(processing.total_count(), 1);
        assert_eq!(processing.column(ProcessingStatus::Ativo).map(|c| c.count()), Some(1));
    }

    #[test]
    fn duplicate_columns_collapse() {
        let items = vec![card(100, Some(SalesStatus::ProposalSent), None)];
        let board = project_board(
            &items,
            &[SalesStatus::ProposalSent, SalesStatus::ProposalSent],
        );
        assert_eq!(board.columns.len(), 1);
        assert_eq!(board.total_count(), 1);
    }

    #[test]
    fn projection_is_stable() {
        let items = vec![
            card(1, Some(SalesStatus::ProposalSent), None),
            card(2, Some(SalesStatus::ProposalSent), None),
        ];
        let first: Vec<_> = project_board(&items, SALES_ORDER).columns[0]
            .items
            .iter()
            .map(|p| p.id)
            .collect();
        let second: Vec<_> = project_board(&items, SALES_ORDER).columns[0]
            .items
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn processing_groups_cover_every_group() {
        let items = vec![
            card(10, Some(SalesStatus::SentToProcessing), Some(ProcessingStatus::Cancelado)),
            card(20, Some(SalesStatus::SentToProcessing), Some(ProcessingStatus::TrocaCarteira)),
        ];
        let groups = processing_groups(&items);
        assert_eq!(groups.len(), 6);
        assert_eq!(groups[0].group, ProcessingGroup::Documentation);
        assert_eq!(groups[0].board.total_value_cents(), 20);
        assert_eq!(groups[5].group, ProcessingGroup::Correction);
        assert_eq!(groups[5].board.total_value_cents(), 10);
        let columns: usize = groups.iter().map(|g| g.board.columns.len()).sum();
        assert_eq!(columns, 22);
    }

    #[test]
    fn operational_board_only_shows_signed_proposals() {
        let mut signed = card(500, None, None);
        signed.status = ProposalStatus::Signed;
        let mut moved = signed.clone();
        moved.id = Uuid::new_v4();
        moved.operational_status = Some(OperationalStatus::Completed);
        let open = card(900, None, None);

        let items = vec![signed.clone(), moved, open];
        let columns = parse_columns::<OperationalStatus>(&[]).unwrap();
        let board = project_board(&items, &columns);
        assert_eq!(board.columns.len(), 4);
        assert_eq!(board.total_count(), 2);
        let analysis = board.column(OperationalStatus::Analysis).unwrap();
        assert_eq!(analysis.items[0].id, signed.id);
        assert_eq!(board.column(OperationalStatus::Completed).map(|c| c.value_cents), Some(500));
    }

    #[test]
    fn column_keys_are_validated() {
        assert_eq!(parse_columns::<SalesStatus>(&[]).unwrap(), SALES_ORDER.to_vec());
        assert_eq!(
            parse_columns::<SalesStatus>(&["enviado_bko".into()]).unwrap(),
            vec![SalesStatus::SentToProcessing]
        );
        assert!(parse_columns::<SalesStatus>(&["  ".into()]).is_err());
        assert!(parse_columns::<ProcessingStatus>(&["proposal_sent".into()]).is_err());
    }
}
