//! Cross-world transfer lineage classification.
//!
//! Given a dossier identifier, [`TransferLedger::classify`] retrieves
//! the dossier's completed transfer history and condenses it into
//! directional facts: has this record arrived from elsewhere, has it
//! been sent elsewhere, and which worlds sit on the other side. The
//! caller renders badges from the facts; the ledger never formats
//! display strings.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use crate::error::{ChanceryError, ChanceryResult};
use crate::models::transfer::{Transfer, TransferStatus};
use crate::models::world::WorldRef;
use crate::repository::{TransferRepository, WorldRepository};

/// One classified transfer touching a dossier, enriched for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferFact {
    pub transfer_id: Uuid,
    /// Categorical reassignment reason, as recorded on the transfer.
    pub transfer_type: String,
    /// The counterpart world: the source for an incoming transfer,
    /// the target for an outgoing one.
    pub world: WorldRef,
    pub transferred_at: DateTime<Utc>,
}

/// Directional classification of a dossier's completed transfers.
///
/// Both flags may be true at once (transferred in from one world,
/// later transferred out to another). The default value — both flags
/// false, no facts — is the state of the majority of dossiers and is
/// not an error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransferView {
    /// Some completed transfer has this dossier as its target.
    pub is_incoming: bool,
    /// Some completed transfer has this dossier as its source.
    pub is_outgoing: bool,
    pub most_recent_incoming: Option<TransferFact>,
    pub most_recent_outgoing: Option<TransferFact>,
}

impl TransferView {
    pub fn is_empty(&self) -> bool {
        !self.is_incoming && !self.is_outgoing
    }
}

/// Classifies cross-world transfer history for dossier-detail views.
///
/// Generic over repository implementations so the classification
/// logic has no dependency on the database crate.
pub struct TransferLedger<T: TransferRepository, W: WorldRepository> {
    transfers: T,
    worlds: W,
}

impl<T: TransferRepository, W: WorldRepository> TransferLedger<T, W> {
    pub fn new(transfers: T, worlds: W) -> Self {
        Self { transfers, worlds }
    }

    /// Retrieve and classify every completed transfer touching the
    /// dossier.
    ///
    /// Retrieval failure propagates as an error so callers can
    /// distinguish "no history" from "history unknown". Individual
    /// records that violate the cross-world invariant or reference an
    /// unresolvable world are skipped with a warning — one bad record
    /// must not hide legitimate history.
    pub async fn classify(&self, dossier_id: Uuid) -> ChanceryResult<TransferView> {
        let retrieved = self
            .transfers
            .list_completed_for_dossier(dossier_id)
            .await?;

        // The store orders by transferred_at descending; re-sort with
        // an id tie-break so equal timestamps classify identically on
        // every call.
        let mut accepted = Vec::with_capacity(retrieved.len());
        for transfer in retrieved {
            match self.check_record(&transfer) {
                Some(transferred_at) => accepted.push((transferred_at, transfer)),
                None => continue,
            }
        }
        accepted.sort_by(|(ts_a, a), (ts_b, b)| ts_b.cmp(ts_a).then(a.id.cmp(&b.id)));

        let refs = self.resolve_world_refs(&accepted).await?;

        let mut view = TransferView::default();
        for (transferred_at, transfer) in &accepted {
            // A record whose worlds did not both resolve is excluded
            // entirely: it contributes neither flags nor facts.
            let (Some(source_world), Some(target_world)) = (
                refs.get(&transfer.source_world_id),
                refs.get(&transfer.target_world_id),
            ) else {
                continue;
            };

            if transfer.target_dossier_id == dossier_id {
                view.is_incoming = true;
                if view.most_recent_incoming.is_none() {
                    view.most_recent_incoming =
                        Some(fact(transfer, source_world.clone(), *transferred_at));
                }
            }
            if transfer.source_dossier_id == dossier_id {
                view.is_outgoing = true;
                if view.most_recent_outgoing.is_none() {
                    view.most_recent_outgoing =
                        Some(fact(transfer, target_world.clone(), *transferred_at));
                }
            }
        }

        Ok(view)
    }

    /// Validate one retrieved record, returning its effective
    /// timestamp, or `None` if the record must be excluded.
    fn check_record(&self, transfer: &Transfer) -> Option<DateTime<Utc>> {
        if transfer.status != TransferStatus::Completed {
            // Scheduled and cancelled records carry no provenance;
            // the store filter should already have dropped them.
            warn!(
                transfer_id = %transfer.id,
                status = transfer.status.as_str(),
                "non-completed transfer reached classification, skipping"
            );
            return None;
        }
        if !transfer.crosses_worlds() {
            warn!(
                transfer_id = %transfer.id,
                world_id = %transfer.source_world_id,
                "transfer has identical source and target world, skipping"
            );
            return None;
        }
        match transfer.transferred_at {
            Some(ts) => Some(ts),
            None => {
                warn!(
                    transfer_id = %transfer.id,
                    "completed transfer is missing transferred_at, skipping"
                );
                None
            }
        }
    }

    /// Resolve every distinct world id referenced by the accepted
    /// records to a display ref, one lookup per id. A missing world is
    /// recorded as absent (records referencing it are then excluded
    /// from classification); any other lookup failure propagates.
    async fn resolve_world_refs(
        &self,
        accepted: &[(DateTime<Utc>, Transfer)],
    ) -> ChanceryResult<HashMap<Uuid, WorldRef>> {
        let mut refs = HashMap::new();
        for (_, transfer) in accepted {
            for world_id in [transfer.source_world_id, transfer.target_world_id] {
                if refs.contains_key(&world_id) {
                    continue;
                }
                match self.worlds.get_by_id(world_id).await {
                    Ok(world) => {
                        refs.insert(world_id, WorldRef::from(&world));
                    }
                    Err(ChanceryError::NotFound { .. }) => {
                        warn!(
                            transfer_id = %transfer.id,
                            world_id = %world_id,
                            "transfer references unresolvable world, omitting from facts"
                        );
                    }
                    Err(e) => return Err(e),
                }
            }
        }
        Ok(refs)
    }
}

fn fact(transfer: &Transfer, world: WorldRef, transferred_at: DateTime<Utc>) -> TransferFact {
    TransferFact {
        transfer_id: transfer.id,
        transfer_type: transfer.transfer_type.clone(),
        world,
        transferred_at,
    }
}
