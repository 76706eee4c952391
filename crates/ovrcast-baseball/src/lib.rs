// Card rating pipeline: season stats in, tiers and liquidation values out.
//
// normalize → scoring → tier → reconcile → valuation, composed per record by
// `evaluation` and driven by `lookup`, `ranking` and `ledger`.

pub mod evaluation;
pub mod ledger;
pub mod lookup;
pub mod normalize;
pub mod ranking;
pub mod reconcile;
pub mod scoring;
pub mod sources;
pub mod stats;
pub mod tier;
pub mod valuation;

pub use evaluation::{evaluate, PlayerReport};
pub use lookup::{LookupOutcome, NameMatch};
pub use ranking::{Eligibility, RankedEntry};
pub use sources::{Snapshot, SourceError};
pub use stats::{Archetype, PlayerRecord, SeasonStats};
