use dashboard_core::{ModelVerdict, Recommendation};

use crate::types::{Consensus, ConsensusLabel};

/// Votes needed before the leading recommendation becomes the consensus
pub const MIN_AGREEMENT: usize = 3;

/// Majority vote over model verdicts.
///
/// The leading label wins only with at least [`MIN_AGREEMENT`] votes; otherwise
/// the result is `Mixed`. Ties at the top resolve in buy, sell, hold order.
pub fn consensus(results: &[ModelVerdict]) -> Consensus {
    let count = |rec: Recommendation| results.iter().filter(|r| r.recommendation == rec).count();
    let buy = count(Recommendation::Buy);
    let sell = count(Recommendation::Sell);
    let hold = count(Recommendation::Hold);
    let agreeing = buy.max(sell).max(hold);

    let label = if agreeing < MIN_AGREEMENT {
        ConsensusLabel::Mixed
    } else if buy == agreeing {
        ConsensusLabel::Buy
    } else if sell == agreeing {
        ConsensusLabel::Sell
    } else {
        ConsensusLabel::Hold
    };

    Consensus {
        label,
        agreeing,
        total: results.len(),
        buy,
        sell,
        hold,
    }
}
