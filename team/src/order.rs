//! Lead ordering
//!
//! The simulator sends out the first entry of a team. Choosing a lead is
//! therefore a permutation of the team: the chosen slot moves to the front
//! and every other entry keeps its relative order.

use crate::TeamError;

/// Team order with `lead` first. Each element is an index into the original team.
pub fn lead_order(len: usize, lead: usize) -> Result<Vec<usize>, TeamError> {
    if lead >= len {
        return Err(TeamError::LeadOutOfRange { slot: lead, len });
    }

    let mut order = Vec::with_capacity(len);
    order.push(lead);
    order.extend((0..len).filter(|i| *i != lead));
    Ok(order)
}

/// Reorder a team so the entry at `lead` is sent out first
pub fn reorder_for_lead<T: Clone>(team: &[T], lead: usize) -> Result<Vec<T>, TeamError> {
    let order = lead_order(team.len(), lead)?;
    Ok(order.into_iter().map(|i| team[i].clone()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lead_order_first_slot() {
        assert_eq!(lead_order(4, 0).unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_lead_order_moves_lead_to_front() {
        assert_eq!(lead_order(6, 3).unwrap(), vec![3, 0, 1, 2, 4, 5]);
    }

    #[test]
    fn test_lead_order_out_of_range() {
        assert_eq!(
            lead_order(2, 5),
            Err(TeamError::LeadOutOfRange { slot: 5, len: 2 })
        );
    }

    #[test]
    fn test_reorder_for_lead() {
        let team = vec!["a", "b", "c"];
        assert_eq!(reorder_for_lead(&team, 2).unwrap(), vec!["c", "a", "b"]);
    }
}
