use tandem_battle::RosterHandle;
use tandem_protocol::Player;

use crate::participant::BattleParticipant;

/// Supplies a participant's roster and reacts to their matches.
///
/// Records behind the handles belong to the provider; the host writes
/// battle results through them but never stores them. Hook methods
/// default to no-ops.
///
/// # Example
///
/// ```ignore
/// struct Trainer {
///     id: BattleParticipant,
///     party: Vec<RosterHandle>,
/// }
///
/// impl RosterProvider for Trainer {
///     fn participant(&self) -> BattleParticipant {
///         self.id
///     }
///
///     fn roster(&self) -> Vec<RosterHandle> {
///         self.party.clone()
///     }
///
///     fn on_active_changed(&self, slot: u8) {
///         println!("sent out {}", slot);
///     }
/// }
/// ```
pub trait RosterProvider: Send + Sync {
    fn participant(&self) -> BattleParticipant;

    /// Up to six entries, in the same order as the submitted team
    fn roster(&self) -> Vec<RosterHandle>;

    fn on_battle_start(&self, side: Player) {
        let _ = side;
    }

    fn on_battle_stop(&self) {}

    /// Our active Pokemon is now the one at team slot `slot`
    fn on_active_changed(&self, slot: u8) {
        let _ = slot;
    }
}
