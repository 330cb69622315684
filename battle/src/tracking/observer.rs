//! Hooks for code that renders or reacts to a replica

use tandem_protocol::Player;

use crate::codec::Action;

/// Called by [`BattleField::apply`](super::BattleField::apply) after each
/// action has changed the state. Every method defaults to a no-op.
pub trait Observer {
    fn on_action(&mut self, action: &Action) {
        let _ = action;
    }

    /// The active slot of `side` changed to `slot`
    fn on_active_changed(&mut self, side: Player, slot: u8) {
        let _ = (side, slot);
    }

    fn on_turn(&mut self, turn: u16) {
        let _ = turn;
    }
}

impl Observer for () {}

/// Keeps every action it is shown
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    pub actions: Vec<Action>,
    pub active_changes: Vec<(Player, u8)>,
}

impl Observer for RecordingObserver {
    fn on_action(&mut self, action: &Action) {
        self.actions.push(action.clone());
    }

    fn on_active_changed(&mut self, side: Player, slot: u8) {
        self.active_changes.push((side, slot));
    }
}
