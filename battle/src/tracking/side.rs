//! One player's half of a replicated battle

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tandem_protocol::{BattleRequest, Player};

use super::pokemon::BattlePokemon;
use crate::roster::RosterHandle;
use crate::types::{SideCondition, SideConditionState};
use crate::wire::SIDE_SLOTS;

/// What the side is currently being asked to do
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// Nothing asked yet, or the battle is over
    #[default]
    None,
    /// Any move or switch
    Any,
    /// A choice was made; waiting on the opponent or the simulator
    Wait,
    /// The active Pokemon fainted or was forced out
    ForcedSwitch,
}

impl RequestKind {
    pub fn from_request(request: &BattleRequest) -> Self {
        if request.wait {
            RequestKind::Wait
        } else if request.is_force_switch() {
            RequestKind::ForcedSwitch
        } else if request.needs_decision() {
            RequestKind::Any
        } else {
            RequestKind::None
        }
    }

    pub fn accepts_choices(&self) -> bool {
        matches!(self, RequestKind::Any | RequestKind::ForcedSwitch)
    }
}

#[derive(Debug, Clone)]
pub struct BattleSide {
    player: Player,
    pokemon: [BattlePokemon; SIDE_SLOTS],
    active: Option<u8>,
    /// Slot at each position of the simulator's team order
    order: [u8; SIDE_SLOTS],
    conditions: HashMap<SideCondition, SideConditionState>,
    pub request: RequestKind,
}

impl BattleSide {
    /// A side whose Pokemon are all unknown
    pub fn transient(player: Player) -> Self {
        BattleSide {
            player,
            pokemon: std::array::from_fn(|_| BattlePokemon::transient()),
            active: None,
            order: std::array::from_fn(|position| position as u8),
            conditions: HashMap::new(),
            request: RequestKind::None,
        }
    }

    /// A side backed by the owner's party. Slots past the party are left transient.
    pub fn owned(player: Player, party: &[RosterHandle]) -> Self {
        let mut side = Self::transient(player);
        for (slot, handle) in party.iter().take(SIDE_SLOTS).enumerate() {
            side.pokemon[slot] = BattlePokemon::owned(handle.clone());
        }
        side
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn pokemon(&self, slot: usize) -> Option<&BattlePokemon> {
        self.pokemon.get(slot)
    }

    pub fn pokemon_mut(&mut self, slot: usize) -> Option<&mut BattlePokemon> {
        self.pokemon.get_mut(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BattlePokemon> {
        self.pokemon.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut BattlePokemon> {
        self.pokemon.iter_mut()
    }

    pub fn active_slot(&self) -> Option<u8> {
        self.active
    }

    pub fn active(&self) -> Option<&BattlePokemon> {
        self.active.and_then(|slot| self.pokemon(usize::from(slot)))
    }

    pub fn active_mut(&mut self) -> Option<&mut BattlePokemon> {
        let slot = self.active?;
        self.pokemon_mut(usize::from(slot))
    }

    /// Make `slot` active. The previous active Pokemon loses its battle-only
    /// state. Returns whether the active slot changed.
    pub fn switch_in(&mut self, slot: u8) -> bool {
        if self.active == Some(slot) {
            return false;
        }
        if let Some(previous) = self.active_mut() {
            previous.clear_battle_state();
        }
        if let Some(incoming) = self.pokemon_mut(usize::from(slot)) {
            incoming.clear_battle_state();
        }
        self.active = Some(slot);
        if let Some(position) = self.position_of(slot) {
            self.order.swap(0, position);
        }
        true
    }

    /// Where `slot` sits in the simulator's team order. The simulator moves
    /// each incoming Pokemon to the front, trading places with the outgoing one.
    pub fn position_of(&self, slot: u8) -> Option<usize> {
        self.order.iter().position(|&s| s == slot)
    }

    pub fn alive_count(&self) -> usize {
        self.pokemon
            .iter()
            .filter(|p| p.is_revealed() && !p.is_fainted())
            .count()
    }

    pub fn has_condition(&self, condition: SideCondition) -> bool {
        self.conditions.contains_key(&condition)
    }

    pub fn condition_layers(&self, condition: SideCondition) -> u8 {
        self.conditions.get(&condition).map_or(0, |s| s.layers)
    }

    /// Start a condition, or add a layer if it is already up
    pub fn add_condition(&mut self, condition: SideCondition) {
        self.conditions
            .entry(condition)
            .and_modify(|state| {
                state.add_layer(condition);
            })
            .or_default();
    }

    pub fn remove_condition(&mut self, condition: SideCondition) {
        self.conditions.remove(&condition);
    }

    pub fn conditions(&self) -> &HashMap<SideCondition, SideConditionState> {
        &self.conditions
    }

    pub(crate) fn swap_conditions(&mut self, other: &mut BattleSide) {
        std::mem::swap(&mut self.conditions, &mut other.conditions);
    }
}
