//! The replicated battle: two sides plus field-wide state

use std::collections::HashSet;

use tandem_protocol::Player;

use super::observer::Observer;
use super::pokemon::BattlePokemon;
use super::side::BattleSide;
use crate::codec::{decode_actions, Action, BulkTarget, DecodeError};
use crate::roster::RosterHandle;
use crate::types::{FieldCondition, PackedBoosts, Weather};
use crate::wire::PokemonRef;

/// A battle rebuilt from action buffers.
///
/// Applying a buffer is all-or-nothing with respect to decoding: the whole
/// buffer is decoded before any state changes.
#[derive(Debug, Clone)]
pub struct BattleField {
    sides: [BattleSide; 2],
    perspective: Option<Player>,
    pub weather: Option<Weather>,
    conditions: HashSet<FieldCondition>,
    pub turn: u16,
}

impl BattleField {
    /// Replica with no owned Pokemon, e.g. for spectators
    pub fn omniscient() -> Self {
        BattleField {
            sides: [
                BattleSide::transient(Player::P1),
                BattleSide::transient(Player::P2),
            ],
            perspective: None,
            weather: None,
            conditions: HashSet::new(),
            turn: 0,
        }
    }

    /// Replica for one participant, whose side is backed by their party
    pub fn for_player(player: Player, party: &[RosterHandle]) -> Self {
        let mut field = Self::omniscient();
        field.sides[player.index()] = BattleSide::owned(player, party);
        field.perspective = Some(player);
        field
    }

    pub fn perspective(&self) -> Option<Player> {
        self.perspective
    }

    pub fn side(&self, player: Player) -> &BattleSide {
        &self.sides[player.index()]
    }

    pub fn side_mut(&mut self, player: Player) -> &mut BattleSide {
        &mut self.sides[player.index()]
    }

    /// Our side, if this replica belongs to a participant
    pub fn me(&self) -> Option<&BattleSide> {
        self.perspective.map(|p| self.side(p))
    }

    pub fn opponent(&self) -> Option<&BattleSide> {
        self.perspective.map(|p| self.side(p.opponent()))
    }

    pub fn pokemon(&self, pokemon: PokemonRef) -> Option<&BattlePokemon> {
        self.side(pokemon.side).pokemon(usize::from(pokemon.slot))
    }

    pub fn pokemon_mut(&mut self, pokemon: PokemonRef) -> Option<&mut BattlePokemon> {
        self.side_mut(pokemon.side)
            .pokemon_mut(usize::from(pokemon.slot))
    }

    pub fn has_condition(&self, condition: FieldCondition) -> bool {
        self.conditions.contains(&condition)
    }

    /// Decode `buffer` and apply every action in order.
    /// Returns the number of actions applied.
    pub fn apply(&mut self, buffer: &[u8], observer: &mut impl Observer) -> Result<usize, DecodeError> {
        let actions = decode_actions(buffer)?;
        for action in &actions {
            self.apply_action(action, observer);
        }
        Ok(actions.len())
    }

    pub fn apply_action(&mut self, action: &Action, observer: &mut impl Observer) {
        match action {
            Action::PokemonDetails {
                pokemon,
                details,
                permanent,
            } => {
                if let Some(p) = self.pokemon_mut(*pokemon) {
                    p.set_details(*details, *permanent);
                }
            }
            Action::SetHp { pokemon, hp, .. } => {
                if let Some(p) = self.pokemon_mut(*pokemon) {
                    p.set_hp(*hp);
                }
            }
            Action::MoveAnimation { .. } | Action::ActionFail { .. } => {}
            Action::SwitchPokemon {
                pokemon, details, ..
            } => {
                let side = self.side_mut(pokemon.side);
                let changed = side.switch_in(pokemon.slot);
                if let Some(p) = side.pokemon_mut(usize::from(pokemon.slot)) {
                    p.set_details(*details, true);
                }
                if changed {
                    observer.on_active_changed(pokemon.side, pokemon.slot);
                }
            }
            Action::SetStatus {
                pokemon,
                status,
                team: false,
            } => {
                if let Some(p) = self.pokemon_mut(*pokemon) {
                    p.set_status(*status);
                }
            }
            Action::SetStatus {
                pokemon,
                status,
                team: true,
            } => {
                for p in self.side_mut(pokemon.side).iter_mut() {
                    if !p.is_fainted() {
                        p.set_status(*status);
                    }
                }
            }
            Action::BoostDelta {
                pokemon,
                mask,
                boosts,
            } => {
                if let Some(p) = self.pokemon_mut(*pokemon) {
                    p.boosts_mut().apply_delta(*boosts, *mask);
                }
            }
            Action::BoostSet {
                pokemon,
                mask,
                boosts,
            } => {
                if let Some(p) = self.pokemon_mut(*pokemon) {
                    p.boosts_mut().assign(*boosts, *mask);
                }
            }
            Action::BoostSwap { pair, mask } => {
                if let (Some(mut source), Some(mut target)) =
                    (self.boosts_of(pair.source), self.boosts_of(pair.target))
                {
                    source.swap_lanes(&mut target, *mask);
                    self.set_boosts(pair.source, source);
                    self.set_boosts(pair.target, target);
                }
            }
            Action::BoostCopy { pair } => {
                if let Some(source) = self.boosts_of(pair.source) {
                    self.set_boosts(pair.target, source);
                }
            }
            Action::BulkBoost { op, target } => match target {
                BulkTarget::One(pokemon) => {
                    if let Some(p) = self.pokemon_mut(*pokemon) {
                        op.apply(p.boosts_mut());
                    }
                }
                BulkTarget::AllActive => {
                    for side in &mut self.sides {
                        if let Some(p) = side.active_mut() {
                            op.apply(p.boosts_mut());
                        }
                    }
                }
            },
            Action::Turn(turn) => {
                self.turn = *turn;
                observer.on_turn(*turn);
            }
            Action::Weather(weather) => self.weather = *weather,
            Action::FieldCondition { condition, active } => {
                if *active {
                    self.conditions.insert(*condition);
                } else {
                    self.conditions.remove(condition);
                }
            }
            Action::SideCondition {
                side,
                condition,
                active,
            } => {
                let side = self.side_mut(*side);
                if *active {
                    side.add_condition(*condition);
                } else {
                    side.remove_condition(*condition);
                }
            }
            Action::SwapSideConditions => {
                let [p1, p2] = &mut self.sides;
                p1.swap_conditions(p2);
            }
            Action::Volatile {
                pokemon,
                volatile,
                active,
            } => {
                if let Some(p) = self.pokemon_mut(*pokemon) {
                    p.set_volatile(*volatile, *active);
                }
            }
            Action::ItemReveal {
                pokemon,
                item,
                consumed,
            } => {
                if let Some(p) = self.pokemon_mut(*pokemon) {
                    p.set_item(if *consumed { 0 } else { *item });
                }
            }
            Action::AbilityReveal { pokemon, ability } => {
                if let Some(p) = self.pokemon_mut(*pokemon) {
                    p.set_ability(*ability);
                }
            }
        }
        observer.on_action(action);
    }

    fn boosts_of(&self, pokemon: PokemonRef) -> Option<PackedBoosts> {
        self.pokemon(pokemon).map(BattlePokemon::boosts)
    }

    fn set_boosts(&mut self, pokemon: PokemonRef, boosts: PackedBoosts) {
        if let Some(p) = self.pokemon_mut(pokemon) {
            *p.boosts_mut() = boosts;
        }
    }
}

#[cfg(test)]
impl BattleField {
    /// Panics unless both replicas hold the same observable state
    pub(crate) fn assert_same_state(&self, other: &BattleField) {
        assert_eq!(self.turn, other.turn);
        assert_eq!(self.weather, other.weather);
        assert_eq!(self.conditions, other.conditions);
        for player in [Player::P1, Player::P2] {
            let (a, b) = (self.side(player), other.side(player));
            assert_eq!(a.active_slot(), b.active_slot(), "{:?} active", player);
            assert_eq!(a.conditions(), b.conditions(), "{:?} conditions", player);
            for slot in 0..crate::wire::SIDE_SLOTS as u8 {
                assert_eq!(a.position_of(slot), b.position_of(slot), "{:?} order", player);
            }
            for (slot, (x, y)) in a.iter().zip(b.iter()).enumerate() {
                let at = format!("{:?} slot {}", player, slot);
                assert_eq!(x.details(), y.details(), "{} details", at);
                assert_eq!(x.hp(), y.hp(), "{} hp", at);
                assert_eq!(x.status(), y.status(), "{} status", at);
                assert_eq!(x.boosts(), y.boosts(), "{} boosts", at);
                assert_eq!(x.volatiles(), y.volatiles(), "{} volatiles", at);
                assert_eq!(x.item(), y.item(), "{} item", at);
                assert_eq!(x.ability(), y.ability(), "{} ability", at);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{encode_actions, BulkBoostOp};
    use crate::tracking::RecordingObserver;
    use crate::roster::RosterEntry;
    use crate::types::{ALL_LANES, BoostStat, SideCondition, Status, Volatile};
    use crate::wire::{CompactDetails, CompactHp, PokemonPairRef};

    fn p1(slot: usize) -> PokemonRef {
        PokemonRef::new(Player::P1, slot).unwrap()
    }

    fn p2(slot: usize) -> PokemonRef {
        PokemonRef::new(Player::P2, slot).unwrap()
    }

    fn details(species: u16) -> CompactDetails {
        CompactDetails {
            species,
            level: 5,
            ..Default::default()
        }
    }

    fn opening() -> Vec<Action> {
        vec![
            Action::SwitchPokemon {
                pokemon: p1(0),
                details: details(1),
                drag: false,
            },
            Action::SetHp {
                pokemon: p1(0),
                hp: CompactHp::new(20, 20),
                direct: false,
                heal: false,
            },
            Action::SwitchPokemon {
                pokemon: p2(0),
                details: details(16),
                drag: false,
            },
            Action::SetHp {
                pokemon: p2(0),
                hp: CompactHp::new(100, 100),
                direct: false,
                heal: false,
            },
            Action::Turn(1),
        ]
    }

    #[test]
    fn test_apply_opening() {
        let mut field = BattleField::omniscient();
        let mut observer = RecordingObserver::default();
        let applied = field.apply(&encode_actions(&opening()), &mut observer).unwrap();

        assert_eq!(applied, 5);
        assert_eq!(field.turn, 1);
        assert_eq!(field.side(Player::P1).active_slot(), Some(0));
        assert_eq!(field.side(Player::P2).active().unwrap().details().species, 16);
        assert_eq!(field.pokemon(p1(0)).unwrap().hp(), (20, 20));
        assert_eq!(observer.actions.len(), 5);
        assert_eq!(observer.active_changes, vec![(Player::P1, 0), (Player::P2, 0)]);
    }

    #[test]
    fn test_bad_buffer_changes_nothing() {
        let mut bytes = encode_actions(&opening());
        bytes.pop();
        bytes.extend_from_slice(&[16, 0, 0]);

        let mut field = BattleField::omniscient();
        assert!(field.apply(&bytes, &mut ()).is_err());
        assert_eq!(field.turn, 0);
        assert_eq!(field.side(Player::P1).active_slot(), None);
    }

    #[test]
    fn test_split_buffers_match_single_buffer() {
        let mut actions = opening();
        actions.extend([
            Action::BoostDelta {
                pokemon: p2(0),
                mask: BoostStat::Atk.bit(),
                boosts: PackedBoosts::new().with(BoostStat::Atk, -1),
            },
            Action::Volatile {
                pokemon: p1(0),
                volatile: Volatile::Substitute,
                active: true,
            },
            Action::SideCondition {
                side: Player::P2,
                condition: SideCondition::Spikes,
                active: true,
            },
            Action::Weather(Some(Weather::Rain)),
            Action::SetStatus {
                pokemon: p2(0),
                status: Some(Status::Burn),
                team: false,
            },
            Action::SwitchPokemon {
                pokemon: p2(1),
                details: details(19),
                drag: true,
            },
            Action::SwapSideConditions,
            Action::Turn(2),
        ]);

        let mut whole = BattleField::omniscient();
        whole.apply(&encode_actions(&actions), &mut ()).unwrap();

        for split in 0..=actions.len() {
            let (prefix, suffix) = actions.split_at(split);
            let mut parts = BattleField::omniscient();
            parts.apply(&encode_actions(prefix), &mut ()).unwrap();
            parts.apply(&encode_actions(suffix), &mut ()).unwrap();
            whole.assert_same_state(&parts);
        }
    }

    #[test]
    fn test_assignments_are_idempotent() {
        let bytes = encode_actions(&opening());
        let mut once = BattleField::omniscient();
        once.apply(&bytes, &mut ()).unwrap();
        let mut twice = BattleField::omniscient();
        twice.apply(&bytes, &mut ()).unwrap();
        twice.apply(&bytes, &mut ()).unwrap();

        assert_eq!(once.turn, twice.turn);
        assert_eq!(
            once.pokemon(p2(0)).unwrap().hp(),
            twice.pokemon(p2(0)).unwrap().hp()
        );
        assert_eq!(
            once.side(Player::P2).active_slot(),
            twice.side(Player::P2).active_slot()
        );
    }

    #[test]
    fn test_owned_side_writes_roster() {
        let party = vec![RosterHandle::new(RosterEntry::new("Bulbasaur", 1, 5, 20))];
        let mut field = BattleField::for_player(Player::P1, &party);
        let actions = vec![
            Action::SwitchPokemon {
                pokemon: p1(0),
                details: details(1),
                drag: false,
            },
            Action::SetHp {
                pokemon: p1(0),
                hp: CompactHp::new(0, 20),
                direct: false,
                heal: false,
            },
            Action::SetStatus {
                pokemon: p1(0),
                status: Some(Status::Fainted),
                team: false,
            },
        ];
        field.apply(&encode_actions(&actions), &mut ()).unwrap();

        let entry = party[0].snapshot();
        assert_eq!(entry.hp, 0);
        assert!(entry.is_fainted());
        assert!(field.me().unwrap().pokemon(0).unwrap().is_owned());
        assert!(!field.opponent().unwrap().pokemon(0).unwrap().is_owned());
    }

    #[test]
    fn test_repeated_boosts_saturate() {
        let mut field = BattleField::omniscient();
        let delta = PackedBoosts::new().with(BoostStat::Atk, 2);
        let boost = Action::BoostDelta {
            pokemon: p1(0),
            mask: BoostStat::Atk.bit(),
            boosts: delta,
        };
        let actions = vec![boost; 5];
        field.apply(&encode_actions(&actions), &mut ()).unwrap();
        assert_eq!(field.pokemon(p1(0)).unwrap().boosts().get(BoostStat::Atk), 7);
    }

    #[test]
    fn test_boost_swap_copy_and_bulk() {
        let mut field = BattleField::omniscient();
        let pair = PokemonPairRef {
            source: p1(0),
            target: p2(0),
        };
        let actions = vec![
            Action::SwitchPokemon {
                pokemon: p1(0),
                details: details(1),
                drag: false,
            },
            Action::SwitchPokemon {
                pokemon: p2(0),
                details: details(16),
                drag: false,
            },
            Action::BoostSet {
                pokemon: p1(0),
                mask: ALL_LANES,
                boosts: PackedBoosts::new().with(BoostStat::Atk, 2).with(BoostStat::Def, -1),
            },
            Action::BoostSwap {
                pair,
                mask: BoostStat::Atk.bit(),
            },
        ];
        field.apply(&encode_actions(&actions), &mut ()).unwrap();
        assert_eq!(field.pokemon(p1(0)).unwrap().boosts().get(BoostStat::Atk), 0);
        assert_eq!(field.pokemon(p2(0)).unwrap().boosts().get(BoostStat::Atk), 2);
        assert_eq!(field.pokemon(p1(0)).unwrap().boosts().get(BoostStat::Def), -1);

        let more = vec![
            Action::BoostCopy { pair },
            Action::BulkBoost {
                op: BulkBoostOp::Invert,
                target: BulkTarget::AllActive,
            },
        ];
        field.apply(&encode_actions(&more), &mut ()).unwrap();
        let target = field.pokemon(p2(0)).unwrap().boosts();
        assert_eq!(target.get(BoostStat::Def), 1);
        assert_eq!(target.get(BoostStat::Atk), 0);

        field
            .apply(
                &encode_actions(&[Action::BulkBoost {
                    op: BulkBoostOp::Clear,
                    target: BulkTarget::One(p2(0)),
                }]),
                &mut (),
            )
            .unwrap();
        assert!(field.pokemon(p2(0)).unwrap().boosts().is_clear());
    }

    #[test]
    fn test_switch_out_drops_volatiles_and_boosts() {
        let mut field = BattleField::omniscient();
        let actions = vec![
            Action::SwitchPokemon {
                pokemon: p2(0),
                details: details(16),
                drag: false,
            },
            Action::Volatile {
                pokemon: p2(0),
                volatile: Volatile::LeechSeed,
                active: true,
            },
            Action::BoostDelta {
                pokemon: p2(0),
                mask: BoostStat::Spe.bit(),
                boosts: PackedBoosts::new().with(BoostStat::Spe, 1),
            },
            Action::SwitchPokemon {
                pokemon: p2(1),
                details: details(19),
                drag: true,
            },
        ];
        field.apply(&encode_actions(&actions), &mut ()).unwrap();
        let benched = field.pokemon(p2(0)).unwrap();
        assert!(!benched.has_volatile(Volatile::LeechSeed));
        assert!(benched.boosts().is_clear());
        assert_eq!(field.side(Player::P2).active_slot(), Some(1));
    }

    #[test]
    fn test_team_cure_skips_fainted() {
        let mut field = BattleField::omniscient();
        let actions = vec![
            Action::SetStatus {
                pokemon: p1(0),
                status: Some(Status::Fainted),
                team: false,
            },
            Action::SetStatus {
                pokemon: p1(1),
                status: Some(Status::Burn),
                team: false,
            },
            Action::SetStatus {
                pokemon: p1(1),
                status: None,
                team: true,
            },
        ];
        field.apply(&encode_actions(&actions), &mut ()).unwrap();
        assert_eq!(field.pokemon(p1(0)).unwrap().status(), Some(Status::Fainted));
        assert_eq!(field.pokemon(p1(1)).unwrap().status(), None);
    }

    #[test]
    fn test_conditions_and_court_change() {
        let mut field = BattleField::omniscient();
        let actions = vec![
            Action::Weather(Some(Weather::Sand)),
            Action::FieldCondition {
                condition: FieldCondition::TrickRoom,
                active: true,
            },
            Action::SideCondition {
                side: Player::P1,
                condition: SideCondition::Spikes,
                active: true,
            },
            Action::SideCondition {
                side: Player::P1,
                condition: SideCondition::Spikes,
                active: true,
            },
            Action::SideCondition {
                side: Player::P2,
                condition: SideCondition::Reflect,
                active: true,
            },
            Action::SwapSideConditions,
        ];
        field.apply(&encode_actions(&actions), &mut ()).unwrap();

        assert_eq!(field.weather, Some(Weather::Sand));
        assert!(field.has_condition(FieldCondition::TrickRoom));
        assert_eq!(field.side(Player::P2).condition_layers(SideCondition::Spikes), 2);
        assert!(field.side(Player::P1).has_condition(SideCondition::Reflect));

        let end = vec![
            Action::Weather(None),
            Action::FieldCondition {
                condition: FieldCondition::TrickRoom,
                active: false,
            },
        ];
        field.apply(&encode_actions(&end), &mut ()).unwrap();
        assert_eq!(field.weather, None);
        assert!(!field.has_condition(FieldCondition::TrickRoom));
    }

    #[test]
    fn test_item_and_ability_reveal() {
        let mut field = BattleField::omniscient();
        let actions = vec![
            Action::ItemReveal {
                pokemon: p2(0),
                item: 12,
                consumed: false,
            },
            Action::AbilityReveal {
                pokemon: p2(0),
                ability: 4,
            },
        ];
        field.apply(&encode_actions(&actions), &mut ()).unwrap();
        let pokemon = field.pokemon(p2(0)).unwrap();
        assert_eq!(pokemon.item(), Some(12));
        assert_eq!(pokemon.ability(), Some(4));

        let consumed = [Action::ItemReveal {
            pokemon: p2(0),
            item: 12,
            consumed: true,
        }];
        field.apply(&encode_actions(&consumed), &mut ()).unwrap();
        assert_eq!(field.pokemon(p2(0)).unwrap().item(), Some(0));
    }
}
