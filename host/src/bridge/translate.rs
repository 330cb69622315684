//! Simulator lines to action buffers, one per audience

use std::sync::Arc;

use tandem_battle::{
    Action, ActionWriter, BoostStat, BulkBoostOp, BulkTarget, CompactDetails, CompactHp, Dex,
    FieldCondition, PackedBoosts, PokemonPairRef, PokemonRef, SideCondition, Status, Type,
    Volatile, Weather, ALL_LANES, MAX_SPECIES_ID, SIDE_SLOTS, to_id,
};
use tandem_protocol::{HpStatus, Player, Pokemon, PokemonDetails, SimMessage, Stat, UpdateLine};

use crate::error::BridgeError;

/// How the simulator ended the battle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win(Player),
    Tie,
}

/// Encoded output of one update chunk. An empty buffer means the audience
/// has nothing to apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Broadcast {
    /// Indexed by [`Player::index`]
    pub sides: [Vec<u8>; 2],
    pub omniscient: Vec<u8>,
}

impl Broadcast {
    pub fn is_empty(&self) -> bool {
        self.omniscient.is_empty() && self.sides.iter().all(Vec::is_empty)
    }
}

/// Turns simulator lines into [`Action`]s.
///
/// Pokemon are addressed by their position in the submitted team, so the
/// translator is built from the team names in the order the simulator got them.
pub struct Translator {
    dex: Arc<dyn Dex>,
    players: [String; 2],
    names: [Vec<String>; 2],
    active: [Option<u8>; 2],
    details: [[Option<CompactDetails>; SIDE_SLOTS]; 2],
    outcome: Option<Outcome>,
}

impl Translator {
    pub fn new(dex: Arc<dyn Dex>, players: [String; 2], names: [Vec<String>; 2]) -> Self {
        Self {
            dex,
            players,
            names,
            active: [None; 2],
            details: [[None; SIDE_SLOTS]; 2],
            outcome: None,
        }
    }

    /// Set once a `|win|` or `|tie|` line has been seen
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn active_slot(&self, side: Player) -> Option<u8> {
        self.active[side.index()]
    }

    /// Encode an update chunk. Split groups send the secret line to its
    /// owner and the omniscient stream, the public line to the opponent.
    pub fn translate_update(&mut self, lines: &[UpdateLine]) -> Result<Broadcast, BridgeError> {
        let mut sides = [ActionWriter::new(), ActionWriter::new()];
        let mut omniscient = ActionWriter::new();

        for line in lines {
            match line {
                UpdateLine::Shared(message) => {
                    for action in self.translate(message)? {
                        sides[0].push(&action);
                        sides[1].push(&action);
                        omniscient.push(&action);
                    }
                }
                UpdateLine::Split {
                    player,
                    secret,
                    public,
                } => {
                    for action in self.translate(secret)? {
                        sides[player.index()].push(&action);
                        omniscient.push(&action);
                    }
                    for action in self.translate(public)? {
                        sides[player.opponent().index()].push(&action);
                    }
                }
            }
        }

        let [p1, p2] = sides;
        Ok(Broadcast {
            sides: [finish(p1), finish(p2)],
            omniscient: finish(omniscient),
        })
    }

    /// Actions for one line
    pub fn translate(&mut self, message: &SimMessage) -> Result<Vec<Action>, BridgeError> {
        let actions = match message {
            SimMessage::Player { .. }
            | SimMessage::TeamSize { .. }
            | SimMessage::GameType(_)
            | SimMessage::Gen(_)
            | SimMessage::Tier(_)
            | SimMessage::Rated(_)
            | SimMessage::Rule(_)
            | SimMessage::ClearPoke
            | SimMessage::Poke { .. }
            | SimMessage::TeamPreview(_)
            | SimMessage::Start => Vec::new(),

            // Private lines arrive in side updates and never reach here
            SimMessage::Request(_) | SimMessage::Error(_) => Vec::new(),
            // Grouped by the chunk parser
            SimMessage::Split(_) => Vec::new(),
            SimMessage::Inactive(_) | SimMessage::InactiveOff(_) | SimMessage::Upkeep => Vec::new(),

            SimMessage::Turn(turn) => vec![Action::Turn(u16::try_from(*turn).unwrap_or(u16::MAX))],
            SimMessage::Win(name) => {
                let winner = self.player_named(name)?;
                self.outcome = Some(Outcome::Win(winner));
                Vec::new()
            }
            SimMessage::Tie => {
                self.outcome = Some(Outcome::Tie);
                Vec::new()
            }

            SimMessage::Move {
                pokemon,
                move_name,
                target,
                miss,
                still,
                anim: _,
            } => {
                let move_id = self
                    .dex
                    .move_id(move_name)
                    .ok_or_else(|| BridgeError::unrecognized("move", move_name))?;
                vec![Action::MoveAnimation {
                    user: self.resolve(pokemon)?,
                    target: target.as_ref().map(|t| self.resolve(t)).transpose()?,
                    move_id,
                    miss: *miss,
                    still: *still,
                }]
            }
            SimMessage::Switch {
                pokemon,
                details,
                hp_status,
            }
            | SimMessage::Replace {
                pokemon,
                details,
                hp_status,
            } => self.switch_in(pokemon, details, hp_status.as_ref(), false)?,
            SimMessage::Drag {
                pokemon,
                details,
                hp_status,
            } => self.switch_in(pokemon, details, hp_status.as_ref(), true)?,
            SimMessage::DetailsChange {
                pokemon,
                details,
                hp_status,
            } => {
                let target = self.resolve(pokemon)?;
                let details = self.compact_details(details)?;
                self.remember(target, details);
                let mut actions = vec![Action::PokemonDetails {
                    pokemon: target,
                    details,
                    permanent: true,
                }];
                if let Some(hp) = hp_status {
                    actions.push(set_hp(target, hp, true, false));
                }
                actions
            }
            SimMessage::FormeChange {
                pokemon,
                species,
                hp_status,
            } => {
                let target = self.resolve(pokemon)?;
                let details = CompactDetails {
                    species: self.species_id(species)?,
                    ..self.known_details(target)
                };
                let mut actions = vec![Action::PokemonDetails {
                    pokemon: target,
                    details,
                    permanent: false,
                }];
                if let Some(hp) = hp_status {
                    actions.push(set_hp(target, hp, true, false));
                }
                actions
            }
            // Doubles repositioning
            SimMessage::Swap { .. } => Vec::new(),
            SimMessage::Cant { pokemon, .. } => vec![Action::ActionFail {
                pokemon: self.resolve(pokemon)?,
                miss: false,
            }],
            SimMessage::Faint(pokemon) => vec![Action::SetStatus {
                pokemon: self.resolve(pokemon)?,
                status: Some(Status::Fainted),
                team: false,
            }],

            SimMessage::Fail { pokemon, .. } | SimMessage::Block { pokemon, .. } => {
                vec![Action::ActionFail {
                    pokemon: self.resolve(pokemon)?,
                    miss: false,
                }]
            }
            SimMessage::NoTarget(pokemon) => match pokemon {
                Some(pokemon) => vec![Action::ActionFail {
                    pokemon: self.resolve(pokemon)?,
                    miss: false,
                }],
                None => Vec::new(),
            },
            SimMessage::Miss { source, .. } => vec![Action::ActionFail {
                pokemon: self.resolve(source)?,
                miss: true,
            }],
            SimMessage::Damage { pokemon, hp_status } => match hp_status {
                Some(hp) => vec![set_hp(self.resolve(pokemon)?, hp, false, false)],
                None => Vec::new(),
            },
            SimMessage::Heal { pokemon, hp_status } => match hp_status {
                Some(hp) => vec![set_hp(self.resolve(pokemon)?, hp, false, true)],
                None => Vec::new(),
            },
            SimMessage::SetHp { pokemon, hp_status } => match hp_status {
                Some(hp) => vec![set_hp(self.resolve(pokemon)?, hp, true, false)],
                None => Vec::new(),
            },
            SimMessage::Status { pokemon, status } => vec![Action::SetStatus {
                pokemon: self.resolve(pokemon)?,
                status: Some(parse_status(status)?),
                team: false,
            }],
            SimMessage::CureStatus { pokemon, .. } => vec![Action::SetStatus {
                pokemon: self.resolve(pokemon)?,
                status: None,
                team: false,
            }],
            SimMessage::CureTeam(pokemon) => vec![Action::SetStatus {
                pokemon: self.resolve(pokemon)?,
                status: None,
                team: true,
            }],
            SimMessage::Boost {
                pokemon,
                stat,
                amount,
            } => self.boost(pokemon, *stat, *amount, false)?,
            SimMessage::Unboost {
                pokemon,
                stat,
                amount,
            } => self.boost(pokemon, *stat, amount.saturating_neg(), false)?,
            SimMessage::SetBoost {
                pokemon,
                stat,
                amount,
            } => self.boost(pokemon, *stat, *amount, true)?,
            SimMessage::SwapBoost {
                source,
                target,
                stats,
            } => {
                let mask = if stats.is_empty() {
                    ALL_LANES
                } else {
                    stats
                        .iter()
                        .filter_map(|s| BoostStat::from_stat(*s))
                        .fold(0, |mask, lane| mask | lane.bit())
                };
                vec![Action::BoostSwap {
                    pair: self.pair(source, target)?,
                    mask,
                }]
            }
            SimMessage::CopyBoost { source, target } => vec![Action::BoostCopy {
                pair: self.pair(source, target)?,
            }],
            SimMessage::InvertBoost(pokemon) => self.bulk(BulkBoostOp::Invert, pokemon)?,
            SimMessage::ClearBoost(pokemon) => self.bulk(BulkBoostOp::Clear, pokemon)?,
            SimMessage::ClearPositiveBoost { target, .. } => {
                self.bulk(BulkBoostOp::ClearPositive, target)?
            }
            SimMessage::ClearNegativeBoost(pokemon) => {
                self.bulk(BulkBoostOp::ClearNegative, pokemon)?
            }
            SimMessage::ClearAllBoost => vec![Action::BulkBoost {
                op: BulkBoostOp::Clear,
                target: BulkTarget::AllActive,
            }],

            SimMessage::Weather { upkeep: true, .. } => Vec::new(),
            SimMessage::Weather {
                weather,
                upkeep: false,
            } => vec![Action::Weather(parse_weather(weather)?)],
            SimMessage::FieldStart(condition) => vec![Action::FieldCondition {
                condition: parse_field(condition)?,
                active: true,
            }],
            SimMessage::FieldEnd(condition) => vec![Action::FieldCondition {
                condition: parse_field(condition)?,
                active: false,
            }],
            SimMessage::SideStart { side, condition } => vec![Action::SideCondition {
                side: side.player,
                condition: parse_side(condition)?,
                active: true,
            }],
            SimMessage::SideEnd { side, condition } => vec![Action::SideCondition {
                side: side.player,
                condition: parse_side(condition)?,
                active: false,
            }],
            SimMessage::SwapSideConditions => vec![Action::SwapSideConditions],
            SimMessage::VolatileStart { pokemon, effect } => vec![Action::Volatile {
                pokemon: self.resolve(pokemon)?,
                volatile: parse_volatile(effect)?,
                active: true,
            }],
            SimMessage::VolatileEnd { pokemon, effect } => vec![Action::Volatile {
                pokemon: self.resolve(pokemon)?,
                volatile: parse_volatile(effect)?,
                active: false,
            }],

            SimMessage::Item { pokemon, item, .. } => vec![Action::ItemReveal {
                pokemon: self.resolve(pokemon)?,
                item: self.item_id(item)?,
                consumed: false,
            }],
            SimMessage::EndItem { pokemon, item, .. } => vec![Action::ItemReveal {
                pokemon: self.resolve(pokemon)?,
                item: self.item_id(item)?,
                consumed: true,
            }],
            SimMessage::Ability {
                pokemon, ability, ..
            } => vec![Action::AbilityReveal {
                pokemon: self.resolve(pokemon)?,
                ability: self
                    .dex
                    .ability_id(ability)
                    .ok_or_else(|| BridgeError::unrecognized("ability", ability))?,
            }],
            SimMessage::EndAbility(_) => Vec::new(),
            SimMessage::Terastallize { pokemon, tera_type } => {
                let target = self.resolve(pokemon)?;
                let tera = Type::from_protocol(tera_type)
                    .ok_or_else(|| BridgeError::unrecognized("type", tera_type))?;
                let details = CompactDetails {
                    tera_type: Some(tera),
                    ..self.known_details(target)
                };
                self.remember(target, details);
                vec![Action::PokemonDetails {
                    pokemon: target,
                    details,
                    permanent: true,
                }]
            }
            SimMessage::Transform { pokemon, species } => {
                tracing::debug!(pokemon = %pokemon.name, species = %species, "Transform is not replicated");
                Vec::new()
            }
            // A detailschange line follows each of these
            SimMessage::Mega { .. } | SimMessage::Primal(_) | SimMessage::Burst { .. } => Vec::new(),

            SimMessage::Crit(_)
            | SimMessage::SuperEffective(_)
            | SimMessage::Resisted(_)
            | SimMessage::Immune(_)
            | SimMessage::ZPower(_)
            | SimMessage::ZBroken(_)
            | SimMessage::Activate { .. }
            | SimMessage::Hint(_)
            | SimMessage::Center
            | SimMessage::Message(_)
            | SimMessage::Combine
            | SimMessage::Waiting { .. }
            | SimMessage::Prepare { .. }
            | SimMessage::MustRecharge(_)
            | SimMessage::Nothing
            | SimMessage::HitCount { .. }
            | SimMessage::SingleMove { .. }
            | SimMessage::SingleTurn { .. }
            | SimMessage::Raw(_) => Vec::new(),
        };

        Ok(actions)
    }

    fn switch_in(
        &mut self,
        pokemon: &Pokemon,
        details: &PokemonDetails,
        hp_status: Option<&HpStatus>,
        drag: bool,
    ) -> Result<Vec<Action>, BridgeError> {
        let target = self.slot_named(pokemon)?;
        let details = self.compact_details(details)?;
        self.remember(target, details);
        self.active[target.side.index()] = Some(target.slot);

        let mut actions = vec![Action::SwitchPokemon {
            pokemon: target,
            details,
            drag,
        }];
        if let Some(hp) = hp_status {
            actions.push(set_hp(target, hp, true, false));
            if let Some(status) = hp.status.as_deref().filter(|s| *s != "fnt") {
                actions.push(Action::SetStatus {
                    pokemon: target,
                    status: Some(parse_status(status)?),
                    team: false,
                });
            }
        }
        Ok(actions)
    }

    fn boost(
        &self,
        pokemon: &Pokemon,
        stat: Stat,
        amount: i8,
        set: bool,
    ) -> Result<Vec<Action>, BridgeError> {
        // Evasion has no lane
        let Some(lane) = BoostStat::from_stat(stat) else {
            return Ok(Vec::new());
        };
        let pokemon = self.resolve(pokemon)?;
        let boosts = PackedBoosts::new().with(lane, amount);
        let mask = lane.bit();
        Ok(vec![if set {
            Action::BoostSet {
                pokemon,
                mask,
                boosts,
            }
        } else {
            Action::BoostDelta {
                pokemon,
                mask,
                boosts,
            }
        }])
    }

    fn bulk(&self, op: BulkBoostOp, pokemon: &Pokemon) -> Result<Vec<Action>, BridgeError> {
        Ok(vec![Action::BulkBoost {
            op,
            target: BulkTarget::One(self.resolve(pokemon)?),
        }])
    }

    fn pair(&self, source: &Pokemon, target: &Pokemon) -> Result<PokemonPairRef, BridgeError> {
        Ok(PokemonPairRef {
            source: self.resolve(source)?,
            target: self.resolve(target)?,
        })
    }

    /// Active idents prefer the tracked active slot, so duplicate names
    /// on one side still land on the Pokemon in battle
    fn resolve(&self, pokemon: &Pokemon) -> Result<PokemonRef, BridgeError> {
        let side = pokemon.player;
        if pokemon.position.is_some()
            && let Some(slot) = self.active[side.index()]
            && self.names[side.index()].get(usize::from(slot)) == Some(&pokemon.name)
        {
            return PokemonRef::new(side, usize::from(slot)).ok_or_else(|| unknown(pokemon));
        }
        self.slot_named(pokemon)
    }

    fn slot_named(&self, pokemon: &Pokemon) -> Result<PokemonRef, BridgeError> {
        self.names[pokemon.player.index()]
            .iter()
            .position(|name| *name == pokemon.name)
            .and_then(|slot| PokemonRef::new(pokemon.player, slot))
            .ok_or_else(|| unknown(pokemon))
    }

    fn player_named(&self, name: &str) -> Result<Player, BridgeError> {
        self.players
            .iter()
            .position(|p| p == name)
            .and_then(Player::from_index)
            .ok_or_else(|| BridgeError::Malformed(format!("winner {:?} is not a player", name)))
    }

    fn remember(&mut self, pokemon: PokemonRef, details: CompactDetails) {
        self.details[pokemon.side.index()][usize::from(pokemon.slot)] = Some(details);
    }

    fn known_details(&self, pokemon: PokemonRef) -> CompactDetails {
        self.details[pokemon.side.index()][usize::from(pokemon.slot)].unwrap_or_default()
    }

    fn species_id(&self, species: &str) -> Result<u16, BridgeError> {
        self.dex
            .species_id(species)
            .filter(|id| *id <= MAX_SPECIES_ID)
            .ok_or_else(|| BridgeError::unrecognized("species", species))
    }

    fn item_id(&self, item: &str) -> Result<u16, BridgeError> {
        self.dex
            .item_id(item)
            .ok_or_else(|| BridgeError::unrecognized("item", item))
    }

    fn compact_details(&self, details: &PokemonDetails) -> Result<CompactDetails, BridgeError> {
        let tera_type = details
            .tera_type
            .as_deref()
            .map(|t| Type::from_protocol(t).ok_or_else(|| BridgeError::unrecognized("type", t)))
            .transpose()?;
        Ok(CompactDetails {
            species: self.species_id(&details.species)?,
            gender: details.gender,
            shiny: details.shiny,
            level: details.level.unwrap_or(100),
            tera_type,
        })
    }
}

fn finish(writer: ActionWriter) -> Vec<u8> {
    if writer.is_empty() {
        Vec::new()
    } else {
        writer.finish()
    }
}

fn unknown(pokemon: &Pokemon) -> BridgeError {
    BridgeError::UnknownPokemon {
        side: pokemon.player,
        name: pokemon.name.clone(),
    }
}

fn set_hp(pokemon: PokemonRef, hp: &HpStatus, direct: bool, heal: bool) -> Action {
    Action::SetHp {
        pokemon,
        hp: CompactHp::from_values(hp.current, hp.max.unwrap_or(0)),
        direct,
        heal,
    }
}

fn parse_status(status: &str) -> Result<Status, BridgeError> {
    Status::from_protocol(status).ok_or_else(|| BridgeError::unrecognized("status", status))
}

fn parse_volatile(effect: &str) -> Result<Volatile, BridgeError> {
    Volatile::from_protocol(effect).ok_or_else(|| BridgeError::unrecognized("volatile", effect))
}

fn parse_weather(weather: &str) -> Result<Option<Weather>, BridgeError> {
    if to_id(weather) == "none" {
        return Ok(None);
    }
    Weather::from_protocol(weather)
        .map(Some)
        .ok_or_else(|| BridgeError::unrecognized("weather", weather))
}

fn parse_field(condition: &str) -> Result<FieldCondition, BridgeError> {
    FieldCondition::from_protocol(condition)
        .ok_or_else(|| BridgeError::unrecognized("field condition", condition))
}

fn parse_side(condition: &str) -> Result<SideCondition, BridgeError> {
    SideCondition::from_protocol(condition)
        .ok_or_else(|| BridgeError::unrecognized("side condition", condition))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_battle::{decode_actions, BattleField, TableDex};
    use tandem_protocol::{parse_sim_chunk, SimChunk};

    fn dex() -> Arc<dyn Dex> {
        Arc::new(TableDex::new(
            &["Bulbasaur", "Charmander", "Pidgey", "Squirtle"],
            &["Tackle", "Growl", "Ember"],
            &["Leftovers", "Sitrus Berry"],
            &["Overgrow", "Blaze"],
        ))
    }

    fn translator() -> Translator {
        Translator::new(
            dex(),
            ["player-1".to_string(), "player-2".to_string()],
            [
                vec!["Bulbasaur".to_string(), "Pidgey".to_string()],
                vec!["Foe".to_string(), "Squirtle".to_string()],
            ],
        )
    }

    fn update(translator: &mut Translator, text: &str) -> Result<Broadcast, BridgeError> {
        match parse_sim_chunk(text).unwrap() {
            SimChunk::Update(lines) => translator.translate_update(&lines),
            other => panic!("not an update: {:?}", other),
        }
    }

    fn p1(slot: usize) -> PokemonRef {
        PokemonRef::new(Player::P1, slot).unwrap()
    }

    fn p2(slot: usize) -> PokemonRef {
        PokemonRef::new(Player::P2, slot).unwrap()
    }

    #[test]
    fn test_switch_line_becomes_switch_and_hp() {
        let mut t = translator();
        let out = update(&mut t, "update\n|switch|p1a: Bulbasaur|Bulbasaur, L5|20/20").unwrap();

        let actions = decode_actions(&out.sides[0]).unwrap();
        assert_eq!(
            actions,
            vec![
                Action::SwitchPokemon {
                    pokemon: p1(0),
                    details: CompactDetails {
                        species: 1,
                        level: 5,
                        ..Default::default()
                    },
                    drag: false,
                },
                Action::SetHp {
                    pokemon: p1(0),
                    hp: CompactHp::new(20, 20),
                    direct: true,
                    heal: false,
                },
            ]
        );
        assert_eq!(out.sides[0], out.sides[1]);
        assert_eq!(out.sides[0], out.omniscient);
        assert_eq!(t.active_slot(Player::P1), Some(0));
    }

    #[test]
    fn test_boost_saturates_on_replica() {
        let mut t = translator();
        let out = update(&mut t, "update\n|-boost|p2a: Foe|atk|1").unwrap();
        let actions = decode_actions(&out.omniscient).unwrap();
        assert_eq!(
            actions,
            vec![Action::BoostDelta {
                pokemon: p2(0),
                mask: BoostStat::Atk.bit(),
                boosts: PackedBoosts::new().with(BoostStat::Atk, 1),
            }]
        );

        let mut field = BattleField::omniscient();
        for _ in 0..10 {
            field.apply(&out.omniscient, &mut ()).unwrap();
        }
        assert_eq!(field.pokemon(p2(0)).unwrap().boosts().get(BoostStat::Atk), 7);
    }

    #[test]
    fn test_split_redacts_for_opponent() {
        let mut t = translator();
        let out = update(
            &mut t,
            "update\n|split|p1\n|-damage|p1a: Bulbasaur|12/20\n|-damage|p1a: Bulbasaur|60/100",
        )
        .unwrap();

        let hp_of = |buffer: &[u8]| match decode_actions(buffer).unwrap().as_slice() {
            [Action::SetHp { hp, .. }] => *hp,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(hp_of(&out.sides[0]), CompactHp::new(12, 20));
        assert_eq!(hp_of(&out.omniscient), CompactHp::new(12, 20));
        assert_eq!(hp_of(&out.sides[1]), CompactHp::new(60, 100));
    }

    #[test]
    fn test_move_and_reveals() {
        let mut t = translator();
        let out = update(
            &mut t,
            "update\n|move|p1a: Bulbasaur|Tackle|p2a: Foe\n|-enditem|p2a: Foe|Sitrus Berry|[eat]\n|-ability|p2a: Foe|Blaze",
        )
        .unwrap();
        let actions = decode_actions(&out.sides[0]).unwrap();
        assert_eq!(
            actions[0],
            Action::MoveAnimation {
                user: p1(0),
                target: Some(p2(0)),
                move_id: 1,
                miss: false,
                still: false,
            }
        );
        assert_eq!(
            actions[1],
            Action::ItemReveal {
                pokemon: p2(0),
                item: 2,
                consumed: true,
            }
        );
        assert_eq!(
            actions[2],
            Action::AbilityReveal {
                pokemon: p2(0),
                ability: 2,
            }
        );
    }

    #[test]
    fn test_unknown_names_are_hard_errors() {
        let mut t = translator();
        assert!(matches!(
            update(&mut t, "update\n|-start|p1a: Bulbasaur|Mystery Effect"),
            Err(BridgeError::Unrecognized { kind: "volatile", .. })
        ));
        assert!(matches!(
            update(&mut t, "update\n|move|p1a: Bulbasaur|Hyper Beam|p2a: Foe"),
            Err(BridgeError::Unrecognized { kind: "move", .. })
        ));
        assert!(matches!(
            update(&mut t, "update\n|-damage|p1a: Missingno|1/2"),
            Err(BridgeError::UnknownPokemon { .. })
        ));
    }

    #[test]
    fn test_faint_and_weather() {
        let mut t = translator();
        let out = update(
            &mut t,
            "update\n|-weather|SunnyDay\n|-weather|SunnyDay|[upkeep]\n|-damage|p2a: Foe|0 fnt\n|faint|p2a: Foe\n|-weather|none",
        )
        .unwrap();
        assert_eq!(
            decode_actions(&out.omniscient).unwrap(),
            vec![
                Action::Weather(Some(Weather::Sun)),
                Action::SetHp {
                    pokemon: p2(0),
                    hp: CompactHp::fainted(),
                    direct: false,
                    heal: false,
                },
                Action::SetStatus {
                    pokemon: p2(0),
                    status: Some(Status::Fainted),
                    team: false,
                },
                Action::Weather(None),
            ]
        );
    }

    #[test]
    fn test_forme_change_is_temporary() {
        let mut t = translator();
        update(&mut t, "update\n|switch|p2a: Squirtle|Squirtle, L30, F|80/80").unwrap();
        let out = update(&mut t, "update\n|-formechange|p2a: Squirtle|Pidgey").unwrap();
        assert_eq!(
            decode_actions(&out.sides[0]).unwrap(),
            vec![Action::PokemonDetails {
                pokemon: p2(1),
                details: CompactDetails {
                    species: 3,
                    gender: Some('F'),
                    level: 30,
                    ..Default::default()
                },
                permanent: false,
            }]
        );
    }

    #[test]
    fn test_outcomes() {
        let mut t = translator();
        update(&mut t, "update\n|turn|4").unwrap();
        assert_eq!(t.outcome(), None);
        update(&mut t, "update\n|win|player-2").unwrap();
        assert_eq!(t.outcome(), Some(Outcome::Win(Player::P2)));

        let mut t = translator();
        update(&mut t, "update\n|tie").unwrap();
        assert_eq!(t.outcome(), Some(Outcome::Tie));

        assert!(update(&mut translator(), "update\n|win|stranger").is_err());
    }

    #[test]
    fn test_cosmetic_lines_produce_nothing() {
        let mut t = translator();
        let out = update(&mut t, "update\n|\n|t:|1700000000\n|-crit|p2a: Foe\n|upkeep").unwrap();
        assert!(out.is_empty());
    }
}
