//! Simulator output: lines, chunks and their parsed form

mod battle;
mod battle_init;
mod battle_major;
mod battle_minor;
mod battle_progress;
mod choice_error;
mod request;

pub use battle::{HpStatus, Player, Pokemon, PokemonDetails, Side, Stat};
pub use choice_error::{ChoiceError, ChoiceErrorCategory, ChoiceErrorKind};
pub use request::{ActivePokemon, BattleRequest, MoveSlot, SideInfo, SidePokemon};

use crate::ParseError;
use anyhow::Result;

/// Every line kind the simulator can emit during a battle.
///
/// Unknown or purely cosmetic lines land in [`SimMessage::Raw`].
#[derive(Debug, Clone, PartialEq)]
pub enum SimMessage {
    // === Initialization ===
    Player {
        player: Player,
        username: String,
        avatar: String,
        rating: Option<u32>,
    },
    TeamSize {
        player: Player,
        size: u8,
    },
    GameType(String),
    Gen(u8),
    Tier(String),
    Rated(Option<String>),
    Rule(String),
    ClearPoke,
    Poke {
        player: Player,
        details: PokemonDetails,
        has_item: bool,
    },
    TeamPreview(Option<u8>),
    Start,

    // === Progress ===
    Request(Box<BattleRequest>),
    Error(ChoiceError),
    Split(Player),
    Inactive(String),
    InactiveOff(String),
    Upkeep,
    Turn(u32),
    Win(String),
    Tie,

    // === Major actions ===
    Move {
        pokemon: Pokemon,
        move_name: String,
        target: Option<Pokemon>,
        miss: bool,
        still: bool,
        anim: Option<String>,
    },
    Switch {
        pokemon: Pokemon,
        details: PokemonDetails,
        hp_status: Option<HpStatus>,
    },
    Drag {
        pokemon: Pokemon,
        details: PokemonDetails,
        hp_status: Option<HpStatus>,
    },
    DetailsChange {
        pokemon: Pokemon,
        details: PokemonDetails,
        hp_status: Option<HpStatus>,
    },
    FormeChange {
        pokemon: Pokemon,
        species: String,
        hp_status: Option<HpStatus>,
    },
    Replace {
        pokemon: Pokemon,
        details: PokemonDetails,
        hp_status: Option<HpStatus>,
    },
    Swap {
        pokemon: Pokemon,
        position: u8,
    },
    Cant {
        pokemon: Pokemon,
        reason: String,
        move_name: Option<String>,
    },
    Faint(Pokemon),

    // === Minor actions ===
    Fail {
        pokemon: Pokemon,
        action: Option<String>,
    },
    Block {
        pokemon: Pokemon,
        effect: String,
        move_name: Option<String>,
        attacker: Option<Pokemon>,
    },
    NoTarget(Option<Pokemon>),
    Miss {
        source: Pokemon,
        target: Option<Pokemon>,
    },
    Damage {
        pokemon: Pokemon,
        hp_status: Option<HpStatus>,
    },
    Heal {
        pokemon: Pokemon,
        hp_status: Option<HpStatus>,
    },
    SetHp {
        pokemon: Pokemon,
        hp_status: Option<HpStatus>,
    },
    Status {
        pokemon: Pokemon,
        status: String,
    },
    CureStatus {
        pokemon: Pokemon,
        status: String,
    },
    CureTeam(Pokemon),
    Boost {
        pokemon: Pokemon,
        stat: Stat,
        amount: i8,
    },
    Unboost {
        pokemon: Pokemon,
        stat: Stat,
        amount: i8,
    },
    SetBoost {
        pokemon: Pokemon,
        stat: Stat,
        amount: i8,
    },
    SwapBoost {
        source: Pokemon,
        target: Pokemon,
        stats: Vec<Stat>,
    },
    InvertBoost(Pokemon),
    ClearBoost(Pokemon),
    ClearAllBoost,
    ClearPositiveBoost {
        target: Pokemon,
        source: Option<Pokemon>,
        effect: String,
    },
    ClearNegativeBoost(Pokemon),
    CopyBoost {
        source: Pokemon,
        target: Pokemon,
    },
    Weather {
        weather: String,
        upkeep: bool,
    },
    FieldStart(String),
    FieldEnd(String),
    SideStart {
        side: Side,
        condition: String,
    },
    SideEnd {
        side: Side,
        condition: String,
    },
    SwapSideConditions,
    VolatileStart {
        pokemon: Pokemon,
        effect: String,
    },
    VolatileEnd {
        pokemon: Pokemon,
        effect: String,
    },
    Crit(Pokemon),
    SuperEffective(Pokemon),
    Resisted(Pokemon),
    Immune(Pokemon),
    Item {
        pokemon: Pokemon,
        item: String,
        from: Option<String>,
    },
    EndItem {
        pokemon: Pokemon,
        item: String,
        from: Option<String>,
        eat: bool,
    },
    Ability {
        pokemon: Pokemon,
        ability: String,
        from: Option<String>,
    },
    EndAbility(Pokemon),
    Transform {
        pokemon: Pokemon,
        species: String,
    },
    Mega {
        pokemon: Pokemon,
        megastone: String,
    },
    Primal(Pokemon),
    Burst {
        pokemon: Pokemon,
        species: String,
        item: String,
    },
    Terastallize {
        pokemon: Pokemon,
        tera_type: String,
    },
    ZPower(Pokemon),
    ZBroken(Pokemon),
    Activate {
        pokemon: Option<Pokemon>,
        effect: String,
    },
    Hint(String),
    Center,
    Message(String),
    Combine,
    Waiting {
        source: Pokemon,
        target: Pokemon,
    },
    Prepare {
        attacker: Pokemon,
        move_name: String,
        defender: Option<Pokemon>,
    },
    MustRecharge(Pokemon),
    Nothing,
    HitCount {
        pokemon: Pokemon,
        count: u8,
    },
    SingleMove {
        pokemon: Pokemon,
        move_name: String,
    },
    SingleTurn {
        pokemon: Pokemon,
        move_name: String,
    },

    Raw(String),
}

/// One logical line of an `update` chunk
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateLine {
    /// Seen identically by everyone
    Shared(SimMessage),

    /// `|split|PLAYER` group: the secret line goes to that player (and the
    /// host), the public line to everyone else
    Split {
        player: Player,
        secret: SimMessage,
        public: SimMessage,
    },
}

/// A blank-line-terminated block of simulator output
#[derive(Debug, Clone, PartialEq)]
pub enum SimChunk {
    /// `update`: battle log lines for all observers
    Update(Vec<UpdateLine>),

    /// `sideupdate` + player line: private lines (`|request|`, `|error|`)
    SideUpdate {
        player: Player,
        messages: Vec<SimMessage>,
    },

    /// `end`: the battle is over, followed by the JSON log
    End(String),
}

/// Parse one chunk of simulator output (without its terminating blank line)
pub fn parse_sim_chunk(chunk: &str) -> Result<SimChunk> {
    let mut lines = chunk.lines().filter(|line| !line.trim().is_empty());
    let kind = lines.next().ok_or(ParseError::EmptyMessage)?;

    match kind.trim() {
        "update" => parse_update(lines).map(SimChunk::Update),
        "sideupdate" => {
            let player = lines
                .next()
                .and_then(|line| Player::parse(line.trim()))
                .ok_or_else(|| ParseError::MissingField("sideupdate player".to_string()))?;
            let messages = lines
                .map(parse_sim_message)
                .collect::<Result<Vec<_>>>()?;
            Ok(SimChunk::SideUpdate { player, messages })
        }
        "end" => Ok(SimChunk::End(lines.collect::<Vec<_>>().join("\n"))),
        other => Err(ParseError::InvalidFormat(format!("unknown chunk type {:?}", other)).into()),
    }
}

fn parse_update<'a>(mut lines: impl Iterator<Item = &'a str>) -> Result<Vec<UpdateLine>> {
    let mut out = Vec::new();

    while let Some(line) = lines.next() {
        match parse_sim_message(line)? {
            SimMessage::Split(player) => {
                let secret = lines
                    .next()
                    .ok_or_else(|| ParseError::MissingField("split secret line".to_string()))?;
                let public = lines
                    .next()
                    .ok_or_else(|| ParseError::MissingField("split public line".to_string()))?;
                out.push(UpdateLine::Split {
                    player,
                    secret: parse_sim_message(secret)?,
                    public: parse_sim_message(public)?,
                });
            }
            message => out.push(UpdateLine::Shared(message)),
        }
    }

    Ok(out)
}

/// Parse a single simulator line into a SimMessage
pub fn parse_sim_message(line: &str) -> Result<SimMessage> {
    let line = line.trim();

    if line.is_empty() {
        return Ok(SimMessage::Raw(String::new()));
    }

    if !line.starts_with('|') {
        return Ok(SimMessage::Raw(line.to_string()));
    }

    let parts: Vec<&str> = line.split('|').collect();

    if parts.len() < 2 {
        return Ok(SimMessage::Raw(line.to_string()));
    }

    match parts[1] {
        // Initialization
        "player" => battle_init::parse_player(&parts),
        "teamsize" => battle_init::parse_teamsize(&parts),
        "gametype" => battle_init::parse_gametype(&parts),
        "gen" => battle_init::parse_gen(&parts),
        "tier" => battle_init::parse_tier(&parts),
        "rated" => battle_init::parse_rated(&parts),
        "rule" => battle_init::parse_rule(&parts),
        "clearpoke" => Ok(SimMessage::ClearPoke),
        "poke" => battle_init::parse_poke(&parts),
        "teampreview" => battle_init::parse_teampreview(&parts),
        "start" => Ok(SimMessage::Start),

        // Progress
        "request" => battle_progress::parse_request(&parts),
        "error" => battle_progress::parse_error(&parts),
        "split" => battle_progress::parse_split(&parts),
        "inactive" => battle_progress::parse_inactive(&parts),
        "inactiveoff" => battle_progress::parse_inactiveoff(&parts),
        "upkeep" => Ok(SimMessage::Upkeep),
        "turn" => battle_progress::parse_turn(&parts),
        "win" => battle_progress::parse_win(&parts),
        "tie" => Ok(SimMessage::Tie),

        // Major actions
        "move" => battle_major::parse_move(&parts),
        "switch" => battle_major::parse_switch(&parts),
        "drag" => battle_major::parse_drag(&parts),
        "detailschange" => battle_major::parse_detailschange(&parts),
        "-formechange" => battle_major::parse_formechange(&parts),
        "replace" => battle_major::parse_replace(&parts),
        "swap" => battle_major::parse_swap(&parts),
        "cant" => battle_major::parse_cant(&parts),
        "faint" => battle_major::parse_faint(&parts),

        // Minor actions
        "-fail" => battle_minor::parse_fail(&parts),
        "-block" => battle_minor::parse_block(&parts),
        "-notarget" => battle_minor::parse_notarget(&parts),
        "-miss" => battle_minor::parse_miss(&parts),
        "-damage" => battle_minor::parse_damage(&parts),
        "-heal" => battle_minor::parse_heal(&parts),
        "-sethp" => battle_minor::parse_sethp(&parts),
        "-status" => battle_minor::parse_status(&parts),
        "-curestatus" => battle_minor::parse_curestatus(&parts),
        "-cureteam" => battle_minor::parse_cureteam(&parts),
        "-boost" => battle_minor::parse_boost(&parts),
        "-unboost" => battle_minor::parse_unboost(&parts),
        "-setboost" => battle_minor::parse_setboost(&parts),
        "-swapboost" => battle_minor::parse_swapboost(&parts),
        "-invertboost" => battle_minor::parse_invertboost(&parts),
        "-clearboost" => battle_minor::parse_clearboost(&parts),
        "-clearallboost" => Ok(SimMessage::ClearAllBoost),
        "-clearpositiveboost" => battle_minor::parse_clearpositiveboost(&parts),
        "-clearnegativeboost" => battle_minor::parse_clearnegativeboost(&parts),
        "-copyboost" => battle_minor::parse_copyboost(&parts),
        "-weather" => battle_minor::parse_weather(&parts),
        "-fieldstart" => battle_minor::parse_fieldstart(&parts),
        "-fieldend" => battle_minor::parse_fieldend(&parts),
        "-sidestart" => battle_minor::parse_sidestart(&parts),
        "-sideend" => battle_minor::parse_sideend(&parts),
        "-swapsideconditions" => Ok(SimMessage::SwapSideConditions),
        "-start" => battle_minor::parse_start(&parts),
        "-end" => battle_minor::parse_end(&parts),
        "-crit" => battle_minor::parse_crit(&parts),
        "-supereffective" => battle_minor::parse_supereffective(&parts),
        "-resisted" => battle_minor::parse_resisted(&parts),
        "-immune" => battle_minor::parse_immune(&parts),
        "-item" => battle_minor::parse_item(&parts),
        "-enditem" => battle_minor::parse_enditem(&parts),
        "-ability" => battle_minor::parse_ability(&parts),
        "-endability" => battle_minor::parse_endability(&parts),
        "-transform" => battle_minor::parse_transform(&parts),
        "-mega" => battle_minor::parse_mega(&parts),
        "-primal" => battle_minor::parse_primal(&parts),
        "-burst" => battle_minor::parse_burst(&parts),
        "-terastallize" => battle_minor::parse_terastallize(&parts),
        "-zpower" => battle_minor::parse_zpower(&parts),
        "-zbroken" => battle_minor::parse_zbroken(&parts),
        "-activate" => battle_minor::parse_activate(&parts),
        "-hint" => battle_minor::parse_hint(&parts),
        "-center" => Ok(SimMessage::Center),
        "-message" => battle_minor::parse_message(&parts),
        "-combine" => Ok(SimMessage::Combine),
        "-waiting" => battle_minor::parse_waiting(&parts),
        "-prepare" => battle_minor::parse_prepare(&parts),
        "-mustrecharge" => battle_minor::parse_mustrecharge(&parts),
        "-nothing" => Ok(SimMessage::Nothing),
        "-hitcount" => battle_minor::parse_hitcount(&parts),
        "-singlemove" => battle_minor::parse_singlemove(&parts),
        "-singleturn" => battle_minor::parse_singleturn(&parts),

        _ => Ok(SimMessage::Raw(line.to_string())),
    }
}
