//! Minor actions: damage, stat stages, status, field and side effects

use super::SimMessage;
use super::battle::{Pokemon, Side, Stat, parse_from_tag, parse_hp_status, parse_pokemon};
use anyhow::Result;

fn text_at(parts: &[&str], index: usize) -> String {
    parts.get(index).unwrap_or(&"").to_string()
}

/// POKEMON|STAT|AMOUNT, shared by the boost family
fn parse_stat_change(parts: &[&str]) -> Result<(Pokemon, Stat, i8)> {
    let pokemon = parse_pokemon(parts, 2)?;
    let stat = parts
        .get(3)
        .and_then(|s| Stat::parse(s))
        .ok_or_else(|| anyhow::anyhow!("Missing stat"))?;
    let amount = parts
        .get(4)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| anyhow::anyhow!("Missing amount"))?;
    Ok((pokemon, stat, amount))
}

fn parse_side(parts: &[&str]) -> Result<(Side, String)> {
    let side = parts
        .get(2)
        .and_then(|s| Side::parse(s))
        .ok_or_else(|| anyhow::anyhow!("Missing side"))?;
    Ok((side, text_at(parts, 3)))
}

/// Parse |-fail|POKEMON|ACTION
pub fn parse_fail(parts: &[&str]) -> Result<SimMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let action = parts.get(3).map(|s| s.to_string());
    Ok(SimMessage::Fail { pokemon, action })
}

/// Parse |-block|POKEMON|EFFECT|MOVE|ATTACKER
pub fn parse_block(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::Block {
        pokemon: parse_pokemon(parts, 2)?,
        effect: text_at(parts, 3),
        move_name: parts.get(4).map(|s| s.to_string()),
        attacker: parts.get(5).and_then(|s| Pokemon::parse(s)),
    })
}

/// Parse |-notarget or |-notarget|POKEMON
pub fn parse_notarget(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::NoTarget(parts.get(2).and_then(|s| Pokemon::parse(s))))
}

/// Parse |-miss|SOURCE|TARGET
pub fn parse_miss(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::Miss {
        source: parse_pokemon(parts, 2)?,
        target: parts.get(3).and_then(|s| Pokemon::parse(s)),
    })
}

/// Parse |-damage|POKEMON|HP STATUS
pub fn parse_damage(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::Damage {
        pokemon: parse_pokemon(parts, 2)?,
        hp_status: parse_hp_status(parts, 3),
    })
}

/// Parse |-heal|POKEMON|HP STATUS
pub fn parse_heal(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::Heal {
        pokemon: parse_pokemon(parts, 2)?,
        hp_status: parse_hp_status(parts, 3),
    })
}

/// Parse |-sethp|POKEMON|HP
pub fn parse_sethp(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::SetHp {
        pokemon: parse_pokemon(parts, 2)?,
        hp_status: parse_hp_status(parts, 3),
    })
}

/// Parse |-status|POKEMON|STATUS
pub fn parse_status(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::Status {
        pokemon: parse_pokemon(parts, 2)?,
        status: text_at(parts, 3),
    })
}

/// Parse |-curestatus|POKEMON|STATUS
pub fn parse_curestatus(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::CureStatus {
        pokemon: parse_pokemon(parts, 2)?,
        status: text_at(parts, 3),
    })
}

/// Parse |-cureteam|POKEMON
pub fn parse_cureteam(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::CureTeam(parse_pokemon(parts, 2)?))
}

/// Parse |-boost|POKEMON|STAT|AMOUNT
pub fn parse_boost(parts: &[&str]) -> Result<SimMessage> {
    let (pokemon, stat, amount) = parse_stat_change(parts)?;
    Ok(SimMessage::Boost {
        pokemon,
        stat,
        amount,
    })
}

/// Parse |-unboost|POKEMON|STAT|AMOUNT
pub fn parse_unboost(parts: &[&str]) -> Result<SimMessage> {
    let (pokemon, stat, amount) = parse_stat_change(parts)?;
    Ok(SimMessage::Unboost {
        pokemon,
        stat,
        amount,
    })
}

/// Parse |-setboost|POKEMON|STAT|AMOUNT
pub fn parse_setboost(parts: &[&str]) -> Result<SimMessage> {
    let (pokemon, stat, amount) = parse_stat_change(parts)?;
    Ok(SimMessage::SetBoost {
        pokemon,
        stat,
        amount,
    })
}

/// Parse |-swapboost|SOURCE|TARGET|STATS (empty STATS swaps everything)
pub fn parse_swapboost(parts: &[&str]) -> Result<SimMessage> {
    let source = parse_pokemon(parts, 2)?;
    let target = parse_pokemon(parts, 3)?;
    let stats = parts
        .get(4)
        .filter(|s| !s.starts_with('['))
        .map(|s| s.split(',').filter_map(|s| Stat::parse(s.trim())).collect())
        .unwrap_or_default();

    Ok(SimMessage::SwapBoost {
        source,
        target,
        stats,
    })
}

/// Parse |-invertboost|POKEMON
pub fn parse_invertboost(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::InvertBoost(parse_pokemon(parts, 2)?))
}

/// Parse |-clearboost|POKEMON
pub fn parse_clearboost(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::ClearBoost(parse_pokemon(parts, 2)?))
}

/// Parse |-clearpositiveboost|TARGET|POKEMON|EFFECT
pub fn parse_clearpositiveboost(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::ClearPositiveBoost {
        target: parse_pokemon(parts, 2)?,
        source: parts.get(3).and_then(|s| Pokemon::parse(s)),
        effect: text_at(parts, 4),
    })
}

/// Parse |-clearnegativeboost|POKEMON
pub fn parse_clearnegativeboost(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::ClearNegativeBoost(parse_pokemon(parts, 2)?))
}

/// Parse |-copyboost|SOURCE|TARGET
pub fn parse_copyboost(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::CopyBoost {
        source: parse_pokemon(parts, 2)?,
        target: parse_pokemon(parts, 3)?,
    })
}

/// Parse |-weather|WEATHER with optional [upkeep]
pub fn parse_weather(parts: &[&str]) -> Result<SimMessage> {
    let weather = parts.get(2).unwrap_or(&"none").to_string();
    let upkeep = parts.contains(&"[upkeep]");
    Ok(SimMessage::Weather { weather, upkeep })
}

/// Parse |-fieldstart|CONDITION
pub fn parse_fieldstart(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::FieldStart(text_at(parts, 2)))
}

/// Parse |-fieldend|CONDITION
pub fn parse_fieldend(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::FieldEnd(text_at(parts, 2)))
}

/// Parse |-sidestart|SIDE|CONDITION
pub fn parse_sidestart(parts: &[&str]) -> Result<SimMessage> {
    let (side, condition) = parse_side(parts)?;
    Ok(SimMessage::SideStart { side, condition })
}

/// Parse |-sideend|SIDE|CONDITION
pub fn parse_sideend(parts: &[&str]) -> Result<SimMessage> {
    let (side, condition) = parse_side(parts)?;
    Ok(SimMessage::SideEnd { side, condition })
}

/// Parse |-start|POKEMON|EFFECT
pub fn parse_start(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::VolatileStart {
        pokemon: parse_pokemon(parts, 2)?,
        effect: text_at(parts, 3),
    })
}

/// Parse |-end|POKEMON|EFFECT
pub fn parse_end(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::VolatileEnd {
        pokemon: parse_pokemon(parts, 2)?,
        effect: text_at(parts, 3),
    })
}

/// Parse |-crit|POKEMON
pub fn parse_crit(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::Crit(parse_pokemon(parts, 2)?))
}

/// Parse |-supereffective|POKEMON
pub fn parse_supereffective(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::SuperEffective(parse_pokemon(parts, 2)?))
}

/// Parse |-resisted|POKEMON
pub fn parse_resisted(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::Resisted(parse_pokemon(parts, 2)?))
}

/// Parse |-immune|POKEMON
pub fn parse_immune(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::Immune(parse_pokemon(parts, 2)?))
}

/// Parse |-item|POKEMON|ITEM with optional [from] EFFECT
pub fn parse_item(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::Item {
        pokemon: parse_pokemon(parts, 2)?,
        item: text_at(parts, 3),
        from: parse_from_tag(parts),
    })
}

/// Parse |-enditem|POKEMON|ITEM with optional [from] EFFECT or [eat]
pub fn parse_enditem(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::EndItem {
        pokemon: parse_pokemon(parts, 2)?,
        item: text_at(parts, 3),
        from: parse_from_tag(parts),
        eat: parts.contains(&"[eat]"),
    })
}

/// Parse |-ability|POKEMON|ABILITY with optional [from] EFFECT
pub fn parse_ability(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::Ability {
        pokemon: parse_pokemon(parts, 2)?,
        ability: text_at(parts, 3),
        from: parse_from_tag(parts),
    })
}

/// Parse |-endability|POKEMON
pub fn parse_endability(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::EndAbility(parse_pokemon(parts, 2)?))
}

/// Parse |-transform|POKEMON|SPECIES
pub fn parse_transform(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::Transform {
        pokemon: parse_pokemon(parts, 2)?,
        species: text_at(parts, 3),
    })
}

/// Parse |-mega|POKEMON|MEGASTONE
pub fn parse_mega(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::Mega {
        pokemon: parse_pokemon(parts, 2)?,
        megastone: text_at(parts, 3),
    })
}

/// Parse |-primal|POKEMON
pub fn parse_primal(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::Primal(parse_pokemon(parts, 2)?))
}

/// Parse |-burst|POKEMON|SPECIES|ITEM
pub fn parse_burst(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::Burst {
        pokemon: parse_pokemon(parts, 2)?,
        species: text_at(parts, 3),
        item: text_at(parts, 4),
    })
}

/// Parse |-terastallize|POKEMON|TYPE
pub fn parse_terastallize(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::Terastallize {
        pokemon: parse_pokemon(parts, 2)?,
        tera_type: text_at(parts, 3),
    })
}

/// Parse |-zpower|POKEMON
pub fn parse_zpower(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::ZPower(parse_pokemon(parts, 2)?))
}

/// Parse |-zbroken|POKEMON
pub fn parse_zbroken(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::ZBroken(parse_pokemon(parts, 2)?))
}

/// Parse |-activate|EFFECT or |-activate|POKEMON|EFFECT
pub fn parse_activate(parts: &[&str]) -> Result<SimMessage> {
    let pokemon = parts.get(2).and_then(|s| Pokemon::parse(s));
    let effect_index = if pokemon.is_some() { 3 } else { 2 };

    Ok(SimMessage::Activate {
        pokemon,
        effect: text_at(parts, effect_index),
    })
}

/// Parse |-hint|MESSAGE
pub fn parse_hint(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::Hint(text_at(parts, 2)))
}

/// Parse |-message|MESSAGE
pub fn parse_message(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::Message(text_at(parts, 2)))
}

/// Parse |-waiting|SOURCE|TARGET
pub fn parse_waiting(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::Waiting {
        source: parse_pokemon(parts, 2)?,
        target: parse_pokemon(parts, 3)?,
    })
}

/// Parse |-prepare|ATTACKER|MOVE or |-prepare|ATTACKER|MOVE|DEFENDER
pub fn parse_prepare(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::Prepare {
        attacker: parse_pokemon(parts, 2)?,
        move_name: text_at(parts, 3),
        defender: parts.get(4).and_then(|s| Pokemon::parse(s)),
    })
}

/// Parse |-mustrecharge|POKEMON
pub fn parse_mustrecharge(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::MustRecharge(parse_pokemon(parts, 2)?))
}

/// Parse |-hitcount|POKEMON|NUM
pub fn parse_hitcount(parts: &[&str]) -> Result<SimMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let count = parts
        .get(3)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| anyhow::anyhow!("Missing hit count"))?;

    Ok(SimMessage::HitCount { pokemon, count })
}

/// Parse |-singlemove|POKEMON|MOVE
pub fn parse_singlemove(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::SingleMove {
        pokemon: parse_pokemon(parts, 2)?,
        move_name: text_at(parts, 3),
    })
}

/// Parse |-singleturn|POKEMON|MOVE
pub fn parse_singleturn(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::SingleTurn {
        pokemon: parse_pokemon(parts, 2)?,
        move_name: text_at(parts, 3),
    })
}
