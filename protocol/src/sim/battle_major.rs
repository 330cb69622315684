//! Major actions: moves, switches, faints, forme changes

use super::SimMessage;
use super::battle::{HpStatus, Pokemon, PokemonDetails, parse_details, parse_hp_status, parse_pokemon};
use anyhow::Result;

/// Parse |move|POKEMON|MOVE|TARGET with optional [miss], [still], [anim] tags
pub fn parse_move(parts: &[&str]) -> Result<SimMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let move_name = parts
        .get(3)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow::anyhow!("Missing move name"))?
        .to_string();
    let target = parts.get(4).and_then(|s| Pokemon::parse(s));

    let mut miss = false;
    let mut still = false;
    let mut anim = None;

    for part in parts.iter().skip(5) {
        match *part {
            "[miss]" => miss = true,
            "[still]" => still = true,
            _ => {
                if let Some(anim_move) = part.strip_prefix("[anim] ") {
                    anim = Some(anim_move.to_string());
                }
            }
        }
    }

    Ok(SimMessage::Move {
        pokemon,
        move_name,
        target,
        miss,
        still,
        anim,
    })
}

/// Shared shape of |switch|, |drag|, |replace| and |detailschange|:
/// POKEMON|DETAILS|HP STATUS
fn parse_appearance(parts: &[&str]) -> Result<(Pokemon, PokemonDetails, Option<HpStatus>)> {
    let pokemon = parse_pokemon(parts, 2)?;
    let details = parse_details(parts, 3);
    if details.species.is_empty() {
        return Err(anyhow::anyhow!("Missing details for {}", pokemon.name));
    }
    Ok((pokemon, details, parse_hp_status(parts, 4)))
}

/// Parse |switch|POKEMON|DETAILS|HP STATUS
pub fn parse_switch(parts: &[&str]) -> Result<SimMessage> {
    let (pokemon, details, hp_status) = parse_appearance(parts)?;
    Ok(SimMessage::Switch {
        pokemon,
        details,
        hp_status,
    })
}

/// Parse |drag|POKEMON|DETAILS|HP STATUS
pub fn parse_drag(parts: &[&str]) -> Result<SimMessage> {
    let (pokemon, details, hp_status) = parse_appearance(parts)?;
    Ok(SimMessage::Drag {
        pokemon,
        details,
        hp_status,
    })
}

/// Parse |detailschange|POKEMON|DETAILS|HP STATUS
pub fn parse_detailschange(parts: &[&str]) -> Result<SimMessage> {
    let (pokemon, details, hp_status) = parse_appearance(parts)?;
    Ok(SimMessage::DetailsChange {
        pokemon,
        details,
        hp_status,
    })
}

/// Parse |replace|POKEMON|DETAILS|HP STATUS
pub fn parse_replace(parts: &[&str]) -> Result<SimMessage> {
    let (pokemon, details, hp_status) = parse_appearance(parts)?;
    Ok(SimMessage::Replace {
        pokemon,
        details,
        hp_status,
    })
}

/// Parse |-formechange|POKEMON|SPECIES|HP STATUS
pub fn parse_formechange(parts: &[&str]) -> Result<SimMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let species = parts.get(3).unwrap_or(&"").to_string();
    let hp_status = parse_hp_status(parts, 4);

    Ok(SimMessage::FormeChange {
        pokemon,
        species,
        hp_status,
    })
}

/// Parse |swap|POKEMON|POSITION
pub fn parse_swap(parts: &[&str]) -> Result<SimMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let position = parts
        .get(3)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| anyhow::anyhow!("Missing position"))?;

    Ok(SimMessage::Swap { pokemon, position })
}

/// Parse |cant|POKEMON|REASON or |cant|POKEMON|REASON|MOVE
pub fn parse_cant(parts: &[&str]) -> Result<SimMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let reason = parts.get(3).unwrap_or(&"").to_string();
    let move_name = parts.get(4).map(|s| s.to_string());

    Ok(SimMessage::Cant {
        pokemon,
        reason,
        move_name,
    })
}

/// Parse |faint|POKEMON
pub fn parse_faint(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::Faint(parse_pokemon(parts, 2)?))
}
