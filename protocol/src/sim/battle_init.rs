//! Lines sent once before the first turn. None of them affect a replica;
//! they are parsed so a chunk can be checked in full.

use super::SimMessage;
use super::battle::{PokemonDetails, parse_player as player_at};
use anyhow::{Result, anyhow};

fn text(parts: &[&str], index: usize) -> String {
    parts.get(index).copied().unwrap_or_default().to_string()
}

fn non_empty(parts: &[&str], index: usize) -> Option<String> {
    parts
        .get(index)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

fn number<T: std::str::FromStr>(parts: &[&str], index: usize) -> Option<T> {
    parts.get(index).and_then(|s| s.parse().ok())
}

/// |player|PLAYER|USERNAME|AVATAR|RATING
pub fn parse_player(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::Player {
        player: player_at(parts, 2)?,
        username: text(parts, 3),
        avatar: text(parts, 4),
        rating: number(parts, 5),
    })
}

/// |teamsize|PLAYER|NUMBER
pub fn parse_teamsize(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::TeamSize {
        player: player_at(parts, 2)?,
        size: number(parts, 3).ok_or_else(|| anyhow!("Missing team size"))?,
    })
}

/// |gametype|GAMETYPE
pub fn parse_gametype(parts: &[&str]) -> Result<SimMessage> {
    non_empty(parts, 2)
        .map(SimMessage::GameType)
        .ok_or_else(|| anyhow!("Missing game type"))
}

/// |gen|GENNUM
pub fn parse_gen(parts: &[&str]) -> Result<SimMessage> {
    number(parts, 2)
        .map(SimMessage::Gen)
        .ok_or_else(|| anyhow!("Missing generation"))
}

/// |tier|FORMATNAME
pub fn parse_tier(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::Tier(text(parts, 2)))
}

/// |rated| with an optional message
pub fn parse_rated(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::Rated(non_empty(parts, 2)))
}

/// |rule|RULE: DESCRIPTION
pub fn parse_rule(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::Rule(text(parts, 2)))
}

/// |poke|PLAYER|DETAILS|ITEM, sent for team preview
pub fn parse_poke(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::Poke {
        player: player_at(parts, 2)?,
        details: parts
            .get(3)
            .map(|s| PokemonDetails::parse(s))
            .unwrap_or_default(),
        has_item: parts.get(4) == Some(&"item"),
    })
}

/// |teampreview with an optional pick count
pub fn parse_teampreview(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::TeamPreview(number(parts, 2)))
}
