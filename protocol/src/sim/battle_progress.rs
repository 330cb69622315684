//! Lines that drive the flow of a battle

use super::SimMessage;
use super::battle::parse_player;
use super::choice_error::ChoiceError;
use super::request::BattleRequest;
use anyhow::{Context, Result};

/// Parse |request|REQUEST (JSON)
pub fn parse_request(parts: &[&str]) -> Result<SimMessage> {
    // The JSON body may itself contain '|'
    let json_str = parts.get(2..).map(|p| p.join("|")).unwrap_or_default();
    if json_str.is_empty() {
        return Err(anyhow::anyhow!("Missing request body"));
    }

    let request: BattleRequest =
        serde_json::from_str(&json_str).context("Failed to parse request JSON")?;
    Ok(SimMessage::Request(Box::new(request)))
}

/// Parse |error|[CATEGORY] MESSAGE
pub fn parse_error(parts: &[&str]) -> Result<SimMessage> {
    let text = parts.get(2..).map(|p| p.join("|")).unwrap_or_default();
    Ok(SimMessage::Error(ChoiceError::parse(&text)))
}

/// Parse |split|PLAYER
pub fn parse_split(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::Split(parse_player(parts, 2)?))
}

/// Parse |inactive|MESSAGE
pub fn parse_inactive(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::Inactive(parts.get(2).unwrap_or(&"").to_string()))
}

/// Parse |inactiveoff|MESSAGE
pub fn parse_inactiveoff(parts: &[&str]) -> Result<SimMessage> {
    Ok(SimMessage::InactiveOff(parts.get(2).unwrap_or(&"").to_string()))
}

/// Parse |turn|NUMBER
pub fn parse_turn(parts: &[&str]) -> Result<SimMessage> {
    let turn = parts
        .get(2)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| anyhow::anyhow!("Missing turn number"))?;

    Ok(SimMessage::Turn(turn))
}

/// Parse |win|USER
pub fn parse_win(parts: &[&str]) -> Result<SimMessage> {
    let user = parts
        .get(2)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow::anyhow!("Missing winner"))?;
    Ok(SimMessage::Win(user.to_string()))
}
