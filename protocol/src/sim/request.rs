//! Battle request types
//!
//! These types represent the JSON body of `|request|` lines. They are
//! serializable again so the host can forward a request to its owner.

use serde::{Deserialize, Serialize};

use super::battle::Player;

/// A request asking one side to make a decision
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleRequest {
    pub rqid: Option<u64>,

    #[serde(default)]
    pub active: Option<Vec<ActivePokemon>>,

    pub side: Option<SideInfo>,

    #[serde(default)]
    pub force_switch: Option<Vec<bool>>,

    #[serde(default)]
    pub team_preview: bool,

    #[serde(default)]
    pub wait: bool,

    #[serde(default)]
    pub no_cancel: bool,
}

impl BattleRequest {
    /// Check if this request requires a decision
    pub fn needs_decision(&self) -> bool {
        !self.wait && (self.team_preview || self.force_switch.is_some() || self.active.is_some())
    }

    pub fn is_force_switch(&self) -> bool {
        self.force_switch
            .as_ref()
            .is_some_and(|fs| fs.iter().any(|&b| b))
    }

    /// Side this request belongs to, if the body names one
    pub fn player(&self) -> Option<Player> {
        self.side.as_ref().and_then(SideInfo::player)
    }

    /// Bench Pokemon that could be switched in
    pub fn available_switches(&self) -> Vec<&SidePokemon> {
        self.side
            .as_ref()
            .map(|s| {
                s.pokemon
                    .iter()
                    .filter(|p| !p.active && !p.is_fainted())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether the (first) active Pokemon is prevented from switching
    pub fn is_trapped(&self) -> bool {
        self.active
            .as_ref()
            .and_then(|a| a.first())
            .is_some_and(|a| !a.can_switch())
    }

    /// Number of selectable moves on the (first) active Pokemon
    pub fn move_count(&self) -> usize {
        self.active
            .as_ref()
            .and_then(|a| a.first())
            .map(|a| a.moves.len())
            .unwrap_or(0)
    }
}

/// Information about an active Pokemon in battle
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivePokemon {
    #[serde(default)]
    pub moves: Vec<MoveSlot>,

    #[serde(default)]
    pub trapped: bool,

    #[serde(default)]
    pub maybe_trapped: bool,

    #[serde(default)]
    pub can_terastallize: Option<String>,
}

impl ActivePokemon {
    /// Non-disabled moves with PP left, paired with their 0-based index
    pub fn available_moves(&self) -> Vec<(usize, &MoveSlot)> {
        self.moves
            .iter()
            .enumerate()
            .filter(|(_, m)| !m.disabled && m.pp > 0)
            .collect()
    }

    pub fn can_switch(&self) -> bool {
        !self.trapped && !self.maybe_trapped
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveSlot {
    #[serde(rename = "move")]
    pub name: String,

    pub id: String,

    #[serde(default)]
    pub pp: u32,

    #[serde(rename = "maxpp", default)]
    pub max_pp: u32,

    #[serde(default)]
    pub target: String,

    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideInfo {
    pub name: String,

    /// "p1" or "p2"
    pub id: String,

    #[serde(default)]
    pub pokemon: Vec<SidePokemon>,
}

impl SideInfo {
    pub fn player(&self) -> Option<Player> {
        Player::parse(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SidePokemon {
    /// e.g. "p1: Pikachu"
    pub ident: String,

    pub details: String,

    /// "HP/MAXHP STATUS"
    pub condition: String,

    #[serde(default)]
    pub active: bool,

    #[serde(default)]
    pub moves: Vec<String>,

    #[serde(default)]
    pub ability: String,

    #[serde(default)]
    pub item: String,

    #[serde(default)]
    pub tera_type: Option<String>,
}

impl SidePokemon {
    pub fn is_fainted(&self) -> bool {
        self.condition.ends_with(" fnt")
    }

    /// Name part of the ident
    pub fn name(&self) -> &str {
        self.ident
            .split_once(": ")
            .map(|(_, name)| name)
            .unwrap_or(&self.ident)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOVE_REQUEST: &str = r#"{"active":[{"moves":[{"move":"Tackle","id":"tackle","pp":35,"maxpp":35,"target":"normal","disabled":false},{"move":"Growl","id":"growl","pp":0,"maxpp":40,"target":"allAdjacentFoes","disabled":false}]}],"side":{"name":"p1","id":"p1","pokemon":[{"ident":"p1: Bulbasaur","details":"Bulbasaur, L5, M","condition":"20/20","active":true,"moves":["tackle","growl"],"ability":"overgrow","item":""},{"ident":"p1: Pidgey","details":"Pidgey, L5","condition":"0 fnt","active":false}]},"rqid":3}"#;

    #[test]
    fn test_parse_move_request() {
        let req: BattleRequest = serde_json::from_str(MOVE_REQUEST).unwrap();

        assert_eq!(req.rqid, Some(3));
        assert!(req.needs_decision());
        assert!(!req.is_force_switch());
        assert!(!req.is_trapped());
        assert_eq!(req.move_count(), 2);
        assert_eq!(req.player(), Some(Player::P1));
        assert!(req.available_switches().is_empty());

        let active = &req.active.as_ref().unwrap()[0];
        let available = active.available_moves();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].1.id, "tackle");
    }

    #[test]
    fn test_parse_force_switch() {
        let json = r#"{"forceSwitch":[true],"side":{"name":"p2","id":"p2","pokemon":[{"ident":"p2: Rattata","details":"Rattata, L5","condition":"0 fnt","active":true},{"ident":"p2: Spearow","details":"Spearow, L5","condition":"18/18","active":false}]},"rqid":7}"#;
        let req: BattleRequest = serde_json::from_str(json).unwrap();

        assert!(req.is_force_switch());
        let switches = req.available_switches();
        assert_eq!(switches.len(), 1);
        assert_eq!(switches[0].name(), "Spearow");
    }

    #[test]
    fn test_parse_wait() {
        let req: BattleRequest = serde_json::from_str(r#"{"wait":true,"rqid":2}"#).unwrap();
        assert!(req.wait);
        assert!(!req.needs_decision());
    }

    #[test]
    fn test_request_serializes_back() {
        let req: BattleRequest = serde_json::from_str(MOVE_REQUEST).unwrap();
        let json = serde_json::to_string(&req).unwrap();
        let again: BattleRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(req, again);
    }
}
