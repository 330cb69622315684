#[cfg(test)]
mod tests {
    use tandem_protocol::Player;

    use crate::codec::{
        decode_actions, encode_actions, flags, Action, ActionId, ActionReader, ActionWriter,
        BulkBoostOp, BulkTarget, DecodeError,
    };
    use crate::tracking::BattleField;
    use crate::types::{BoostStat, FieldCondition, PackedBoosts, SideCondition, Status, Volatile, Weather};
    use crate::wire::{CompactDetails, CompactHp, PokemonPairRef, PokemonRef};

    fn p1(slot: usize) -> PokemonRef {
        PokemonRef::new(Player::P1, slot).unwrap()
    }

    fn p2(slot: usize) -> PokemonRef {
        PokemonRef::new(Player::P2, slot).unwrap()
    }

    fn bulbasaur() -> CompactDetails {
        CompactDetails {
            species: 1,
            gender: Some('M'),
            level: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_switch_and_hp_bytes() {
        let actions = [
            Action::SwitchPokemon {
                pokemon: p1(0),
                details: bulbasaur(),
                drag: false,
            },
            Action::SetHp {
                pokemon: p1(0),
                hp: CompactHp::new(20, 20),
                direct: false,
                heal: false,
            },
        ];
        let bytes = encode_actions(&actions);
        assert_eq!(
            bytes,
            vec![4, 0, 0x10, 0x01, 0x48, 0x01, 0x00, 2, 0, 0x10, 20, 20, 0]
        );
        assert_eq!(decode_actions(&bytes).unwrap(), actions.to_vec());
    }

    #[test]
    fn test_empty_stream() {
        let bytes = ActionWriter::new().finish();
        assert_eq!(bytes, vec![0]);
        assert!(decode_actions(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_move_animation_target_is_optional() {
        let with_target = Action::MoveAnimation {
            user: p1(0),
            target: Some(p2(0)),
            move_id: 33,
            miss: true,
            still: false,
        };
        let without_target = Action::MoveAnimation {
            user: p2(0),
            target: None,
            move_id: 0x0102,
            miss: false,
            still: true,
        };
        let bytes = encode_actions([&with_target, &without_target]);
        assert_eq!(&bytes[..6], &[3, flags::MOVE_HAS_TARGET | flags::MOVE_MISS, 0x10, 0x20, 33, 0]);
        assert_eq!(&bytes[6..11], &[3, flags::MOVE_STILL, 0x20, 0x02, 0x01]);
        assert_eq!(
            decode_actions(&bytes).unwrap(),
            vec![with_target, without_target]
        );
    }

    #[test]
    fn test_unmapped_move_fails() {
        assert_eq!(
            decode_actions(&[3, 0, 0x10, 0, 0, 0]),
            Err(DecodeError::UnmappedMove)
        );
    }

    #[test]
    fn test_transform_is_reserved() {
        assert_eq!(
            decode_actions(&[16, 0, 0x10, 0]),
            Err(DecodeError::Unsupported(ActionId::Transform))
        );
    }

    #[test]
    fn test_unknown_action_and_volatile() {
        assert_eq!(decode_actions(&[42, 0, 0]), Err(DecodeError::UnknownAction(42)));
        assert_eq!(
            decode_actions(&[13, 0, 0x10, 250, 0]),
            Err(DecodeError::UnknownVolatile(250))
        );
    }

    #[test]
    fn test_truncated_payload() {
        let bytes = encode_actions(&[Action::Turn(300)]);
        assert_eq!(
            decode_actions(&bytes[..3]),
            Err(DecodeError::Truncated {
                action: ActionId::Turn,
                needed: 2,
                remaining: 1,
            })
        );
    }

    #[test]
    fn test_missing_end_and_trailing_bytes() {
        let bytes = encode_actions(&[Action::Turn(1)]);
        assert_eq!(
            decode_actions(&bytes[..bytes.len() - 1]),
            Err(DecodeError::MissingEnd)
        );

        let mut extra = bytes.clone();
        extra.push(9);
        assert_eq!(decode_actions(&extra), Err(DecodeError::TrailingBytes(1)));
    }

    #[test]
    fn test_unknown_flag_bits_rejected() {
        assert!(matches!(
            decode_actions(&[9, 0x80, 1, 0, 0]),
            Err(DecodeError::InvalidFlags {
                action: ActionId::Turn,
                ..
            })
        ));
        // set and swap together
        assert!(matches!(
            decode_actions(&[7, flags::BOOST_SET | flags::BOOST_SWAP, 0x10, 0, 0]),
            Err(DecodeError::InvalidFlags { .. })
        ));
    }

    #[test]
    fn test_boost_variants() {
        let pair = PokemonPairRef {
            source: p1(0),
            target: p2(0),
        };
        let delta = PackedBoosts::new()
            .with(BoostStat::Atk, 2)
            .with(BoostStat::Spe, -1);
        let actions = vec![
            Action::BoostDelta {
                pokemon: p1(0),
                mask: delta.nonzero_mask(),
                boosts: delta,
            },
            Action::BoostSet {
                pokemon: p2(0),
                mask: BoostStat::Atk.bit(),
                boosts: PackedBoosts::new().with(BoostStat::Atk, 6),
            },
            Action::BoostSwap {
                pair,
                mask: BoostStat::Def.bit() | BoostStat::Spd.bit(),
            },
            Action::BoostCopy { pair },
            Action::BulkBoost {
                op: BulkBoostOp::Invert,
                target: BulkTarget::One(p2(0)),
            },
            Action::BulkBoost {
                op: BulkBoostOp::Clear,
                target: BulkTarget::AllActive,
            },
        ];
        let bytes = encode_actions(&actions);
        // delta record: header, ref, mask, 3 lane bytes
        assert_eq!(&bytes[..7], &[7, 0, 0x10, 0b10001, 0x02, 0x00, 0x0f]);
        assert_eq!(decode_actions(&bytes).unwrap(), actions);
    }

    #[test]
    fn test_status_cure_and_team() {
        let actions = vec![
            Action::SetStatus {
                pokemon: p2(1),
                status: Some(Status::Sleep),
                team: false,
            },
            Action::SetStatus {
                pokemon: p1(0),
                status: None,
                team: true,
            },
        ];
        let bytes = encode_actions(&actions);
        assert_eq!(&bytes[..4], &[6, 0, 0x21, 6]);
        assert_eq!(&bytes[4..8], &[6, flags::STATUS_CURE | flags::STATUS_TEAM, 0x10, 0]);
        assert_eq!(decode_actions(&bytes).unwrap(), actions);

        // cure flag contradicting the status byte
        assert!(decode_actions(&[6, flags::STATUS_CURE, 0x10, 1, 0]).is_err());
    }

    #[test]
    fn test_field_and_side_conditions() {
        let actions = vec![
            Action::Weather(Some(Weather::Rain)),
            Action::Weather(None),
            Action::FieldCondition {
                condition: FieldCondition::TrickRoom,
                active: true,
            },
            Action::SideCondition {
                side: Player::P2,
                condition: SideCondition::Spikes,
                active: true,
            },
            Action::SideCondition {
                side: Player::P1,
                condition: SideCondition::Reflect,
                active: false,
            },
            Action::SwapSideConditions,
            Action::Volatile {
                pokemon: p1(2),
                volatile: Volatile::Substitute,
                active: true,
            },
            Action::ItemReveal {
                pokemon: p2(0),
                item: 7,
                consumed: true,
            },
            Action::AbilityReveal {
                pokemon: p2(0),
                ability: 300,
            },
        ];
        let bytes = encode_actions(&actions);
        assert_eq!(decode_actions(&bytes).unwrap(), actions);
    }

    #[test]
    fn test_bad_side_in_side_condition() {
        assert_eq!(
            decode_actions(&[12, 0, 3, 1, 0]),
            Err(DecodeError::InvalidSide(3))
        );
    }

    #[test]
    fn test_reader_streams_and_stops_after_error() {
        let mut bytes = encode_actions(&[Action::Turn(1), Action::Turn(2)]);
        bytes.truncate(bytes.len() - 1);
        bytes.extend_from_slice(&[99, 0]);

        let mut reader = ActionReader::new(&bytes);
        assert_eq!(reader.next(), Some(Ok(Action::Turn(1))));
        assert_eq!(reader.next(), Some(Ok(Action::Turn(2))));
        assert_eq!(reader.next(), Some(Err(DecodeError::UnknownAction(99))));
        assert_eq!(reader.next(), None);
        assert!(!reader.is_finished());
    }

    /// One or more actions for every id that can be encoded
    fn one_of_each() -> Vec<Action> {
        let pair = PokemonPairRef {
            source: p1(0),
            target: p2(0),
        };
        vec![
            Action::PokemonDetails {
                pokemon: p2(0),
                details: CompactDetails {
                    species: 150,
                    ..Default::default()
                },
                permanent: true,
            },
            Action::SetHp {
                pokemon: p2(0),
                hp: CompactHp::new(37, 100),
                direct: true,
                heal: false,
            },
            Action::MoveAnimation {
                user: p1(0),
                target: Some(p2(0)),
                move_id: 33,
                miss: false,
                still: false,
            },
            Action::SwitchPokemon {
                pokemon: p2(1),
                details: bulbasaur(),
                drag: true,
            },
            Action::ActionFail {
                pokemon: p1(0),
                miss: true,
            },
            Action::SetStatus {
                pokemon: p1(0),
                status: Some(Status::Paralysis),
                team: false,
            },
            Action::SetStatus {
                pokemon: p1(0),
                status: None,
                team: true,
            },
            Action::BoostDelta {
                pokemon: p1(0),
                mask: BoostStat::Atk.bit() | BoostStat::Spe.bit(),
                boosts: PackedBoosts::new()
                    .with(BoostStat::Atk, 2)
                    .with(BoostStat::Spe, -1),
            },
            Action::BoostSet {
                pokemon: p2(0),
                mask: BoostStat::Def.bit(),
                boosts: PackedBoosts::new().with(BoostStat::Def, -3),
            },
            Action::BoostSwap {
                pair,
                mask: BoostStat::Atk.bit() | BoostStat::Def.bit(),
            },
            Action::BoostCopy { pair },
            Action::BulkBoost {
                op: BulkBoostOp::Invert,
                target: BulkTarget::AllActive,
            },
            Action::BulkBoost {
                op: BulkBoostOp::ClearNegative,
                target: BulkTarget::One(p1(0)),
            },
            Action::Turn(7),
            Action::Weather(Some(Weather::Rain)),
            Action::FieldCondition {
                condition: FieldCondition::TrickRoom,
                active: true,
            },
            Action::SideCondition {
                side: Player::P1,
                condition: SideCondition::Spikes,
                active: true,
            },
            Action::SwapSideConditions,
            Action::Volatile {
                pokemon: p2(0),
                volatile: Volatile::Substitute,
                active: true,
            },
            Action::ItemReveal {
                pokemon: p2(0),
                item: 7,
                consumed: false,
            },
            Action::ItemReveal {
                pokemon: p1(0),
                item: 7,
                consumed: true,
            },
            Action::AbilityReveal {
                pokemon: p2(0),
                ability: 65,
            },
        ]
    }

    fn started() -> BattleField {
        let mut field = BattleField::omniscient();
        let setup = [
            Action::SwitchPokemon {
                pokemon: p1(0),
                details: bulbasaur(),
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
                details: bulbasaur(),
                drag: false,
            },
            Action::BoostSet {
                pokemon: p2(0),
                mask: BoostStat::Spa.bit(),
                boosts: PackedBoosts::new().with(BoostStat::Spa, -2),
            },
        ];
        for action in &setup {
            field.apply_action(action, &mut ());
        }
        field
    }

    #[test]
    fn test_decoded_actions_replicate_like_originals() {
        let samples = one_of_each();
        for byte in 1..=16u8 {
            let id = ActionId::from_byte(byte).unwrap();
            let cases: Vec<&Action> = samples.iter().filter(|a| a.id() == id).collect();
            if id == ActionId::Transform {
                assert!(cases.is_empty());
                assert_eq!(
                    decode_actions(&[byte, 0, 0x10, 0]),
                    Err(DecodeError::Unsupported(id))
                );
                continue;
            }
            assert!(!cases.is_empty(), "no sample for {:?}", id);

            for action in cases {
                let mut direct = started();
                direct.apply_action(action, &mut ());

                let mut decoded = started();
                let bytes = encode_actions([action]);
                for received in decode_actions(&bytes).unwrap() {
                    decoded.apply_action(&received, &mut ());
                }
                direct.assert_same_state(&decoded);
            }
        }
    }
}
