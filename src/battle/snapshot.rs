//! Binary snapshots of a battle for an external persistence layer.

use crate::battle::state::Battle;
use crate::errors::SnapshotError;

impl Battle {
    pub fn to_snapshot_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(postcard::to_allocvec(self)?)
    }

    pub fn from_snapshot_bytes(bytes: &[u8]) -> Result<Battle, SnapshotError> {
        Ok(postcard::from_bytes(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::battle::state::Battle;
    use crate::battle::tests::common::{
        ability, create_test_battle, status_effect, TestCombatantBuilder,
    };
    use pretty_assertions::assert_eq;
    use schema::{AbilityCategory, Element, StatusEffectKind};

    #[test]
    fn test_snapshot_restores_mid_battle_state() {
        let mut battle = create_test_battle(
            vec![TestCombatantBuilder::new("hero")
                .with_hp(42, 100)
                .with_ability(ability("ember", Element::Fire, AbilityCategory::Magical, 40))
                .with_status(status_effect(StatusEffectKind::Regen, 2, 1.0))
                .build()],
            vec![TestCombatantBuilder::new("slime").enemy().build()],
        );
        battle.turn_count = 4;

        let bytes = battle.to_snapshot_bytes().unwrap();
        let restored = Battle::from_snapshot_bytes(&bytes).unwrap();

        assert_eq!(restored, battle);
    }

    #[test]
    fn test_garbage_is_a_snapshot_error() {
        assert!(Battle::from_snapshot_bytes(&[0xff, 0xff, 0xff]).is_err());
    }
}
