use crate::battle::engine::BattleEngine;
use crate::battle::state::{Battle, BattleRewards};
use crate::combatant::Combatant;
use crate::rng::RandomSource;

impl BattleEngine {
    /// Experience and gold for every defeated enemy.
    ///
    /// Each enemy is worth a flat base plus `floor((max_hp + attack + defense) / 10)`
    /// experience, and a flat base plus a random bonus of gold. Item drops are
    /// always empty.
    pub fn calculate_battle_rewards(
        &self,
        battle: &Battle,
        rng: &mut dyn RandomSource,
    ) -> BattleRewards {
        let mut rewards = BattleRewards::default();

        for enemy in battle.enemy_squad().into_iter().filter(|e| e.is_fainted()) {
            rewards.experience += self.experience_for(enemy);
            rewards.gold += self.config().reward_base_gold
                + rng.range_u32(0, self.config().reward_gold_bonus_max, "gold bonus");
        }

        tracing::debug!(
            experience = rewards.experience,
            gold = rewards.gold,
            "battle rewards calculated"
        );
        rewards
    }

    fn experience_for(&self, enemy: &Combatant) -> u32 {
        let stats = &enemy.stats;
        self.config().reward_base_experience + (stats.max_hp + stats.attack + stats.defense) / 10
    }
}
