// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Vaultsmith Contributors

use crate::data::pool_registry::PoolConfig;
use alloy::primitives::Address;

/// Swap paths handed to the strategy constructor. Each path is a token hop
/// list a UniswapV2-style router can execute as-is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrategyRoutes {
    /// Reward token to the chain's wrapped native (fee conversion path).
    pub output_to_native: Vec<Address>,
    /// Reward token to the LP's token0.
    pub output_to_lp0: Vec<Address>,
    /// Reward token to the LP's token1.
    pub output_to_lp1: Vec<Address>,
    /// Secondary reward to the chain's wrapped native, dual-reward farms only.
    pub reward_to_output: Option<Vec<Address>>,
}

impl StrategyRoutes {
    /// Routes for a single-reward chef. Hops that start and end on the same
    /// token (reward farming its own LP side) still carry both entries; the
    /// strategy skips the swap when the path is an identity.
    pub fn single_reward(
        reward: Address,
        wrapped_native: Address,
        token0: Address,
        token1: Address,
    ) -> Self {
        Self {
            output_to_native: vec![reward, wrapped_native],
            output_to_lp0: vec![reward, token0],
            output_to_lp1: vec![reward, token1],
            reward_to_output: None,
        }
    }

    /// Routes for a dual-reward chef (MiniChef style). The secondary reward
    /// is first folded into the primary, and LP legs route through the
    /// secondary and token1 because direct reward pairs rarely exist on
    /// these farms.
    pub fn dual_reward(
        reward: Address,
        secondary: Address,
        wrapped_native: Address,
        token0: Address,
        token1: Address,
    ) -> Self {
        Self {
            output_to_native: vec![reward, secondary, wrapped_native],
            output_to_lp0: vec![reward, secondary, token1, token0],
            output_to_lp1: vec![reward, secondary, token1],
            reward_to_output: Some(vec![secondary, wrapped_native]),
        }
    }

    /// Pick the route shape from the pool entry.
    pub fn for_pool(
        pool: &PoolConfig,
        wrapped_native: Address,
        token0: Address,
        token1: Address,
    ) -> Self {
        match pool.secondary_reward {
            Some(secondary) => Self::dual_reward(
                pool.reward_token,
                secondary,
                wrapped_native,
                token0,
                token1,
            ),
            None => Self::single_reward(pool.reward_token, wrapped_native, token0, token1),
        }
    }

    pub fn is_dual_reward(&self) -> bool {
        self.reward_to_output.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const REWARD: Address = address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
    const SECONDARY: Address = address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");
    const NATIVE: Address = address!("cccccccccccccccccccccccccccccccccccccccc");
    const TOKEN0: Address = address!("dddddddddddddddddddddddddddddddddddddddd");
    const TOKEN1: Address = address!("eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");

    #[test]
    fn single_reward_routes_are_direct_hops() {
        let routes = StrategyRoutes::single_reward(REWARD, NATIVE, TOKEN0, TOKEN1);

        assert_eq!(routes.output_to_native, vec![REWARD, NATIVE]);
        assert_eq!(routes.output_to_lp0, vec![REWARD, TOKEN0]);
        assert_eq!(routes.output_to_lp1, vec![REWARD, TOKEN1]);
        assert!(!routes.is_dual_reward());
    }

    #[test]
    fn single_reward_keeps_identity_leg_when_reward_is_lp_side() {
        // Reward token is also token0; the path still has two entries.
        let routes = StrategyRoutes::single_reward(REWARD, NATIVE, REWARD, TOKEN1);
        assert_eq!(routes.output_to_lp0, vec![REWARD, REWARD]);
    }

    #[test]
    fn dual_reward_routes_fold_through_secondary() {
        let routes = StrategyRoutes::dual_reward(REWARD, SECONDARY, NATIVE, TOKEN0, TOKEN1);

        assert_eq!(routes.output_to_native, vec![REWARD, SECONDARY, NATIVE]);
        assert_eq!(routes.output_to_lp0, vec![REWARD, SECONDARY, TOKEN1, TOKEN0]);
        assert_eq!(routes.output_to_lp1, vec![REWARD, SECONDARY, TOKEN1]);
        assert_eq!(routes.reward_to_output, Some(vec![SECONDARY, NATIVE]));
        assert!(routes.is_dual_reward());
    }

    #[test]
    fn for_pool_follows_secondary_reward_presence() {
        let mut pool = PoolConfig {
            id: "test".into(),
            protocol_name: "Test".into(),
            protocol_symbol: "TST".into(),
            lp_token: TOKEN0,
            router: TOKEN1,
            chef: NATIVE,
            reward_token: REWARD,
            pool_id: 0,
            secondary_reward: None,
            strategy_artifact: "StrategyChefLP".into(),
        };

        assert!(!StrategyRoutes::for_pool(&pool, NATIVE, TOKEN0, TOKEN1).is_dual_reward());

        pool.secondary_reward = Some(SECONDARY);
        assert!(StrategyRoutes::for_pool(&pool, NATIVE, TOKEN0, TOKEN1).is_dual_reward());
    }
}
