//! Enemy decision making.
//!
//! Greedy and without lookahead: attack when adjacent, otherwise step to the
//! reachable cell closest to the player and attack if that made it adjacent.
//! Ties between equally close cells go to the cheapest move, then to the
//! lowest `(x, y)`.

use crate::action::{Action, BasicAttackAction, MoveAction};
use crate::config::GameConfig;
use crate::engine::{ExecuteError, ExecutionOutcome, GameEngine};
use crate::env::GameEnv;
use crate::state::{CombatState, EntityId, Position};

/// Stateless enemy controller.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnemyAi;

impl EnemyAi {
    /// Actions the enemy will take this turn, in order. Empty when it has
    /// nothing useful to do.
    pub fn plan(state: &CombatState, enemy: EntityId, config: &GameConfig) -> Vec<Action> {
        let mut plan = Vec::new();
        let Some(actor) = state.combatant(enemy).filter(|actor| actor.alive) else {
            return plan;
        };
        let Some(player) = state.player().filter(|player| player.alive) else {
            return plan;
        };
        let target = player.position;
        let can_attack = actor.action_points.has(config.basic_attack_cost);

        let mut position = actor.position;
        if position.distance(target) > BasicAttackAction::RANGE
            && !actor.movement_points.is_empty()
        {
            if let Some(step) = Self::best_step(state, position, target, actor.movement_points.current)
            {
                plan.push(MoveAction::new(enemy, step).into());
                position = step;
            }
        }

        if can_attack && position.distance(target) == BasicAttackAction::RANGE {
            plan.push(BasicAttackAction::new(enemy, target).into());
        }
        plan
    }

    /// Reachable cell minimising `(distance to target, cost, x, y)`, kept only
    /// if it strictly improves on the current distance.
    fn best_step(
        state: &CombatState,
        from: Position,
        target: Position,
        budget: u32,
    ) -> Option<Position> {
        let current = from.distance(target);
        state
            .grid
            .reachable(from, budget)
            .into_iter()
            .min_by_key(|&(cell, cost)| (cell.distance(target), cost, cell))
            .filter(|&(cell, _)| cell.distance(target) < current)
            .map(|(cell, _)| cell)
    }

    /// Plans and executes the enemy's turn. Stops early if an action ends
    /// the combat.
    pub fn act(
        engine: &mut GameEngine<'_>,
        env: GameEnv<'_>,
        enemy: EntityId,
    ) -> Result<Vec<ExecutionOutcome>, ExecuteError> {
        let plan = Self::plan(engine.state(), enemy, env.rules()?);
        let mut outcomes = Vec::with_capacity(plan.len());
        for action in &plan {
            if engine.phase().is_terminal() {
                break;
            }
            outcomes.push(engine.execute(env, action)?);
        }
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::state::Phase;
    use crate::testing::{TestOracles, begin_playing, enemy_at, player_at};

    fn state_with_enemy(enemy_position: Position, mp: u32) -> CombatState {
        let mut state = CombatState::new(Grid::new(8, 8), 21);
        state.spawn(player_at(Position::new(2, 2))).unwrap();
        let mut enemy = enemy_at(1, enemy_position, 20);
        enemy.movement_points.maximum = mp;
        enemy.movement_points.current = mp;
        state.spawn(enemy).unwrap();
        begin_playing(&mut state);
        state.turn.actor_index = 1;
        state
    }

    #[test]
    fn adjacent_enemy_attacks() {
        let state = state_with_enemy(Position::new(3, 2), 3);
        let plan = EnemyAi::plan(&state, EntityId(1), &GameConfig::default());
        assert_eq!(
            plan,
            vec![Action::Attack(BasicAttackAction::new(EntityId(1), Position::new(2, 2)))]
        );
    }

    #[test]
    fn enemy_closes_in_then_attacks() {
        let state = state_with_enemy(Position::new(5, 2), 3);
        let plan = EnemyAi::plan(&state, EntityId(1), &GameConfig::default());
        assert_eq!(
            plan,
            vec![
                Action::Move(MoveAction::new(EntityId(1), Position::new(3, 2))),
                Action::Attack(BasicAttackAction::new(EntityId(1), Position::new(2, 2))),
            ]
        );
    }

    #[test]
    fn ties_prefer_cheapest_then_lowest_coordinates() {
        // From (5, 5) with 2 MP, (3, 5), (4, 4) and (5, 3) all end at distance 4.
        let state = state_with_enemy(Position::new(5, 5), 2);
        let plan = EnemyAi::plan(&state, EntityId(1), &GameConfig::default());
        assert_eq!(
            plan,
            vec![Action::Move(MoveAction::new(EntityId(1), Position::new(3, 5)))]
        );
    }

    #[test]
    fn immobile_enemy_out_of_reach_does_nothing() {
        let oracles = TestOracles::new();
        let mut state = state_with_enemy(Position::new(4, 2), 0);
        assert!(EnemyAi::plan(&state, EntityId(1), &oracles.config).is_empty());

        let mut engine = GameEngine::new(&mut state);
        let outcomes = EnemyAi::act(&mut engine, oracles.env(), EntityId(1)).unwrap();
        assert!(outcomes.is_empty());
        engine.advance_turn().unwrap();
        assert_eq!(engine.current_actor(), Some(EntityId::PLAYER));
        assert_eq!(engine.phase(), Phase::Playing);
        assert_eq!(state.player().unwrap().hp.current, 50);
    }

    #[test]
    fn act_executes_the_plan() {
        let oracles = TestOracles::new();
        let mut state = state_with_enemy(Position::new(5, 2), 3);
        let mut engine = GameEngine::new(&mut state);

        let outcomes = EnemyAi::act(&mut engine, oracles.env(), EntityId(1)).unwrap();

        assert_eq!(outcomes.len(), 2);
        let enemy = state.combatant(EntityId(1)).unwrap();
        assert_eq!(enemy.position, Position::new(3, 2));
        assert!(state.player().unwrap().hp.current < 50);
        assert!(state.occupancy_consistent());
    }
}
