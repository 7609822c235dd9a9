//! Combat orchestrator.
//!
//! Owns one [`CombatSession`] and drives it: player requests come in through
//! [`CombatOrchestrator::handle`], enemy turns and turn countdowns advance
//! through [`CombatOrchestrator::tick`]. Every engine event is published on
//! the [`EventBus`]. When the fight ends the orchestrator concludes the
//! session and hands the report to the [`ReportRepository`].

use std::sync::Arc;

use game_core::{
    Action, BasicAttackAction, CastSpellAction, CharacterId, CombatEvent, CombatReport,
    CombatSession, EnemyAi, Encounter, EntityId, GameConfig, GameError, MoveAction, Phase,
    PlaceAction, Position, Refusal, RefusalKind, SessionId, TimerKind, TurnTimer, WorldPoint,
};

use crate::api::{InputRequest, Response, Result, RuntimeError};
use crate::events::{EventBus, SessionEvent};
use crate::oracle::OracleManager;
use crate::repository::{InMemoryReportRepository, ReportRepository, SessionRepository};

/// Drives a single combat session from positioning to its report.
pub struct CombatOrchestrator {
    session: CombatSession,
    oracles: OracleManager,
    bus: EventBus,
    reports: Arc<dyn ReportRepository>,
    sessions: Option<Arc<dyn SessionRepository>>,
    timer: Option<TurnTimer>,
    report: Option<CombatReport>,
}

impl CombatOrchestrator {
    /// Create a new orchestrator builder
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    pub fn session(&self) -> &CombatSession {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn config(&self) -> &GameConfig {
        self.oracles.game_config()
    }

    /// The live turn timer, if any.
    pub fn timer(&self) -> Option<&TurnTimer> {
        self.timer.as_ref().filter(|timer| timer.is_armed())
    }

    /// Report of a finished fight.
    pub fn report(&self) -> Option<&CombatReport> {
        self.report.as_ref()
    }

    pub fn current_actor(&self) -> Option<EntityId> {
        if self.phase() != Phase::Playing {
            return None;
        }
        self.session.state.turn.current_actor()
    }

    pub fn is_player_turn(&self) -> bool {
        self.current_actor() == Some(EntityId::PLAYER)
    }

    /// Translates a pointer position into the grid cell under it.
    pub fn cell_at(&self, point: WorldPoint) -> Option<Position> {
        let transform = self.config().transform();
        self.session.state.grid.cell_at(&transform, point)
    }

    // ========================================================================
    // Player input
    // ========================================================================

    /// Runs one player request. Refusals leave the session untouched and come
    /// back as [`Response::Refused`]; errors mean an invariant broke.
    pub fn handle(&mut self, request: InputRequest) -> Result<Response> {
        if self.phase().is_terminal() {
            return Ok(self.refuse(Refusal {
                kind: RefusalKind::WrongPhase,
                code: "SESSION_ENDED".to_owned(),
                message: format!("combat already ended in {}", self.phase()),
            }));
        }
        tracing::debug!(session = %self.session.id, ?request, "handling input");

        let player = EntityId::PLAYER;
        let response = match request {
            InputRequest::Ready => self.ready()?,
            InputRequest::EndTurn => self.end_turn()?,
            InputRequest::PlaceAt(target) => self.perform(PlaceAction::new(player, target).into())?,
            InputRequest::MoveTo(target) => self.perform(MoveAction::new(player, target).into())?,
            InputRequest::Attack(target) => {
                self.perform(BasicAttackAction::new(player, target).into())?
            }
            InputRequest::CastAt { spell, target } => self.perform(
                CastSpellAction {
                    actor: player,
                    spell,
                    target,
                }
                .into(),
            )?,
        };
        self.checkpoint()?;
        Ok(response)
    }

    fn ready(&mut self) -> Result<Response> {
        let env = self.oracles.as_game_env();
        let events = match self.session.ready(&env) {
            Ok(events) => events,
            Err(error) => {
                return match Refusal::from_error(&error) {
                    Some(refusal) => Ok(self.refuse(refusal)),
                    None => Err(error.into()),
                };
            }
        };
        tracing::info!(
            session = %self.session.id,
            enemies = self.session.encounter.enemies.len(),
            "combat started"
        );
        self.bus.publish_all(events.iter().cloned());
        self.arm_timer();

        let mut events = events;
        events.extend(self.settle()?);
        Ok(Response::Accepted { events })
    }

    fn end_turn(&mut self) -> Result<Response> {
        let events = match self.session.engine().pass_turn(EntityId::PLAYER) {
            Ok(events) => events,
            Err(error) => {
                return match Refusal::from_error(&error) {
                    Some(refusal) => Ok(self.refuse(refusal)),
                    None => Err(error.into()),
                };
            }
        };
        self.bus.publish_all(events.iter().cloned());
        self.arm_timer();
        Ok(Response::Accepted { events })
    }

    fn perform(&mut self, action: Action) -> Result<Response> {
        let env = self.oracles.as_game_env();
        let outcome = match self.session.engine().execute(env, &action) {
            Ok(outcome) => outcome,
            Err(error) => {
                return match Refusal::from_error(&error) {
                    Some(refusal) => Ok(self.refuse(refusal)),
                    None => {
                        tracing::error!(
                            session = %self.session.id,
                            code = error.error_code(),
                            "invariant violated: {}",
                            error
                        );
                        Err(error.into())
                    }
                };
            }
        };

        let mut events = outcome.events;
        self.bus.publish_all(events.iter().cloned());

        let advance = action.consumes_turn() && self.config().advance_after_action;
        if advance && self.phase() == Phase::Playing {
            events.extend(self.advance()?);
        }
        events.extend(self.settle()?);
        Ok(Response::Accepted { events })
    }

    fn refuse(&self, refusal: Refusal) -> Response {
        tracing::debug!(session = %self.session.id, %refusal, "request refused");
        self.bus.publish(SessionEvent::Refused {
            session: self.session.id,
            refusal: refusal.clone(),
        });
        Response::Refused(refusal)
    }

    // ========================================================================
    // Timers and enemy turns
    // ========================================================================

    /// Advances the live timer by `elapsed` ticks and acts on its expiry:
    /// a player countdown passes the turn, an enemy think delay runs the AI.
    pub fn tick(&mut self, elapsed: u32) -> Result<Vec<CombatEvent>> {
        if self.phase() != Phase::Playing {
            return Ok(Vec::new());
        }
        let Some(timer) = self.timer.as_mut() else {
            return Ok(Vec::new());
        };
        let Some(kind) = timer.tick(elapsed) else {
            return Ok(Vec::new());
        };
        let actor = timer.actor();
        self.timer = None;

        if self.session.state.turn.current_actor() != Some(actor) {
            tracing::warn!(%actor, "stale turn timer dropped");
            self.arm_timer();
            return Ok(Vec::new());
        }
        self.bus.publish(SessionEvent::TimerExpired {
            session: self.session.id,
            timer: kind,
        });

        let mut events = match kind {
            TimerKind::TurnCountdown => {
                tracing::info!(%actor, "turn countdown expired, passing turn");
                self.advance()?
            }
            TimerKind::ThinkDelay => self.enemy_turn(actor)?,
        };
        events.extend(self.settle()?);
        self.checkpoint()?;
        Ok(events)
    }

    /// Ticks until it is the player's turn again or the fight is over.
    /// Returns everything that happened on the way.
    pub fn run_until_player_turn(&mut self) -> Result<Vec<CombatEvent>> {
        let mut events = Vec::new();
        while self.phase() == Phase::Playing && !self.is_player_turn() {
            if self.timer().is_none() {
                self.arm_timer();
                if self.timer.is_none() {
                    break;
                }
            }
            let elapsed = self.timer().map_or(1, |timer| timer.remaining().max(1));
            events.extend(self.tick(elapsed)?);
        }
        Ok(events)
    }

    fn enemy_turn(&mut self, enemy: EntityId) -> Result<Vec<CombatEvent>> {
        let plan = EnemyAi::plan(&self.session.state, enemy, self.oracles.game_config());
        tracing::debug!(%enemy, ?plan, "enemy decided");

        let env = self.oracles.as_game_env();
        let mut events = Vec::new();
        for action in &plan {
            if self.phase() != Phase::Playing {
                break;
            }
            match self.session.engine().execute(env, action) {
                Ok(outcome) => {
                    self.bus.publish_all(outcome.events.iter().cloned());
                    events.extend(outcome.events);
                }
                Err(error) if error.is_refusal() => {
                    tracing::warn!(%enemy, code = error.error_code(), "enemy action refused: {}", error);
                    break;
                }
                Err(error) => return Err(error.into()),
            }
        }

        if self.phase() == Phase::Playing {
            events.extend(self.advance()?);
        }
        Ok(events)
    }

    fn advance(&mut self) -> Result<Vec<CombatEvent>> {
        let events = self.session.engine().advance_turn()?;
        self.bus.publish_all(events.iter().cloned());
        self.arm_timer();
        Ok(events)
    }

    fn arm_timer(&mut self) {
        self.timer = self
            .current_actor()
            .and_then(|actor| self.session.state.combatant(actor))
            .map(|combatant| TurnTimer::for_turn(combatant, self.oracles.game_config()));
    }

    // ========================================================================
    // Conclusion
    // ========================================================================

    /// Concludes a finished fight exactly once: cancels timers, saves the
    /// report, updates the character and announces the end.
    fn settle(&mut self) -> Result<Vec<CombatEvent>> {
        let outcome = self.phase();
        if !outcome.is_terminal() || self.report.is_some() {
            return Ok(Vec::new());
        }
        if let Some(timer) = self.timer.as_mut() {
            timer.cancel();
        }
        self.timer = None;

        let env = self.oracles.as_game_env();
        let report = self.session.conclude(&env)?;
        self.reports.save_report(&report)?;
        self.oracles.characters().apply_snapshot(&report.snapshot);
        if let Some(sessions) = &self.sessions {
            sessions.delete(self.session.id)?;
        }

        tracing::info!(
            session = %self.session.id,
            %outcome,
            rounds = report.rounds,
            experience = report.experience_gained,
            currency = report.drops.currency,
            items = report.drops.items.len(),
            leveled_up = report.leveled_up,
            "combat concluded"
        );

        let ended = CombatEvent::SessionEnded { outcome };
        self.bus.publish(ended.clone());
        self.bus.publish(SessionEvent::ReportSaved {
            session: self.session.id,
            outcome,
        });
        self.report = Some(report);
        Ok(vec![ended])
    }

    fn checkpoint(&self) -> Result<()> {
        if let Some(sessions) = &self.sessions
            && !self.phase().is_terminal()
        {
            sessions.save(&self.session)?;
        }
        Ok(())
    }
}

// ============================================================================
// Builder
// ============================================================================

enum SessionSource {
    Existing(CombatSession),
    New {
        id: SessionId,
        character: CharacterId,
        encounter: Encounter,
        seed: u64,
    },
}

/// Builder for [`CombatOrchestrator`] with flexible configuration.
pub struct OrchestratorBuilder {
    oracles: Option<OracleManager>,
    source: Option<SessionSource>,
    bus: Option<EventBus>,
    reports: Option<Arc<dyn ReportRepository>>,
    sessions: Option<Arc<dyn SessionRepository>>,
}

impl OrchestratorBuilder {
    fn new() -> Self {
        Self {
            oracles: None,
            source: None,
            bus: None,
            reports: None,
            sessions: None,
        }
    }

    /// Set required oracle manager
    pub fn oracles(mut self, oracles: OracleManager) -> Self {
        self.oracles = Some(oracles);
        self
    }

    /// Resume an existing session.
    pub fn session(mut self, session: CombatSession) -> Self {
        self.source = Some(SessionSource::Existing(session));
        self
    }

    /// Start a new session for `character` on `encounter`.
    pub fn new_session(
        mut self,
        id: SessionId,
        character: impl Into<String>,
        encounter: Encounter,
        seed: u64,
    ) -> Self {
        self.source = Some(SessionSource::New {
            id,
            character: CharacterId::new(character),
            encounter,
            seed,
        });
        self
    }

    /// Share an existing bus (a fresh one is created otherwise).
    pub fn event_bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Where finished fights go (in-memory when unset).
    pub fn reports(mut self, reports: Arc<dyn ReportRepository>) -> Self {
        self.reports = Some(reports);
        self
    }

    /// Checkpoint the session after every request and tick.
    pub fn sessions(mut self, sessions: Arc<dyn SessionRepository>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    pub fn build(self) -> Result<CombatOrchestrator> {
        let oracles = self.oracles.ok_or(RuntimeError::MissingOracles)?;
        let session = match self.source.ok_or(RuntimeError::MissingSession)? {
            SessionSource::Existing(session) => session,
            SessionSource::New {
                id,
                character,
                encounter,
                seed,
            } => {
                use game_core::CharacterOracle;
                let sheet = oracles
                    .characters()
                    .character(&character)
                    .ok_or_else(|| RuntimeError::UnknownCharacter(character.0.clone()))?;
                CombatSession::create(id, sheet, encounter, seed)?
            }
        };

        let bus = self.bus.unwrap_or_default();
        bus.publish(SessionEvent::Started {
            session: session.id,
            encounter: session.encounter.id.clone(),
        });
        tracing::info!(
            session = %session.id,
            encounter = %session.encounter.id,
            character = %session.character.id,
            phase = %session.phase(),
            "session opened"
        );

        let mut orchestrator = CombatOrchestrator {
            session,
            oracles,
            bus,
            reports: self
                .reports
                .unwrap_or_else(|| Arc::new(InMemoryReportRepository::new())),
            sessions: self.sessions,
            timer: None,
            report: None,
        };
        orchestrator.arm_timer();
        Ok(orchestrator)
    }
}
