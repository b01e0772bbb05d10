//! Interaction dispatcher.
//!
//! Routes the three platform event kinds through decode, ownership guard,
//! session lifecycle, ledger, and the matching game engine. All domain-state
//! mutation completes synchronously inside `dispatch`, so the surrounding
//! adapter can await its acknowledgment afterwards without racing the core.
//!
//! The stake is debited before the settle step claims the session; if the
//! claim is lost (double submit, stale token) the stake is refunded, so the
//! losing path has zero net ledger effect and a session pays out at most
//! once.

use crate::config::BotConfig;
use crate::errors::{BotError, BotResult, Surfacing};
use crate::games::{blackjack, generic, slot_machine};
use crate::games::{Bet, GameAction, GameData, GameKind, Outcome};
use crate::ledger::Ledger;
use crate::platform::{InteractionEvent, PromptKind, Reply, UiPrompt};
use crate::session::{SessionState, SessionStore};
use crate::token::InteractionToken;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Mutex;
use tracing::{info, warn};

/// What a bet settled into while the session entry lock was held.
enum Settle {
    /// Single-step game (or immediate blackjack natural): outcome is final.
    Resolved(Outcome),
    /// Multi-step game continues; reply with follow-up buttons.
    InPlay {
        text: String,
        actions: Vec<GameAction>,
    },
}

/// One blackjack button click, resolved under the session entry lock.
enum HandStep {
    Terminal { outcome: Outcome, bet: u64 },
    Continue { text: String },
}

/// Routes inbound interactions to the ledger, session store, and engines.
pub struct Dispatcher {
    config: BotConfig,
    ledger: Ledger,
    sessions: SessionStore,
    rng: Mutex<StdRng>,
}

impl Dispatcher {
    pub fn new(config: BotConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            ledger: Ledger::new(config.starting_balance),
            sessions: SessionStore::new(),
            rng: Mutex::new(rng),
            config,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// The random source has no invariants a panicking holder could break,
    /// so a poisoned lock is taken over rather than propagated.
    fn lock_rng(&self) -> std::sync::MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Handle one interaction event and produce the reply payload.
    pub fn dispatch(&self, event: InteractionEvent) -> Reply {
        let result = match &event {
            InteractionEvent::SlashCommand { user, command } => {
                self.handle_slash(user, command)
            }
            InteractionEvent::ButtonClick { user, token } => self.handle_button(user, token),
            InteractionEvent::ModalSubmit { user, token, input } => {
                self.handle_modal(user, token, input)
            }
        };

        match result {
            Ok(reply) => reply,
            Err(err) => self.reply_for(err),
        }
    }

    /// Map an error onto the surfacing policy.
    fn reply_for(&self, err: BotError) -> Reply {
        match err.surfacing() {
            Surfacing::Silent => {
                warn!(error = %err, "dropping anomalous interaction");
                Reply::Ignore
            }
            Surfacing::Rejection => Reply::ephemeral(format!("bet rejected: {}", err)),
            Surfacing::Inactive => Reply::ephemeral("this game is no longer active"),
        }
    }

    /// Slash command: create a session and issue the start button.
    fn handle_slash(&self, user: &str, command: &str) -> BotResult<Reply> {
        let Some(kind) = GameKind::parse(command) else {
            warn!(command, "unknown game command");
            return Ok(Reply::ephemeral("unknown game command"));
        };

        let balance = self.ledger.get_or_create(user);
        let session = self.sessions.create(user, kind);
        let token = InteractionToken::new(kind.as_str(), user, session.id, kind, GameAction::Start)?;

        info!(user, session = %session.id, kind = %kind, "game session opened");
        Ok(Reply::Prompt {
            content: format!("{} started a new {} game (balance: {})", user, kind, balance),
            prompts: vec![UiPrompt {
                token: token.encode(),
                label: "START".to_string(),
                kind: PromptKind::Button,
            }],
        })
    }

    /// Button click: start prompts for a bet; hit/stand/finish advance a
    /// session that is in play.
    fn handle_button(&self, user: &str, raw_token: &str) -> BotResult<Reply> {
        let token = InteractionToken::decode(raw_token)?;
        if token.owner_id != user {
            return Err(BotError::OwnershipMismatch);
        }

        match token.action {
            GameAction::Start => {
                // The owner check against the session record matters here:
                // buttons are channel-visible, so a token minted with the
                // clicker's own id but someone else's session uuid would
                // otherwise pass the self-ownership guard above.
                self.sessions.with_session_mut(token.session_id, |session| {
                    if session.owner_id != token.owner_id {
                        return Err(BotError::OwnershipMismatch);
                    }
                    if session.state != SessionState::Created || session.kind != token.kind {
                        return Err(BotError::StateConflict);
                    }
                    session.state = SessionState::AwaitingBet;
                    Ok(())
                })?;
                let modal = token.with_action(GameAction::Bet);
                Ok(Reply::Prompt {
                    content: "Your Bet".to_string(),
                    prompts: vec![UiPrompt {
                        token: modal.encode(),
                        label: "Your Bet".to_string(),
                        kind: PromptKind::Modal,
                    }],
                })
            }
            GameAction::Hit | GameAction::Stand => {
                if token.kind != GameKind::Blackjack {
                    return Err(BotError::InvalidField {
                        field: "action",
                        value: token.action.to_string(),
                    });
                }
                let mv = if token.action == GameAction::Hit {
                    blackjack::Move::Hit
                } else {
                    blackjack::Move::Stand
                };
                self.advance_blackjack(user, &token, mv)
            }
            GameAction::Finish => {
                if token.kind != GameKind::Generic {
                    return Err(BotError::InvalidField {
                        field: "action",
                        value: token.action.to_string(),
                    });
                }
                self.finish_generic(user, &token)
            }
            // A bet action belongs on a modal, never a button.
            GameAction::Bet => Err(BotError::InvalidField {
                field: "action",
                value: token.action.to_string(),
            }),
        }
    }

    /// Modal submit: parse and validate the bet, stake it, settle the session.
    fn handle_modal(&self, user: &str, raw_token: &str, input: &str) -> BotResult<Reply> {
        let token = InteractionToken::decode(raw_token)?;
        if token.owner_id != user {
            return Err(BotError::OwnershipMismatch);
        }
        if token.action != GameAction::Bet {
            return Err(BotError::InvalidField {
                field: "action",
                value: token.action.to_string(),
            });
        }

        let bet = Bet::parse(input)?;
        let amount = bet.amount();
        if amount < self.config.min_bet || amount > self.config.max_bet {
            return Err(BotError::InvalidAmount(amount));
        }

        // Stake first: the debit is atomic per user and a rejection here
        // leaves the session awaiting its bet.
        self.ledger.get_or_create(user);
        self.ledger.debit(user, amount)?;

        let settled = self
            .sessions
            .with_session_mut(token.session_id, |session| {
                if session.owner_id != token.owner_id {
                    return Err(BotError::OwnershipMismatch);
                }
                if session.state != SessionState::AwaitingBet || session.kind != token.kind {
                    return Err(BotError::StateConflict);
                }

                match session.kind {
                    GameKind::SlotMachine => {
                        let outcome = {
                            let mut rng = self.lock_rng();
                            slot_machine::play(bet, &mut *rng)
                        };
                        session.state = SessionState::Resolved;
                        Ok(Settle::Resolved(outcome))
                    }
                    GameKind::Blackjack => {
                        let (hand, natural) = {
                            let mut rng = self.lock_rng();
                            blackjack::deal(bet, &mut *rng)
                        };
                        if let Some(outcome) = natural {
                            session.state = SessionState::Resolved;
                            return Ok(Settle::Resolved(outcome));
                        }
                        let text = blackjack::describe(&hand);
                        session.data = GameData::Blackjack(hand);
                        session.state = SessionState::InPlay;
                        Ok(Settle::InPlay {
                            text,
                            actions: vec![GameAction::Hit, GameAction::Stand],
                        })
                    }
                    GameKind::Generic => {
                        session.data = GameData::Generic(generic::start(bet));
                        session.state = SessionState::InPlay;
                        Ok(Settle::InPlay {
                            text: format!("game started with a stake of {}", amount),
                            actions: vec![GameAction::Finish],
                        })
                    }
                }
            });

        match settled {
            Ok(Settle::Resolved(outcome)) => {
                let balance = self.ledger.credit(user, outcome.total_return(amount))?;
                info!(
                    user,
                    session = %token.session_id,
                    delta = outcome.payout_delta,
                    balance,
                    "session resolved"
                );
                Ok(Reply::message(format!(
                    "{} - balance: {}",
                    outcome.description, balance
                )))
            }
            Ok(Settle::InPlay { text, actions }) => Ok(self.in_play_prompt(&token, text, actions)),
            Err(err) => {
                // The session claim was lost after the stake was taken:
                // refund so the losing path nets to zero.
                self.ledger.credit(user, amount)?;
                Err(err)
            }
        }
    }

    /// Hit/stand on an in-play blackjack session.
    fn advance_blackjack(
        &self,
        user: &str,
        token: &InteractionToken,
        mv: blackjack::Move,
    ) -> BotResult<Reply> {
        let step = self.sessions.with_session_mut(token.session_id, |session| {
            if session.owner_id != token.owner_id {
                return Err(BotError::OwnershipMismatch);
            }
            if session.state != SessionState::InPlay {
                return Err(BotError::StateConflict);
            }
            let GameData::Blackjack(hand) = &mut session.data else {
                return Err(BotError::StateConflict);
            };

            match blackjack::advance(hand, mv) {
                Some(outcome) => {
                    let bet = hand.bet;
                    session.state = SessionState::Resolved;
                    session.data = GameData::Idle;
                    Ok(HandStep::Terminal { outcome, bet })
                }
                None => Ok(HandStep::Continue {
                    text: blackjack::describe(hand),
                }),
            }
        })?;

        match step {
            HandStep::Terminal { outcome, bet } => {
                let balance = self.ledger.credit(user, outcome.total_return(bet))?;
                info!(
                    user,
                    session = %token.session_id,
                    delta = outcome.payout_delta,
                    balance,
                    "blackjack resolved"
                );
                Ok(Reply::message(format!(
                    "{} - balance: {}",
                    outcome.description, balance
                )))
            }
            HandStep::Continue { text } => Ok(self.in_play_prompt(
                token,
                text,
                vec![GameAction::Hit, GameAction::Stand],
            )),
        }
    }

    /// Finish button on an in-play generic session.
    fn finish_generic(&self, user: &str, token: &InteractionToken) -> BotResult<Reply> {
        let (outcome, bet) = self.sessions.with_session_mut(token.session_id, |session| {
            if session.owner_id != token.owner_id {
                return Err(BotError::OwnershipMismatch);
            }
            if session.state != SessionState::InPlay {
                return Err(BotError::StateConflict);
            }
            let GameData::Generic(state) = &session.data else {
                return Err(BotError::StateConflict);
            };

            let outcome = generic::finish(state);
            let bet = state.bet;
            session.state = SessionState::Resolved;
            session.data = GameData::Idle;
            Ok((outcome, bet))
        })?;

        let balance = self.ledger.credit(user, outcome.total_return(bet))?;
        info!(user, session = %token.session_id, balance, "generic game resolved");
        Ok(Reply::message(format!(
            "{} - balance: {}",
            outcome.description, balance
        )))
    }

    /// Build the follow-up button prompt for an in-play session.
    fn in_play_prompt(
        &self,
        token: &InteractionToken,
        content: String,
        actions: Vec<GameAction>,
    ) -> Reply {
        let prompts = actions
            .into_iter()
            .map(|action| UiPrompt {
                token: token.with_action(action).encode(),
                label: action.as_str().to_uppercase(),
                kind: PromptKind::Button,
            })
            .collect();
        Reply::Prompt { content, prompts }
    }
}
