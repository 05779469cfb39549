//! Game templates and the sessions played from them.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dice::{create_custom_dice, Dice, Sides, StandardDice};
use crate::ids::IdGenerator;
use crate::roll::{now_millis, InvalidDiceError, RollResult, Roller};
use crate::storage::{KeyValueStore, Storage};
use crate::utils::is_blank;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GameError {
    #[error("Game name is required")]
    NameRequired,
    #[error("A game needs at least one dice")]
    NoDice,
    #[error("Invalid player range {min}-{max}")]
    InvalidPlayerRange { min: u32, max: u32 },
    #[error("This game is for {min}-{max} players, not {count}")]
    PlayerCount { count: usize, min: u32, max: u32 },
    #[error("Every player needs a name")]
    BlankPlayerName,
    #[error("A game template with id {0} already exists")]
    DuplicateTemplate(String),
    #[error("No game template with id {0}")]
    UnknownTemplate(String),
    #[error("No game session with id {0}")]
    UnknownSession(String),
    #[error("Game {template_id} has no dice {dice_id}")]
    DiceNotInGame { dice_id: String, template_id: String },
    #[error(transparent)]
    InvalidDice(#[from] InvalidDiceError),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub dice: Vec<Dice>,
    #[serde(default)]
    pub rules: String,
    pub min_players: u32,
    pub max_players: u32,
}

impl GameTemplate {
    pub fn validate(&self) -> Result<(), GameError> {
        if is_blank(&self.name) {
            return Err(GameError::NameRequired);
        }
        if self.dice.is_empty() {
            return Err(GameError::NoDice);
        }
        if self.min_players < 1 || self.min_players > self.max_players {
            return Err(GameError::InvalidPlayerRange {
                min: self.min_players,
                max: self.max_players,
            });
        }
        Ok(())
    }

    pub fn accepts_players(&self, count: usize) -> bool {
        (self.min_players as usize..=self.max_players as usize).contains(&count)
    }
}

fn numbered_d6(n: usize, color: &str) -> Dice {
    Dice::Standard(StandardDice {
        id: format!("d6-{}", n),
        sides: Sides::D6,
        name: Sides::D6.to_string(),
        color: color.to_string(),
    })
}

const D6_COLORS: [&str; 5] = ["#3b82f6", "#ef4444", "#10b981", "#f59e0b", "#8b5cf6"];

/// Templates offered before the user has saved any of their own.
pub fn default_templates<G: IdGenerator + ?Sized>(ids: &mut G) -> Vec<GameTemplate> {
    let color_dice = create_custom_dice(
        ids,
        "Color Dice",
        ["Red", "Blue", "Green", "Yellow", "Purple", "Orange"]
            .iter()
            .map(|c| c.to_string())
            .collect(),
        "#ec4899",
    );

    vec![
        GameTemplate {
            id: "meyer".to_string(),
            name: "Meyer".to_string(),
            description: "A traditional Danish dice game for 2-4 players".to_string(),
            dice: D6_COLORS[..2]
                .iter()
                .enumerate()
                .map(|(i, color)| numbered_d6(i + 1, color))
                .collect(),
            rules: "Roll two dice. The highest combination wins. 21 (6+6) is the highest, followed by 31 (6+5), 32 (6+4), etc. 11 (1+1) is the lowest.".to_string(),
            min_players: 2,
            max_players: 4,
        },
        GameTemplate {
            id: "yahtzee".to_string(),
            name: "Yahtzee".to_string(),
            description: "Classic dice game with scoring categories".to_string(),
            dice: D6_COLORS
                .iter()
                .enumerate()
                .map(|(i, color)| numbered_d6(i + 1, color))
                .collect(),
            rules: "Roll 5 dice up to 3 times. Score based on combinations like three of a kind, full house, yahtzee (five of a kind), etc.".to_string(),
            min_players: 1,
            max_players: 10,
        },
        GameTemplate {
            id: "color-game".to_string(),
            name: "Color Game".to_string(),
            description: "Simple color-based dice game".to_string(),
            dice: vec![Dice::Custom(color_dice)],
            rules: "Roll the color dice. Each player takes turns rolling and must perform an action based on the color rolled.".to_string(),
            min_players: 2,
            max_players: 6,
        },
    ]
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub id: String,
    pub template_id: String,
    pub players: Vec<String>,
    /// Index into `players` of whoever rolls next.
    pub current_player: usize,
    pub rolls: Vec<RollResult>,
    pub started_at: i64,
}

impl GameSession {
    pub fn start<G>(ids: &mut G, template: &GameTemplate, players: Vec<String>) -> Result<Self, GameError>
    where
        G: IdGenerator + ?Sized,
    {
        if !template.accepts_players(players.len()) {
            return Err(GameError::PlayerCount {
                count: players.len(),
                min: template.min_players,
                max: template.max_players,
            });
        }
        if players.iter().any(|p| is_blank(p)) {
            return Err(GameError::BlankPlayerName);
        }
        Ok(GameSession {
            id: ids.next_id(),
            template_id: template.id.clone(),
            players: players.into_iter().map(|p| p.trim().to_string()).collect(),
            current_player: 0,
            rolls: Vec::new(),
            started_at: now_millis(),
        })
    }

    pub fn current_player(&self) -> Option<&str> {
        self.players.get(self.current_player).map(String::as_str)
    }

    pub fn advance_turn(&mut self) {
        if !self.players.is_empty() {
            self.current_player = (self.current_player + 1) % self.players.len();
        }
    }

    /// Appends the rolls of the current player's turn and passes the dice on.
    pub fn record_turn(&mut self, rolls: impl IntoIterator<Item = RollResult>) {
        self.rolls.extend(rolls);
        self.advance_turn();
    }
}

impl<S: KeyValueStore> Storage<S> {
    /// Stored templates, or the defaults (which get saved) when there are none yet.
    pub fn templates_or_seed<G: IdGenerator + ?Sized>(&mut self, ids: &mut G) -> Vec<GameTemplate> {
        let templates = self.get_game_templates();
        if !templates.is_empty() {
            return templates;
        }
        let defaults = default_templates(ids);
        log::info!("Seeding {} default game templates", defaults.len());
        let _ = self.save_game_templates(&defaults);
        defaults
    }

    pub fn find_template(&self, id: &str) -> Option<GameTemplate> {
        self.get_game_templates().into_iter().find(|t| t.id == id)
    }

    pub fn add_game_template(&mut self, template: GameTemplate) -> Result<GameTemplate, GameError> {
        template.validate()?;
        let mut templates = self.get_game_templates();
        if templates.iter().any(|t| t.id == template.id) {
            return Err(GameError::DuplicateTemplate(template.id));
        }
        templates.push(template.clone());
        let _ = self.save_game_templates(&templates);
        Ok(template)
    }

    pub fn find_session(&self, id: &str) -> Option<GameSession> {
        self.get_game_sessions().into_iter().find(|s| s.id == id)
    }

    pub fn start_game<G>(&mut self, ids: &mut G, template_id: &str, players: Vec<String>) -> Result<GameSession, GameError>
    where
        G: IdGenerator + ?Sized,
    {
        let template = self
            .find_template(template_id)
            .ok_or_else(|| GameError::UnknownTemplate(template_id.to_string()))?;
        let session = GameSession::start(ids, &template, players)?;
        let mut sessions = self.get_game_sessions();
        sessions.push(session.clone());
        let _ = self.save_game_sessions(&sessions);
        log::info!("Started {} session {} for {:?}", template.name, session.id, session.players);
        Ok(session)
    }

    /// Rolls every dice of the session's template for the current player.
    ///
    /// The rolls are tagged with the session id, appended to the session and to the
    /// global history, and the turn moves to the next player.
    pub fn play_turn<R, G>(&mut self, roller: &mut Roller<R, G>, session_id: &str) -> Result<(GameSession, Vec<RollResult>), GameError>
    where
        R: Rng,
        G: IdGenerator,
    {
        self.take_turn(roller, session_id, None)
    }

    /// Rolls a single dice of the session's template for the current player, then
    /// passes the turn on like [`Storage::play_turn`].
    pub fn roll_in_game<R, G>(&mut self, roller: &mut Roller<R, G>, session_id: &str, dice_id: &str) -> Result<(GameSession, RollResult), GameError>
    where
        R: Rng,
        G: IdGenerator,
    {
        let (session, mut rolls) = self.take_turn(roller, session_id, Some(dice_id))?;
        let roll = rolls.pop().ok_or_else(|| GameError::DiceNotInGame {
            dice_id: dice_id.to_string(),
            template_id: session.template_id.clone(),
        })?;
        Ok((session, roll))
    }

    fn take_turn<R, G>(
        &mut self,
        roller: &mut Roller<R, G>,
        session_id: &str,
        dice_id: Option<&str>,
    ) -> Result<(GameSession, Vec<RollResult>), GameError>
    where
        R: Rng,
        G: IdGenerator,
    {
        let mut sessions = self.get_game_sessions();
        let session = sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| GameError::UnknownSession(session_id.to_string()))?;
        let template = self
            .find_template(&session.template_id)
            .ok_or_else(|| GameError::UnknownTemplate(session.template_id.clone()))?;

        let dice: Vec<&Dice> = match dice_id {
            Some(id) => {
                let one = template.dice.iter().find(|d| d.id() == id).ok_or_else(|| {
                    GameError::DiceNotInGame {
                        dice_id: id.to_string(),
                        template_id: template.id.clone(),
                    }
                })?;
                vec![one]
            }
            None => template.dice.iter().collect(),
        };
        let rolls = dice
            .into_iter()
            .map(|dice| roller.roll_in_game(dice, session_id))
            .collect::<Result<Vec<_>, _>>()?;

        session.record_turn(rolls.iter().cloned());
        let session = session.clone();
        let _ = self.save_game_sessions(&sessions);
        for roll in &rolls {
            let _ = self.add_roll_to_history(roll.clone());
        }
        Ok((session, rolls))
    }

    /// Ends a session, removing it from storage.
    pub fn end_game(&mut self, session_id: &str) -> Result<GameSession, GameError> {
        let mut sessions = self.get_game_sessions();
        let index = sessions
            .iter()
            .position(|s| s.id == session_id)
            .ok_or_else(|| GameError::UnknownSession(session_id.to_string()))?;
        let ended = sessions.remove(index);
        let _ = self.save_game_sessions(&sessions);
        log::info!("Ended session {} after {} rolls", ended.id, ended.rolls.len());
        Ok(ended)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::ids::SequentialIds;
    use crate::storage::MemoryStore;

    fn players(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn seeded_storage() -> (Storage<MemoryStore>, SequentialIds) {
        let mut storage = Storage::new(MemoryStore::new());
        let mut ids = SequentialIds::new("id");
        storage.templates_or_seed(&mut ids);
        (storage, ids)
    }

    #[test]
    fn default_templates_are_valid() {
        let templates = default_templates(&mut SequentialIds::new("dice"));
        let ids: Vec<&str> = templates.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(vec!["meyer", "yahtzee", "color-game"], ids);
        for template in &templates {
            assert_eq!(Ok(()), template.validate(), "{}", template.id);
        }
        assert_eq!(2, templates[0].dice.len());
        assert_eq!(5, templates[1].dice.len());
        assert_eq!(6, templates[2].dice[0].face_count());
    }

    #[test]
    fn seeds_templates_only_once() {
        let (mut storage, mut ids) = seeded_storage();
        let stored = storage.get_game_templates();
        assert_eq!(3, stored.len());

        let custom = GameTemplate {
            id: "duel".to_string(),
            name: "Duel".to_string(),
            description: String::new(),
            dice: vec![Dice::from(StandardDice::new(Sides::D20))],
            rules: "Highest roll wins.".to_string(),
            min_players: 2,
            max_players: 2,
        };
        storage.add_game_template(custom.clone()).unwrap();
        assert_eq!(
            Err(GameError::DuplicateTemplate("duel".to_string())),
            storage.add_game_template(custom)
        );
        assert_eq!(4, storage.templates_or_seed(&mut ids).len());
    }

    #[test]
    fn validates_templates() {
        let base = default_templates(&mut SequentialIds::new("dice")).remove(0);
        let cases = [
            (GameTemplate { name: " ".to_string(), ..base.clone() }, Err(GameError::NameRequired)),
            (GameTemplate { dice: vec![], ..base.clone() }, Err(GameError::NoDice)),
            (
                GameTemplate { min_players: 0, ..base.clone() },
                Err(GameError::InvalidPlayerRange { min: 0, max: 4 }),
            ),
            (
                GameTemplate { min_players: 5, ..base.clone() },
                Err(GameError::InvalidPlayerRange { min: 5, max: 4 }),
            ),
            (base.clone(), Ok(())),
        ];

        for (template, expected) in cases {
            assert_eq!(expected, template.validate());
        }
    }

    #[test]
    fn sessions_check_the_player_count() {
        let (mut storage, mut ids) = seeded_storage();
        assert_eq!(
            Err(GameError::PlayerCount { count: 1, min: 2, max: 4 }),
            storage.start_game(&mut ids, "meyer", players(&["Ann"]))
        );
        assert_eq!(
            Err(GameError::BlankPlayerName),
            storage.start_game(&mut ids, "meyer", players(&["Ann", "  "]))
        );
        assert_eq!(
            Err(GameError::UnknownTemplate("chess".to_string())),
            storage.start_game(&mut ids, "chess", players(&["Ann", "Bob"]))
        );
        assert!(storage.get_game_sessions().is_empty());
    }

    #[test]
    fn turns_rotate_and_rolls_are_recorded() {
        let (mut storage, mut ids) = seeded_storage();
        let session = storage
            .start_game(&mut ids, "meyer", players(&["Ann", "Bob"]))
            .unwrap();
        assert_eq!(Some("Ann"), session.current_player());

        let mut roller = Roller::with_parts(StdRng::seed_from_u64(1), SequentialIds::new("roll"));
        let (after_ann, rolls) = storage.play_turn(&mut roller, &session.id).unwrap();
        assert_eq!(2, rolls.len());
        assert!(rolls.iter().all(|r| r.game_id.as_deref() == Some(session.id.as_str())));
        assert_eq!(Some("Bob"), after_ann.current_player());

        let (after_bob, _) = storage.play_turn(&mut roller, &session.id).unwrap();
        assert_eq!(Some("Ann"), after_bob.current_player());
        assert_eq!(4, after_bob.rolls.len());

        assert_eq!(Some(after_bob), storage.find_session(&session.id));
        assert_eq!(4, storage.get_roll_history().len());
    }

    #[test]
    fn rolling_one_dice_passes_the_turn() {
        let (mut storage, mut ids) = seeded_storage();
        let session = storage
            .start_game(&mut ids, "yahtzee", players(&["Ann", "Bob"]))
            .unwrap();
        let mut roller = Roller::with_parts(StdRng::seed_from_u64(3), SequentialIds::new("roll"));

        let (after, roll) = storage.roll_in_game(&mut roller, &session.id, "d6-3").unwrap();
        assert_eq!("d6-3", roll.dice_id);
        assert_eq!(Some(session.id.clone()), roll.game_id);
        assert_eq!(vec![roll.clone()], after.rolls);
        assert_eq!(Some("Bob"), after.current_player());
        assert_eq!(Some(after), storage.find_session(&session.id));
        assert_eq!(vec![roll], storage.get_roll_history());

        assert_eq!(
            Err(GameError::DiceNotInGame {
                dice_id: "d20".to_string(),
                template_id: "yahtzee".to_string(),
            }),
            storage.roll_in_game(&mut roller, &session.id, "d20")
        );
        assert_eq!(
            Err(GameError::UnknownSession("gone".to_string())),
            storage.roll_in_game(&mut roller, "gone", "d6-1")
        );
        assert_eq!(1, storage.get_roll_history().len());
    }

    #[test]
    fn ending_a_game_removes_the_session() {
        let (mut storage, mut ids) = seeded_storage();
        let first = storage
            .start_game(&mut ids, "yahtzee", players(&["Solo"]))
            .unwrap();
        let second = storage
            .start_game(&mut ids, "color-game", players(&["Ann", "Bob", "Cid"]))
            .unwrap();

        assert_eq!(first.id, storage.end_game(&first.id).unwrap().id);
        assert_eq!(vec![second], storage.get_game_sessions());
        assert_eq!(
            Err(GameError::UnknownSession(first.id.clone())),
            storage.end_game(&first.id)
        );
    }

    #[test]
    fn session_json_shape() {
        let session = GameSession {
            id: "s1".to_string(),
            template_id: "meyer".to_string(),
            players: players(&["Ann", "Bob"]),
            current_player: 1,
            rolls: vec![],
            started_at: 5,
        };
        assert_eq!(
            serde_json::json!({
                "id": "s1", "templateId": "meyer", "players": ["Ann", "Bob"],
                "currentPlayer": 1, "rolls": [], "startedAt": 5
            }),
            serde_json::to_value(&session).unwrap()
        );
    }
}
