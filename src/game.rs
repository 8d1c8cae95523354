//! Session state machine: menu → loading → playing → game over, with an
//! error state reachable from loading.
//!
//! Transitions never perform I/O. Any transition that needs a new quiz item
//! returns the [`FetchRequest`] to dispatch, and the result comes back
//! through [`Game::apply_fetch`]. Each request carries a fresh id; a
//! response is applied only while the game is still loading that exact id,
//! so replies that arrive after the player went home or retried are dropped.

use crate::models::{Difficulty, FetchRequest, FetchResponse, GameSession, GameSummary, QuizItem};
use tracing::{debug, error, info};

pub const FIRST_ROUND_ERROR: &str = "Could not generate content. Please try again.";
pub const NEXT_ROUND_ERROR: &str = "Could not load the next question.";

#[derive(Debug, Clone, PartialEq)]
pub enum GameState {
    Menu,
    Loading {
        request: FetchRequest,
    },
    Playing {
        item: QuizItem,
        /// Highlighted option, moved with the arrow keys.
        cursor: usize,
        /// Locked-in choice; set once, reveals the answer.
        selected: Option<usize>,
    },
    GameOver,
    Error {
        message: String,
        request: FetchRequest,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug)]
pub struct Game {
    state: GameState,
    session: GameSession,
    difficulty: Difficulty,
    next_request_id: u64,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self {
            state: GameState::Menu,
            session: GameSession::default(),
            difficulty: Difficulty::default(),
            next_request_id: 1,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn pending_request_id(&self) -> Option<u64> {
        match &self.state {
            GameState::Loading { request } => Some(request.id),
            _ => None,
        }
    }

    pub fn summary(&self) -> Option<GameSummary> {
        match self.state {
            GameState::GameOver => Some(self.session.summary()),
            _ => None,
        }
    }

    fn issue_request(&mut self, difficulty: Difficulty, excluded_words: Vec<String>) -> FetchRequest {
        let request = FetchRequest {
            id: self.next_request_id,
            difficulty,
            excluded_words,
        };
        self.next_request_id += 1;
        debug!(
            id = request.id,
            excluded = request.excluded_words.len(),
            "issuing fetch request"
        );
        self.state = GameState::Loading {
            request: request.clone(),
        };
        request
    }

    /// Begin a new game. Allowed from the menu and from the results screen.
    pub fn start(&mut self, difficulty: Difficulty) -> Option<FetchRequest> {
        if !matches!(self.state, GameState::Menu | GameState::GameOver) {
            return None;
        }
        info!(?difficulty, "starting new game");
        self.difficulty = difficulty;
        self.session = GameSession::started();
        Some(self.issue_request(difficulty, Vec::new()))
    }

    /// Feed a worker reply back in. Returns false when the reply was stale.
    pub fn apply_fetch(&mut self, response: FetchResponse) -> bool {
        if self.pending_request_id() != Some(response.request_id) {
            debug!(
                request_id = response.request_id,
                "discarding stale fetch response"
            );
            return false;
        }
        let GameState::Loading { request } = std::mem::replace(&mut self.state, GameState::Menu)
        else {
            unreachable!("pending request implies loading state");
        };

        match response.result {
            Ok(item) => {
                info!(round = self.session.current_round, word = %item.word, "round ready");
                self.state = GameState::Playing {
                    item,
                    cursor: 0,
                    selected: None,
                };
            }
            Err(e) => {
                error!(round = self.session.current_round, error = %e, "quiz fetch failed");
                let message = if self.session.history.is_empty() {
                    FIRST_ROUND_ERROR
                } else {
                    NEXT_ROUND_ERROR
                };
                self.state = GameState::Error {
                    message: message.to_string(),
                    request,
                };
            }
        }
        true
    }

    pub fn move_cursor(&mut self, mv: CursorMove) {
        if let GameState::Playing {
            cursor,
            selected: None,
            ..
        } = &mut self.state
        {
            // Options sit in a 2x2 grid: 0 1 / 2 3.
            *cursor = match mv {
                CursorMove::Left | CursorMove::Right => *cursor ^ 1,
                CursorMove::Up | CursorMove::Down => *cursor ^ 2,
            };
        }
    }

    /// Lock in a choice and reveal the answer. Only the first choice counts.
    pub fn select(&mut self, index: usize) -> bool {
        match &mut self.state {
            GameState::Playing {
                item,
                cursor,
                selected: selected @ None,
            } if index < item.options.len() => {
                *selected = Some(index);
                *cursor = index;
                debug!(index, correct = item.is_correct(index), "option selected");
                true
            }
            _ => false,
        }
    }

    /// Submit the locked-in choice, if any.
    pub fn confirm(&mut self) -> Option<FetchRequest> {
        match self.state {
            GameState::Playing {
                selected: Some(index),
                ..
            } => self.submit_answer(index),
            _ => None,
        }
    }

    /// Record the answer for the current round and move on. Returns the next
    /// fetch to dispatch, or None when the game ended or nothing was playing.
    pub fn submit_answer(&mut self, index: usize) -> Option<FetchRequest> {
        let (word, correct) = match &self.state {
            GameState::Playing { item, .. } if index < item.options.len() => {
                (item.word.clone(), item.is_correct(index))
            }
            _ => return None,
        };

        self.session.record(&word, correct);
        info!(
            round = self.session.current_round,
            %word,
            correct,
            score = self.session.score,
            "round answered"
        );

        if self.session.is_final_round() {
            info!(score = self.session.score, "game over");
            self.state = GameState::GameOver;
            return None;
        }

        self.session.current_round += 1;
        let excluded = self.session.excluded_words();
        Some(self.issue_request(self.difficulty, excluded))
    }

    /// Repeat the request that failed, under a new id.
    pub fn retry(&mut self) -> Option<FetchRequest> {
        let GameState::Error { request, .. } = &self.state else {
            return None;
        };
        let (difficulty, excluded) = (request.difficulty, request.excluded_words.clone());
        info!(round = self.session.current_round, "retrying fetch");
        Some(self.issue_request(difficulty, excluded))
    }

    /// Back to the menu from anywhere; the session and any pending fetch are dropped.
    pub fn go_home(&mut self) {
        if !matches!(self.state, GameState::Menu) {
            debug!("returning to menu");
        }
        self.state = GameState::Menu;
        self.session = GameSession::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use proptest::prelude::*;

    fn item(word: &str, correct: usize) -> QuizItem {
        let mut options = vec![
            "pear".to_string(),
            "lemon".to_string(),
            "grape".to_string(),
        ];
        options.insert(correct, word.to_string());
        QuizItem {
            word: word.to_string(),
            options,
            correct_option_index: correct,
            definition: format!("A fruit called {}.", word),
            image_base64: Some("aGVsbG8=".to_string()),
        }
    }

    fn ok(request: &FetchRequest, item: QuizItem) -> FetchResponse {
        FetchResponse {
            request_id: request.id,
            result: Ok(item),
        }
    }

    fn fail(request: &FetchRequest) -> FetchResponse {
        FetchResponse {
            request_id: request.id,
            result: Err(GenerationError::transport("connection refused")),
        }
    }

    /// Play `answers.len()` rounds, answering correctly where the flag is set.
    fn play(game: &mut Game, answers: &[bool]) {
        let mut request = game.start(Difficulty::Beginner).unwrap();
        for (round, correct) in answers.iter().enumerate() {
            assert!(game.apply_fetch(ok(&request, item(&format!("fruit{}", round), 0))));
            let next = game.submit_answer(if *correct { 0 } else { 1 });
            match next {
                Some(r) => request = r,
                None => break,
            }
        }
    }

    #[test]
    fn test_apple_scenario() {
        let mut game = Game::new();
        let request = game.start(Difficulty::Beginner).unwrap();
        assert!(request.excluded_words.is_empty());
        assert!(matches!(game.state(), GameState::Loading { .. }));

        assert!(game.apply_fetch(ok(&request, item("apple", 0))));
        assert!(matches!(game.state(), GameState::Playing { .. }));

        let next = game.submit_answer(0).unwrap();
        assert_eq!(game.session().score, 10);
        assert_eq!(
            game.session().history,
            vec![crate::models::RoundRecord {
                word: "apple".to_string(),
                correct: true
            }]
        );
        assert_eq!(game.session().current_round, 2);
        assert_eq!(next.excluded_words, vec!["apple"]);
        assert_eq!(next.difficulty, Difficulty::Beginner);
        assert_eq!(game.pending_request_id(), Some(next.id));
    }

    #[test]
    fn test_transport_error_then_retry() {
        let mut game = Game::new();
        let first = game.start(Difficulty::Advanced).unwrap();
        game.apply_fetch(ok(&first, item("durian", 2)));
        let second = game.submit_answer(1).unwrap();
        let before = game.session().clone();

        assert!(game.apply_fetch(fail(&second)));
        match game.state() {
            GameState::Error { message, .. } => assert_eq!(message, NEXT_ROUND_ERROR),
            other => panic!("expected error state, got {:?}", other),
        }

        let retried = game.retry().unwrap();
        assert_ne!(retried.id, second.id);
        assert_eq!(retried.difficulty, second.difficulty);
        assert_eq!(retried.excluded_words, second.excluded_words);

        assert!(game.apply_fetch(ok(&retried, item("lychee", 1))));
        assert!(matches!(game.state(), GameState::Playing { .. }));
        assert_eq!(game.session(), &before);
    }

    #[test]
    fn test_first_round_error_message() {
        let mut game = Game::new();
        let request = game.start(Difficulty::Beginner).unwrap();
        game.apply_fetch(fail(&request));
        assert!(matches!(
            game.state(),
            GameState::Error { message, .. } if message == FIRST_ROUND_ERROR
        ));
    }

    #[test]
    fn test_ten_rounds_seven_correct() {
        let mut game = Game::new();
        play(
            &mut game,
            &[true, true, true, false, true, false, true, true, false, true],
        );
        assert_eq!(game.state(), &GameState::GameOver);
        let summary = game.summary().unwrap();
        assert_eq!(summary.correct_answers, 7);
        assert_eq!(summary.percentage, 70);
        assert_eq!(summary.score, 70);
        assert_eq!(game.session().current_round, 10);
        assert_eq!(game.session().history.len(), 10);
    }

    #[test]
    fn test_final_round_never_loads() {
        let mut game = Game::new();
        play(&mut game, &[true; 9]);
        assert_eq!(game.session().current_round, 10);
        let request = match game.state() {
            GameState::Loading { request } => request.clone(),
            other => panic!("expected loading, got {:?}", other),
        };
        game.apply_fetch(ok(&request, item("kiwi", 3)));
        assert_eq!(game.submit_answer(3), None);
        assert_eq!(game.state(), &GameState::GameOver);
    }

    #[test]
    fn test_stale_response_after_home_is_ignored() {
        let mut game = Game::new();
        let request = game.start(Difficulty::Beginner).unwrap();
        game.go_home();
        assert!(!game.apply_fetch(ok(&request, item("apple", 0))));
        assert_eq!(game.state(), &GameState::Menu);
        assert_eq!(game.session(), &GameSession::default());
    }

    #[test]
    fn test_stale_response_after_restart_is_ignored() {
        let mut game = Game::new();
        let old = game.start(Difficulty::Beginner).unwrap();
        game.go_home();
        let new = game.start(Difficulty::Advanced).unwrap();
        assert!(!game.apply_fetch(ok(&old, item("apple", 0))));
        assert_eq!(game.pending_request_id(), Some(new.id));
        assert!(game.apply_fetch(ok(&new, item("durian", 0))));
    }

    #[test]
    fn test_start_resets_previous_session() {
        let mut game = Game::new();
        play(&mut game, &[true; 10]);
        assert_eq!(game.session().score, 100);

        let request = game.start(Difficulty::Advanced).unwrap();
        assert_eq!(game.session(), &GameSession::started());
        assert!(request.excluded_words.is_empty());
        assert_eq!(game.difficulty(), Difficulty::Advanced);
    }

    #[test]
    fn test_start_ignored_mid_game() {
        let mut game = Game::new();
        game.start(Difficulty::Beginner).unwrap();
        assert_eq!(game.start(Difficulty::Advanced), None);
        assert_eq!(game.difficulty(), Difficulty::Beginner);
    }

    #[test]
    fn test_input_ignored_while_loading() {
        let mut game = Game::new();
        game.start(Difficulty::Beginner).unwrap();
        assert!(!game.select(0));
        assert_eq!(game.submit_answer(0), None);
        assert_eq!(game.confirm(), None);
        assert_eq!(game.retry(), None);
        assert!(game.session().history.is_empty());
    }

    #[test]
    fn test_select_locks_first_choice() {
        let mut game = Game::new();
        let request = game.start(Difficulty::Beginner).unwrap();
        game.apply_fetch(ok(&request, item("apple", 2)));

        assert!(game.select(1));
        assert!(!game.select(2));
        game.move_cursor(CursorMove::Right);
        match game.state() {
            GameState::Playing {
                cursor, selected, ..
            } => {
                assert_eq!(*selected, Some(1));
                assert_eq!(*cursor, 1);
            }
            other => panic!("expected playing, got {:?}", other),
        }

        game.confirm().unwrap();
        assert_eq!(game.session().score, 0);
        assert!(!game.session().history[0].correct);
    }

    #[test]
    fn test_cursor_moves_on_grid() {
        let mut game = Game::new();
        let request = game.start(Difficulty::Beginner).unwrap();
        game.apply_fetch(ok(&request, item("apple", 0)));

        let cursor = |game: &Game| match game.state() {
            GameState::Playing { cursor, .. } => *cursor,
            _ => unreachable!(),
        };
        game.move_cursor(CursorMove::Right);
        assert_eq!(cursor(&game), 1);
        game.move_cursor(CursorMove::Down);
        assert_eq!(cursor(&game), 3);
        game.move_cursor(CursorMove::Left);
        assert_eq!(cursor(&game), 2);
        game.move_cursor(CursorMove::Up);
        assert_eq!(cursor(&game), 0);
    }

    #[test]
    fn test_out_of_range_answer_ignored() {
        let mut game = Game::new();
        let request = game.start(Difficulty::Beginner).unwrap();
        game.apply_fetch(ok(&request, item("apple", 0)));
        assert!(!game.select(4));
        assert_eq!(game.submit_answer(7), None);
        assert!(matches!(game.state(), GameState::Playing { .. }));
    }

    #[test]
    fn test_home_from_every_state() {
        let mut game = Game::new();
        let request = game.start(Difficulty::Beginner).unwrap();
        game.apply_fetch(fail(&request));
        game.go_home();
        assert_eq!(game.state(), &GameState::Menu);

        let request = game.start(Difficulty::Beginner).unwrap();
        game.apply_fetch(ok(&request, item("apple", 0)));
        game.go_home();
        assert_eq!(game.state(), &GameState::Menu);
        assert_eq!(game.session().current_round, 0);
    }

    proptest! {
        #[test]
        fn prop_score_and_rounds_follow_history(answers in proptest::collection::vec(any::<bool>(), 1..=10)) {
            let mut game = Game::new();
            play(&mut game, &answers);

            let session = game.session();
            let correct = answers.iter().filter(|c| **c).count() as u32;
            prop_assert_eq!(session.history.len(), answers.len());
            prop_assert_eq!(session.score, 10 * correct);
            prop_assert!(session.current_round <= session.total_rounds);

            if answers.len() == 10 {
                prop_assert_eq!(game.state(), &GameState::GameOver);
            } else {
                prop_assert_eq!(session.current_round as usize, answers.len() + 1);
                prop_assert!(matches!(game.state(), GameState::Loading { .. }), "expected loading");
            }
        }
    }
}
