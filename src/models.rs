use crate::error::GenerationError;
use serde::{Deserialize, Serialize};

pub const TOTAL_ROUNDS: u32 = 10;
pub const POINTS_PER_CORRECT: u32 = 10;
pub const OPTION_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    #[default]
    Beginner,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 2] = [Difficulty::Beginner, Difficulty::Advanced];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Advanced => "Advanced",
        }
    }

    /// Short teaser shown under the menu entry.
    pub fn sample(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Apple, Banana, Orange...",
            Difficulty::Advanced => "Durian, Mangosteen...",
        }
    }
}

/// One generated question. `options[correct_option_index] == word` for every
/// item the orchestrator returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizItem {
    pub word: String,
    pub options: Vec<String>,
    pub correct_option_index: usize,
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
}

impl QuizItem {
    pub fn is_correct(&self, option_index: usize) -> bool {
        option_index == self.correct_option_index
    }

    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_option_index]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundRecord {
    pub word: String,
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    pub score: u32,
    pub total_rounds: u32,
    pub current_round: u32,
    pub history: Vec<RoundRecord>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self {
            score: 0,
            total_rounds: TOTAL_ROUNDS,
            current_round: 0,
            history: Vec::new(),
        }
    }
}

impl GameSession {
    /// Fresh session positioned on round 1.
    pub fn started() -> Self {
        Self {
            current_round: 1,
            ..Self::default()
        }
    }

    pub fn is_final_round(&self) -> bool {
        self.current_round >= self.total_rounds
    }

    pub fn record(&mut self, word: &str, correct: bool) {
        if correct {
            self.score += POINTS_PER_CORRECT;
        }
        self.history.push(RoundRecord {
            word: word.to_string(),
            correct,
        });
    }

    pub fn excluded_words(&self) -> Vec<String> {
        self.history.iter().map(|r| r.word.clone()).collect()
    }

    pub fn correct_answers(&self) -> usize {
        self.history.iter().filter(|r| r.correct).count()
    }

    pub fn summary(&self) -> GameSummary {
        let correct_answers = self.correct_answers();
        let percentage = if self.total_rounds == 0 {
            0
        } else {
            (100.0 * correct_answers as f64 / self.total_rounds as f64).round() as u32
        };
        GameSummary {
            correct_answers,
            total_rounds: self.total_rounds,
            percentage,
            score: self.score,
            verdict: Verdict::for_percentage(percentage),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Perfect,
    Excellent,
    Good,
    KeepPracticing,
}

impl Verdict {
    pub fn for_percentage(percentage: u32) -> Self {
        match percentage {
            100.. => Verdict::Perfect,
            80..=99 => Verdict::Excellent,
            50..=79 => Verdict::Good,
            _ => Verdict::KeepPracticing,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Verdict::Perfect => "Outstanding!",
            Verdict::Excellent => "Excellent!",
            Verdict::Good => "Well Done!",
            Verdict::KeepPracticing => "Keep Going!",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Verdict::Perfect => "You are a true fruit master!",
            Verdict::Excellent => "Your vocabulary is really solid!",
            Verdict::Good => "You finished the lesson nicely.",
            Verdict::KeepPracticing => "Practice a bit more to remember the words!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub correct_answers: usize,
    pub total_rounds: u32,
    pub percentage: u32,
    pub score: u32,
    pub verdict: Verdict,
}

/// Work order sent to the fetch worker. `id` is the generation counter the
/// state machine uses to recognise the reply it is waiting for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub id: u64,
    pub difficulty: Difficulty,
    pub excluded_words: Vec<String>,
}

#[derive(Debug)]
pub struct FetchResponse {
    pub request_id: u64,
    pub result: Result<QuizItem, GenerationError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(results: &[bool]) -> GameSession {
        let mut session = GameSession::started();
        for (i, correct) in results.iter().enumerate() {
            session.record(&format!("fruit{}", i), *correct);
        }
        session
    }

    #[test]
    fn test_score_tracks_correct_answers() {
        let session = session_with(&[true, false, true, true]);
        assert_eq!(session.history.len(), 4);
        assert_eq!(session.score, 30);
        assert_eq!(session.correct_answers(), 3);
    }

    #[test]
    fn test_summary_seven_of_ten() {
        let session = session_with(&[
            true, true, false, true, true, false, true, true, false, true,
        ]);
        let summary = session.summary();
        assert_eq!(summary.correct_answers, 7);
        assert_eq!(summary.percentage, 70);
        assert_eq!(summary.score, 70);
        assert_eq!(summary.verdict, Verdict::Good);
    }

    #[test]
    fn test_verdict_tiers() {
        assert_eq!(Verdict::for_percentage(100), Verdict::Perfect);
        assert_eq!(Verdict::for_percentage(80), Verdict::Excellent);
        assert_eq!(Verdict::for_percentage(90), Verdict::Excellent);
        assert_eq!(Verdict::for_percentage(50), Verdict::Good);
        assert_eq!(Verdict::for_percentage(40), Verdict::KeepPracticing);
        assert_eq!(Verdict::for_percentage(0), Verdict::KeepPracticing);
    }

    #[test]
    fn test_excluded_words_in_round_order() {
        let mut session = GameSession::started();
        session.record("apple", true);
        session.record("kiwi", false);
        assert_eq!(session.excluded_words(), vec!["apple", "kiwi"]);
    }

    #[test]
    fn test_quiz_item_wire_names() {
        let json = r#"{
            "word": "apple",
            "options": ["apple", "pear", "lemon", "grape"],
            "correctOptionIndex": 0,
            "definition": "A round fruit with red or green skin."
        }"#;
        let item: QuizItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.correct_option(), "apple");
        assert!(item.is_correct(0));
        assert!(!item.is_correct(2));
        assert!(item.image_base64.is_none());
    }
}
