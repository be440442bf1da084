//! Environmental awareness quiz
//!
//! Ten fixed questions. Presentation order is shuffled on every render; pass
//! a seeded RNG to make the order reproducible.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::HashMap;

/// Points per correct answer
pub const POINTS_PER_ANSWER: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizQuestion {
    /// Stable index into the bank, used to match submitted answers
    pub id: usize,
    pub question: &'static str,
    pub options: [&'static str; 4],
    pub answer: &'static str,
}

const fn q(
    id: usize,
    question: &'static str,
    options: [&'static str; 4],
    answer: &'static str,
) -> QuizQuestion {
    QuizQuestion {
        id,
        question,
        options,
        answer,
    }
}

pub static QUESTIONS: [QuizQuestion; 10] = [
    q(
        0,
        "Which of the following vehicles has the least carbon emissions?",
        ["Diesel Car", "Electric Scooter", "Petrol Bike", "Gasoline SUV"],
        "Electric Scooter",
    ),
    q(
        1,
        "What gas do plants absorb from the atmosphere?",
        ["Oxygen", "Nitrogen", "Carbon Dioxide", "Hydrogen"],
        "Carbon Dioxide",
    ),
    q(
        2,
        "Which of these is a renewable energy source?",
        ["Coal", "Solar", "Oil", "Natural Gas"],
        "Solar",
    ),
    q(
        3,
        "Which material is NOT biodegradable?",
        ["Banana Peel", "Plastic Bottle", "Paper", "Cotton Cloth"],
        "Plastic Bottle",
    ),
    q(
        4,
        "What is the biggest contributor to climate change?",
        ["Plastic", "Water Waste", "Greenhouse Gas Emissions", "Noise Pollution"],
        "Greenhouse Gas Emissions",
    ),
    q(
        5,
        "Which of these actions helps reduce air pollution?",
        ["Using public transport", "Burning trash", "Using diesel cars", "Cutting trees"],
        "Using public transport",
    ),
    q(
        6,
        "What can you do to conserve water?",
        ["Leave tap open", "Fix leaking taps", "Use bathtub daily", "Water lawn daily"],
        "Fix leaking taps",
    ),
    q(
        7,
        "Which of the following is an eco-friendly habit?",
        [
            "Throwing plastic into rivers",
            "Using reusable bags",
            "Driving solo daily",
            "Leaving lights on",
        ],
        "Using reusable bags",
    ),
    q(
        8,
        "Which mode of transport is most eco-friendly?",
        ["Walking", "SUV", "Motorcycle", "Airplane"],
        "Walking",
    ),
    q(
        9,
        "What does 'reduce' in the 3Rs mean?",
        ["Use less", "Throw away", "Recycle more", "Buy more"],
        "Use less",
    ),
];

/// Questions in a random order drawn from `rng`
pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Vec<&'static QuizQuestion> {
    let mut questions: Vec<&'static QuizQuestion> = QUESTIONS.iter().collect();
    questions.shuffle(rng);
    questions
}

/// Questions in an order fixed by `seed`
pub fn shuffled_seeded(seed: u64) -> Vec<&'static QuizQuestion> {
    shuffled(&mut StdRng::seed_from_u64(seed))
}

/// Score a submission keyed by question id. Unknown ids and unanswered
/// questions score nothing.
pub fn score(answers: &HashMap<usize, String>) -> u32 {
    QUESTIONS
        .iter()
        .filter(|q| answers.get(&q.id).map(String::as_str) == Some(q.answer))
        .count() as u32
        * POINTS_PER_ANSWER
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_correct() -> HashMap<usize, String> {
        QUESTIONS
            .iter()
            .map(|q| (q.id, q.answer.to_string()))
            .collect()
    }

    #[test]
    fn test_bank_is_consistent() {
        for (i, question) in QUESTIONS.iter().enumerate() {
            assert_eq!(question.id, i);
            assert!(question.options.contains(&question.answer));
        }
    }

    #[test]
    fn test_seeded_shuffle_is_reproducible() {
        let a: Vec<usize> = shuffled_seeded(42).iter().map(|q| q.id).collect();
        let b: Vec<usize> = shuffled_seeded(42).iter().map(|q| q.id).collect();
        assert_eq!(a, b);

        let mut sorted = a.clone();
        sorted.sort();
        assert_eq!(sorted, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_perfect_score() {
        assert_eq!(score(&all_correct()), 20);
    }

    #[test]
    fn test_partial_score() {
        let mut answers = all_correct();
        answers.insert(0, "Diesel Car".to_string());
        answers.remove(&1);
        answers.insert(99, "Solar".to_string());
        assert_eq!(score(&answers), 16);
    }

    #[test]
    fn test_empty_submission() {
        assert_eq!(score(&HashMap::new()), 0);
    }
}
