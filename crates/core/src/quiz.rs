use crate::domain::ratio::RatioCategory;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub id: u8,
    pub topic: RatioCategory,
    pub prompt: &'static str,
    pub options: [&'static str; 3],
    #[serde(skip)]
    answer: &'static str,
    #[serde(skip)]
    explanation: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "explanation", rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Incorrect(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GradeError {
    #[error("no quiz question {0}")]
    UnknownQuestion(u8),
    #[error("'{answer}' is not an option for question {question}")]
    UnknownOption { question: u8, answer: String },
}

static QUESTIONS: [Question; 5] = [
    Question {
        id: 1,
        topic: RatioCategory::Liquidity,
        prompt: "What does the Current Ratio measure?",
        options: ["Profitability", "Liquidity", "Leverage"],
        answer: "Liquidity",
        explanation: "Incorrect. It measures Liquidity.",
    },
    Question {
        id: 2,
        topic: RatioCategory::Leverage,
        prompt: "Which ratio indicates how much debt a company uses to finance its assets?",
        options: ["Return on Equity", "Debt Ratio", "Inventory Turnover"],
        answer: "Debt Ratio",
        explanation: "Incorrect. The correct answer is Debt Ratio.",
    },
    Question {
        id: 3,
        topic: RatioCategory::Profitability,
        prompt: "Return on Equity (ROE) tells you how much...",
        options: [
            "Equity is available",
            "Net income is earned per unit of equity",
            "Debt is used",
        ],
        answer: "Net income is earned per unit of equity",
        explanation: "Incorrect. ROE measures net income per unit of equity.",
    },
    Question {
        id: 4,
        topic: RatioCategory::Efficiency,
        prompt: "Which ratio reflects how efficiently a firm uses its assets to generate sales?",
        options: ["Asset Turnover", "Current Ratio", "Debt-to-Equity"],
        answer: "Asset Turnover",
        explanation: "Incorrect. Asset Turnover measures efficiency.",
    },
    Question {
        id: 5,
        topic: RatioCategory::MarketValue,
        prompt: "What does the Price/Earnings (P/E) Ratio represent?",
        options: ["Profitability", "Market expectation", "Liquidity"],
        answer: "Market expectation",
        explanation: "Incorrect. It reflects market expectations of earnings.",
    },
];

pub fn questions() -> &'static [Question] {
    &QUESTIONS
}

pub fn grade(question: u8, answer: &str) -> Result<Verdict, GradeError> {
    let q = QUESTIONS
        .iter()
        .find(|q| q.id == question)
        .ok_or(GradeError::UnknownQuestion(question))?;

    let answer = answer.trim();
    if !q.options.contains(&answer) {
        return Err(GradeError::UnknownOption {
            question,
            answer: answer.to_string(),
        });
    }

    Ok(if answer == q.answer {
        Verdict::Correct
    } else {
        Verdict::Incorrect(q.explanation)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_answers_are_accepted() {
        assert_eq!(grade(1, "Liquidity").unwrap(), Verdict::Correct);
        assert_eq!(grade(5, " Market expectation ").unwrap(), Verdict::Correct);
    }

    #[test]
    fn wrong_option_carries_explanation() {
        assert_eq!(
            grade(2, "Return on Equity").unwrap(),
            Verdict::Incorrect("Incorrect. The correct answer is Debt Ratio.")
        );
    }

    #[test]
    fn every_answer_is_one_of_its_options() {
        for q in questions() {
            assert!(q.options.contains(&q.answer), "question {}", q.id);
        }
    }

    #[test]
    fn unknown_question_or_option_is_rejected() {
        assert_eq!(grade(9, "Liquidity"), Err(GradeError::UnknownQuestion(9)));
        assert!(matches!(
            grade(1, "Solvency"),
            Err(GradeError::UnknownOption { question: 1, .. })
        ));
    }

    #[test]
    fn verdict_serializes_with_tag() {
        let json = serde_json::to_value(Verdict::Incorrect("x")).unwrap();
        assert_eq!(json["verdict"], "incorrect");
        assert_eq!(json["explanation"], "x");
        let json = serde_json::to_value(Verdict::Correct).unwrap();
        assert_eq!(json["verdict"], "correct");
    }
}
