//! Founder behavioural questionnaire.
//!
//! Twenty multiple-choice questions, each probing one trait. A complete set
//! of answers renders into a Markdown assessment that becomes an
//! `assessment` data source.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::DataSource;
use crate::enums::SourceType;
use crate::errors::CoreError;

pub const ASSESSMENT_FILENAME: &str = "Founder Psychometric Assessment";

/// One questionnaire item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub prompt: &'static str,
    pub options: [&'static str; 4],
    pub trait_name: &'static str,
}

pub const QUESTIONS: [Question; 20] = [
    Question {
        prompt: "When faced with a major setback, your first reaction is to:",
        options: [
            "Analyze what went wrong to prevent it in the future.",
            "Rally the team to find an immediate solution.",
            "Seek advice from mentors and advisors.",
            "Take a step back to reassess the overall strategy.",
        ],
        trait_name: "Resilience & Problem-Solving",
    },
    Question {
        prompt: "You have a strong vision for your product, but key market feedback suggests a different direction. You:",
        options: [
            "Stick to your vision, believing the market will catch up.",
            "Conduct more research to validate the feedback before making changes.",
            "Pivot the product roadmap to align with the feedback.",
            "Try to find a compromise that incorporates feedback without losing the core vision.",
        ],
        trait_name: "Adaptability & Vision",
    },
    Question {
        prompt: "When hiring a key team member, what do you prioritize most?",
        options: [
            "Raw talent and potential, even if they lack experience.",
            "Deep domain expertise and a proven track record.",
            "Cultural fit and alignment with the company's mission.",
            "A strong work ethic and ability to execute quickly.",
        ],
        trait_name: "Team Building & Leadership",
    },
    Question {
        prompt: "How do you approach risk?",
        options: [
            "Avoid it whenever possible; stability is key.",
            "Take calculated risks where the potential reward outweighs the downside.",
            "Embrace high-risk, high-reward opportunities.",
            "Systematically de-risk every aspect of the business before scaling.",
        ],
        trait_name: "Risk Tolerance",
    },
    Question {
        prompt: "Your company is running low on cash. You:",
        options: [
            "Immediately start an aggressive fundraising process.",
            "Cut costs drastically to extend the runway, even if it slows growth.",
            "Focus all efforts on generating short-term revenue.",
            "Transparently communicate the situation to the team to brainstorm solutions.",
        ],
        trait_name: "Financial Management & Transparency",
    },
    Question {
        prompt: "A key employee wants to leave for a competitor. You:",
        options: [
            "Wish them well and immediately start a search for their replacement.",
            "Make a competitive counter-offer to convince them to stay.",
            "Conduct an exit interview to understand their reasons for leaving.",
            "Assess the impact on the team and communicate a plan to mitigate it.",
        ],
        trait_name: "Leadership & Retention",
    },
    Question {
        prompt: "You receive harsh, negative feedback from an early customer. You:",
        options: [
            "Question the validity of the feedback.",
            "Thank them and ask detailed follow-up questions to understand the root cause.",
            "Apologize and offer a discount or refund.",
            "Compare their feedback with other users' experiences before acting.",
        ],
        trait_name: "Customer Focus & Humility",
    },
    Question {
        prompt: "A new technology emerges that could disrupt your entire industry. You:",
        options: [
            "Wait to see how it develops and how competitors react.",
            "Assign a small team to research and experiment with the new technology.",
            "Double down on your current technology to build a stronger moat.",
            "Begin exploring ways to integrate the new technology into your product.",
        ],
        trait_name: "Strategic Foresight",
    },
    Question {
        prompt: "You have two equally promising strategic paths, but only resources for one. How do you decide?",
        options: [
            "Choose the path that aligns best with the original company vision.",
            "Build a financial model to compare the potential ROI of each path.",
            "Consult with your team and advisors to get their perspectives.",
            "Run small, cheap experiments for both paths to see which gets more traction.",
        ],
        trait_name: "Decision Making",
    },
    Question {
        prompt: "How do you prefer to celebrate team wins?",
        options: [
            "With public recognition in a company-wide meeting.",
            "With financial bonuses or stock options.",
            "With a team-building event or offsite.",
            "By immediately setting the next ambitious goal.",
        ],
        trait_name: "Culture & Motivation",
    },
    Question {
        prompt: "A potential investor strongly disagrees with your core business model but is willing to invest if you change it. You:",
        options: [
            "Politely decline the investment to protect your vision.",
            "Consider the change if the investor has a strong track record in your industry.",
            "Ask for the data and reasoning behind their suggestion for further evaluation.",
            "Seek other investors who are aligned with your current model.",
        ],
        trait_name: "Conviction & Coachability",
    },
    Question {
        prompt: "Which of these best describes your biggest personal weakness as a founder?",
        options: [
            "I can be too focused on product details and lose sight of the bigger picture.",
            "I sometimes struggle with delegating important tasks.",
            "I can be overly optimistic in financial and timeline projections.",
            "I find it difficult to deliver critical feedback to my team.",
        ],
        trait_name: "Self-Awareness",
    },
    Question {
        prompt: "How do you personally stay updated with market trends?",
        options: [
            "Reading industry news, blogs, and reports daily.",
            "Networking with other founders, investors, and experts.",
            "Attending conferences and industry events.",
            "Analyzing competitor products and strategies.",
        ],
        trait_name: "Continuous Learning",
    },
    Question {
        prompt: "When pitching your company, the most important thing to convey is:",
        options: [
            "The massive size of the market opportunity.",
            "The unique, defensible technology you've built.",
            "The incredible team you've assembled.",
            "The compelling story of why your company must exist.",
        ],
        trait_name: "Sales & Communication",
    },
    Question {
        prompt: "You realize a core feature you spent months building isn't being used by customers. You:",
        options: [
            "Launch a marketing campaign to educate users on the feature's benefits.",
            "Interview users to understand why they aren't using it.",
            "Remove the feature to reduce product complexity.",
            "Deprioritize the feature but leave it in, in case it becomes useful later.",
        ],
        trait_name: "Product Sense",
    },
    Question {
        prompt: "How do you handle disagreements with your co-founder(s)?",
        options: [
            "We debate until we reach a consensus, no matter how long it takes.",
            "We rely on data and experiments to prove which approach is better.",
            "We defer to the person with the most expertise in that specific area.",
            "If we're at a stalemate, one person has the final say (CEO or designated tie-breaker).",
        ],
        trait_name: "Conflict Resolution",
    },
    Question {
        prompt: "The best way to motivate your team during a tough period is:",
        options: [
            "By showing unwavering optimism and confidence in the future.",
            "By being transparent about the challenges and showing a clear plan forward.",
            "By offering incentives for hitting short-term recovery goals.",
            "By reminding them of the company's mission and long-term vision.",
        ],
        trait_name: "Leadership in Crisis",
    },
    Question {
        prompt: "You are presented with an early, but modest, acquisition offer. You:",
        options: [
            "Reject it immediately as it undervalues your long-term potential.",
            "Seriously consider it as a way to de-risk the outcome for the team and early investors.",
            "Use the offer as leverage in your current fundraising round.",
            "Evaluate it against a clear set of criteria for what a 'good' exit looks like for you.",
        ],
        trait_name: "Strategic Thinking",
    },
    Question {
        prompt: "Describe your ideal relationship with your investors.",
        options: [
            "They provide capital and stay out of the day-to-day operations.",
            "They act as a formal board member for governance and accountability.",
            "They are active partners who I can call for advice and introductions.",
            "They are deeply embedded in our strategy and operations.",
        ],
        trait_name: "Investor Relations",
    },
    Question {
        prompt: "When do you know it's the right time to stop pursuing an idea and move on?",
        options: [
            "When the team's morale is consistently low.",
            "When the data clearly shows a lack of product-market fit after multiple iterations.",
            "When the company is about to run out of money.",
            "When you personally lose passion for the problem you're solving.",
        ],
        trait_name: "Grit vs. Stubbornness",
    },
];

/// Chosen option index per question index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AssessmentAnswers(pub BTreeMap<usize, usize>);

impl AssessmentAnswers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer, replacing any earlier choice for the question.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for an unknown question or option.
    pub fn answer(&mut self, question: usize, option: usize) -> Result<(), CoreError> {
        let q = QUESTIONS
            .get(question)
            .ok_or_else(|| CoreError::Validation(format!("no question {}", question + 1)))?;
        if option >= q.options.len() {
            return Err(CoreError::Validation(format!(
                "question {} has no option {}",
                question + 1,
                option + 1
            )));
        }
        self.0.insert(question, option);
        Ok(())
    }

    /// Answer text for a question, if answered.
    #[must_use]
    pub fn text(&self, question: usize) -> Option<&'static str> {
        let option = *self.0.get(&question)?;
        QUESTIONS.get(question).map(|q| q.options[option])
    }

    #[must_use]
    pub fn answered(&self) -> usize {
        self.0.len()
    }

    /// Every question has an answer.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        (0..QUESTIONS.len()).all(|i| self.0.contains_key(&i))
    }

    /// Indices of unanswered questions.
    #[must_use]
    pub fn missing(&self) -> Vec<usize> {
        (0..QUESTIONS.len())
            .filter(|i| !self.0.contains_key(i))
            .collect()
    }

    /// Render the assessment report.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` listing unanswered questions.
    pub fn render(&self) -> Result<String, CoreError> {
        if !self.is_complete() {
            let missing: Vec<String> = self.missing().iter().map(|i| (i + 1).to_string()).collect();
            return Err(CoreError::Validation(format!(
                "all questions must be answered; missing {}",
                missing.join(", ")
            )));
        }
        Ok(render_summary(self))
    }

    /// Render into a completed, selected `assessment` source.
    ///
    /// # Errors
    ///
    /// See [`AssessmentAnswers::render`].
    pub fn to_source(&self, id: String, now: DateTime<Utc>) -> Result<DataSource, CoreError> {
        let content = self.render()?;
        Ok(DataSource::completed(
            id,
            SourceType::Assessment,
            content,
            Some(ASSESSMENT_FILENAME.to_string()),
            now,
        ))
    }
}

fn answer_contains(answers: &AssessmentAnswers, question: usize, needle: &str) -> bool {
    answers
        .text(question)
        .is_some_and(|t| t.to_lowercase().contains(needle))
}

fn render_summary(answers: &AssessmentAnswers) -> String {
    let resilience = if answer_contains(answers, 0, "analyze") {
        "proactive and analytical"
    } else {
        "collaborative and solution-oriented"
    };
    let vision = if answer_contains(answers, 1, "vision") {
        "strong commitment to their core vision while remaining open"
    } else {
        "data-driven and flexible approach"
    };
    let team = if answer_contains(answers, 2, "cultural fit") {
        "cultural alignment and team cohesion"
    } else {
        "talent and execution ability"
    };
    let risk = if answer_contains(answers, 3, "calculated") {
        "balanced and strategic"
    } else {
        "cautious and methodical"
    };
    let finance = if answer_contains(answers, 4, "transparently") {
        "transparent and team-oriented"
    } else {
        "pragmatic and decisive"
    };

    format!(
        "# Founder Behavioural Assessment Results\n\n\
This report provides a qualitative analysis based on the founder's responses to a psychometric questionnaire.\n\n\
## Key Traits Analysis:\n\n\
- **Resilience & Problem-Solving:** The founder's response suggests a {resilience} approach to challenges. They appear capable of navigating setbacks effectively.\n\n\
- **Adaptability & Vision:** The assessment indicates a {vision} to market feedback. This balance is crucial for product-market fit.\n\n\
- **Team Building & Leadership:** The founder prioritizes {team}, suggesting a clear philosophy on building a high-performing team.\n\n\
- **Risk Tolerance:** The founder demonstrates a {risk} approach to risk, which is vital for sustainable growth.\n\n\
- **Financial Management & Transparency:** The response indicates a {finance} style in managing financial pressures.\n\n\
## Overall Summary:\n\
The founder exhibits key psychological traits associated with successful entrepreneurs, including strong problem-solving skills, adaptability, and a clear leadership style. Further diligence is recommended, but this initial assessment is positive.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn all_answered(option: usize) -> AssessmentAnswers {
        let mut answers = AssessmentAnswers::new();
        for i in 0..QUESTIONS.len() {
            answers.answer(i, option).unwrap();
        }
        answers
    }

    #[test]
    fn every_question_has_a_trait() {
        assert!(QUESTIONS.iter().all(|q| !q.trait_name.is_empty()));
    }

    #[test]
    fn incomplete_answers_do_not_render() {
        let mut answers = AssessmentAnswers::new();
        answers.answer(0, 1).unwrap();
        let err = answers.render().unwrap_err();
        assert!(err.to_string().contains("missing 2, 3"));
        assert_eq!(answers.missing().len(), 19);
    }

    #[test]
    fn answer_bounds_checked() {
        let mut answers = AssessmentAnswers::new();
        assert!(answers.answer(20, 0).is_err());
        assert!(answers.answer(0, 4).is_err());
    }

    #[test]
    fn answer_replaces_previous_choice() {
        let mut answers = AssessmentAnswers::new();
        answers.answer(3, 0).unwrap();
        answers.answer(3, 1).unwrap();
        assert_eq!(answers.answered(), 1);
        assert!(answers.text(3).unwrap().contains("calculated"));
    }

    #[test]
    fn phrasing_follows_answers() {
        let mut answers = all_answered(0);
        answers.answer(2, 2).unwrap();
        answers.answer(3, 1).unwrap();
        answers.answer(4, 3).unwrap();
        let report = answers.render().unwrap();
        assert!(report.contains("proactive and analytical"));
        assert!(report.contains("strong commitment to their core vision"));
        assert!(report.contains("cultural alignment and team cohesion"));
        assert!(report.contains("balanced and strategic"));
        assert!(report.contains("transparent and team-oriented"));
    }

    #[test]
    fn alternate_phrasing() {
        let mut answers = all_answered(1);
        answers.answer(3, 0).unwrap();
        let report = answers.render().unwrap();
        assert!(report.contains("collaborative and solution-oriented"));
        assert!(report.contains("data-driven and flexible approach"));
        assert!(report.contains("talent and execution ability"));
        assert!(report.contains("cautious and methodical"));
        assert!(report.contains("pragmatic and decisive"));
    }

    #[test]
    fn assessment_source_is_ready_for_prompting() {
        let source = all_answered(0).to_source("src-a".into(), Utc::now()).unwrap();
        assert_eq!(source.source_type, SourceType::Assessment);
        assert_eq!(source.filename.as_deref(), Some(ASSESSMENT_FILENAME));
        assert!(source.is_eligible());
    }

    #[test]
    fn rendering_is_deterministic() {
        let answers = all_answered(2);
        assert_eq!(answers.render().unwrap(), answers.render().unwrap());
    }
}
