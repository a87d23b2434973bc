//! # Survey
//!
//! Fixed question table, submission entries and the yes/no tally.
//!
//! Question indices are positional. Index `i` of an answer array and index `i`
//! of an aggregate always refer to `QUESTIONS[i]`, so the table must only ever
//! be appended to, never reordered.
use chrono::Utc;
use serde::{Deserialize, Serialize};

pub const QUESTION_COUNT: usize = 11;

pub type Answers = [Option<bool>; QUESTION_COUNT];

pub struct Question {
    pub prompt: &'static str,
    /// Illustration stem, `images/<name>.png` and `BodySVGs/<name>.svg`.
    pub name: &'static str,
}

pub const QUESTIONS: [Question; QUESTION_COUNT] = [
    Question {
        prompt: "If you could, would you choose the eye color of your child?",
        name: "eyecolor",
    },
    Question {
        prompt: "Would you choose the sex of your child?",
        name: "sex",
    },
    Question {
        prompt: "Huntingtons disease is a genetic neurodegenerative disorder which begins with mood changes and jerky walking, and eventually leads to dementia and difficulty with coordinated movement. It involves the basal ganglia, the brain region shown here. If you could ensure your child would not be born with Huntingtons disease, would you?",
        name: "huntingtons",
    },
    Question {
        prompt: "Hemophilia is a genetic disorder which impedes the ability of blood to clot, which would normally stop bleeding when a blood vessel is broken. If you could ensure your child would not be born with hemophilia, would you?",
        name: "hemophilia",
    },
    Question {
        prompt: "If you could choose the height of your child, would you?",
        name: "height",
    },
    Question {
        prompt: "Tay-Sachs disease is a genetic disorder which leads to deterioration of mental and physical abilities. Here it is represented by the brain stem. If you could ensure your child would not be born with Tay-Sachs disease, would you?",
        name: "taysachs",
    },
    Question {
        prompt: "If possible, would you decrease the likelihood of your child developing alcoholism?",
        name: "alcoholism",
    },
    Question {
        prompt: "If you could decrease the likelihood of your child developing obesity, would you?",
        name: "obesity",
    },
    Question {
        prompt: "Intelligence is represented here by the frontal cortex, a region of the brain associated with executive function. If you could increase the chances of your child having above average intelligence, would you?",
        name: "intelligence",
    },
    Question {
        prompt: "Would you choose to decrease the likelihood of your child developing depression?",
        name: "depression",
    },
    Question {
        prompt: "If you could improve the natural athleticism of your child, would you?",
        name: "athleticism",
    },
];

/// One respondent's answers. Never updated once stored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Submission {
    pub answers: Answers,
    /// Milliseconds since the Unix epoch, 0 when an older entry lacks one.
    #[serde(default)]
    pub timestamp: i64,
}

impl Submission {
    pub fn new(answers: Answers) -> Self {
        Self {
            answers,
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub yes: u64,
    pub no: u64,
}

impl Tally {
    pub fn total(&self) -> u64 {
        self.yes + self.no
    }

    pub fn yes_percent(&self) -> f64 {
        percent(self.yes, self.total())
    }

    pub fn no_percent(&self) -> f64 {
        percent(self.no, self.total())
    }

    /// Overlay opacity for the body visualization, 5% floor and 100% ceiling.
    pub fn opacity(&self) -> f64 {
        match self.total() {
            0 => 0.05,
            total => 0.05 + 0.95 * (self.yes as f64 / total as f64),
        }
    }
}

fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }

    part as f64 / total as f64 * 100.0
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Aggregate {
    pub counts: [Tally; QUESTION_COUNT],
}

impl Aggregate {
    pub fn record(&mut self, answers: &Answers) {
        for (tally, answer) in self.counts.iter_mut().zip(answers) {
            match answer {
                Some(true) => tally.yes += 1,
                Some(false) => tally.no += 1,
                None => {}
            }
        }
    }

    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a Submission>,
    {
        let mut aggregate = Self::default();

        for entry in entries {
            aggregate.record(&entry.answers);
        }

        aggregate
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|tally| tally.total() == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(answers: Answers) -> Submission {
        Submission {
            answers,
            timestamp: 0,
        }
    }

    #[test]
    fn test_empty_aggregate() {
        let aggregate = Aggregate::from_entries(std::iter::empty());

        assert!(aggregate.is_empty());
        assert_eq!(aggregate.counts, [Tally::default(); QUESTION_COUNT]);
    }

    #[test]
    fn test_counts_per_index() {
        let mut first = [None; QUESTION_COUNT];
        first[0] = Some(true);
        first[1] = Some(false);
        first[10] = Some(true);

        let mut second = [Some(true); QUESTION_COUNT];
        second[1] = None;

        let aggregate = Aggregate::from_entries(&[entry(first), entry(second)]);

        assert_eq!(aggregate.counts[0], Tally { yes: 2, no: 0 });
        assert_eq!(aggregate.counts[1], Tally { yes: 0, no: 1 });
        assert_eq!(aggregate.counts[5], Tally { yes: 1, no: 0 });
        assert_eq!(aggregate.counts[10], Tally { yes: 2, no: 0 });
    }

    #[test]
    fn test_nulls_not_counted() {
        let aggregate = Aggregate::from_entries(&[entry([None; QUESTION_COUNT])]);

        assert!(aggregate.is_empty());
    }

    #[test]
    fn test_opacity_bounds() {
        assert_eq!(Tally::default().opacity(), 0.05);
        assert_eq!(Tally { yes: 0, no: 4 }.opacity(), 0.05);
        assert!((Tally { yes: 4, no: 0 }.opacity() - 1.0).abs() < 1e-9);
        assert!((Tally { yes: 1, no: 1 }.opacity() - 0.525).abs() < 1e-9);
    }

    #[test]
    fn test_percentages() {
        let tally = Tally { yes: 3, no: 1 };

        assert_eq!(tally.yes_percent(), 75.0);
        assert_eq!(tally.no_percent(), 25.0);
        assert_eq!(Tally::default().yes_percent(), 0.0);
    }

    #[test]
    fn test_submission_json_shape() {
        let mut answers = [None; QUESTION_COUNT];
        answers[2] = Some(false);

        let value = serde_json::to_value(entry(answers)).unwrap();

        assert_eq!(value["answers"].as_array().unwrap().len(), QUESTION_COUNT);
        assert_eq!(value["answers"][2], false);
        assert!(value["answers"][0].is_null());
        assert_eq!(value["timestamp"], 0);
    }
}
