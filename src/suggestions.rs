//! Canned task suggestions and motivational quotes.

use chrono::Weekday;
use rand::seq::SliceRandom;

/// Suggestions for the given local hour (0-23) and weekday.
pub fn suggestions_for(hour: u32, weekday: Weekday) -> Vec<&'static str> {
    let mut suggestions = match hour {
        5..=11 => vec![
            "Morning exercise",
            "Review daily goals",
            "Check emails",
            "Plan day ahead",
        ],
        12..=16 => vec![
            "Lunch break",
            "Team meeting",
            "Project review",
            "Client follow-up",
        ],
        17..=21 => vec![
            "Evening walk",
            "Dinner preparation",
            "Read a book",
            "Plan tomorrow",
        ],
        _ => vec![
            "Prepare for bed",
            "Set alarm",
            "Review tomorrow's schedule",
            "Meditate",
        ],
    };

    match weekday {
        Weekday::Mon => suggestions.extend(["Weekly planning", "Team sync"]),
        Weekday::Fri => suggestions.extend(["Week review", "Plan weekend"]),
        _ => {}
    }
    suggestions
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub text: &'static str,
    pub author: &'static str,
}

pub const QUOTES: &[Quote] = &[
    Quote {
        text: "The only way to do great work is to love what you do.",
        author: "Steve Jobs",
    },
    Quote {
        text: "Success is not final, failure is not fatal: it is the courage to continue that counts.",
        author: "Winston Churchill",
    },
    Quote {
        text: "The future belongs to those who believe in the beauty of their dreams.",
        author: "Eleanor Roosevelt",
    },
    Quote {
        text: "Don't watch the clock; do what it does. Keep going.",
        author: "Sam Levenson",
    },
    Quote {
        text: "The only limit to our realization of tomorrow is our doubts of today.",
        author: "Franklin D. Roosevelt",
    },
    Quote {
        text: "Believe you can and you're halfway there.",
        author: "Theodore Roosevelt",
    },
    Quote {
        text: "It does not matter how slowly you go as long as you do not stop.",
        author: "Confucius",
    },
    Quote {
        text: "Everything you've ever wanted is on the other side of fear.",
        author: "George Addair",
    },
];

pub fn random_quote() -> Quote {
    QUOTES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(QUOTES[0])
}
