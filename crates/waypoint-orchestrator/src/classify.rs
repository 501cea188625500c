// crates/waypoint-orchestrator/src/classify.rs
// ============================================================================
// Module: Intent Classification
// Description: Ordered keyword classification and destination extraction.
// Purpose: Derive a routing intent from one inbound message and its context.
// Dependencies: waypoint-core
// ============================================================================

//! ## Overview
//! Classification is a strictly ordered keyword ladder: itinerary queries
//! first, then cancellation, modification, trip creation, context-dependent
//! additions, search, and booking. The ladder is deterministic; confidence
//! is a fixed advisory value. Destination extraction checks a known-city
//! list before falling back to cue phrases ("trip to X", "visit X") and a
//! capitalized-word scan.

// ============================================================================
// SECTION: Imports
// ============================================================================

use waypoint_core::DispatchContext;
use waypoint_core::Domain;
use waypoint_core::Intent;
use waypoint_core::IntentKind;

// ============================================================================
// SECTION: Keyword Tables
// ============================================================================

/// Advisory confidence attached to every keyword classification.
const KEYWORD_CONFIDENCE: f64 = 0.8;

/// Flight domain cue words.
const FLIGHT_WORDS: &[&str] = &["flight", "fly", "airport", "airline", "plane"];

/// Lodging domain cue words.
const LODGING_WORDS: &[&str] = &["hotel", "room", "stay", "accommodation", "lodge"];

/// Vehicle domain cue words.
const VEHICLE_WORDS: &[&str] = &["car", "vehicle", "rent", "rental", "drive"];

/// Itinerary query phrases.
const QUERY_PHRASES: &[&str] = &[
    "my booking",
    "my flight",
    "my hotel",
    "my reservation",
    "my trip",
    "my itinerary",
    "what time",
    "when is",
    "show me",
    "what do i have",
];

/// Cancellation cue words.
const CANCEL_WORDS: &[&str] = &["cancel", "delete", "remove"];

/// Modification cue words.
const MODIFY_WORDS: &[&str] = &["change", "modify", "update", "reschedule"];

/// Trip creation phrases.
const CREATE_PHRASES: &[&str] = &[
    "plan a trip",
    "planning a trip",
    "new trip",
    "going to",
    "want to go",
    "need to go",
    "traveling to",
    "travel to",
];

/// Addition cue words, meaningful only with an active trip.
const ADD_WORDS: &[&str] =
    &["add", "book", "reserve", "get me", "find me", "i need", "i want"];

/// Search cue words.
const SEARCH_WORDS: &[&str] =
    &["search", "find", "look for", "show", "list", "available", "options"];

/// Booking cue words for callers without an active trip.
const BOOK_WORDS: &[&str] = &["book", "reserve", "purchase"];

// ============================================================================
// SECTION: Classification
// ============================================================================

/// Classifies one inbound message against the caller's context.
#[must_use]
pub fn classify(message: &str, context: &DispatchContext) -> Intent {
    let lowered = message.to_lowercase();
    let domain = classify_domain(&lowered);
    let has_trip = context.active_trip.is_some();

    let kind = if contains_any(&lowered, QUERY_PHRASES) {
        IntentKind::QueryItinerary
    } else if contains_any(&lowered, CANCEL_WORDS) {
        IntentKind::CancelBooking
    } else if contains_any(&lowered, MODIFY_WORDS) {
        IntentKind::ModifyBooking
    } else if contains_any(&lowered, CREATE_PHRASES) {
        IntentKind::CreateTrip
    } else if has_trip && contains_any(&lowered, ADD_WORDS) {
        IntentKind::AddToTrip
    } else if contains_any(&lowered, SEARCH_WORDS) {
        IntentKind::Search
    } else if contains_any(&lowered, BOOK_WORDS) {
        if has_trip { IntentKind::AddToTrip } else { IntentKind::CreateTrip }
    } else {
        IntentKind::General
    };

    Intent {
        kind,
        domain,
        confidence: KEYWORD_CONFIDENCE,
    }
}

/// Classifies the travel domain of a lowercased message.
fn classify_domain(lowered: &str) -> Domain {
    if contains_any(lowered, FLIGHT_WORDS) {
        Domain::Flights
    } else if contains_any(lowered, LODGING_WORDS) {
        Domain::Lodging
    } else if contains_any(lowered, VEHICLE_WORDS) {
        Domain::Vehicles
    } else {
        Domain::None
    }
}

/// Returns whether any needle occurs in the haystack.
fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

// ============================================================================
// SECTION: Destination Extraction
// ============================================================================

/// Cities recognized without any cue phrase.
const KNOWN_CITIES: &[&str] = &[
    "New York",
    "Los Angeles",
    "Chicago",
    "Houston",
    "Phoenix",
    "Philadelphia",
    "San Antonio",
    "San Diego",
    "Dallas",
    "San Jose",
    "Austin",
    "Jacksonville",
    "Fort Worth",
    "Columbus",
    "Charlotte",
    "San Francisco",
    "Indianapolis",
    "Seattle",
    "Denver",
    "Boston",
    "Miami",
    "Atlanta",
    "Las Vegas",
    "Orlando",
    "Tampa",
    "Portland",
    "Paris",
    "London",
    "Tokyo",
    "Sydney",
    "Dubai",
    "Singapore",
];

/// Cue phrases preceding a destination, most specific first.
const DESTINATION_CUES: &[&[&str]] = &[
    &["trip", "to"],
    &["going", "to"],
    &["travel", "to"],
    &["fly", "to"],
    &["visit"],
    &["vacation", "in"],
    &["to"],
];

/// Words never accepted as a destination after a cue.
const CUE_STOPWORDS: &[&str] = &["plan", "book", "search", "find", "help", "want", "need"];

/// Capitalized words skipped by the fallback scan.
const FALLBACK_STOPWORDS: &[&str] =
    &["i", "would", "like", "want", "need", "please", "can", "could"];

/// Extracts a destination from the message, when one can be found.
#[must_use]
pub fn extract_destination(message: &str) -> Option<String> {
    let lowered = message.to_lowercase();
    for city in KNOWN_CITIES {
        if lowered.contains(&city.to_lowercase()) {
            return Some((*city).to_string());
        }
    }

    let words: Vec<&str> = message.split_whitespace().collect();
    for cue in DESTINATION_CUES {
        if let Some(destination) = capitalized_after_cue(&words, cue) {
            if !CUE_STOPWORDS.contains(&destination.to_lowercase().as_str()) {
                return Some(destination);
            }
        }
    }

    // Last resort: the first capitalized word that is not a stopword.
    for (index, word) in words.iter().enumerate() {
        let cleaned = trim_punctuation(word);
        if is_capitalized(cleaned) && !FALLBACK_STOPWORDS.contains(&cleaned.to_lowercase().as_str())
        {
            let next = words.get(index + 1).map(|next| trim_punctuation(next));
            if let Some(next) = next.filter(|next| is_capitalized(next)) {
                return Some(format!("{cleaned} {next}"));
            }
            return Some(cleaned.to_string());
        }
    }
    None
}

/// Finds up to two capitalized words following a cue word sequence.
fn capitalized_after_cue(words: &[&str], cue: &[&str]) -> Option<String> {
    let positions = words.len().checked_sub(cue.len())?;
    for start in 0 ..= positions {
        let matches = cue
            .iter()
            .zip(&words[start ..])
            .all(|(expected, word)| trim_punctuation(word).eq_ignore_ascii_case(expected));
        if !matches {
            continue;
        }
        let first = words.get(start + cue.len()).map(|word| trim_punctuation(word))?;
        if !is_capitalized(first) {
            continue;
        }
        let second = words
            .get(start + cue.len() + 1)
            .map(|word| trim_punctuation(word))
            .filter(|word| is_capitalized(word));
        return Some(match second {
            Some(second) => format!("{first} {second}"),
            None => first.to_string(),
        });
    }
    None
}

/// Strips trailing sentence punctuation from a word.
fn trim_punctuation(word: &str) -> &str {
    word.trim_end_matches(['.', ',', '!', '?', ';', ':'])
}

/// Returns whether a word starts with an uppercase letter.
fn is_capitalized(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
