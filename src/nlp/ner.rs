// Named entity recognition using regex patterns. Feeds the subject pool for
// question synthesis.
use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Person,
    Organization,
    Location,
    Email,
    Date,
    Money,
    Percent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub text: String,
    pub kind: EntityKind,
    pub start: usize,
    pub end: usize,
}

static PERSON_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+)+)\b").unwrap()
});

static ORGANIZATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b((?:[A-Z][A-Za-z&]+\s+)+(?:Inc|LLC|Corp|Corporation|Ltd|Limited|Company|Co|Group|Institute|University|College|Agency|Bank|Authority|Council|Ministry|Department)\b\.?)").unwrap()
});

static LOCATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b((?:United States|USA|UK|United Kingdom|European Union|New York|California|Texas|London|Paris|Berlin|Tokyo|Beijing|Singapore|Sydney|Toronto|Mumbai|Washington|Chicago|Los Angeles|San Francisco|Boston|Seattle|Miami|Austin|Denver|Portland|Atlanta))\b").unwrap()
});

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,})\b").unwrap()
});

static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2}[/-]\d{1,2}[/-]\d{2,4}|\d{4}[/-]\d{1,2}[/-]\d{1,2}|(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\s+\d{1,2},?\s+\d{4}|(?:Q[1-4]|FY)\s?\d{2,4})\b").unwrap()
});

static MONEY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[$€£]\s*\d+(?:,\d{3})*(?:\.\d+)?(?:\s*(?:million|billion|thousand|[MBK]))?|\d+(?:,\d{3})*(?:\.\d{2})?\s*(?:USD|EUR|GBP|dollars?|euros?|pounds?)").unwrap()
});

static PERCENT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+(?:\.\d+)?\s?(?:%|percent\b)").unwrap()
});

// Checked in this order; an earlier kind claims the text first.
static PATTERNS: Lazy<Vec<(EntityKind, &'static Regex)>> = Lazy::new(|| {
    vec![
        (EntityKind::Email, &*EMAIL_PATTERN),
        (EntityKind::Date, &*DATE_PATTERN),
        (EntityKind::Money, &*MONEY_PATTERN),
        (EntityKind::Percent, &*PERCENT_PATTERN),
        (EntityKind::Location, &*LOCATION_PATTERN),
        (EntityKind::Organization, &*ORGANIZATION_PATTERN),
        (EntityKind::Person, &*PERSON_PATTERN),
    ]
});

const ORG_MARKERS: [&str; 6] = ["Inc", "Corp", "LLC", "Ltd", "University", "College"];

pub fn extract_entities_from_text(text: &str) -> Vec<Entity> {
    let mut entities = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut claimed: Vec<(usize, usize)> = Vec::new();

    for (kind, pattern) in PATTERNS.iter() {
        for cap in pattern.captures_iter(text) {
            let m = match cap.get(1).or_else(|| cap.get(0)) {
                Some(m) => m,
                None => continue,
            };
            let word = m.as_str().trim().to_string();
            if word.is_empty() || seen.contains(&word) {
                continue;
            }
            // Person names come last; skip anything an earlier kind already covers.
            if *kind == EntityKind::Person
                && (ORG_MARKERS.iter().any(|o| word.contains(o))
                    || claimed.iter().any(|&(s, e)| m.start() < e && s < m.end()))
            {
                continue;
            }
            seen.insert(word.clone());
            claimed.push((m.start(), m.end()));
            entities.push(Entity {
                text: word,
                kind: *kind,
                start: m.start(),
                end: m.end(),
            });
        }
    }

    entities.sort_by_key(|e| e.start);
    entities
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_entities_from_text() {
        let text = "Barack Obama was born in Hawaii. He worked in Chicago and later became the 44th President of the United States.";
        let entities = extract_entities_from_text(text);
        assert!(!entities.is_empty());
        assert!(entities.iter().any(|e| e.kind == EntityKind::Location));
        assert!(entities
            .iter()
            .any(|e| e.kind == EntityKind::Person && e.text == "Barack Obama"));
    }

    #[test]
    fn test_extract_email() {
        let text = "Contact us at support@example.com for more information.";
        let entities = extract_entities_from_text(text);
        assert!(entities
            .iter()
            .any(|e| e.kind == EntityKind::Email && e.text == "support@example.com"));
    }

    #[test]
    fn test_extract_date_money_percent() {
        let text = "The meeting is scheduled for Jan 15, 2024. Revenue grew 12% to $4.5 million.";
        let entities = extract_entities_from_text(text);
        assert!(entities.iter().any(|e| e.kind == EntityKind::Date));
        assert!(entities.iter().any(|e| e.kind == EntityKind::Percent));
        assert!(entities.iter().any(|e| e.kind == EntityKind::Money));
    }

    #[test]
    fn test_organization_not_reported_as_person() {
        let text = "Funding came from Acme Robotics Inc. last year.";
        let entities = extract_entities_from_text(text);
        assert!(entities.iter().any(|e| e.kind == EntityKind::Organization));
        assert!(!entities.iter().any(|e| e.kind == EntityKind::Person));
    }

    #[test]
    fn test_sorted_and_deduplicated() {
        let text = "London is busy. Paris is calm. London again.";
        let entities = extract_entities_from_text(text);
        let names: Vec<&str> = entities.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(names, vec!["London", "Paris"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(extract_entities_from_text("").is_empty());
    }
}
