//! Pattern Classifier: ordered regex tables for the game's free-text strings.
//!
//! Each table is one semantic family, most specific phrasing first. Matching
//! is case-sensitive and anchored at both ends; callers normalize the text
//! (see [`crate::text`]) before matching. The tables are data — new
//! phrasings are added here without touching interpretation logic.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

fn table(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("hardcoded pattern"))
        .collect()
}

/// Requirement tooltips meaning "quality must be absent".
pub static TOOLTIPS_NONE: Lazy<Vec<Regex>> = Lazy::new(|| {
    table(&[
        r"^You unlocked this by not having any <span class='quality-name'>(?P<quality>.+)</span>$",
        r"^You can't do this when you have <span class='quality-name'>(?P<quality>.+)</span>$",
        r"^Unlocked when you do not have <span class='quality-name'>(?P<quality>.+)</span>$",
        r"^You unlocked this by having no <span class='quality-name'>(?P<quality>.+)</span>$",
    ])
});

/// Requirement tooltips meaning "quality present, any amount".
pub static TOOLTIPS_AT_LEAST_ONE: Lazy<Vec<Regex>> = Lazy::new(|| {
    table(&[
        r"^You need (?:an? )?<span class='quality-name'>(?P<quality>.+)</span>$",
        r"^Unlocked when you have <span class='quality-name'>(?P<quality>.+)</span>$",
        r"^You need to be <span class='quality-name'>(?P<quality>.+)</span> someone$",
        r"^You unlocked this with (?:an? )?<span class='quality-name'>(?P<quality>.+)</span> <em>\(you have (?P<current>\d+) in all\)</em>$",
        r"^You can't do this when you have any <span class='quality-name'>(?P<quality>.+)</span>$",
        r"^You must be (?P<quality>.+)\.$",
        r"^This is unlocked because you have the (?P<quality>.+)\.$",
    ])
});

/// Requirement tooltips carrying a lower bound.
pub static TOOLTIPS_MINIMUM: Lazy<Vec<Regex>> = Lazy::new(|| {
    table(&[
        r"^You unlocked this with <span class='quality-name'>(?P<quality>.+)</span> (?P<current>\d+) <em>\(you needed (?P<quantity_min>\d+)\)</em>$",
        r"^You unlocked this with (?P<current>\d+) <span class='quality-name'>(?P<quality>.+)</span> <em>\(you needed (?P<quantity_min>\d+)\)</em>$",
        r"^You need <span class='quality-name'>(?P<quality>.+)</span> (?P<quantity_min>\d+)<em> \(you have (?P<current>\d+)\)</em>$",
        r"^You need (?P<quantity_min>\d+) <span class='quality-name'>(?P<quality>.+)</span> <em>\(you have (?P<current>\d+)\)</em>$",
        r"^You need (?P<quantity_min>\d+) <span class='quality-name'>(?P<quality>.+)</span>$",
        r"^You need <span class='quality-name'>(?P<quality>.+)</span> (?P<quantity_min>\d+)$",
    ])
});

/// Requirement tooltips carrying an upper bound.
pub static TOOLTIPS_MAXIMUM: Lazy<Vec<Regex>> = Lazy::new(|| {
    table(&[
        r"^You can't do this when you have <span class='quality-name'>(?P<quality>.+)</span> higher than (?P<quantity_max>\d+)<em> \(you have (?P<current>\d+)\)</em>$",
        r"^You unlocked this with <span class='quality-name'>(?P<quality>.+)</span> (?P<current>\d+) <em>\(you needed (?P<quantity_max>\d+) at most\)</em>$",
        r"^You unlocked this by not having <span class='quality-name'>(?P<quality>.+)</span> <em>\(you needed (?P<quantity_max>\d+) at most\)</em>$",
    ])
});

/// Requirement tooltips demanding an exact value.
pub static TOOLTIPS_EXACTLY: Lazy<Vec<Regex>> = Lazy::new(|| {
    table(&[
        r"^You unlocked this with <span class='quality-name'>(?P<quality>.+)</span> (?P<current>\d+)<em> \(you needed exactly (?P<quantity>\d+)\)</em>$",
        r"^You need exactly <span class='quality-name'>(?P<quality>.+)</span> (?P<quantity>\d+)<em> \(you have (?P<current>\d+)\)</em>$",
        r"^You need <span class='quality-name'>(?P<quality>.+)</span> exactly (?P<quantity>\d+)$",
    ])
});

/// Requirement tooltips carrying an inclusive range.
pub static TOOLTIPS_RANGE: Lazy<Vec<Regex>> = Lazy::new(|| {
    table(&[
        r"^You unlocked this with <span class='quality-name'>(?P<quality>.+)</span> (?P<current>\d+)<em> \(you needed (?P<quantity_min>\d+)-(?P<quantity_max>\d+)\)</em>$",
        r"^You need <span class='quality-name'>(?P<quality>.+)</span> (?P<quantity_min>\d+)-(?P<quantity_max>\d+)(?:<em> \(you have (?P<current>\d+)\)</em>)?$",
    ])
});

/// Requirement tooltips enumerating allowed named states.
pub static TOOLTIPS_WORDY: Lazy<Vec<Regex>> = Lazy::new(|| {
    table(&[
        r"^Unlocked when <span class='quality-name'>(?P<quality>.+)</span> is:<ul class='wordy-list'>(?P<requirements>.+)</ul>$",
    ])
});

static TOOLTIPS_WORDY_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<li(?: class='current')?>(?:<em>)?(.*?)(?:</em>)?</li>").expect("hardcoded pattern")
});

/// Outcome messages reporting a gained quantity.
pub static QUALITY_GAIN: Lazy<Vec<Regex>> = Lazy::new(|| {
    table(&[
        r"^You've gained (?P<quantity>\d+) x (?P<quality>.+?)(?: \(new total (?P<new_state>.+)\))?\.$",
        r"^You now have (?P<quantity>\d+) x (?P<quality>.+)\.$",
        r"^You've gained (?P<quantity>\d+) x (?P<quality>.+)\.$",
    ])
});

/// Outcome messages reporting a lost quantity.
pub static QUALITY_LOSS: Lazy<Vec<Regex>> = Lazy::new(|| {
    table(&[
        r"^You've lost (?P<quantity>\d+) x (?P<quality>.+?)(?: \(new total (?P<new_state>.+)\))?\.$",
    ])
});

/// Outcome messages meaning "reset to zero".
pub static QUALITY_SET_ZERO: Lazy<Vec<Regex>> = Lazy::new(|| {
    table(&[
        r"^Your '(?P<quality>.+)' Quality has gone!$",
        r"^'(?P<quality>.+)' has been reset: a conclusion, or a new beginning\?$",
    ])
});

/// Outcome messages reporting an explicit new value.
pub static QUALITY_SET_TO: Lazy<Vec<Regex>> = Lazy::new(|| {
    table(&[r"^An occurrence! Your '(?P<quality>.+)' Quality is now (?P<quantity>\d+)!$"])
});

/// First match wins across an ordered pattern table.
pub fn match_any<'t>(patterns: &[Regex], text: &'t str) -> Option<Captures<'t>> {
    patterns.iter().find_map(|pattern| pattern.captures(text))
}

/// Extract a named integer capture.
pub fn capture_i64(caps: &Captures<'_>, name: &str) -> Option<i64> {
    caps.name(name).and_then(|m| m.as_str().parse().ok())
}

/// Extract the enumerated values out of a wordy-list markup fragment.
pub fn wordy_values(list_markup: &str) -> Vec<String> {
    TOOLTIPS_WORDY_ITEM
        .captures_iter(list_markup)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().replace("\\\"", "\""))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_family() {
        for text in [
            "You unlocked this by not having any <span class='quality-name'>Scandal</span>",
            "You can't do this when you have <span class='quality-name'>Scandal</span>",
            "Unlocked when you do not have <span class='quality-name'>Scandal</span>",
            "You unlocked this by having no <span class='quality-name'>Scandal</span>",
        ] {
            let caps = match_any(&TOOLTIPS_NONE, text).expect(text);
            assert_eq!(&caps["quality"], "Scandal");
        }
    }

    #[test]
    fn test_at_least_one_family() {
        let caps = match_any(
            &TOOLTIPS_AT_LEAST_ONE,
            "You need a <span class='quality-name'>Whirring Contraption</span>",
        )
        .unwrap();
        assert_eq!(&caps["quality"], "Whirring Contraption");

        let caps = match_any(
            &TOOLTIPS_AT_LEAST_ONE,
            "You unlocked this with an <span class='quality-name'>Infernal Contract</span> <em>(you have 7 in all)</em>",
        )
        .unwrap();
        assert_eq!(capture_i64(&caps, "current"), Some(7));

        assert!(match_any(&TOOLTIPS_AT_LEAST_ONE, "You must be someone important.").is_some());
    }

    #[test]
    fn test_minimum_family() {
        let caps = match_any(
            &TOOLTIPS_MINIMUM,
            "You need 5 <span class='quality-name'>Shadowy</span>",
        )
        .unwrap();
        assert_eq!(capture_i64(&caps, "quantity_min"), Some(5));
        assert_eq!(&caps["quality"], "Shadowy");

        let caps = match_any(
            &TOOLTIPS_MINIMUM,
            "You unlocked this with <span class='quality-name'>Shadowy</span> 12 <em>(you needed 10)</em>",
        )
        .unwrap();
        assert_eq!(capture_i64(&caps, "quantity_min"), Some(10));
        assert_eq!(capture_i64(&caps, "current"), Some(12));
    }

    #[test]
    fn test_maximum_family() {
        let caps = match_any(
            &TOOLTIPS_MAXIMUM,
            "You can't do this when you have <span class='quality-name'>Suspicion</span> higher than 10<em> (you have 12)</em>",
        )
        .unwrap();
        assert_eq!(capture_i64(&caps, "quantity_max"), Some(10));
    }

    #[test]
    fn test_exactly_family() {
        let caps = match_any(
            &TOOLTIPS_EXACTLY,
            "You need <span class='quality-name'>A Turncoat</span> exactly 2",
        )
        .unwrap();
        assert_eq!(capture_i64(&caps, "quantity"), Some(2));
    }

    #[test]
    fn test_range_family() {
        let caps = match_any(
            &TOOLTIPS_RANGE,
            "You need <span class='quality-name'>The Airs of London</span> 1-50",
        )
        .unwrap();
        assert_eq!(capture_i64(&caps, "quantity_min"), Some(1));
        assert_eq!(capture_i64(&caps, "quantity_max"), Some(50));

        let caps = match_any(
            &TOOLTIPS_RANGE,
            "You need <span class='quality-name'>The Airs of London</span> 1-50<em> (you have 23)</em>",
        )
        .unwrap();
        assert_eq!(capture_i64(&caps, "current"), Some(23));
    }

    #[test]
    fn test_wordy_family() {
        let text = "Unlocked when <span class='quality-name'>Destiny</span> is:<ul class='wordy-list'><li>the Fire</li><li class='current'><em>the Gleam</em></li></ul>";
        let caps = match_any(&TOOLTIPS_WORDY, text).unwrap();
        let values = wordy_values(&caps["requirements"]);
        assert_eq!(values, vec!["the Fire", "the Gleam"]);
    }

    #[test]
    fn test_wordy_values_unescape() {
        let values = wordy_values(r#"<li>a \"quoted\" state</li>"#);
        assert_eq!(values, vec![r#"a "quoted" state"#]);
    }

    #[test]
    fn test_gain_family() {
        let caps = match_any(&QUALITY_GAIN, "You've gained 2 x Clue.").unwrap();
        assert_eq!(capture_i64(&caps, "quantity"), Some(2));
        assert_eq!(&caps["quality"], "Clue");

        let caps =
            match_any(&QUALITY_GAIN, "You've gained 3 x Rostygold (new total 211).").unwrap();
        assert_eq!(capture_i64(&caps, "quantity"), Some(3));
        assert_eq!(&caps["quality"], "Rostygold");
        assert_eq!(&caps["new_state"], "211");

        assert!(match_any(&QUALITY_GAIN, "You now have 4 x Souls.").is_some());
    }

    #[test]
    fn test_loss_family() {
        let caps = match_any(&QUALITY_LOSS, "You've lost 1 x Rostygold (new total 208).").unwrap();
        assert_eq!(capture_i64(&caps, "quantity"), Some(1));
    }

    #[test]
    fn test_set_families() {
        assert!(match_any(&QUALITY_SET_ZERO, "Your 'Nightmares' Quality has gone!").is_some());
        assert!(match_any(
            &QUALITY_SET_ZERO,
            "'A Name Whispered in Darkness' has been reset: a conclusion, or a new beginning?"
        )
        .is_some());

        let caps = match_any(
            &QUALITY_SET_TO,
            "An occurrence! Your 'Wounds' Quality is now 3!",
        )
        .unwrap();
        assert_eq!(capture_i64(&caps, "quantity"), Some(3));
    }

    #[test]
    fn test_anchored_matching() {
        // A prefix match must not count: patterns are anchored at both ends.
        assert!(match_any(
            &TOOLTIPS_MINIMUM,
            "You need 5 <span class='quality-name'>Shadowy</span> and something else"
        )
        .is_none());
    }
}
