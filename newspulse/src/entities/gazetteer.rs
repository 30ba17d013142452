//! Rule based recognizer: capitalized runs of tokens are matched, longest
//! first, against gazetteers and organisation/event naming patterns.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use super::{Entity, EntityLabel, EntityRecognizer};

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9]+(?:['’.&\-][A-Za-z0-9]+)*").expect("static regex"));

const GPE: &[&str] = &[
    "U.S", "US", "USA", "United States", "America", "UK", "U.K", "United Kingdom", "Britain",
    "England", "EU", "Europe", "China", "India", "Japan", "Germany", "France", "Italy", "Spain",
    "Canada", "Mexico", "Brazil", "Russia", "Ukraine", "Israel", "Iran", "Saudi Arabia",
    "South Korea", "Korea", "Taiwan", "Hong Kong", "Singapore", "Australia", "Indonesia",
    "Vietnam", "Turkey", "Netherlands", "Switzerland", "Sweden", "Norway", "Ireland", "Poland",
    "South Africa", "Nigeria", "Egypt", "Argentina", "UAE", "Qatar", "Pakistan", "Bangladesh",
    "California", "Texas", "New York", "Florida", "Nevada", "Washington", "Michigan", "Ohio",
    "Arizona", "Massachusetts", "London", "Paris", "Berlin", "Tokyo", "Beijing", "Shanghai",
    "Shenzhen", "Mumbai", "Delhi", "New Delhi", "Bengaluru", "Bangalore", "Seoul", "Dubai",
    "San Francisco", "Los Angeles", "Seattle", "Austin", "Chicago", "Boston", "Toronto",
    "Sydney", "Brussels", "Frankfurt", "Zurich", "Cupertino", "Redmond",
];

const ORG: &[&str] = &[
    "Tesla", "Apple", "Microsoft", "Google", "Alphabet", "Amazon", "AWS", "Nvidia", "Meta",
    "Facebook", "Instagram", "WhatsApp", "OpenAI", "Anthropic", "Intel", "AMD", "IBM",
    "Oracle", "Samsung", "Sony", "Netflix", "Uber", "Lyft", "SpaceX", "Twitter", "Reuters",
    "Bloomberg", "CNBC", "BBC", "Ford", "GM", "General Motors", "Toyota", "BYD", "Rivian",
    "Lucid", "Volkswagen", "Boeing", "Airbus", "Walmart", "Disney", "Qualcomm", "TSMC", "Arm",
    "Broadcom", "Salesforce", "Adobe", "Spotify", "Alibaba", "Tencent", "Baidu", "Huawei",
    "Xiaomi", "Fed", "Federal Reserve", "SEC", "FTC", "FDA", "Nasdaq", "NYSE", "Wall Street",
    "Goldman Sachs", "JPMorgan", "JPMorgan Chase", "Morgan Stanley", "Bank of America",
    "Citigroup", "Berkshire Hathaway", "BlackRock", "European Commission", "White House",
    "Congress", "Senate", "Pentagon", "NASA", "Tata", "Reliance", "Infosys",
];

const PRODUCT: &[&str] = &[
    "iPhone", "iPad", "MacBook", "MacBook Pro", "MacBook Air", "Mac", "Apple Watch",
    "Vision Pro", "AirPods", "Windows", "Android", "Azure", "Copilot", "ChatGPT", "GPT-4",
    "GPT-4o", "GPT-5", "Gemini", "Claude", "Pixel", "Chrome", "Model 3", "Model S", "Model X",
    "Model Y", "Cybertruck", "Autopilot", "Full Self-Driving", "FSD", "Optimus", "Kindle",
    "Alexa", "Prime Video", "Xbox", "PlayStation", "GeForce", "RTX", "Blackwell", "H100",
    "H200", "A100", "CUDA", "Galaxy", "Starlink",
];

const EVENT: &[&str] = &[
    "CES", "WWDC", "Olympics", "World Cup", "Black Friday", "Cyber Monday", "Prime Day",
    "Davos", "Super Bowl", "Computex", "Google I/O", "Mobile World Congress", "Brexit",
];

const PERSON: &[&str] = &[
    "Elon Musk", "Musk", "Tim Cook", "Satya Nadella", "Sundar Pichai", "Jeff Bezos",
    "Andy Jassy", "Jensen Huang", "Sam Altman", "Mark Zuckerberg", "Zuckerberg",
    "Warren Buffett", "Donald Trump", "Trump", "Joe Biden", "Biden", "Narendra Modi", "Modi",
    "Jerome Powell", "Powell", "Lisa Su", "Bill Gates",
];

const ORG_SUFFIXES: &[&str] = &[
    "inc", "corp", "corporation", "co", "company", "ltd", "llc", "plc", "group", "holdings",
    "technologies", "technology", "motors", "bank", "capital", "partners", "labs", "systems",
    "airlines", "industries", "pharmaceuticals", "association", "institute", "university",
    "agency", "commission", "authority", "ventures", "foundation", "networks", "semiconductor",
    "automotive", "media",
];

const ORG_PREFIXES: &[&str] = &["bank", "university", "department", "ministry", "bureau", "board"];

const EVENT_SUFFIXES: &[&str] = &[
    "summit", "conference", "expo", "olympics", "cup", "festival", "election", "elections",
    "awards", "games", "forum", "week", "war",
];

/// Uppercase words that are common nouns in business news, not organisations.
const ACRONYM_STOPLIST: &[&str] = &[
    "CEO", "CFO", "CTO", "COO", "AI", "EV", "EVS", "IPO", "GPU", "GPUS", "CPU", "ETF", "TV",
    "PM", "AM", "OK", "Q1", "Q2", "Q3", "Q4", "FY", "YOY", "NEWS", "LIVE", "NEW", "THE", "AND",
    "UPDATE", "WATCH",
];

/// Recognizer backed by static word lists; needs no model files.
pub struct GazetteerRecognizer {
    lookup: HashMap<String, EntityLabel>,
    name_rules: bool,
}

impl GazetteerRecognizer {
    pub fn new() -> Self {
        let mut lookup = HashMap::new();
        for (list, label) in [
            (PERSON, EntityLabel::Person),
            (EVENT, EntityLabel::Event),
            (PRODUCT, EntityLabel::Product),
            (ORG, EntityLabel::Org),
            (GPE, EntityLabel::Gpe),
        ] {
            for name in list {
                lookup.insert(name.to_lowercase(), label);
            }
        }
        Self { lookup, name_rules: true }
    }

    /// Recognizer that knows only the names added with `with_entry`; the
    /// suffix and acronym rules are off.
    pub fn names_only() -> Self {
        Self { lookup: HashMap::new(), name_rules: false }
    }

    /// Add or relabel a name, e.g. the company being analysed.
    pub fn with_entry(mut self, name: &str, label: EntityLabel) -> Self {
        self.lookup.insert(name.to_lowercase(), label);
        self
    }

    fn classify(&self, tokens: &[&str]) -> Option<EntityLabel> {
        let joined = tokens.join(" ");
        if let Some(label) = self.lookup.get(&joined.to_lowercase()) {
            return Some(*label);
        }
        if !self.name_rules {
            return None;
        }

        let first = tokens.first()?.to_lowercase();
        let last = tokens.last()?.trim_end_matches('.').to_lowercase();

        if tokens.len() > 1 && tokens.iter().all(|t| is_capitalized(t)) {
            if ORG_SUFFIXES.contains(&last.as_str()) {
                return Some(EntityLabel::Org);
            }
            if EVENT_SUFFIXES.contains(&last.as_str()) {
                return Some(EntityLabel::Event);
            }
        }
        if tokens.len() > 2 && tokens[1] == "of" && ORG_PREFIXES.contains(&first.as_str()) {
            return Some(EntityLabel::Org);
        }
        if tokens.len() == 1 && is_acronym(tokens[0]) {
            return Some(EntityLabel::Org);
        }
        None
    }
}

impl Default for GazetteerRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_acronym(token: &str) -> bool {
    (2..=5).contains(&token.len())
        && token.chars().all(|c| c.is_ascii_uppercase())
        && !ACRONYM_STOPLIST.contains(&token)
}

fn is_capitalized(token: &str) -> bool {
    token.chars().any(|c| c.is_uppercase())
}

fn strip_possessive(token: &str) -> Option<&str> {
    token.strip_suffix("'s").or_else(|| token.strip_suffix("’s"))
}

fn flush<'a>(current: &mut Vec<&'a str>, runs: &mut Vec<Vec<&'a str>>) {
    while current.last() == Some(&"of") {
        current.pop();
    }
    if !current.is_empty() {
        runs.push(std::mem::take(current));
    }
}

/// Maximal runs of capitalized tokens separated only by whitespace. `of` and
/// numbers may continue a run but never start one, and a run never ends on
/// `of`. A possessive closes the run it belongs to.
fn capitalized_runs(text: &str) -> Vec<Vec<&str>> {
    let mut runs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut last_end = 0;

    for m in TOKEN.find_iter(text) {
        let token = m.as_str();
        let contiguous = text[last_end..m.start()].chars().all(char::is_whitespace);
        last_end = m.end();

        if !contiguous {
            flush(&mut current, &mut runs);
        }

        if let Some(stem) = strip_possessive(token) {
            if is_capitalized(stem) {
                current.push(stem);
            }
            flush(&mut current, &mut runs);
            continue;
        }

        let continues = !current.is_empty()
            && (token == "of" || token.chars().all(|c| c.is_ascii_digit()));
        if is_capitalized(token) || continues {
            current.push(token);
        } else {
            flush(&mut current, &mut runs);
        }
    }
    flush(&mut current, &mut runs);
    runs
}

impl EntityRecognizer for GazetteerRecognizer {
    fn recognize(&self, text: &str) -> anyhow::Result<Vec<Entity>> {
        let mut entities = Vec::new();

        for run in capitalized_runs(text) {
            let mut start = 0;
            while start < run.len() {
                if !is_capitalized(run[start]) {
                    start += 1;
                    continue;
                }
                let found = (start + 1..=run.len())
                    .rev()
                    .find_map(|end| self.classify(&run[start..end]).map(|label| (end, label)));
                match found {
                    Some((end, label)) => {
                        entities.push(Entity { text: run[start..end].join(" "), label });
                        start = end;
                    }
                    None => start += 1,
                }
            }
        }

        Ok(entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labelled(text: &str) -> Vec<(String, EntityLabel)> {
        GazetteerRecognizer::new()
            .recognize(text)
            .unwrap()
            .into_iter()
            .map(|e| (e.text, e.label))
            .collect()
    }

    #[test]
    fn finds_gazetteer_entries_inside_headline_case() {
        let found = labelled("Tesla Model Y Sales Slump In China As BYD Gains");
        assert!(found.contains(&("Tesla".to_string(), EntityLabel::Org)));
        assert!(found.contains(&("Model Y".to_string(), EntityLabel::Product)));
        assert!(found.contains(&("China".to_string(), EntityLabel::Gpe)));
        assert!(found.contains(&("BYD".to_string(), EntityLabel::Org)));
    }

    #[test]
    fn handles_possessives_and_people() {
        let found = labelled("Apple's iPhone event: Tim Cook says the U.S. market is strong.");
        assert_eq!(
            found,
            vec![
                ("Apple".to_string(), EntityLabel::Org),
                ("iPhone".to_string(), EntityLabel::Product),
                ("Tim Cook".to_string(), EntityLabel::Person),
                ("U.S".to_string(), EntityLabel::Gpe),
            ]
        );
    }

    #[test]
    fn naming_patterns_detect_unknown_organisations_and_events() {
        let found = labelled("Shares of Acme Robotics Inc jumped before the Future Mobility Summit");
        assert!(found.contains(&("Acme Robotics Inc".to_string(), EntityLabel::Org)));
        assert!(found.contains(&("Future Mobility Summit".to_string(), EntityLabel::Event)));
        assert!(!found.iter().any(|(t, _)| t == "Shares"));
    }

    #[test]
    fn bank_of_pattern_and_acronyms() {
        let found = labelled("Analysts at Bank of Montreal and UBS cut targets, says the CEO");
        assert!(found.contains(&("Bank of Montreal".to_string(), EntityLabel::Org)));
        assert!(found.contains(&("UBS".to_string(), EntityLabel::Org)));
        assert!(!found.iter().any(|(t, _)| t == "CEO"));
    }

    #[test]
    fn punctuation_splits_runs() {
        let found = labelled("Microsoft, Google and Amazon");
        let names: Vec<_> = found.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(names, vec!["Microsoft", "Google", "Amazon"]);
    }

    #[test]
    fn custom_entries_are_recognized() {
        let rec = GazetteerRecognizer::new().with_entry("Zypher Dynamics", EntityLabel::Org);
        let found = rec.recognize("Zypher Dynamics expands").unwrap();
        assert_eq!(found[0].text, "Zypher Dynamics");
        assert_eq!(found[0].label, EntityLabel::Org);
    }

    #[test]
    fn names_only_knows_just_its_entries() {
        let rec = GazetteerRecognizer::names_only().with_entry("zomato", EntityLabel::Org);
        let found = rec.recognize("Zomato shares jump after NASA and Acme Corp report").unwrap();
        assert_eq!(found, vec![Entity { text: "Zomato".to_string(), label: EntityLabel::Org }]);
    }
}
