// MLB club code <-> full name table.
//
// Roster exports use short codes; the schedule feed uses full club names.

/// (code, full name) for every club, as the schedule feed names them.
pub const TEAMS: [(&str, &str); 30] = [
    ("ARI", "Arizona Diamondbacks"),
    ("ATH", "Athletics"),
    ("ATL", "Atlanta Braves"),
    ("BAL", "Baltimore Orioles"),
    ("BOS", "Boston Red Sox"),
    ("CHC", "Chicago Cubs"),
    ("CWS", "Chicago White Sox"),
    ("CIN", "Cincinnati Reds"),
    ("CLE", "Cleveland Guardians"),
    ("COL", "Colorado Rockies"),
    ("DET", "Detroit Tigers"),
    ("HOU", "Houston Astros"),
    ("KC", "Kansas City Royals"),
    ("LAA", "Los Angeles Angels"),
    ("LAD", "Los Angeles Dodgers"),
    ("MIA", "Miami Marlins"),
    ("MIL", "Milwaukee Brewers"),
    ("MIN", "Minnesota Twins"),
    ("NYM", "New York Mets"),
    ("NYY", "New York Yankees"),
    ("PHI", "Philadelphia Phillies"),
    ("PIT", "Pittsburgh Pirates"),
    ("SD", "San Diego Padres"),
    ("SF", "San Francisco Giants"),
    ("SEA", "Seattle Mariners"),
    ("STL", "St. Louis Cardinals"),
    ("TB", "Tampa Bay Rays"),
    ("TEX", "Texas Rangers"),
    ("TOR", "Toronto Blue Jays"),
    ("WSH", "Washington Nationals"),
];

/// Alternate abbreviations seen in fantasy platform exports.
const CODE_ALIASES: [(&str, &str); 9] = [
    ("AZ", "ARI"),
    ("OAK", "ATH"),
    ("CHW", "CWS"),
    ("KCR", "KC"),
    ("SDP", "SD"),
    ("SFG", "SF"),
    ("TBR", "TB"),
    ("WSN", "WSH"),
    ("WAS", "WSH"),
];

/// Former feed names that still appear in historical schedules.
const NAME_ALIASES: [(&str, &str); 1] = [("Oakland Athletics", "ATH")];

fn canonical_code(code: &str) -> String {
    let upper = code.trim().to_uppercase();
    CODE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == upper)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(upper)
}

/// Full club name for a roster code, e.g. `"NYY"` -> `"New York Yankees"`.
/// Case-insensitive; accepts the aliases in `CODE_ALIASES`.
pub fn full_name(code: &str) -> Option<&'static str> {
    let code = canonical_code(code);
    TEAMS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Roster code for a full club name as the schedule feed spells it.
pub fn code_for(full_name: &str) -> Option<&'static str> {
    let name = full_name.trim();
    TEAMS
        .iter()
        .find(|(_, n)| n.eq_ignore_ascii_case(name))
        .map(|(code, _)| *code)
        .or_else(|| {
            NAME_ALIASES
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, code)| *code)
        })
}
