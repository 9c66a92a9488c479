// Field normalization: player-name canonicalization, team code remapping,
// numeric coercion and the name carry-forward fold for markup tables.

use regex::Regex;
use std::sync::LazyLock;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Team abbreviations used by the markup sources, mapped onto the codes the
/// tabular sources use.
pub const TEAM_REMAP: &[(&str, &str)] = &[
    ("LV", "LVR"),
    ("KC", "KAN"),
    ("GB", "GNB"),
    ("TB", "TAM"),
    ("NO", "NOR"),
    ("LA", "LAR"),
    ("NE", "NWE"),
    ("SF", "SFO"),
];

const JR_SUFFIX: &str = " Jr.";

/// The markup sources glue an abbreviated name onto this player's display
/// name in a way the generic steps cannot undo.
static COMPOUND_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(Amon-Ra St Brown).*").expect("compound name pattern is valid")
});

// ---------------------------------------------------------------------------
// Player names
// ---------------------------------------------------------------------------

/// Reduce a player name to its canonical key.
///
/// Trims, removes the literal " Jr." suffix, removes every period and
/// collapses the known compound-name artifact. Applying it to an already
/// canonical key returns the key unchanged.
pub fn canonical_key(name: &str) -> String {
    let without_suffix = name.trim().replace(JR_SUFFIX, "");
    let without_periods = without_suffix.replace('.', "");
    let collapsed = COMPOUND_NAME.replace(&without_periods, "$1");
    collapsed.trim().to_string()
}

/// Undo the display format of the markup sources, where a cell reads like
/// `"Ja'Marr ChaseJ. Chase"`: cut at the last period, then drop the trailing
/// initial the source appends. The result still needs [`canonical_key`].
pub fn strip_markup_display(display: &str) -> String {
    let display = display.trim();
    let truncated = match display.rfind('.') {
        Some(idx) => &display[..idx],
        None => display,
    };
    let mut chars = truncated.chars();
    chars.next_back();
    chars.as_str().to_string()
}

/// Canonical key for a name cell from a markup source.
pub fn markup_key(display: &str) -> String {
    canonical_key(&strip_markup_display(display))
}

// ---------------------------------------------------------------------------
// Carry-forward
// ---------------------------------------------------------------------------

/// One step of the carry-forward fold.
///
/// Takes the last non-blank name seen in the block and the current name
/// cell; returns the updated state and the name this row resolves to. A row
/// with a blank cell and no prior name resolves to `None`.
pub fn carry_forward(last: Option<String>, cell: &str) -> (Option<String>, Option<String>) {
    let cell = cell.trim();
    if cell.is_empty() {
        let resolved = last.clone();
        (last, resolved)
    } else {
        let name = cell.to_string();
        (Some(name.clone()), Some(name))
    }
}

/// Resolve the name cell of every row, threading the carry-forward state
/// through the sequence.
pub fn resolve_names<'a, I>(cells: I) -> Vec<Option<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    cells
        .into_iter()
        .scan(None, |state: &mut Option<String>, cell| {
            let (next, resolved) = carry_forward(state.take(), cell);
            *state = next;
            Some(resolved)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// Map a team abbreviation onto its canonical code. Unknown codes pass
/// through trimmed.
pub fn remap_team(code: &str) -> String {
    let code = code.trim();
    TEAM_REMAP
        .iter()
        .find(|(from, _)| *from == code)
        .map(|(_, to)| (*to).to_string())
        .unwrap_or_else(|| code.to_string())
}

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

/// Result of coercing one text cell to a number.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericCell {
    Value(f64),
    /// Empty cell; a missing value rather than a failure.
    Blank,
    /// Non-empty text that is not a finite number.
    Unparsable(String),
}

impl NumericCell {
    pub fn value(&self) -> Option<f64> {
        match self {
            NumericCell::Value(v) => Some(*v),
            _ => None,
        }
    }
}

/// Strip thousands separators and surrounding whitespace, then parse.
pub fn coerce_numeric(raw: &str) -> NumericCell {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return NumericCell::Blank;
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => NumericCell::Value(v),
        _ => NumericCell::Unparsable(raw.to_string()),
    }
}
