//! Turns a flat `application/x-www-form-urlencoded` submission into an
//! [`AllocationForm`].
//!
//! Field names the decoder understands:
//!
//! - `agents`, repeated once per agent
//! - `chores`, repeated once per chore
//! - `cost_values[<agent>][<chore>]` or `dislike_values[<agent>][<chore>]`,
//!   depending on the configured [`RatingKind`]
//!
//! Anything else is ignored. Order, duplicates and empty strings in the
//! agent and chore lists are kept exactly as submitted.

use crate::domain::model::{AllocationForm, RatingKind, RatingMatrix, NEUTRAL_RATING};
use regex::Regex;
use std::sync::LazyLock;

pub const AGENTS_FIELD: &str = "agents";
pub const CHORES_FIELD: &str = "chores";
pub const NEW_AGENT_FIELD: &str = "new_agent";
pub const NEW_CHORE_FIELD: &str = "new_chore";
pub const REMOVE_AGENT_FIELD: &str = "remove_agent";
pub const REMOVE_CHORE_FIELD: &str = "remove_chore";

// 只錨定開頭，尾巴多出來的字元不影響匹配
static RATING_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(cost_values|dislike_values)\[(.+?)\]\[(.+?)\]")
        .expect("rating field pattern is valid")
});

/// Decodes a raw urlencoded request body.
pub fn decode_urlencoded(body: &[u8], kind: RatingKind) -> AllocationForm {
    decode_pairs(url::form_urlencoded::parse(body), kind)
}

/// Decodes already-split name/value pairs. Pure: the same pairs always give the same form.
pub fn decode_pairs<I, K, V>(pairs: I, kind: RatingKind) -> AllocationForm
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let prefix = kind.field_name();
    let mut form = AllocationForm {
        ratings: prefix.map(|_| RatingMatrix::new()),
        ..AllocationForm::default()
    };

    for (name, value) in pairs {
        let (name, value) = (name.as_ref(), value.as_ref());

        match name {
            AGENTS_FIELD => form.agents.push(value.to_string()),
            CHORES_FIELD => form.chores.push(value.to_string()),
            _ => {
                let (Some(prefix), Some(matrix)) = (prefix, form.ratings.as_mut()) else {
                    continue;
                };
                if let Some((agent, chore)) = parse_rating_field(name, prefix) {
                    matrix
                        .entry(agent.to_string())
                        .or_default()
                        .insert(chore.to_string(), parse_rating(value));
                }
            }
        }
    }

    form
}

/// Add and remove requests coming from the list editor buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListEdits {
    pub new_agents: Vec<String>,
    pub new_chores: Vec<String>,
    pub remove_agent: Option<usize>,
    pub remove_chore: Option<usize>,
}

impl ListEdits {
    /// Removals first, then additions. Blank names are not added and
    /// ratings for names no longer listed are dropped.
    pub fn apply(self, form: &mut AllocationForm) {
        let AllocationForm {
            agents,
            chores,
            ratings,
        } = form;

        if let Some(index) = self.remove_agent.filter(|i| *i < agents.len()) {
            agents.remove(index);
        }
        if let Some(index) = self.remove_chore.filter(|i| *i < chores.len()) {
            chores.remove(index);
        }

        agents.extend(self.new_agents);
        chores.extend(self.new_chores);

        if let Some(matrix) = ratings.as_mut() {
            matrix.retain(|agent, _| agents.contains(agent));
            for row in matrix.values_mut() {
                row.retain(|chore, _| chores.contains(chore));
            }
        }
    }
}

pub fn decode_edits<I, K, V>(pairs: I) -> ListEdits
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut edits = ListEdits::default();

    for (name, value) in pairs {
        let value = value.as_ref().trim();
        match name.as_ref() {
            NEW_AGENT_FIELD => edits.new_agents.extend(clean_name(value)),
            NEW_CHORE_FIELD => edits.new_chores.extend(clean_name(value)),
            REMOVE_AGENT_FIELD => edits.remove_agent = value.parse().ok(),
            REMOVE_CHORE_FIELD => edits.remove_chore = value.parse().ok(),
            _ => {}
        }
    }

    edits
}

/// Drops square brackets from a new name so it survives the
/// `prefix[agent][chore]` round trip. Blank results give `None`.
fn clean_name(value: &str) -> Option<String> {
    let name: String = value.chars().filter(|c| !matches!(c, '[' | ']')).collect();
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Decodes a list editor submission and applies its add/remove requests.
pub fn decode_editor_urlencoded(body: &[u8], kind: RatingKind) -> AllocationForm {
    let pairs: Vec<_> = url::form_urlencoded::parse(body).collect();
    let mut form = decode_pairs(pairs.iter().map(|(k, v)| (k, v)), kind);
    decode_edits(pairs.iter().map(|(k, v)| (k, v))).apply(&mut form);
    form
}

/// Splits `prefix[agent][chore]` into `(agent, chore)`. Partial matches give `None`.
pub fn parse_rating_field<'a>(name: &'a str, prefix: &str) -> Option<(&'a str, &'a str)> {
    let caps = RATING_FIELD.captures(name)?;
    if caps.get(1)?.as_str() != prefix {
        return None;
    }
    Some((caps.get(2)?.as_str(), caps.get(3)?.as_str()))
}

/// Integer rating, or [`NEUTRAL_RATING`] when the value does not parse.
pub fn parse_rating(value: &str) -> i64 {
    value.trim().parse().unwrap_or(NEUTRAL_RATING)
}
