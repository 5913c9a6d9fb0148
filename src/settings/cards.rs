use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Remember how each sound card's page was customised
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CardSettings {
    /// Preferences by card config name
    pub known: BTreeMap<String, CardPrefs>,
}

/// Encoding information about a single sound card
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardPrefs {
    /// Tab label to show instead of the card name
    pub display_name: Option<String>,
    /// Config names of controls not shown on the page
    pub hidden: BTreeSet<String>,
}

impl CardSettings {
    pub fn prefs(&self, card: &str) -> Option<&CardPrefs> {
        self.known.get(card)
    }

    pub fn prefs_mut(&mut self, card: &str) -> &mut CardPrefs {
        self.known.entry(card.to_owned()).or_default()
    }
}
