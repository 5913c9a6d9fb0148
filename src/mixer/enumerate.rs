use super::CardId;

use alsa::Ctl;
use tracing::debug;

/// ALSA never numbers cards past this
const MAX_CARDS: u32 = 32;

/// Collect `hw:N` ids for as long as `open` succeeds
pub fn probe_cards<F: FnMut(&str) -> bool>(mut open: F) -> Vec<CardId> {
    let mut cards = Vec::new();
    for index in 0..MAX_CARDS {
        let id = format!("hw:{}", index);
        if !open(&id) {
            debug!("No card at {}, stopping", id);
            break;
        }
        cards.push(id);
    }
    cards
}

/// Sound cards present on this system
pub fn hw_cards() -> Vec<CardId> {
    probe_cards(|id| match Ctl::new(id, false) {
        Ok(_) => true,
        Err(e) => {
            debug!("{}: {}", id, e);
            false
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probing_stops_at_the_first_gap() {
        let cards = probe_cards(|id| id != "hw:2" && id != "hw:4");
        assert_eq!(cards, vec!["hw:0", "hw:1"]);
    }

    #[test]
    fn no_cards() {
        let mut tried = Vec::new();
        let cards = probe_cards(|id| {
            tried.push(id.to_owned());
            false
        });
        assert!(cards.is_empty());
        assert_eq!(tried, vec!["hw:0"]);
    }

    #[test]
    fn probing_is_capped() {
        let cards = probe_cards(|_| true);
        assert_eq!(cards.len(), MAX_CARDS as usize);
        assert_eq!(cards.last().map(String::as_str), Some("hw:31"));
    }
}
