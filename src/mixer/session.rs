//! An open mixer on one sound card and the controls watching it.

use super::{AlsaElement, CardId};
use crate::error::Error;

use alsa::mixer::{Mixer, Selem};
use alsa::poll::Descriptors;
use alsa::Ctl;
use tracing::{debug, warn};

use std::cell::RefCell;
use std::os::unix::io::RawFd;
use std::rc::Rc;

/// Something that re-reads the device and updates what it shows
///
/// Refreshing never writes to the device, so it is safe to call at any
/// time and as often as needed.
pub trait Refresh {
    fn refresh(&self) -> Result<(), Error>;
}

/// Controls to refresh after the mixer reported changes
#[derive(Default)]
pub struct Observers {
    list: RefCell<Vec<Rc<dyn Refresh>>>,
}

impl Observers {
    #[cfg(test)]
    pub fn register(&self, observer: Rc<dyn Refresh>) {
        self.list.borrow_mut().push(observer);
    }

    pub fn register_all(&self, pending: PendingObservers) {
        self.list.borrow_mut().extend(pending.0);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.list.borrow().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.list.borrow().is_empty()
    }

    /// Refresh every observer in registration order
    pub fn notify(&self) {
        // an observer may register more while being refreshed
        let list = self.list.borrow().clone();
        for observer in list {
            if let Err(e) = observer.refresh() {
                warn!("Refresh failed: {}", e);
            }
        }
    }
}

/// Observers of a control that is still being built
///
/// Nothing is refreshed until the batch is handed to
/// [`MixerSession::register_all`]. Dropping it registers nothing.
#[derive(Default)]
pub struct PendingObservers(Vec<Rc<dyn Refresh>>);

impl PendingObservers {
    pub fn add(&mut self, observer: Rc<dyn Refresh>) {
        self.0.push(observer);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardInfo {
    pub id: CardId,
    pub name: String,
    pub mixer_name: String,
}

/// Which readiness conditions a poll descriptor waits for
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Interest {
    pub read: bool,
    pub write: bool,
    pub priority: bool,
}

impl Interest {
    pub fn from_events(events: libc::c_short) -> Self {
        Self {
            read: events & libc::POLLIN != 0,
            write: events & libc::POLLOUT != 0,
            priority: events & libc::POLLPRI != 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollDescriptor {
    pub fd: RawFd,
    pub interest: Interest,
}

pub struct MixerSession {
    info: CardInfo,
    mixer: Rc<Mixer>,
    observers: Observers,
}

impl MixerSession {
    /// Read the card's identity, then open and load its mixer
    pub fn open(card_id: &str) -> Result<Self, Error> {
        let info = {
            let ctl = Ctl::new(card_id, false)?;
            let card = ctl.card_info()?;
            CardInfo {
                id: card_id.to_owned(),
                name: card.get_name()?.to_owned(),
                mixer_name: card.get_mixername()?.to_owned(),
            }
        };

        let mixer = Mixer::new(card_id, false)?;
        debug!("Opened mixer {} on {} ({})", info.mixer_name, info.name, info.id);

        Ok(Self {
            info,
            mixer: Rc::new(mixer),
            observers: Observers::default(),
        })
    }

    pub fn info(&self) -> &CardInfo {
        &self.info
    }

    /// All simple elements, in mixer order
    pub fn elements(&self) -> Vec<AlsaElement> {
        let mut elements = Vec::new();
        for elem in self.mixer.iter() {
            let selem = match Selem::new(elem) {
                Some(selem) => selem,
                None => continue,
            };
            match AlsaElement::new(self.mixer.clone(), &selem) {
                Ok(element) => elements.push(element),
                Err(e) => warn!("{}: skipping unreadable element: {}", self.info.id, e),
            }
        }
        elements
    }

    pub fn poll_descriptors(&self) -> Result<Vec<PollDescriptor>, Error> {
        let fds = Descriptors::get(self.mixer.as_ref())?;
        Ok(fds
            .into_iter()
            .map(|pfd| PollDescriptor {
                fd: pfd.fd,
                interest: Interest::from_events(pfd.events),
            })
            .collect())
    }

    /// Start refreshing a fully built control's observers
    pub fn register_all(&self, pending: PendingObservers) {
        self.observers.register_all(pending);
    }

    /// Pump pending mixer events, then refresh every registered control
    pub fn handle_events(&self) -> Result<(), Error> {
        let count = self.mixer.handle_events()?;
        debug!("{}: handled {} mixer events", self.info.id, count);
        self.observers.notify();
        Ok(())
    }
}
