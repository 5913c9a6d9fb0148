//! Hooks mixer poll descriptors into the GLib main loop.

use crate::error::Error;
use crate::mixer::{Interest, MixerSession};

use glib::{Continue, IOCondition, SourceId};
use tracing::{debug, warn};

use std::rc::Rc;

fn condition(interest: Interest) -> IOCondition {
    let mut cond = IOCondition::empty();
    if interest.read {
        cond |= IOCondition::IN;
    }
    if interest.write {
        cond |= IOCondition::OUT;
    }
    if interest.priority {
        cond |= IOCondition::PRI;
    }
    cond
}

/// Owns the main loop sources of one mixer session
///
/// The sources go away with the dispatcher, so drop it before the session.
#[derive(Default)]
pub struct Dispatcher {
    sources: Vec<SourceId>,
}

impl Dispatcher {
    pub fn attach(session: Rc<MixerSession>) -> Result<Self, Error> {
        let descriptors = session.poll_descriptors()?;
        let mut sources = Vec::with_capacity(descriptors.len());

        for pd in descriptors {
            let session = session.clone();
            let id = glib::source::unix_fd_add_local(pd.fd, condition(pd.interest), move |_, _| {
                if let Err(e) = session.handle_events() {
                    warn!("{}: failed to handle mixer events: {}", session.info().id, e);
                }
                Continue(true)
            });
            sources.push(id);
        }

        debug!("Watching {} descriptors", sources.len());
        Ok(Self { sources })
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        for id in self.sources.drain(..) {
            glib::source_remove(id);
        }
    }
}
