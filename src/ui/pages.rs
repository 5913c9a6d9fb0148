use glib::object::IsA;
use gtk::{prelude::*, Justification, Label, Notebook, PositionType, Widget};

/// The notebook holding one tab per sound card
pub struct Pages {
    inner: Notebook,
    labels: Vec<Label>,
}

impl Pages {
    pub fn new() -> Self {
        let inner = Notebook::new();
        inner.set_scrollable(true);
        inner.set_tab_pos(PositionType::Top);
        inner.set_show_border(false);
        Self {
            inner,
            labels: Vec::new(),
        }
    }

    pub fn widget(&self) -> &Notebook {
        &self.inner
    }

    /// Append a page and return its position
    pub fn append<T: IsA<Widget>>(&mut self, label: &str, child: &T) -> u32 {
        let label = Label::new(Some(label));
        label.set_justify(Justification::Left);
        let pos = self.inner.append_page(child, Some(&label));
        self.labels.push(label);
        pos
    }

    /// Change the tab label of the page at `pos`
    pub fn set_label(&self, pos: u32, text: &str) {
        if let Some(label) = self.labels.get(pos as usize) {
            label.set_text(text);
        }
    }

    /// Position of the current page
    pub fn current(&self) -> Option<u32> {
        self.inner.get_current_page()
    }
}
