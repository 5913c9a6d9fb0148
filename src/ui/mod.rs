//! gamix GTK UI module

mod mixer;
mod pages;
mod props;
mod slider;
mod toggle;
mod utils;
mod window;

pub use window::MixerWindow;
