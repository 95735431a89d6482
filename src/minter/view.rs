//! Render targets driven by the controller.
//!
//! The controller decides *what* each target shows; a `View` only puts it on
//! screen. `TerminalView` is the CLI implementation.

use std::fmt;

/// Text elements the controller writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    /// `"<n> / <max> minted"`.
    Supply,
    /// `"connected as: 0x1234...abcd"` or `"not connected"`.
    Address,
    /// Unit price line written by the price query.
    Price,
}

/// Containers toggled between hidden and visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    /// Connect prompt, shown only while disconnected.
    Connect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    Hidden,
    Table,
}

pub trait View {
    fn set_text(&mut self, element: Element, text: &str);

    fn set_display(&mut self, panel: Panel, display: Display);

    /// Blocking notice for the user.
    fn alert(&mut self, message: &str);
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Element::Supply => "supply",
            Element::Address => "address",
            Element::Price => "price",
        };
        f.write_str(name)
    }
}

/// Writes render updates to stdout and alerts to stderr.
#[derive(Debug)]
pub struct TerminalView {
    /// Print text updates; off when the caller prints its own output.
    echo: bool,
    connect_prompt_visible: bool,
}

impl TerminalView {
    pub fn new() -> Self {
        Self {
            echo: true,
            connect_prompt_visible: false,
        }
    }

    /// A view that only shows alerts.
    pub fn quiet() -> Self {
        Self {
            echo: false,
            connect_prompt_visible: false,
        }
    }
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for TerminalView {
    fn set_text(&mut self, element: Element, text: &str) {
        if self.echo {
            println!("[{}] {}", element, text);
        }
    }

    fn set_display(&mut self, panel: Panel, display: Display) {
        let visible = display != Display::Hidden;
        match panel {
            Panel::Connect => {
                if self.echo && visible && !self.connect_prompt_visible {
                    println!("Type `connect` to connect your wallet.");
                }
                self.connect_prompt_visible = visible;
            }
        }
    }

    fn alert(&mut self, message: &str) {
        eprintln!("!! {}", message);
    }
}
