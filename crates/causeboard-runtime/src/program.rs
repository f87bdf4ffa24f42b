#![forbid(unsafe_code)]

//! Elm-style model and command types.
//!
//! The program runtime manages the update/view loop. It separates state
//! (Model) from rendering (View) and provides a command pattern for side
//! effects.
//!
//! # Example
//!
//! ```
//! use causeboard_core::input::InputEvent;
//! use causeboard_render::{Document, Node, RegionId};
//! use causeboard_runtime::program::{Cmd, Model};
//!
//! struct Echo {
//!     last: String,
//! }
//!
//! enum Msg {
//!     Search(String),
//!     Ignore,
//! }
//!
//! impl From<InputEvent> for Msg {
//!     fn from(event: InputEvent) -> Self {
//!         match event {
//!             InputEvent::Search(text) => Msg::Search(text),
//!             _ => Msg::Ignore,
//!         }
//!     }
//! }
//!
//! impl Model for Echo {
//!     type Message = Msg;
//!
//!     fn update(&mut self, msg: Msg) -> Cmd<Msg> {
//!         if let Msg::Search(text) = msg {
//!             self.last = text;
//!         }
//!         Cmd::none()
//!     }
//!
//!     fn view(&self, doc: &mut Document) {
//!         doc.set_region(RegionId::CauseList, [Node::text(self.last.clone())]);
//!     }
//! }
//! ```

use causeboard_core::input::InputEvent;
use causeboard_render::{Document, HostEffect};

use crate::subscription::Subscription;

/// The Model trait defines page state and behavior.
pub trait Model {
    /// The message type for this model.
    ///
    /// Messages represent actions that update the model state. Host input
    /// converts into them directly.
    type Message: From<InputEvent> + 'static;

    /// Initialize the model with startup commands.
    ///
    /// Called once, before the first frame.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// Update the model in response to a message.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Write the current state into a fresh document.
    ///
    /// Must be pure: the runtime may call it at any time and diffs the
    /// result against the previous frame.
    fn view(&self, doc: &mut Document);

    /// Declare active subscriptions.
    ///
    /// Called after each `update()`. The runtime compares the returned set
    /// (by `SubId`) against currently running subscriptions, starting new
    /// ones and cancelling the rest.
    fn subscriptions(&self) -> Vec<Box<dyn Subscription<Self::Message>>> {
        vec![]
    }
}

/// Commands represent side effects to be executed by the runtime.
#[derive(Default)]
pub enum Cmd<M> {
    /// No operation.
    #[default]
    None,
    /// Execute several commands in order.
    Batch(Vec<Cmd<M>>),
    /// Send a message to the model.
    Msg(M),
    /// Surface a log line to the host.
    Log(String),
    /// Queue a one-shot host action for the next frame.
    Effect(HostEffect),
}

impl<M: std::fmt::Debug> std::fmt::Debug for Cmd<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Batch(cmds) => f.debug_tuple("Batch").field(cmds).finish(),
            Self::Msg(m) => f.debug_tuple("Msg").field(m).finish(),
            Self::Log(s) => f.debug_tuple("Log").field(s).finish(),
            Self::Effect(e) => f.debug_tuple("Effect").field(e).finish(),
        }
    }
}

impl<M> Cmd<M> {
    /// Create a no-op command.
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    /// Create a message command.
    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    /// Create a log command.
    #[inline]
    pub fn log(msg: impl Into<String>) -> Self {
        Self::Log(msg.into())
    }

    /// Create a host effect command.
    #[inline]
    pub fn effect(effect: HostEffect) -> Self {
        Self::Effect(effect)
    }

    /// Create a batch of commands, dropping no-ops.
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or_default(),
            _ => Self::Batch(cmds),
        }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Return a stable name for tracing.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Batch(_) => "Batch",
            Self::Msg(_) => "Msg",
            Self::Log(_) => "Log",
            Self::Effect(_) => "Effect",
        }
    }

    /// Number of leaf commands, counting through nested batches.
    pub fn count(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Batch(cmds) => cmds.iter().map(Self::count).sum(),
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use causeboard_core::input::FormKind;

    #[derive(Debug, PartialEq)]
    struct Msg(u8);

    #[test]
    fn batch_collapses_trivial_cases() {
        assert!(Cmd::<Msg>::batch(vec![]).is_none());
        assert!(Cmd::<Msg>::batch(vec![Cmd::none(), Cmd::none()]).is_none());
        match Cmd::batch(vec![Cmd::none(), Cmd::msg(Msg(1))]) {
            Cmd::Msg(Msg(1)) => {}
            other => panic!("expected single Msg, got {other:?}"),
        }
        let cmd = Cmd::batch(vec![Cmd::msg(Msg(1)), Cmd::log("x")]);
        assert_eq!(cmd.type_name(), "Batch");
        assert_eq!(cmd.count(), 2);
    }

    #[test]
    fn count_walks_nested_batches() {
        let cmd: Cmd<Msg> = Cmd::Batch(vec![
            Cmd::log("a"),
            Cmd::Batch(vec![
                Cmd::effect(HostEffect::ShowModal),
                Cmd::effect(HostEffect::ResetForm {
                    form: FormKind::Donate,
                }),
            ]),
            Cmd::None,
        ]);
        assert_eq!(cmd.count(), 3);
    }

    #[test]
    fn debug_names_variants() {
        let cmd: Cmd<Msg> = Cmd::log("hello");
        assert_eq!(format!("{cmd:?}"), "Log(\"hello\")");
        assert_eq!(format!("{:?}", Cmd::<Msg>::none()), "None");
    }
}
