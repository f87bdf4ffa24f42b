#![forbid(unsafe_code)]

//! Form feedback.
//!
//! A submit always succeeds: it queues one toast, asks the host to reset
//! the form, and for donations also launches one floating heart. The host
//! suppresses default navigation before forwarding the submit.

use causeboard_core::input::FormKind;

use crate::config::Messages;

/// A visible acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    id: u64,
    message: String,
}

impl Toast {
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Side effects one submit asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    pub form: FormKind,
    pub toast_id: u64,
    pub spawn_heart: bool,
}

/// Live toasts, oldest first.
#[derive(Debug, Clone, Default)]
pub struct FormFeedback {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl FormFeedback {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one submit of `form`.
    pub fn submit(&mut self, form: FormKind, messages: &Messages) -> Submission {
        let message = match form {
            FormKind::Volunteer => &messages.volunteer,
            FormKind::Donate => &messages.donate,
        };
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            message: message.clone(),
        });
        tracing::debug!(form = form.element_id(), toast_id = id, "form submitted");
        Submission {
            form,
            toast_id: id,
            spawn_heart: form == FormKind::Donate,
        }
    }

    /// Drop toast `id`. Returns whether it was still up.
    pub fn expire(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    #[must_use]
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn donate_asks_for_one_heart() {
        let mut forms = FormFeedback::new();
        let messages = Messages::default();
        let sub = forms.submit(FormKind::Donate, &messages);
        assert!(sub.spawn_heart);
        assert_eq!(forms.toasts().len(), 1);
        assert_eq!(forms.toasts()[0].message(), "💖 Thank you for your donation!");

        let sub = forms.submit(FormKind::Volunteer, &messages);
        assert!(!sub.spawn_heart);
        assert_eq!(sub.toast_id, 1);
        assert_eq!(forms.toasts().len(), 2);
    }

    #[test]
    fn expire_removes_only_that_toast() {
        let mut forms = FormFeedback::new();
        let messages = Messages::default();
        let a = forms.submit(FormKind::Volunteer, &messages).toast_id;
        let b = forms.submit(FormKind::Volunteer, &messages).toast_id;
        assert!(forms.expire(a));
        assert!(!forms.expire(a));
        assert_eq!(forms.toasts().iter().map(Toast::id).collect::<Vec<_>>(), [b]);
    }
}
