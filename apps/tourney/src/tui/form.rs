//! # Modal Forms
//!
//! Editable state behind the floating create/edit dialogs. A form is a list
//! of fields followed by `Save` and `Cancel` buttons; focus moves through
//! all of them in order and wraps at either end.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What the owner of a form should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormAction {
    /// Keep the form open.
    Pending,
    /// Persist the values.
    Submit,
    /// Close without saving.
    Cancel,
}

/// Which part of the form has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormFocus {
    Field(usize),
    Save,
    Cancel,
}

/// Value held by a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FieldValue {
    Text(String),
    Choice {
        options: Vec<&'static str>,
        selected: usize,
    },
}

/// A labelled field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Field {
    pub(crate) label: &'static str,
    pub(crate) value: FieldValue,
}

/// A modal form and its focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Form {
    pub(crate) title: &'static str,
    pub(crate) fields: Vec<Field>,
    /// Outer size of the dialog, in cells.
    pub(crate) width: u16,
    pub(crate) height: u16,
    focus: usize,
}

impl Form {
    pub(crate) fn new(title: &'static str, width: u16, height: u16) -> Self {
        Self {
            title,
            fields: Vec::new(),
            width,
            height,
            focus: 0,
        }
    }

    pub(crate) fn with_text(mut self, label: &'static str, value: impl Into<String>) -> Self {
        self.fields.push(Field {
            label,
            value: FieldValue::Text(value.into()),
        });
        self
    }

    pub(crate) fn with_choice(
        mut self,
        label: &'static str,
        options: Vec<&'static str>,
        selected: usize,
    ) -> Self {
        let selected = selected.min(options.len().saturating_sub(1));
        self.fields.push(Field {
            label,
            value: FieldValue::Choice { options, selected },
        });
        self
    }

    pub(crate) fn focus(&self) -> FormFocus {
        match self.focus.checked_sub(self.fields.len()) {
            None => FormFocus::Field(self.focus),
            Some(0) => FormFocus::Save,
            Some(_) => FormFocus::Cancel,
        }
    }

    /// Current text of field `idx`, or empty if it is not a text field.
    pub(crate) fn text(&self, idx: usize) -> String {
        match self.fields.get(idx).map(|f| &f.value) {
            Some(FieldValue::Text(text)) => text.clone(),
            _ => String::new(),
        }
    }

    /// Selected option of field `idx`, or 0 if it is not a choice field.
    pub(crate) fn choice(&self, idx: usize) -> usize {
        match self.fields.get(idx).map(|f| &f.value) {
            Some(FieldValue::Choice { selected, .. }) => *selected,
            _ => 0,
        }
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        match key.code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Enter => match self.focus() {
                FormFocus::Save => return FormAction::Submit,
                FormFocus::Cancel => return FormAction::Cancel,
                FormFocus::Field(_) => self.focus_next(),
            },
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_prev(),
            KeyCode::Left => self.cycle_choice(false),
            KeyCode::Right => self.cycle_choice(true),
            KeyCode::Backspace => {
                if let Some(FieldValue::Text(text)) = self.focused_value_mut() {
                    text.pop();
                }
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                if let Some(FieldValue::Text(text)) = self.focused_value_mut() {
                    text.push(c);
                }
            }
            _ => {}
        }
        FormAction::Pending
    }

    fn slots(&self) -> usize {
        self.fields.len() + 2
    }

    fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.slots();
    }

    fn focus_prev(&mut self) {
        self.focus = (self.focus + self.slots() - 1) % self.slots();
    }

    fn focused_value_mut(&mut self) -> Option<&mut FieldValue> {
        self.fields.get_mut(self.focus).map(|f| &mut f.value)
    }

    fn cycle_choice(&mut self, forward: bool) {
        if let Some(FieldValue::Choice { options, selected }) = self.focused_value_mut()
            && !options.is_empty()
        {
            let len = options.len();
            *selected = if forward {
                (*selected + 1) % len
            } else {
                (*selected + len - 1) % len
            };
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn sample() -> Form {
        Form::new("Edit", 40, 10)
            .with_text("Name", "Cup")
            .with_choice("Style", vec!["one", "two"], 0)
    }

    #[test]
    fn focus_walks_fields_then_buttons_and_wraps() {
        let mut form = sample();
        assert_eq!(form.focus(), FormFocus::Field(0));
        form.handle_key(key(KeyCode::Tab));
        assert_eq!(form.focus(), FormFocus::Field(1));
        form.handle_key(key(KeyCode::Down));
        assert_eq!(form.focus(), FormFocus::Save);
        form.handle_key(key(KeyCode::Tab));
        assert_eq!(form.focus(), FormFocus::Cancel);
        form.handle_key(key(KeyCode::Tab));
        assert_eq!(form.focus(), FormFocus::Field(0));
        form.handle_key(key(KeyCode::BackTab));
        assert_eq!(form.focus(), FormFocus::Cancel);
    }

    #[test]
    fn typing_edits_focused_text() {
        let mut form = sample();
        form.handle_key(key(KeyCode::Backspace));
        form.handle_key(key(KeyCode::Char('b')));
        form.handle_key(key(KeyCode::Char('!')));
        assert_eq!(form.text(0), "Cub!");
    }

    #[test]
    fn control_chords_are_not_typed() {
        let mut form = sample();
        form.handle_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));
        assert_eq!(form.text(0), "Cup");
    }

    #[test]
    fn typing_on_choice_is_ignored() {
        let mut form = sample();
        form.handle_key(key(KeyCode::Tab));
        form.handle_key(key(KeyCode::Char('x')));
        assert_eq!(form.choice(1), 0);
        assert_eq!(form.text(0), "Cup");
    }

    #[test]
    fn arrows_cycle_choice() {
        let mut form = sample();
        form.handle_key(key(KeyCode::Tab));
        form.handle_key(key(KeyCode::Right));
        assert_eq!(form.choice(1), 1);
        form.handle_key(key(KeyCode::Right));
        assert_eq!(form.choice(1), 0);
        form.handle_key(key(KeyCode::Left));
        assert_eq!(form.choice(1), 1);
    }

    #[test]
    fn enter_advances_then_submits_on_save() {
        let mut form = sample();
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormAction::Pending);
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormAction::Pending);
        assert_eq!(form.focus(), FormFocus::Save);
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormAction::Submit);
    }

    #[test]
    fn enter_on_cancel_and_escape_cancel() {
        let mut form = sample();
        form.handle_key(key(KeyCode::Up));
        assert_eq!(form.focus(), FormFocus::Cancel);
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormAction::Cancel);
        assert_eq!(sample().handle_key(key(KeyCode::Esc)), FormAction::Cancel);
    }

    #[test]
    fn choice_selection_clamped() {
        let form = Form::new("T", 10, 5).with_choice("Style", vec!["a", "b"], 9);
        assert_eq!(form.choice(0), 1);
    }
}
