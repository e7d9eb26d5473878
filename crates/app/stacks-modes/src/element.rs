//! Render tree produced by modes and consumed by the host.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Element {
    Container {
        name: String,
        children: Vec<Element>,
    },
    Heading {
        text: String,
    },
    /// Single-choice control
    Select {
        name: String,
        options: Vec<SelectOption>,
        selected: String,
    },
    /// Clickable on/off control
    Toggle {
        name: String,
        label: String,
        active: bool,
    },
    Label {
        text: String,
    },
}

impl Element {
    pub fn container(name: impl Into<String>, children: Vec<Element>) -> Self {
        Element::Container {
            name: name.into(),
            children,
        }
    }

    pub fn label(text: impl Into<String>) -> Self {
        Element::Label { text: text.into() }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Element::Container { name, .. }
            | Element::Select { name, .. }
            | Element::Toggle { name, .. } => Some(name),
            Element::Heading { .. } | Element::Label { .. } => None,
        }
    }

    pub fn children(&self) -> &[Element] {
        match self {
            Element::Container { children, .. } => children.as_slice(),
            _ => &[],
        }
    }

    /// Depth-first walk over this element and its descendants.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = vec![self];
        for child in self.children() {
            out.extend(child.descendants());
        }
        out
    }

    pub fn find(&self, name: &str) -> Option<&Element> {
        self.descendants()
            .into_iter()
            .find(|element| element.name() == Some(name))
    }

    /// Text of every label, in render order.
    pub fn texts(&self) -> Vec<&str> {
        self.descendants()
            .into_iter()
            .filter_map(|element| match element {
                Element::Heading { text } | Element::Label { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// User interaction with a named element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Select { name: String, value: String },
    Click { name: String },
}

impl UiEvent {
    pub fn select(name: impl Into<String>, value: impl Into<String>) -> Self {
        UiEvent::Select {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn click(name: impl Into<String>) -> Self {
        UiEvent::Click { name: name.into() }
    }
}
