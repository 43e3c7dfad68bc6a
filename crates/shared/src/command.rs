//! Outbound command documents (Player → Server)
//!
//! A command is a single `<command>` root element. Its `type` attribute names
//! the command, every other attribute is a flat string value, serialized in
//! the order it was added.
//!
//! ## Versioning Policy
//!
//! - New command types can be added at the end (the server ignores what it
//!   does not know)
//! - Renaming a wire name is a breaking change

use serde_json::{Map, Value};

use crate::error::{EncodingError, ProtocolError};
use crate::xml;

/// Root element name of every outbound document.
pub const COMMAND_ROOT: &str = "command";

/// Attribute carrying the command discriminant.
pub const TYPE_ATTRIBUTE: &str = "type";

/// Command types the client knows how to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandType {
    Register,
    CreateGame,
    JoinGame,
    ExitGame,
    StartGame,
    ChooseTeam,
    StartAction,
    Undo,
    Commit,
    Upgrade,
    Research,
    ExplorePos,
    InfluenceSrc,
    InfluenceDst,
}

impl CommandType {
    /// Wire name used in the `type` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Register => "register",
            CommandType::CreateGame => "create_game",
            CommandType::JoinGame => "join_game",
            CommandType::ExitGame => "exit_game",
            CommandType::StartGame => "start_game",
            CommandType::ChooseTeam => "choose_team",
            CommandType::StartAction => "start_action",
            CommandType::Undo => "undo",
            CommandType::Commit => "commit",
            CommandType::Upgrade => "cmd_upgrade",
            CommandType::Research => "cmd_research",
            CommandType::ExplorePos => "cmd_explore_pos",
            CommandType::InfluenceSrc => "cmd_influence_src",
            CommandType::InfluenceDst => "cmd_influence_dst",
        }
    }
}

impl std::fmt::Display for CommandType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A child element holding free text, e.g. `<note>hello</note>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextElement {
    pub name: String,
    pub text: String,
}

/// One outbound command, built fresh per message and serialized immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDocument {
    kind: String,
    attributes: Vec<(String, String)>,
    children: Vec<TextElement>,
}

impl CommandDocument {
    /// Create an empty command of the given type.
    pub fn new(kind: CommandType) -> Self {
        Self {
            kind: kind.as_str().to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Build a command with the given attributes, in order.
    pub fn build<I, K, V>(kind: CommandType, attributes: I) -> Result<Self, EncodingError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut doc = Self::new(kind);
        for (name, value) in attributes {
            doc.push_attr(name, value)?;
        }
        Ok(doc)
    }

    /// Build a command from loosely-typed attribute data.
    ///
    /// Every value must be a JSON string; anything else is an encoding error.
    pub fn from_json(kind: CommandType, attributes: &Map<String, Value>) -> Result<Self, EncodingError> {
        let mut doc = Self::new(kind);
        for (name, value) in attributes {
            match value {
                Value::String(s) => {
                    doc.push_attr(name.as_str(), s.as_str())?;
                }
                other => {
                    return Err(EncodingError::NonStringAttribute {
                        name: name.clone(),
                        found: json_kind(other),
                    })
                }
            }
        }
        Ok(doc)
    }

    /// Append one attribute.
    pub fn push_attr(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<&mut Self, EncodingError> {
        let name = name.into();
        if name == TYPE_ATTRIBUTE {
            return Err(EncodingError::ReservedAttribute);
        }
        if !xml::is_valid_name(&name) {
            return Err(EncodingError::InvalidName {
                what: "attribute",
                name,
            });
        }
        if self.attr(&name).is_some() {
            return Err(EncodingError::DuplicateAttribute(name));
        }
        self.attributes.push((name, value.into()));
        Ok(self)
    }

    /// Append a text child element.
    pub fn push_text(
        &mut self,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<&mut Self, EncodingError> {
        let name = name.into();
        if !xml::is_valid_name(&name) {
            return Err(EncodingError::InvalidName {
                what: "element",
                name,
            });
        }
        self.children.push(TextElement {
            name,
            text: text.into(),
        });
        Ok(self)
    }

    /// The `type` discriminant.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Attributes in insertion order, excluding `type`.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn text_elements(&self) -> &[TextElement] {
        &self.children
    }

    /// Serialize to the wire representation.
    pub fn to_xml(&self) -> String {
        xml::serialize(self)
    }

    /// Read a document back from its serialized form.
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        let parsed = xml::parse(text)?;
        Ok(Self {
            kind: parsed.kind,
            attributes: parsed.attributes,
            children: parsed.children,
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
