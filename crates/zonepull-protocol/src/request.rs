//! The request envelope: credentials, command name and argument value.

use crate::ENVELOPE_TAG;
use crate::codec::{Codec, decode_element, encode_value};
use crate::error::{ProtocolError, ProtocolResult};
use crate::filter::TreeFilter;
use crate::value::Value;
use crate::xml::Element;

const CREDENTIALS_TAG: &str = "credentials";

/// Account credentials carried in every request.
///
/// Username, password and hash are always rendered (empty when unset);
/// language, token, ip and misc follow in that fixed order when set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    /// Account name.
    pub username: String,
    /// Account password.
    pub password: String,
    /// Password hash, used instead of the password by some deployments.
    pub hash: Option<String>,
    /// Session token.
    pub token: Option<String>,
    /// Caller IP forwarded to the API.
    pub ip: Option<String>,
    /// Reply language.
    pub language: Option<String>,
    /// Free-form extra credential data.
    pub misc: Option<Value>,
}

impl Credentials {
    /// Creates credentials from a username and password.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Sets the password hash.
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    /// Sets the session token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the forwarded caller IP.
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    /// Sets the reply language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the free-form misc value.
    pub fn with_misc(mut self, misc: impl Into<Value>) -> Self {
        self.misc = Some(misc.into());
        self
    }

    /// Rebuilds credentials from a decoded `credentials` entry.
    /// Missing username or password read as empty.
    fn from_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_text).map(str::to_owned);
        Self {
            username: text("username").unwrap_or_default(),
            password: text("password").unwrap_or_default(),
            hash: text("hash"),
            token: text("token"),
            ip: text("ip"),
            language: text("language"),
            misc: value.get("misc").cloned(),
        }
    }

    fn to_element(&self) -> Element {
        let mut credentials = Element::new(CREDENTIALS_TAG);
        credentials.push_element(Element::with_text("username", &self.username));
        credentials.push_element(Element::with_text("password", &self.password));
        credentials.push_element(Element::with_text(
            "hash",
            self.hash.as_deref().unwrap_or(""),
        ));
        if let Some(language) = &self.language {
            credentials.push_element(Element::with_text("language", language));
        }
        if let Some(token) = &self.token {
            credentials.push_element(Element::with_text("token", token));
        }
        if let Some(ip) = &self.ip {
            credentials.push_element(Element::with_text("ip", ip));
        }
        if let Some(misc) = &self.misc {
            let mut element = Element::new("misc");
            encode_value(misc, &mut element);
            credentials.push_element(element);
        }
        credentials
    }
}

/// A request envelope.
///
/// Built programmatically and rendered to wire text, or loaded from
/// wire text and parsed back into fields. The first rendering is
/// cached; mutating fields afterwards does not change the cached text.
#[derive(Default)]
pub struct Request {
    command: String,
    args: Value,
    credentials: Credentials,
    raw: Option<String>,
    filters: Vec<Box<dyn TreeFilter>>,
}

impl Request {
    /// Creates a request for the given command.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    /// Creates a request holding wire text, to be taken apart with
    /// [`Request::parse_content`].
    pub fn from_raw(xml: impl Into<String>) -> Self {
        Self {
            raw: Some(xml.into()),
            ..Self::default()
        }
    }

    /// Sets the argument value.
    pub fn with_args(mut self, args: impl Into<Value>) -> Self {
        self.args = args.into();
        self
    }

    /// Sets the credentials.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Returns the command name.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Replaces the command name.
    pub fn set_command(&mut self, command: impl Into<String>) {
        self.command = command.into();
    }

    /// Returns the argument value.
    pub fn args(&self) -> &Value {
        &self.args
    }

    /// Replaces the argument value.
    pub fn set_args(&mut self, args: impl Into<Value>) {
        self.args = args.into();
    }

    /// Returns the credentials.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Replaces the credentials.
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = credentials;
    }

    /// Returns the wire text, if already rendered or loaded.
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Registers a pre-parse filter hook; hooks run in registration
    /// order against the parsed tree before field extraction.
    pub fn add_filter(&mut self, filter: Box<dyn TreeFilter>) {
        self.filters.push(filter);
    }

    /// Renders the request to wire text, caching the result. Repeated
    /// calls return the identical cached text even if fields changed
    /// in between.
    pub fn render(&mut self, codec: &Codec) -> ProtocolResult<&str> {
        if self.raw.is_none() {
            if self.command.is_empty() {
                return Err(ProtocolError::envelope("request has no command"));
            }
            let mut root = Element::new(ENVELOPE_TAG);
            root.push_element(self.credentials.to_element());
            let mut command = Element::new(self.command.clone());
            encode_value(&self.args, &mut command);
            root.push_element(command);
            self.raw = Some(codec.serialize(&root));
        }
        Ok(self.raw.as_deref().unwrap_or_default())
    }

    /// Parses the stored wire text into command, arguments and
    /// credentials.
    ///
    /// Extraction is by document order, never by name: the first root
    /// entry is the credentials, the second names the command and
    /// carries its arguments. Registered filters run against the tree
    /// first.
    pub fn parse_content(&mut self) -> ProtocolResult<()> {
        let raw = self
            .raw
            .clone()
            .ok_or_else(|| ProtocolError::envelope("no wire text to parse"))?;
        let mut root = crate::xml::parse_document(&raw)?;
        for filter in &self.filters {
            filter.apply(&mut root)?;
        }

        let mut entries = root.elements();
        let credentials = entries
            .next()
            .ok_or_else(|| ProtocolError::envelope("missing credentials entry"))?;
        let command = entries
            .next()
            .ok_or_else(|| ProtocolError::envelope("missing command entry"))?;

        self.credentials = Credentials::from_value(&decode_element(credentials)?);
        self.command = command.name.clone();
        self.args = decode_element(command)?;
        Ok(())
    }
}
