//! The command contract.
//!
//! A [`CommandDefinition`] is plain data plus a `run` closure. The router
//! treats every command the same way through this struct, and the registration
//! pipeline reads the same fields to publish the command to the platform.

use crate::{
    core::{
        events::EventSource,
        interaction::{Interaction, Member, MessageRef, ParameterValue, Reply, User},
        platform::Platform,
    },
    errors::{Error, Result},
};
use std::collections::{BTreeMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed, sendable future returned by handlers.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Type-erased command body.
pub type CommandHandler = Arc<dyn Fn(CommandContext) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Type of a declared command parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// Free text
    String,
    /// Whole number
    Integer,
    /// Floating point number
    Number,
    /// True/false
    Boolean,
    /// A user
    User,
    /// A channel
    Channel,
    /// A role
    Role,
    /// A user or a role
    Mentionable,
    /// An uploaded file
    Attachment,
}

impl ParameterValue {
    /// Kind this value satisfies.
    #[must_use]
    pub const fn kind(&self) -> ParameterKind {
        match self {
            Self::String(_) => ParameterKind::String,
            Self::Integer(_) => ParameterKind::Integer,
            Self::Number(_) => ParameterKind::Number,
            Self::Boolean(_) => ParameterKind::Boolean,
            Self::User(_) => ParameterKind::User,
            Self::Channel(_) => ParameterKind::Channel,
            Self::Role(_) => ParameterKind::Role,
            Self::Mentionable(_) => ParameterKind::Mentionable,
            Self::Attachment(_) => ParameterKind::Attachment,
        }
    }
}

/// Declaration of one command parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    /// Parameter name, lowercase on most platforms
    pub name: String,
    /// Help text shown by the client
    pub description: String,
    /// Accepted value type
    pub kind: ParameterKind,
    /// Whether the client must supply it
    pub required: bool,
}

impl ParameterSpec {
    /// A required parameter.
    #[must_use]
    pub fn required(name: impl Into<String>, description: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required: true,
        }
    }

    /// An optional parameter.
    #[must_use]
    pub fn optional(name: impl Into<String>, description: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            required: false,
            ..Self::required(name, description, kind)
        }
    }
}

/// Parameters of one invocation, validated against the command's schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters(BTreeMap<String, ParameterValue>);

impl Parameters {
    /// Extracts and validates the parameters of a command interaction.
    ///
    /// Every supplied option must be declared with a matching kind, and every
    /// required parameter must be present. Component interactions yield an
    /// empty set.
    pub fn from_interaction(schema: &[ParameterSpec], interaction: &Interaction) -> Result<Self> {
        let Some(command) = interaction.command() else {
            return Ok(Self::default());
        };

        let mut values = BTreeMap::new();
        for option in &command.options {
            let spec = schema
                .iter()
                .find(|spec| spec.name == option.name)
                .ok_or_else(|| Error::InvalidParameter {
                    name: option.name.clone(),
                    reason: "not declared by this command".to_string(),
                })?;

            if option.value.kind() != spec.kind {
                return Err(Error::InvalidParameter {
                    name: option.name.clone(),
                    reason: format!("expected {:?}, got {:?}", spec.kind, option.value.kind()),
                });
            }
            values.insert(option.name.clone(), option.value.clone());
        }

        if let Some(missing) = schema
            .iter()
            .find(|spec| spec.required && !values.contains_key(&spec.name))
        {
            return Err(Error::InvalidParameter {
                name: missing.name.clone(),
                reason: "required but missing".to_string(),
            });
        }

        Ok(Self(values))
    }

    /// Raw access to a value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.0.get(name)
    }

    /// A string parameter.
    #[must_use]
    pub fn string(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            ParameterValue::String(value) => Some(value),
            _ => None,
        }
    }

    /// An integer parameter.
    #[must_use]
    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            ParameterValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// A number parameter.
    #[must_use]
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            ParameterValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// A boolean parameter.
    #[must_use]
    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            ParameterValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// Id of a user parameter.
    #[must_use]
    pub fn user(&self, name: &str) -> Option<u64> {
        match self.get(name)? {
            ParameterValue::User(id) => Some(*id),
            _ => None,
        }
    }

    /// Id of a channel parameter.
    #[must_use]
    pub fn channel(&self, name: &str) -> Option<u64> {
        match self.get(name)? {
            ParameterValue::Channel(id) => Some(*id),
            _ => None,
        }
    }

    /// Number of supplied parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no parameters were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Who is acting: the guild member when there is one, the bare user otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity<'a> {
    /// Acting inside a guild
    Member(&'a Member),
    /// Acting in a direct message
    User(&'a User),
}

impl Identity<'_> {
    /// The underlying user.
    #[must_use]
    pub const fn user(&self) -> &User {
        match self {
            Self::Member(member) => &member.user,
            Self::User(user) => user,
        }
    }

    /// The user id.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.user().id
    }

    /// Guild nickname if there is one, account name otherwise.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Member(member) => member.nick.as_deref().unwrap_or(&member.user.name),
            Self::User(user) => &user.name,
        }
    }
}

/// Resolves who is acting on an interaction. Never absent.
#[must_use]
pub fn acting_identity(interaction: &Interaction) -> Identity<'_> {
    interaction
        .member
        .as_ref()
        .map_or(Identity::User(&interaction.user), Identity::Member)
}

/// Whether the interaction happened outside any guild.
#[must_use]
pub const fn is_in_dm(interaction: &Interaction) -> bool {
    interaction.member.is_none()
}

/// Everything a command body gets to work with.
#[derive(Clone)]
pub struct CommandContext {
    /// The invocation, already acknowledged
    pub interaction: Arc<Interaction>,
    /// Validated parameters
    pub parameters: Parameters,
    /// Host platform
    pub platform: Arc<dyn Platform>,
    /// Event source, for commands that open menus
    pub events: EventSource,
    /// The registry the command was routed from
    pub registry: Arc<CommandRegistry>,
}

impl CommandContext {
    /// Who invoked the command.
    #[must_use]
    pub fn identity(&self) -> Identity<'_> {
        acting_identity(&self.interaction)
    }

    /// Sends a follow-up to the invocation.
    pub async fn follow_up(&self, reply: Reply) -> Result<MessageRef> {
        self.platform.send_follow_up(&self.interaction, &reply).await
    }
}

/// A slash command: metadata plus its body.
#[derive(Clone)]
pub struct CommandDefinition {
    /// Name; matched case-insensitively
    pub name: String,
    /// Description shown by the client
    pub description: String,
    /// Whether the command is enabled for everyone when the app joins a guild
    pub default_permission: bool,
    /// Declared parameters, at most 25
    pub parameters: Vec<ParameterSpec>,
    /// Delete the command from the platform right after registering it
    pub marked_for_removal: bool,
    run: CommandHandler,
}

impl std::fmt::Debug for CommandDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("default_permission", &self.default_permission)
            .field("parameters", &self.parameters)
            .field("marked_for_removal", &self.marked_for_removal)
            .finish_non_exhaustive()
    }
}

impl CommandDefinition {
    /// A command with no parameters whose body does nothing.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            default_permission: true,
            parameters: Vec::new(),
            marked_for_removal: false,
            run: Arc::new(|_| Box::pin(async { Ok(()) })),
        }
    }

    /// Sets the command body.
    #[must_use]
    pub fn run<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(CommandContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.run = Arc::new(move |ctx| Box::pin(handler(ctx)));
        self
    }

    /// Declares a parameter.
    #[must_use]
    pub fn parameter(mut self, spec: ParameterSpec) -> Self {
        self.parameters.push(spec);
        self
    }

    /// Sets whether the command is enabled by default.
    #[must_use]
    pub fn default_permission(mut self, enabled: bool) -> Self {
        self.default_permission = enabled;
        self
    }

    /// Marks the command for deletion on the next registration pass.
    #[must_use]
    pub fn marked_for_removal(mut self) -> Self {
        self.marked_for_removal = true;
        self
    }

    /// Whether `name` refers to this command.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    /// Runs the command body.
    pub async fn invoke(&self, ctx: CommandContext) -> Result<()> {
        (self.run)(ctx).await
    }
}

/// The active command set.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: Vec<CommandDefinition>,
}

impl CommandRegistry {
    /// Builds a registry, rejecting names that clash case-insensitively.
    pub fn new(commands: Vec<CommandDefinition>) -> Result<Self> {
        let mut seen = HashSet::new();
        for command in &commands {
            if !seen.insert(command.name.to_lowercase()) {
                return Err(Error::DuplicateCommand {
                    name: command.name.clone(),
                });
            }
        }
        Ok(Self { commands })
    }

    /// First command matching `name`, case-insensitively.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.iter().find(|command| command.matches(name))
    }

    /// All commands in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.commands.iter()
    }

    /// Number of commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
