// src/core/command.rs

//! The command tree: builder surface, sub-command resolution and the local parse.

use crate::{
    constants::{
        COMMAND_PATTERN, HELP_OPTION_NAMES, SELF_KEYS, TYPE_SWITCH, UNKNOWN_TEXT,
        VERSION_OPTION_NAMES,
    },
    core::{
        action::{Action, Injected, Required},
        argument::{Argument, ArgumentList},
        dispatch,
        error::CmdError,
        option::{OptionDef, OptionList},
        params::ParsedState,
        tokenizer::{self, trim_option_name},
        types::{Type, TypeRegistry, TypeSpec},
    },
    models::{Token, Value},
    system::{
        logger::{ConsoleLogger, ErrorSink, Logger},
        text_source::text_or_file,
    },
};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use std::{
    fmt,
    path::Path,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak},
};

lazy_static! {
    static ref COMMAND_RE: Regex = Regex::new(COMMAND_PATTERN).expect("valid command pattern");
}

/// One of the names a sub-command answers to.
#[derive(Debug, Clone)]
pub enum CommandName {
    Exact(String),
    /// Matches when the pattern matches anywhere in the candidate.
    Pattern(Regex),
}

impl CommandName {
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Exact(name) => name == candidate,
            Self::Pattern(re) => re.is_match(candidate),
        }
    }
}

impl From<&str> for CommandName {
    fn from(name: &str) -> Self {
        Self::Exact(name.to_string())
    }
}

impl From<String> for CommandName {
    fn from(name: String) -> Self {
        Self::Exact(name)
    }
}

impl From<Regex> for CommandName {
    fn from(re: Regex) -> Self {
        Self::Pattern(re)
    }
}

struct Node {
    names: Vec<CommandName>,
    parent: Option<Weak<RwLock<Node>>>,
    /// `None` on the root itself.
    root: Option<Weak<RwLock<Node>>>,
    options: OptionList,
    children: Vec<Command>,
    actions: Vec<Action>,
    arguments: ArgumentList,
    types: TypeRegistry,
    logger: Arc<dyn Logger>,
    errors: ErrorSink,
    help: Option<Action>,
    state: ParsedState,
}

impl Node {
    fn new(names: Vec<CommandName>) -> Self {
        Self {
            names,
            parent: None,
            root: None,
            options: OptionList::default(),
            children: Vec::new(),
            actions: Vec::new(),
            arguments: ArgumentList::default(),
            types: TypeRegistry::default(),
            logger: Arc::new(ConsoleLogger),
            errors: ErrorSink::default(),
            help: None,
            state: ParsedState::default(),
        }
    }
}

/// A node of the command tree.
///
/// `Command` is a cheap, cloneable handle; clones refer to the same node. Builder calls
/// return `&Self` so they chain, except [`Command::command`], which returns the new child.
#[derive(Clone)]
pub struct Command {
    inner: Arc<RwLock<Node>>,
}

impl Default for Command {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_read() {
            Ok(node) => f
                .debug_struct("Command")
                .field("names", &node.names)
                .field("name", &node.state.name())
                .field("children", &node.children.len())
                .finish_non_exhaustive(),
            Err(_) => f.write_str("Command { .. }"),
        }
    }
}

impl Command {
    /// A root command with no names of its own.
    pub fn new() -> Self {
        Self::from_node(Node::new(Vec::new()))
    }

    /// A root command answering to `names`.
    pub fn named<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<CommandName>,
    {
        Self::from_node(Node::new(names.into_iter().map(Into::into).collect()))
    }

    fn from_node(node: Node) -> Self {
        Self {
            inner: Arc::new(RwLock::new(node)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Node> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Node> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    // --- TREE ---

    /// Declares a sub-command and returns it. The child inherits this node's logger,
    /// error sink and custom types as they are right now.
    pub fn command<I, N>(&self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<CommandName>,
    {
        let mut child = Node::new(names.into_iter().map(Into::into).collect());
        {
            let node = self.read();
            child.parent = Some(Arc::downgrade(&self.inner));
            child.root = Some(
                node.root
                    .clone()
                    .unwrap_or_else(|| Arc::downgrade(&self.inner)),
            );
            child.logger = Arc::clone(&node.logger);
            child.errors = node.errors.clone();
            child.types = node.types.clone();
        }
        let child = Self::from_node(child);
        self.write().children.push(child.clone());
        child
    }

    pub fn root(&self) -> Self {
        self.read()
            .root
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|inner| Self { inner })
            .unwrap_or_else(|| self.clone())
    }

    /// The node this one was declared on. A root is its own parent.
    pub fn parent(&self) -> Self {
        self.read()
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|inner| Self { inner })
            .unwrap_or_else(|| self.clone())
    }

    pub fn is_root(&self) -> bool {
        self.read().root.is_none()
    }

    /// Whether two handles point at the same node.
    pub fn same_node(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn children(&self) -> Vec<Self> {
        self.read().children.clone()
    }

    pub fn matches_name(&self, candidate: &str) -> bool {
        self.read().names.iter().any(|name| name.matches(candidate))
    }

    // --- BUILDER ---

    /// Declares an option. Aliases already claimed by another option of this command
    /// are reported as `RepeatedOption` and the option is not added.
    pub fn option<I, S>(&self, names: I, kind: impl Into<TypeSpec>) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let spec = kind.into();
        let clash = {
            let mut node = self.write();
            let option = OptionDef::new(names, node.types.resolve_spec(&spec));
            let clash = node.options.conflict(&option).map(str::to_string);
            if clash.is_none() {
                node.options.push(option);
            }
            clash
        };
        if let Some(alias) = clash {
            log::warn!("Option alias '{}' is already registered on this command", alias);
            self.emit_error(&CmdError::RepeatedOption(alias));
        }
        self
    }

    /// Replaces the positional types; slot `i` validates the i-th positional.
    pub fn arguments<I, T>(&self, kinds: I) -> &Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeSpec>,
    {
        {
            let mut node = self.write();
            let list: ArgumentList = kinds
                .into_iter()
                .map(|kind| Argument::new(node.types.resolve_spec(&kind.into())))
                .collect();
            node.arguments = list;
        }
        self
    }

    /// Appends an action. Registration order is match-priority order.
    pub fn action(&self, action: Action) -> &Self {
        self.write().actions.push(action);
        self
    }

    /// Replaces the error sink of this command.
    pub fn error<F>(&self, handler: F) -> &Self
    where
        F: Fn(&CmdError) + Send + Sync + 'static,
    {
        self.write().errors = ErrorSink::Custom(Arc::new(handler));
        self
    }

    pub fn console(&self, logger: impl Logger + 'static) -> &Self {
        self.write().logger = Arc::new(logger);
        self
    }

    /// Makes a custom type resolvable by name on this command and on children declared later.
    pub fn register_type(&self, kind: Type) -> &Self {
        self.write().types.register(kind);
        self
    }

    /// Adds `-v/--version`, printing `text` (or the file behind `@path`) and stopping dispatch.
    pub fn version(&self, text: impl Into<String>) -> &Self {
        self.version_with(Action::text(text))
    }

    /// Adds `-v/--version` running `action` instead of printing a text.
    pub fn version_with(&self, action: Action) -> &Self {
        self.option(VERSION_OPTION_NAMES, TYPE_SWITCH)
            .action(action.required(Required::names(&["version"])))
    }

    /// Adds `-h/--help`. The same text is printed when no action matches a parse.
    pub fn help(&self, text: impl Into<String>) -> &Self {
        self.help_with(Action::text(text))
    }

    /// Adds `-h/--help` running `action`, which also runs when no action matches a parse.
    pub fn help_with(&self, action: Action) -> &Self {
        let action = action.required(Required::names(&["help"]));
        self.write().help = Some(action.clone());
        self.option(HELP_OPTION_NAMES, TYPE_SWITCH).action(action)
    }

    // --- PARSE ---

    /// Parses an externally supplied invocation sequence on the root of this tree.
    pub async fn ready<S>(&self, argv: &[S]) -> Result<(), CmdError>
    where
        S: AsRef<str> + Sync,
    {
        self.root().parse(argv).await
    }

    /// Parses `argv` (program path first) and dispatches the matching actions.
    ///
    /// Only an empty `argv` is returned as an error. Parse and dispatch failures are
    /// delivered to the error sink of the command they happened on.
    pub async fn parse<S>(&self, argv: &[S]) -> Result<(), CmdError>
    where
        S: AsRef<str> + Sync,
    {
        if argv.is_empty() {
            return Err(CmdError::InvalidArguments);
        }
        let mut args: Vec<String> = argv
            .iter()
            .skip(1)
            .map(|arg| arg.as_ref().to_string())
            .collect();
        let mut node = self.clone();
        loop {
            if args.is_empty() {
                log::debug!("Nothing to parse after the program path");
                return Ok(());
            }
            match node.find_sub_command(&args) {
                Ok(Some(child)) => {
                    args.remove(0);
                    node = child;
                }
                Ok(None) => break,
                Err(err) => {
                    node.emit_error(&err);
                    return Ok(());
                }
            }
        }
        match node.parse_local(&args) {
            Ok(()) => dispatch::run(&node).await,
            Err(err) => node.emit_error(&err),
        }
        Ok(())
    }

    /// `args[0]` is this command's own label; `args[1]` is the sub-command candidate.
    fn find_sub_command(&self, args: &[String]) -> Result<Option<Self>, CmdError> {
        let Some(candidate) = args.get(1) else {
            return Ok(None);
        };
        let node = self.read();
        if node.children.is_empty() || tokenizer::looks_like_option(candidate) {
            return Ok(None);
        }
        if !COMMAND_RE.is_match(candidate) {
            return Err(CmdError::InvalidCommand(candidate.clone()));
        }
        log::debug!("Looking up sub-command '{}'", candidate);
        node.children
            .iter()
            .find(|child| child.matches_name(candidate))
            .cloned()
            .map(Some)
            .ok_or_else(|| CmdError::InvalidCommand(candidate.clone()))
    }

    /// Tokenizes and classifies `args` against this command's declarations, replacing
    /// the parsed state. On failure the state is left empty.
    fn parse_local(&self, args: &[String]) -> Result<(), CmdError> {
        let mut node = self.write();
        node.state = ParsedState::default();
        let Some(label) = args.first() else {
            return Ok(());
        };
        let name = Path::new(label)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| label.clone());

        // Slot 0 is always the command label, never a positional or an option.
        let mut tokens = vec![Token::normal(label.as_str())];
        tokens.extend(tokenizer::tokenize(args.get(1..).unwrap_or_default()));
        let tokens = tokenizer::expand_short_options(tokens, &node.options);
        log::debug!("Tokens for '{}': {:?}", name, tokens);

        let (argv, captured) = classify(&tokens, &node.options, &node.arguments)?;
        let options = normalize(&captured, &node.options);
        log::debug!("Parsed '{}': argv={:?} options={:?}", name, argv, options);
        node.state = ParsedState::assemble(name, argv, options);
        Ok(())
    }

    // --- ACCESSORS ---

    pub fn has(&self, name: &str) -> bool {
        self.read().state.has(name)
    }

    /// Current value of a parameter; `self` resolves to this command.
    pub fn get(&self, name: &str) -> Option<Value> {
        let node = self.read();
        if SELF_KEYS.contains(&trim_option_name(name)) {
            return node
                .state
                .is_parsed()
                .then(|| Value::Command(self.clone()));
        }
        node.state.get(name).cloned()
    }

    /// Writes a parameter through to `argv` (`$N`) or to the option and all of its aliases.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> &Self {
        {
            let mut node = self.write();
            let key = trim_option_name(name);
            let aliases: Vec<String> = node
                .options
                .iter()
                .find(|option| option.names().iter().any(|a| trim_option_name(a) == key))
                .map(|option| option.names().to_vec())
                .unwrap_or_default();
            node.state.set(name, value.into(), &aliases);
        }
        self
    }

    /// The label of the last parse (basename of the command slot).
    pub fn name(&self) -> Option<String> {
        self.read().state.name().map(str::to_string)
    }

    pub fn argv(&self) -> Vec<Value> {
        self.read().state.argv().to_vec()
    }

    pub fn argc(&self) -> usize {
        self.read().state.argc()
    }

    pub fn options(&self) -> IndexMap<String, Value> {
        self.read().state.options().clone()
    }

    pub fn options_count(&self) -> usize {
        self.read().state.options().len()
    }

    /// A snapshot of the parameter map (without the `self` keys).
    pub fn params(&self) -> IndexMap<String, Value> {
        self.read().state.params().clone()
    }

    pub fn state(&self) -> ParsedState {
        self.read().state.clone()
    }

    /// Writes `message` through this command's logger.
    pub fn log(&self, message: &str) {
        let logger = Arc::clone(&self.read().logger);
        logger.log(message);
    }

    // --- DISPATCH SUPPORT ---

    pub(crate) fn actions_and_state(&self) -> (Vec<Action>, ParsedState) {
        let node = self.read();
        (node.actions.clone(), node.state.clone())
    }

    pub(crate) fn inject(&self, params: &[String]) -> Injected {
        Injected::new(
            params
                .iter()
                .map(|name| (name.clone(), self.get(name)))
                .collect(),
        )
    }

    pub(crate) fn help_action(&self) -> Option<Action> {
        self.read().help.clone()
    }

    /// Prints a string-or-file text through this command's logger.
    pub(crate) fn print(&self, text: &str) {
        let logger = Arc::clone(&self.read().logger);
        let content = text_or_file(text);
        if content.is_empty() {
            logger.log(UNKNOWN_TEXT);
        } else {
            logger.log(&content);
        }
    }

    pub(crate) fn emit_error(&self, error: &CmdError) {
        let (sink, logger) = {
            let node = self.read();
            (node.errors.clone(), Arc::clone(&node.logger))
        };
        log::debug!("Command error: {}", error);
        sink.emit(error, logger.as_ref());
    }
}

/// Walks the tokens after the label. Options consume the next token when it exists, is not
/// an option name (unless the type is greedy) and passes validation; otherwise they take
/// their type's default and the next token is examined on its own.
fn classify(
    tokens: &[Token],
    options: &OptionList,
    arguments: &ArgumentList,
) -> Result<(Vec<Value>, IndexMap<String, Value>), CmdError> {
    let mut argv = Vec::new();
    let mut captured = IndexMap::new();
    let mut index = 1;
    while let Some(token) = tokens.get(index) {
        index += 1;
        if token.is_option_name() {
            let option = options
                .get(&token.value)
                .ok_or_else(|| CmdError::InvalidOption(token.value.clone()))?;
            let value = match tokens.get(index) {
                Some(next)
                    if (!next.is_option_name() || option.kind().is_greedy())
                        && option.accepts(Some(&next.value)) =>
                {
                    index += 1;
                    option.convert(&next.value)
                }
                _ => option.kind().default_value().clone(),
            };
            captured.insert(token.value.clone(), value);
            continue;
        }
        if let Some(argument) = arguments.get(argv.len()) {
            if !argument.accepts(&token.value) {
                return Err(CmdError::InvalidArgument(token.value.clone()));
            }
        }
        argv.push(Value::Str(token.value.clone()));
    }
    Ok((argv, captured))
}

/// Re-keys captured options by their dash-less name and copies each value to every alias.
fn normalize(captured: &IndexMap<String, Value>, options: &OptionList) -> IndexMap<String, Value> {
    let mut normalized = IndexMap::new();
    for (name, value) in captured {
        normalized.insert(trim_option_name(name).to_string(), value.clone());
        if let Some(option) = options.get(name) {
            for alias in option.names() {
                normalized.insert(trim_option_name(alias).to_string(), value.clone());
            }
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::Flow, system::logger::MemoryLogger};
    use std::sync::Mutex;

    type Errors = Arc<Mutex<Vec<String>>>;

    fn capture_errors(cmd: &Command) -> Errors {
        let errors: Errors = Arc::default();
        let sink = Arc::clone(&errors);
        cmd.error(move |err| sink.lock().unwrap().push(err.to_string()));
        errors
    }

    fn strs(values: &[Value]) -> Vec<&str> {
        values.iter().filter_map(Value::as_str).collect()
    }

    #[tokio::test]
    async fn test_tab_number_and_string_argument() {
        let cmd = Command::new();
        cmd.option(["-t", "--tab"], "number").arguments(["string"]);
        cmd.parse(&["node", "app", "-t", "5", "hello"]).await.unwrap();

        assert_eq!(strs(&cmd.argv()), ["hello"]);
        assert_eq!(cmd.argc(), 1);
        let options = cmd.options();
        assert_eq!(options.len(), 2);
        assert_eq!(options.get("t"), Some(&Value::Number(5.0)));
        assert_eq!(options.get("tab"), Some(&Value::Number(5.0)));
        assert_eq!(cmd.name().as_deref(), Some("app"));
    }

    #[tokio::test]
    async fn test_every_alias_sees_the_same_value() {
        for used in ["-o", "--out", "--output"] {
            let cmd = Command::new();
            cmd.option(["-o", "--out", "--output"], "string");
            cmd.parse(&["node", "app", used, "dist"]).await.unwrap();
            for alias in ["-o", "--out", "--output", "o", "out", "output"] {
                assert!(cmd.has(alias), "{used}: missing {alias}");
                assert_eq!(cmd.get(alias), Some(Value::from("dist")), "{used}: {alias}");
            }
        }
    }

    #[tokio::test]
    async fn test_equals_form_assigns_value() {
        let cmd = Command::new();
        cmd.option(["--tab"], "number");
        cmd.parse(&["node", "app", "--tab=7"]).await.unwrap();
        assert_eq!(cmd.get("tab"), Some(Value::Number(7.0)));
        assert_eq!(cmd.argc(), 0);
    }

    #[tokio::test]
    async fn test_rejected_equals_value_becomes_positional() {
        let cmd = Command::new();
        cmd.option(["--tab"], "number");
        cmd.parse(&["node", "app", "--tab=wide"]).await.unwrap();
        assert_eq!(cmd.get("tab"), Some(Value::Number(0.0)));
        assert_eq!(strs(&cmd.argv()), ["wide"]);
    }

    #[tokio::test]
    async fn test_short_cluster_behaves_like_separate_flags() {
        let clustered = Command::new();
        let separate = Command::new();
        for cmd in [&clustered, &separate] {
            cmd.option(["-a"], "switch")
                .option(["-b"], "switch")
                .option(["-c"], "switch");
        }
        clustered.parse(&["node", "app", "-abc", "x"]).await.unwrap();
        separate.parse(&["node", "app", "-a", "-b", "-c", "x"]).await.unwrap();

        assert_eq!(clustered.state(), separate.state());
        assert_eq!(clustered.get("b"), Some(Value::Bool(true)));
    }

    #[tokio::test]
    async fn test_short_cluster_with_unknown_char_is_invalid_option() {
        let cmd = Command::new();
        cmd.option(["-a"], "switch");
        let errors = capture_errors(&cmd);
        cmd.parse(&["node", "app", "-ax"]).await.unwrap();
        assert_eq!(*errors.lock().unwrap(), vec!["Invalid option: -ax"]);
        assert!(!cmd.has("a"), "no partial state after a failed parse");
    }

    #[tokio::test]
    async fn test_non_greedy_option_takes_default_before_another_option() {
        let cmd = Command::new();
        cmd.option(["-n"], "number").option(["-x"], "number");
        cmd.parse(&["node", "app", "-n", "-x", "3"]).await.unwrap();
        assert_eq!(cmd.get("n"), Some(Value::Number(0.0)));
        assert_eq!(cmd.get("x"), Some(Value::Number(3.0)));
    }

    #[tokio::test]
    async fn test_non_greedy_option_leaves_invalid_value_as_positional() {
        let cmd = Command::new();
        cmd.option(["-n"], "number");
        cmd.parse(&["node", "app", "-n", "abc"]).await.unwrap();
        assert_eq!(cmd.get("n"), Some(Value::Number(0.0)));
        assert_eq!(strs(&cmd.argv()), ["abc"]);
    }

    #[tokio::test]
    async fn test_greedy_option_consumes_option_looking_value() {
        let cmd = Command::new();
        cmd.option(["-s"], "string*").option(["-p"], "string");
        cmd.parse(&["node", "app", "-s", "-5", "-p"]).await.unwrap();
        assert_eq!(cmd.get("s"), Some(Value::from("-5")));
        assert_eq!(cmd.get("p"), Some(Value::from("")));
    }

    #[tokio::test]
    async fn test_switch_and_boolean_values() {
        let cmd = Command::new();
        cmd.option(["-q"], "switch").option(["--color"], "boolean");
        cmd.parse(&["node", "app", "-q", "file", "--color", "no"]).await.unwrap();
        assert_eq!(cmd.get("q"), Some(Value::Bool(true)));
        assert_eq!(cmd.get("color"), Some(Value::Bool(false)));
        assert_eq!(strs(&cmd.argv()), ["file"]);
    }

    #[tokio::test]
    async fn test_invalid_argument_aborts_the_parse() {
        let cmd = Command::new();
        cmd.arguments(["number", "string"]);
        let errors = capture_errors(&cmd);
        let ran = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&ran);
        cmd.action(Action::new(&[], move |_| {
            *flag.lock().unwrap() = true;
            Ok(Flow::Continue)
        }).required(Required::Any));

        cmd.parse(&["node", "app", "abc", "x"]).await.unwrap();
        assert_eq!(*errors.lock().unwrap(), vec!["Invalid argument: abc"]);
        assert!(!*ran.lock().unwrap());
        assert_eq!(cmd.argc(), 0);
    }

    #[tokio::test]
    async fn test_extra_positionals_are_not_validated() {
        let cmd = Command::new();
        cmd.arguments(["number"]);
        cmd.parse(&["node", "app", "1", "two", "3"]).await.unwrap();
        assert_eq!(strs(&cmd.argv()), ["1", "two", "3"]);
    }

    #[tokio::test]
    async fn test_unknown_option_goes_to_error_sink() {
        let cmd = Command::new();
        let errors = capture_errors(&cmd);
        cmd.parse(&["node", "app", "--bogus"]).await.unwrap();
        assert_eq!(*errors.lock().unwrap(), vec!["Invalid option: --bogus"]);
    }

    #[tokio::test]
    async fn test_sub_command_routing_and_tail() {
        let root = Command::new();
        root.option(["-v", "--version"], "switch");
        let start = root.command(["start"]);
        start.option(["-p", "--port"], "number");

        root.parse(&["node", "app", "start", "-p", "80", "now"]).await.unwrap();
        assert_eq!(start.name().as_deref(), Some("start"));
        assert_eq!(start.get("port"), Some(Value::Number(80.0)));
        assert_eq!(strs(&start.argv()), ["now"]);
        assert_eq!(root.name(), None, "the parent does not parse locally");
    }

    #[tokio::test]
    async fn test_nested_sub_commands_and_patterns() {
        let root = Command::new();
        let remote = root.command(["remote", "r"]);
        let add = remote.command([Regex::new(r"^add\d*$").unwrap()]);
        root.parse(&["node", "git", "r", "add2", "origin"]).await.unwrap();
        assert_eq!(add.name().as_deref(), Some("add2"));
        assert_eq!(strs(&add.argv()), ["origin"]);
        assert!(add.root().same_node(&root));
        assert!(add.parent().same_node(&remote));
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_sub_commands() {
        let root = Command::new();
        root.command(["start"]);
        let errors = capture_errors(&root);
        root.parse(&["node", "app", "stop"]).await.unwrap();
        root.parse(&["node", "app", "_start"]).await.unwrap();
        assert_eq!(
            *errors.lock().unwrap(),
            vec!["Invalid command: stop", "Invalid command: _start"]
        );
    }

    #[tokio::test]
    async fn test_option_in_sub_command_slot_parses_locally() {
        let root = Command::new();
        root.option(["-q"], "switch");
        root.command(["start"]);
        root.parse(&["node", "app", "-q"]).await.unwrap();
        assert_eq!(root.get("q"), Some(Value::Bool(true)));
    }

    #[tokio::test]
    async fn test_empty_input_is_rejected_directly() {
        let cmd = Command::new();
        let errors = capture_errors(&cmd);
        let empty: [&str; 0] = [];
        assert!(matches!(cmd.parse(&empty).await, Err(CmdError::InvalidArguments)));
        assert!(cmd.parse(&["node"]).await.is_ok());
        assert!(errors.lock().unwrap().is_empty());
        assert!(!cmd.has("command"));
    }

    #[tokio::test]
    async fn test_set_positional_round_trip() {
        let cmd = Command::new();
        cmd.parse(&["node", "app", "one", "two"]).await.unwrap();
        cmd.set("$1", "uno");
        assert_eq!(cmd.get("$1"), Some(Value::from("uno")));
        let argv = cmd.get("argv").unwrap();
        assert_eq!(argv.as_list().unwrap()[0], Value::from("uno"));
        assert_eq!(cmd.argv()[0], Value::from("uno"));
    }

    #[tokio::test]
    async fn test_set_option_updates_aliases() {
        let cmd = Command::new();
        cmd.option(["-t", "--tab"], "number");
        cmd.parse(&["node", "app", "-t", "2"]).await.unwrap();
        cmd.set("--tab", 4);
        assert_eq!(cmd.get("t"), Some(Value::Number(4.0)));
        assert_eq!(cmd.options().get("tab"), Some(&Value::Number(4.0)));
    }

    #[tokio::test]
    async fn test_parsing_twice_overwrites_state() {
        let cmd = Command::new();
        cmd.option(["-q"], "switch");
        cmd.parse(&["node", "app", "-q", "a"]).await.unwrap();
        cmd.parse(&["node", "app", "b"]).await.unwrap();
        assert!(!cmd.has("q"));
        assert_eq!(strs(&cmd.argv()), ["b"]);
    }

    #[tokio::test]
    async fn test_equivalent_trees_parse_identically() {
        fn build() -> Command {
            let cmd = Command::new();
            cmd.option(["-t", "--tab"], "number")
                .option(["-a"], "switch")
                .option(["-b"], "switch")
                .arguments(["string"]);
            cmd
        }
        let argv = ["node", "app", "-ab", "--tab=3", "x", "y"];
        let first = build();
        let second = build();
        first.parse(&argv).await.unwrap();
        second.parse(&argv).await.unwrap();
        assert_eq!(first.state(), second.state());
        assert_eq!(first.options_count(), 4);
    }

    #[tokio::test]
    async fn test_repeated_option_is_reported_and_skipped() {
        let cmd = Command::new();
        let errors = capture_errors(&cmd);
        cmd.option(["-t", "--tab"], "number").option(["--tab"], "string");
        assert_eq!(*errors.lock().unwrap(), vec!["Repeated option: --tab"]);
        cmd.parse(&["node", "app", "--tab", "3"]).await.unwrap();
        assert_eq!(cmd.get("tab"), Some(Value::Number(3.0)));
    }

    #[tokio::test]
    async fn test_children_inherit_logger_sink_and_types_at_creation() {
        let root = Command::new();
        let logger = MemoryLogger::new();
        root.console(logger.clone());
        let errors = capture_errors(&root);
        root.register_type(Type::new("word").pattern(Regex::new(r"^[a-z]+$").unwrap()));
        let child = root.command(["child"]);
        child.arguments(["word"]);

        root.parse(&["node", "app", "child", "Nope"]).await.unwrap();
        assert_eq!(*errors.lock().unwrap(), vec!["Invalid argument: Nope"]);

        let later = MemoryLogger::new();
        root.console(later.clone());
        child.help("child help");
        root.parse(&["node", "app", "child", "-h"]).await.unwrap();
        assert_eq!(logger.logs(), vec!["child help"]);
        assert!(later.logs().is_empty());
    }

    #[tokio::test]
    async fn test_self_resolves_to_the_command() {
        let cmd = Command::new();
        assert_eq!(cmd.get("self"), None);
        cmd.parse(&["node", "app"]).await.unwrap();
        let me = cmd.get("$this").unwrap();
        assert!(me.as_command().unwrap().same_node(&cmd));
    }

    #[test]
    fn test_root_links() {
        let root = Command::new();
        assert!(root.is_root());
        assert!(root.parent().same_node(&root));
        assert!(root.root().same_node(&root));
        let child = root.command(["a"]);
        let grandchild = child.command(["b"]);
        assert!(!grandchild.is_root());
        assert!(grandchild.parent().same_node(&child));
        assert!(child.parent().same_node(&root));
        assert!(grandchild.root().same_node(&root));
        assert_eq!(root.children().len(), 1);
        assert!(child.matches_name("a"));
    }
}
