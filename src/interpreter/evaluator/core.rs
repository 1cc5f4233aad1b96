use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::{
    error::{Error, RuntimeError},
    interpreter::{
        node::{DiskVerb, Node, NodeKind},
        parser::parse,
        value::core::{Number, NumberSystem},
    },
    storage::{ProfileStore, Snapshot},
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Callback fired after a profile was saved, with the profile name.
pub type SaveHook = Box<dyn FnMut(&str) + Send>;

/// Stores the calculator state between lines.
///
/// Holds the variable store and the profile store that `save(name)` and
/// `load(name)` talk to. Exactly one line is evaluated at a time; the
/// variable store only changes after a line was fully reduced.
///
/// ## Usage
///
/// ```
/// use radcalc::{Calculator, storage::MemoryStore};
///
/// let mut calc = Calculator::new(MemoryStore::new());
/// assert_eq!(calc.eval_line("$foo = 0xff - 1").unwrap(), "254");
/// assert_eq!(calc.eval_line("hex($foo + 1)").unwrap(), "0xff");
/// assert_eq!(calc.eval_line("clear()").unwrap(), "Cleared state");
/// assert!(calc.eval_line("$foo").is_err());
/// ```
pub struct Calculator {
    variables: BTreeMap<String, Number>,
    store:     Box<dyn ProfileStore>,
    on_save:   Option<SaveHook>,
}

impl Calculator {
    /// Creates a calculator with an empty variable store.
    pub fn new(store: impl ProfileStore + 'static) -> Self {
        Self { variables: BTreeMap::new(),
               store:     Box::new(store),
               on_save:   None, }
    }

    /// Creates a calculator and loads `profile` into it.
    ///
    /// A profile that cannot be loaded is logged and skipped; the calculator
    /// then starts empty.
    pub fn with_profile(store: impl ProfileStore + 'static, profile: &str) -> Self {
        let mut calc = Self::new(store);
        if let Err(error) = calc.load(profile) {
            warn!(profile, %error, "could not load startup profile");
        }
        calc
    }

    /// Registers a callback that runs after every successful `save(name)`.
    #[must_use]
    pub fn on_save(mut self, hook: impl FnMut(&str) + Send + 'static) -> Self {
        self.on_save = Some(Box::new(hook));
        self
    }

    /// All variables, by name.
    #[must_use]
    pub const fn variables(&self) -> &BTreeMap<String, Number> {
        &self.variables
    }

    /// Looks up one variable by its name including the `$`.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&Number> {
        self.variables.get(name)
    }

    /// Parses and evaluates one line, committing any assignment.
    ///
    /// # Errors
    /// `Error::Parse` if the line is rejected, `Error::Runtime` if it cannot
    /// be evaluated.
    pub fn eval_line(&mut self, input: &str) -> Result<String, Error> {
        let nodes = parse(input)?;
        Ok(self.exec(&nodes, true)?)
    }

    /// Evaluates a parsed node sequence and returns the result text.
    ///
    /// A leading control node is handled first: `clear()`, `save(name)` and
    /// `load(name)` run and return their status message; an output setting
    /// selects the radix of the result; an assignment records its target.
    /// The rest is reduced to a single number.
    ///
    /// # Parameters
    /// - `nodes`: Output of a successful parse.
    /// - `commit`: Whether an assignment is written to the variable store.
    ///   With `false` the result is computed and returned only.
    ///
    /// # Returns
    /// The result literal, a status message, or an empty string for an empty
    /// line.
    ///
    /// # Errors
    /// Unknown variables, malformed literals, negative shifts, storage
    /// failures, and sequences from a failed parse.
    pub fn exec(&mut self, nodes: &[Node], commit: bool) -> EvalResult<String> {
        if let Some(Node::ParsingStopped { pos }) = nodes.last() {
            return Err(RuntimeError::IncompleteParse { pos: *pos });
        }

        let mut output = None;
        let mut target = None;
        let rest = match nodes.first() {
            None => return Ok(String::new()),
            Some(Node::Clear { .. }) => return Ok(self.clear()),
            Some(Node::Disk { verb: DiskVerb::Save,
                              profile,
                              .. }) => return self.save(profile),
            Some(Node::Disk { verb: DiskVerb::Load,
                              profile,
                              .. }) => return self.load(profile),
            Some(Node::SetOutput { system, .. }) => {
                output = Some(*system);
                &nodes[1..]
            },
            Some(Node::Assign { target: name, .. }) => {
                target = Some(name.as_str());
                &nodes[1..]
            },
            Some(_) => nodes,
        };

        if rest.iter().all(|node| node.kind() == NodeKind::End) {
            return Ok(String::new());
        }

        let result = self.reduce(rest.to_vec())?;
        let text = match output {
            Some(system) => result.render(system)?,
            None => result.value.clone(),
        };

        if let Some(name) = target {
            if commit {
                self.variables.insert(name.to_string(), Number::parse(result.pos, &text));
            } else {
                debug!(name, "dry run, assignment not committed");
            }
        }

        debug!(result = %text, output = %output.unwrap_or(NumberSystem::Dec), "line evaluated");
        Ok(text)
    }

    fn clear(&mut self) -> String {
        self.variables.clear();
        info!("variables cleared");
        "Cleared state".to_string()
    }

    fn save(&mut self, profile: &str) -> EvalResult<String> {
        let snapshot = Snapshot { variables: self.variables.clone() };
        self.store.write(profile, &snapshot.encode()?)?;
        info!(profile, variables = snapshot.variables.len(), "profile saved");

        if let Some(hook) = self.on_save.as_mut() {
            hook(profile);
        }
        Ok(format!("Saved {profile}"))
    }

    /// Merges a saved profile into the variable store. Variables that exist
    /// in both are overwritten by the saved value.
    fn load(&mut self, profile: &str) -> EvalResult<String> {
        let snapshot = Snapshot::decode(&self.store.read(profile)?)?;
        info!(profile, variables = snapshot.variables.len(), "profile loaded");

        self.variables.extend(snapshot.variables);
        Ok(format!("Loaded {profile}"))
    }
}
