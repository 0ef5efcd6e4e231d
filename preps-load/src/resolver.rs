//! Layered resolution of connection settings.
//!
//! Each field is looked up in a fixed order:
//!
//! | field | 1st | 2nd | 3rd |
//! |---|---|---|---|
//! | database, host, user | command line | properties file | error |
//! | port | command line | properties file | 5432 |
//! | password | `-w` value | `-W` prompt | properties file, else error |
//!
//! A `ConfigResolver` only exists once the command line has been validated
//! and, if `-W` was given, the password has been read. Field lookups happen
//! on query, so a missing field is only an error for callers that ask for it.

use crate::cli::{ConnectionArgs, ConnectionCli};
use crate::error::ConfigError;
use crate::prompt::{PASSWORD_PROMPT, SecretSource};
use clap::{CommandFactory, Parser, error::ErrorKind};
use preps_core::{ConnectionConfig, DEFAULT_PORT, PropertiesStore, Secret};
use std::ffi::OsString;
use std::path::Path;
use tracing::{debug, warn};

/// Result type for resolver operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Where the password came from, holding the value itself.
#[derive(Debug)]
enum PasswordSource {
    CommandLine(Secret),
    Prompt(Secret),
    Properties(Secret),
    Missing,
    Cleared,
}

impl PasswordSource {
    const fn describe(&self) -> &'static str {
        match self {
            Self::CommandLine(_) => "command line",
            Self::Prompt(_) => "password prompt",
            Self::Properties(_) => "properties file",
            Self::Missing => "no source",
            Self::Cleared => "cleared",
        }
    }
}

/// Resolved view over the command line, the prompt and the properties file.
///
/// # Security
/// Whichever password wins is held as a [`Secret`]; the losing candidates
/// are dropped (and zeroed) during construction. The properties store kept
/// inside never contains the password.
///
/// # Example
/// ```rust
/// use preps_core::PropertiesStore;
/// use preps_load::{ConfigResolver, cli::ConnectionArgs, prompt::NoTerminal};
///
/// let properties = PropertiesStore::parse("database=shop\nhost=db1\nuser=a\npassword=p\n");
/// let args = ConnectionArgs {
///     database: Some("override".to_string()),
///     ..Default::default()
/// };
///
/// let resolver = ConfigResolver::new(args, properties, &mut NoTerminal)?;
/// assert_eq!(resolver.database()?, "override");
/// assert_eq!(resolver.host()?, "db1");
/// assert_eq!(resolver.port()?, 5432);
/// # Ok::<(), preps_load::ConfigError>(())
/// ```
#[derive(Debug)]
pub struct ConfigResolver {
    args: ConnectionArgs,
    properties: PropertiesStore,
    password: PasswordSource,
}

impl ConfigResolver {
    /// Tokenises `argv` (program name first), loads the properties file at
    /// `properties_path` and builds the resolver.
    ///
    /// # Errors
    /// Returns [`ConfigError::ArgumentParse`] for unknown, malformed or
    /// conflicting options, and any error [`ConfigResolver::new`] returns.
    pub fn parse_from<I, T>(
        argv: I,
        properties_path: &Path,
        secrets: &mut dyn SecretSource,
    ) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let cli = ConnectionCli::try_parse_from(argv)?;
        Self::load(cli.connection, properties_path, secrets)
    }

    /// Loads the properties file at `properties_path` and builds the resolver.
    ///
    /// A missing or unreadable file is logged and replaced by an empty store;
    /// it only becomes fatal when a field is missing from both sources.
    ///
    /// # Errors
    /// Same as [`ConfigResolver::new`].
    pub fn load(
        args: ConnectionArgs,
        properties_path: &Path,
        secrets: &mut dyn SecretSource,
    ) -> ConfigResult<Self> {
        Self::new(args, load_properties(properties_path), secrets)
    }

    /// Validates `args` and performs the password prompt if `-W` was given.
    ///
    /// # Errors
    /// - [`ConfigError::ArgumentParse`] if both `-w` and `-W` are set
    /// - [`ConfigError::TerminalUnavailable`] / [`ConfigError::SecretPrompt`]
    ///   if the prompt cannot be shown or read
    pub fn new(
        mut args: ConnectionArgs,
        mut properties: PropertiesStore,
        secrets: &mut dyn SecretSource,
    ) -> ConfigResult<Self> {
        if args.password.is_some() && args.password_prompt {
            return Err(ConnectionCli::command()
                .error(
                    ErrorKind::ArgumentConflict,
                    "the argument '--password <PASSWORD>' cannot be used with '--password-prompt'",
                )
                .into());
        }

        let fallback = properties.take("password").map(Secret::new);
        let password = match args.password.take() {
            Some(value) => PasswordSource::CommandLine(Secret::new(value)),
            None if args.password_prompt => {
                PasswordSource::Prompt(secrets.read_secret(PASSWORD_PROMPT)?)
            }
            None => fallback.map_or(PasswordSource::Missing, PasswordSource::Properties),
        };
        debug!("Password source: {}", password.describe());

        Ok(Self {
            args,
            properties,
            password,
        })
    }

    /// Database name: command line, then properties file.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingConfiguration`] if neither has one.
    pub fn database(&self) -> ConfigResult<&str> {
        self.lookup(self.args.database.as_deref(), "database")
    }

    /// Server host: command line, then properties file.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingConfiguration`] if neither has one.
    pub fn host(&self) -> ConfigResult<&str> {
        self.lookup(self.args.host.as_deref(), "host")
    }

    /// User name: command line, then properties file.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingConfiguration`] if neither has one.
    pub fn user(&self) -> ConfigResult<&str> {
        self.lookup(self.args.user.as_deref(), "user")
    }

    /// Server port: command line, then properties file, then 5432.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidPort`] if the winning value is not a
    /// port number. A bad command-line value is not replaced by the file's.
    pub fn port(&self) -> ConfigResult<u16> {
        match self
            .args
            .port
            .as_deref()
            .or_else(|| self.properties.get("port"))
        {
            Some(value) => parse_port(value),
            None => Ok(DEFAULT_PORT),
        }
    }

    /// Password: `-w` value, then the prompted value, then properties file.
    ///
    /// # Errors
    /// - [`ConfigError::MissingConfiguration`] if no source supplied one
    /// - [`ConfigError::PasswordCleared`] after [`Self::forget_password`]
    pub fn password(&self) -> ConfigResult<&str> {
        match &self.password {
            PasswordSource::CommandLine(secret)
            | PasswordSource::Prompt(secret)
            | PasswordSource::Properties(secret) => Ok(secret.expose()),
            PasswordSource::Missing => Err(ConfigError::missing("password")),
            PasswordSource::Cleared => Err(ConfigError::PasswordCleared),
        }
    }

    /// Zeroes the held password. Later [`Self::password`] calls fail with
    /// [`ConfigError::PasswordCleared`] instead of falling back to another source.
    pub fn forget_password(&mut self) {
        self.password = PasswordSource::Cleared;
        debug!("Password cleared");
    }

    /// Builds a complete [`ConnectionConfig`], copying the password.
    ///
    /// Fields are checked in the order database, host, port, user, password;
    /// the first failure is returned.
    ///
    /// # Errors
    /// Any error of the individual queries.
    pub fn resolve(&self) -> ConfigResult<ConnectionConfig> {
        Ok(ConnectionConfig::new(
            self.database()?,
            self.host()?,
            self.port()?,
            self.user()?,
            Secret::from(self.password()?),
        ))
    }

    /// Like [`Self::resolve`] but consumes the resolver and moves the
    /// password instead of copying it, leaving a single owner.
    ///
    /// # Errors
    /// Any error of the individual queries.
    pub fn into_config(mut self) -> ConfigResult<ConnectionConfig> {
        let database = self.database()?.to_string();
        let host = self.host()?.to_string();
        let port = self.port()?;
        let user = self.user()?.to_string();

        let password = match std::mem::replace(&mut self.password, PasswordSource::Cleared) {
            PasswordSource::CommandLine(secret)
            | PasswordSource::Prompt(secret)
            | PasswordSource::Properties(secret) => secret,
            PasswordSource::Missing => return Err(ConfigError::missing("password")),
            PasswordSource::Cleared => return Err(ConfigError::PasswordCleared),
        };

        Ok(ConnectionConfig::new(database, host, port, user, password))
    }

    fn lookup<'a>(&'a self, cli: Option<&'a str>, key: &'static str) -> ConfigResult<&'a str> {
        cli.or_else(|| self.properties.get(key))
            .ok_or_else(|| ConfigError::missing(key))
    }
}

/// Reads the fallback store, degrading to an empty one on failure.
pub fn load_properties(path: &Path) -> PropertiesStore {
    match PropertiesStore::load(path) {
        Ok(store) => store,
        Err(e) => {
            warn!("{}; continuing without fallback values", e.diagnostic());
            PropertiesStore::empty()
        }
    }
}

fn parse_port(value: &str) -> ConfigResult<u16> {
    value
        .trim()
        .parse::<u16>()
        .map_err(|source| ConfigError::InvalidPort {
            value: value.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{NoTerminal, StaticSecret};

    fn shop_properties() -> PropertiesStore {
        PropertiesStore::from_pairs([
            ("database", "shop"),
            ("host", "db1"),
            ("user", "a"),
            ("password", "p"),
            ("port", "5433"),
        ])
    }

    fn resolver(argv: &[&str], properties: PropertiesStore) -> ConfigResult<ConfigResolver> {
        let cli = ConnectionCli::try_parse_from(std::iter::once("preps").chain(argv.iter().copied()))?;
        ConfigResolver::new(cli.connection, properties, &mut NoTerminal)
    }

    #[test]
    fn test_fallback_only() {
        let resolver = resolver(&[], shop_properties()).unwrap();
        assert_eq!(resolver.database().unwrap(), "shop");
        assert_eq!(resolver.host().unwrap(), "db1");
        assert_eq!(resolver.port().unwrap(), 5433);
        assert_eq!(resolver.user().unwrap(), "a");
        assert_eq!(resolver.password().unwrap(), "p");
    }

    #[test]
    fn test_cli_overrides_single_field() {
        let resolver = resolver(&["-d", "override"], shop_properties()).unwrap();
        assert_eq!(resolver.database().unwrap(), "override");
        assert_eq!(resolver.host().unwrap(), "db1");
        assert_eq!(resolver.port().unwrap(), 5433);
        assert_eq!(resolver.user().unwrap(), "a");
        assert_eq!(resolver.password().unwrap(), "p");
    }

    #[test]
    fn test_port_defaults_to_5432() {
        let resolver = resolver(&[], PropertiesStore::empty()).unwrap();
        assert_eq!(resolver.port().unwrap(), DEFAULT_PORT);
    }

    #[test]
    fn test_invalid_cli_port_is_fatal() {
        let resolver = resolver(&["-p", "fivefour"], shop_properties()).unwrap();
        assert!(matches!(
            resolver.port(),
            Err(ConfigError::InvalidPort { ref value, .. }) if value == "fivefour"
        ));
    }

    #[test]
    fn test_invalid_properties_port_is_fatal() {
        let properties = PropertiesStore::from_pairs([("port", "54x")]);
        let resolver = resolver(&[], properties).unwrap();
        assert!(matches!(
            resolver.port(),
            Err(ConfigError::InvalidPort { .. })
        ));
    }

    #[test]
    fn test_out_of_range_port_is_invalid() {
        let resolver = resolver(&["--port", "70000"], PropertiesStore::empty()).unwrap();
        assert!(matches!(
            resolver.port(),
            Err(ConfigError::InvalidPort { .. })
        ));
    }

    #[test]
    fn test_missing_fields_are_reported_lazily() {
        let resolver = resolver(&["-H", "db1"], PropertiesStore::empty()).unwrap();

        assert_eq!(resolver.host().unwrap(), "db1");
        assert!(matches!(
            resolver.database(),
            Err(ConfigError::MissingConfiguration { field: "database" })
        ));
        assert!(matches!(
            resolver.user(),
            Err(ConfigError::MissingConfiguration { field: "user" })
        ));
        assert!(matches!(
            resolver.password(),
            Err(ConfigError::MissingConfiguration { field: "password" })
        ));
    }

    #[test]
    fn test_password_precedence_cli_over_properties() {
        let resolver = resolver(&["-w", "from-cli"], shop_properties()).unwrap();
        assert_eq!(resolver.password().unwrap(), "from-cli");
    }

    #[test]
    fn test_password_prompt_is_eager_and_wins() {
        let cli = ConnectionCli::try_parse_from(["preps", "-W"]).unwrap();
        let mut source = StaticSecret::new("typed");

        let resolver = ConfigResolver::new(cli.connection, shop_properties(), &mut source).unwrap();
        assert_eq!(source.reads(), 1);
        assert_eq!(resolver.password().unwrap(), "typed");
        assert_eq!(resolver.password().unwrap(), "typed");
        assert_eq!(source.reads(), 1);
    }

    #[test]
    fn test_password_prompt_without_terminal_fails() {
        let result = resolver(&["-W"], shop_properties());
        assert!(matches!(result, Err(ConfigError::TerminalUnavailable)));
    }

    #[test]
    fn test_no_prompt_unless_requested() {
        let cli = ConnectionCli::try_parse_from(["preps"]).unwrap();
        let mut source = StaticSecret::new("typed");
        let resolver = ConfigResolver::new(cli.connection, shop_properties(), &mut source).unwrap();
        assert_eq!(source.reads(), 0);
        assert_eq!(resolver.password().unwrap(), "p");
    }

    #[test]
    fn test_conflicting_password_options_from_argv() {
        let result = resolver(&["-w", "x", "-W"], shop_properties());
        let Err(ConfigError::ArgumentParse(err)) = result else {
            panic!("expected an argument parse error");
        };
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_conflicting_password_options_built_in_code() {
        let args = ConnectionArgs {
            password: Some("x".to_string()),
            password_prompt: true,
            ..Default::default()
        };
        let mut source = StaticSecret::new("typed");
        let result = ConfigResolver::new(args, shop_properties(), &mut source);

        assert!(matches!(result, Err(ConfigError::ArgumentParse(_))));
        assert_eq!(source.reads(), 0);
    }

    #[test]
    fn test_forget_password() {
        let mut resolver = resolver(&["-w", "secret"], shop_properties()).unwrap();
        resolver.forget_password();

        assert!(matches!(
            resolver.password(),
            Err(ConfigError::PasswordCleared)
        ));
        assert!(matches!(
            resolver.resolve(),
            Err(ConfigError::PasswordCleared)
        ));
        // Other fields are unaffected
        assert_eq!(resolver.database().unwrap(), "shop");
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let resolver = resolver(&["-u", "bob"], shop_properties()).unwrap();
        let first = resolver.resolve().unwrap();
        let second = resolver.resolve().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.user, "bob");
        assert_eq!(first.password.expose(), "p");
    }

    #[test]
    fn test_into_config_moves_password() {
        let resolver = resolver(&["-w", "from-cli"], shop_properties()).unwrap();
        let config = resolver.into_config().unwrap();

        assert_eq!(config.database, "shop");
        assert_eq!(config.host, "db1");
        assert_eq!(config.port, 5433);
        assert_eq!(config.user, "a");
        assert_eq!(config.password.expose(), "from-cli");
    }

    #[test]
    fn test_into_config_reports_first_missing_field() {
        let properties = PropertiesStore::from_pairs([("database", "shop"), ("port", "x")]);
        let resolver = resolver(&[], properties).unwrap();
        assert!(matches!(
            resolver.into_config(),
            Err(ConfigError::MissingConfiguration { field: "host" })
        ));
    }

    #[test]
    fn test_debug_does_not_leak_password() {
        let resolver = resolver(&["-w", "super_secret_password_123"], shop_properties()).unwrap();
        let debug = format!("{:?}", resolver);
        assert!(!debug.contains("super_secret_password_123"));
        // Fallback password was moved out of the store as well
        assert!(!debug.contains("\"p\""));
    }
}
