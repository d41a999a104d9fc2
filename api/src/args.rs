use clap::{ArgAction, Args as ClapArgs, Parser};
use incognito_core::{
    domain::common::{
        AnalysisConfig, IncognitoConfig, LLMConfig, LLMProvider, ProductDatabaseConfig,
    },
    infrastructure::{
        llm::{
            gemini_client::DEFAULT_GEMINI_BASE_URL,
            openai_client::{DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL},
        },
        product::openfoodfacts::{DEFAULT_OPENFOODFACTS_BASE_URL, DEFAULT_USER_AGENT},
    },
};

#[derive(Debug, Clone, Parser)]
#[command(name = "incognito", version, about = "Food product health analysis API")]
pub struct Args {
    #[command(flatten)]
    pub server: ServerArgs,

    #[command(flatten)]
    pub llm: LlmArgs,

    #[command(flatten)]
    pub product_database: ProductDatabaseArgs,

    #[command(flatten)]
    pub analysis: AnalysisArgs,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct ServerArgs {
    #[arg(long = "server-host", env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long = "server-port", env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Prefix for every route, e.g. `/api`
    #[arg(long = "server-root-path", env = "ROOT_PATH", default_value = "")]
    pub root_path: String,

    #[arg(
        long = "server-allowed-origins",
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "*"
    )]
    pub allowed_origins: Vec<String>,

    /// Expose Prometheus metrics on `{root_path}/metrics`
    #[arg(
        long = "metrics-enabled",
        env = "METRICS_ENABLED",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub metrics_enabled: bool,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct LlmArgs {
    #[arg(long = "llm-provider", env = "LLM_PROVIDER", default_value = "gemini")]
    pub provider: LLMProvider,

    #[arg(
        long = "gemini-api-key",
        env = "GOOGLE_API_KEY",
        default_value = "",
        hide_env_values = true
    )]
    pub gemini_api_key: String,

    /// Skips model discovery when set
    #[arg(long = "gemini-model", env = "GEMINI_MODEL")]
    pub gemini_model: Option<String>,

    #[arg(long = "gemini-base-url", env = "GEMINI_BASE_URL", default_value = DEFAULT_GEMINI_BASE_URL)]
    pub gemini_base_url: String,

    #[arg(long = "openai-api-key", env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[arg(long = "openai-model", env = "OPENAI_MODEL", default_value = DEFAULT_OPENAI_MODEL)]
    pub openai_model: String,

    #[arg(long = "openai-base-url", env = "OPENAI_BASE_URL", default_value = DEFAULT_OPENAI_BASE_URL)]
    pub openai_base_url: String,

    #[arg(long = "llm-timeout-secs", env = "LLM_TIMEOUT_SECS", default_value_t = 20)]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct ProductDatabaseArgs {
    #[arg(
        long = "openfoodfacts-base-url",
        env = "OPENFOODFACTS_BASE_URL",
        default_value = DEFAULT_OPENFOODFACTS_BASE_URL
    )]
    pub base_url: String,

    #[arg(
        long = "openfoodfacts-user-agent",
        env = "OPENFOODFACTS_USER_AGENT",
        default_value = DEFAULT_USER_AGENT
    )]
    pub user_agent: String,

    #[arg(
        long = "openfoodfacts-timeout-secs",
        env = "OPENFOODFACTS_TIMEOUT_SECS",
        default_value_t = 20
    )]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct AnalysisArgs {
    /// Validate generated verdicts against the typed schema and send the JSON
    /// schema to the model
    #[arg(long = "strict-schema", env = "STRICT_SCHEMA")]
    pub strict_schema: bool,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct LogArgs {
    #[arg(long = "log-filter", env = "LOG_FILTER", default_value = "info")]
    pub filter: String,

    #[arg(long = "log-json", env = "LOG_JSON")]
    pub json: bool,
}

impl From<Args> for IncognitoConfig {
    fn from(args: Args) -> Self {
        IncognitoConfig {
            llm: LLMConfig {
                provider: args.llm.provider,
                gemini_api_key: args.llm.gemini_api_key,
                gemini_model: args.llm.gemini_model.filter(|m| !m.trim().is_empty()),
                gemini_base_url: args.llm.gemini_base_url,
                openai_api_key: args.llm.openai_api_key.filter(|k| !k.trim().is_empty()),
                openai_model: args.llm.openai_model,
                openai_base_url: args.llm.openai_base_url,
                timeout_secs: args.llm.timeout_secs,
            },
            product_database: ProductDatabaseConfig {
                base_url: args.product_database.base_url,
                user_agent: args.product_database.user_agent,
                timeout_secs: args.product_database.timeout_secs,
            },
            analysis: AnalysisConfig {
                strict_schema: args.analysis.strict_schema,
            },
        }
    }
}
