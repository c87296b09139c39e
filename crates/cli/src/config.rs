use clap::{Parser, Subcommand, ValueEnum};
use stacktoken_codec::{DecodeOptions, StatusPolicy};
use stacktoken_query::View;
use stacktoken_types::TOKEN_DECIMALS;
use tracing::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Text,
}

/// Decode question/answer contract query results.
#[derive(Debug, Parser)]
#[command(name = "stacktoken", version)]
pub struct Cli {
    /// What to do with unknown question status ordinals: flag | reject
    #[arg(long, env = "STACKTOKEN_STATUS_POLICY", default_value = "flag", global = true)]
    pub status_policy: StatusPolicy,

    /// Decimal places used when printing reward amounts (0 to 77)
    #[arg(
        long,
        env = "STACKTOKEN_DECIMALS",
        default_value_t = TOKEN_DECIMALS,
        value_parser = clap::value_parser!(u32).range(0..=77),
        global = true
    )]
    pub decimals: u32,

    #[arg(long, value_enum, default_value_t = Format::Json, global = true)]
    pub format: Format,

    /// Log level for stderr output
    #[arg(long, env = "STACKTOKEN_LOG", default_value = "info", global = true)]
    pub log_level: Level,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Decode base64 Question records (arguments, or one per stdin line)
    Questions { records: Vec<String> },

    /// Decode base64 Answer records (arguments, or one per stdin line)
    Answers { records: Vec<String> },

    /// Decode a saved vm-values query response for a named view
    View {
        /// Endpoint name, e.g. getAllOpenQuestions or getContractStats
        name: View,

        /// Response JSON file, or - for stdin
        #[arg(long, default_value = "-")]
        response: String,
    },
}

impl Cli {
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            status_policy: self.status_policy,
        }
    }
}
