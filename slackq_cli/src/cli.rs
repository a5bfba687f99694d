use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "slackq")]
#[command(about = "slackq - read and post Slack messages from the terminal")]
#[command(version)]
#[command(after_help = "\x1b[1;36mExamples:\x1b[0m
  slackq recent C0123456789 --limit 10
  slackq user \"Alice Smith\"
  slackq from-user C0123456789 alice
  slackq post C0123456789 \"deploy finished\"
  slackq call get_recent_slack_messages -p channel_id=C0123456789 -p limit=3")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Slack bot or user token
    #[arg(long, env = "SLACK_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Slack Web API root
    #[arg(long, env = "SLACK_API_BASE", global = true)]
    pub api_base: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10, global = true)]
    pub timeout: u64,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose logging (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the most recent messages in a channel
    Recent {
        /// Channel ID (C...)
        channel: String,
        #[arg(short, long, default_value_t = 5)]
        limit: u32,
    },

    /// Look up a user by handle or real name
    User {
        /// Handle or real name
        name: String,
    },

    /// Show recent messages in a channel written by one user
    FromUser {
        /// Channel ID (C...)
        channel: String,
        /// Handle or real name of the author
        username: String,
        #[arg(short, long, default_value_t = 10)]
        limit: u32,
    },

    /// Post a message to a channel
    Post {
        /// Channel ID (C...)
        channel: String,
        /// Message text
        text: String,
    },

    /// List the available tools and their descriptions
    Tools,

    /// Call a tool by name with raw arguments
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  slackq call get_slack_user_info --args '{\"username\":\"alice\"}'
  slackq call post_slack_message -p channel_id=C0123456789 -p text=hello")]
    Call {
        /// Tool name
        tool: String,
        /// Arguments as a JSON object
        #[arg(long)]
        args: Option<String>,
        /// key=value arguments (numbers and booleans are parsed)
        #[arg(short = 'p', long = "param")]
        params: Vec<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Text,
    Json,
}
