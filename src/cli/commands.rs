use clap::{Parser, Subcommand};

/// `Mistward` - local-intent router and hallucination guardrail for a desktop companion.
#[derive(Parser, Debug)]
#[command(name = "mistward")]
#[command(version)]
#[command(about = "Verified local actions and a reply guardrail for a desktop AI companion.", long_about = None)]
pub struct Cli {
    /// Log at debug level regardless of config
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP gateway (dashboard, local-action, validate-response)
    Serve {
        /// Port to listen on (use 0 for random available port; default from config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (default from config)
        #[arg(long)]
        host: Option<String>,
    },

    /// Run one message through the local-intent router and print the result as JSON
    Act {
        /// The user message
        message: String,
    },

    /// Check an assistant reply against the guardrail and print the verdict as JSON
    Validate {
        /// What the user asked
        #[arg(long)]
        user: String,

        /// What the chat gateway answered
        #[arg(long)]
        assistant: String,
    },

    /// Print recent guardrail blocks, newest first
    Events {
        /// Maximum number of events (1-200)
        #[arg(short, long, default_value_t = 40)]
        limit: usize,
    },
}
