use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "probsim",
    version,
    about = "Similarity search over a programming-problem catalog"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the HTTP query server
    Serve {
        /// Problem catalog CSV (defaults to the configured path)
        #[arg(long, value_hint = ValueHint::FilePath)]
        dataset: Option<PathBuf>,
        /// Address to listen on. Also reads PROBSIM_ADDR.
        #[arg(long, env = "PROBSIM_ADDR")]
        addr: Option<SocketAddr>,
    },
    /// Run a single query against the catalog and print the matches
    Query {
        /// Free-text query such as "sum of two numbers"
        query: String,
        /// Similarity method: tfidf or embeddings
        #[arg(short, long, default_value = "tfidf")]
        method: String,
        /// Maximum results to return
        #[arg(short = 'k', long, default_value_t = 5)]
        top_k: usize,
        /// Problem catalog CSV (defaults to the configured path)
        #[arg(long, value_hint = ValueHint::FilePath)]
        dataset: Option<PathBuf>,
        /// Emit structured JSON output
        #[arg(long)]
        json: bool,
    },
    /// Show or create configuration
    Config {
        /// Create a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_serve_with_addr() {
        let cli = Cli::parse_from(["probsim", "serve", "--addr", "0.0.0.0:9000"]);
        match cli.command {
            Commands::Serve { addr, dataset } => {
                assert_eq!(addr, Some("0.0.0.0:9000".parse().unwrap()));
                assert_eq!(dataset, None);
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn cli_parses_query_defaults() {
        let cli = Cli::parse_from(["probsim", "query", "sum of two numbers"]);
        match cli.command {
            Commands::Query {
                query,
                method,
                top_k,
                json,
                ..
            } => {
                assert_eq!(query, "sum of two numbers");
                assert_eq!(method, "tfidf");
                assert_eq!(top_k, 5);
                assert!(!json);
            }
            _ => panic!("Expected Query command"),
        }
    }

    #[test]
    fn cli_parses_query_method_and_top_k() {
        let cli = Cli::parse_from([
            "probsim", "query", "sum", "--method", "embeddings", "-k", "3", "--json",
        ]);
        match cli.command {
            Commands::Query {
                method, top_k, json, ..
            } => {
                assert_eq!(method, "embeddings");
                assert_eq!(top_k, 3);
                assert!(json);
            }
            _ => panic!("Expected Query command"),
        }
    }

    #[test]
    fn cli_parses_config_init() {
        let cli = Cli::parse_from(["probsim", "config", "--init"]);
        match cli.command {
            Commands::Config { init } => assert!(init),
            _ => panic!("Expected Config command"),
        }
    }
}
