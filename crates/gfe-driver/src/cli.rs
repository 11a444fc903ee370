//! Command-line options of the driver

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "gfe-driver")]
#[command(about = "Benchmark driver for graph libraries")]
#[command(version)]
pub struct Cli {
    /// Library to evaluate (see --list-libraries)
    #[arg(short = 'l', long)]
    pub library: Option<String>,

    /// Graph to load
    #[arg(short = 'G', long, visible_alias = "path")]
    pub graph: Option<PathBuf>,

    /// Load the graph as undirected
    #[arg(long)]
    pub undirected: bool,

    /// Log of updates to replay in the aging experiment
    #[arg(short = 'u', long)]
    pub update_log: Option<PathBuf>,

    /// Threads for read operations
    #[arg(short = 'r', long)]
    pub threads_read: Option<String>,

    /// Threads for write operations
    #[arg(short = 'w', long)]
    pub threads_write: Option<String>,

    /// Repetitions of each experiment, when applicable
    #[arg(short = 'R', long)]
    pub repetitions: Option<String>,

    /// Budget per operation in seconds, 0 = no timeout
    #[arg(short = 't', long)]
    pub timeout: Option<String>,

    /// Random seed
    #[arg(long)]
    pub seed: Option<String>,

    /// Max weight assigned to the edges of unweighted graphs
    #[arg(long)]
    pub max_weight: Option<String>,

    /// Surplus of updates in the aging experiment, relative to the final graph
    #[arg(short = 'a', long)]
    pub aging_coeff: Option<String>,

    /// Expansion factor for the vertices
    #[arg(long)]
    pub ef_vertices: Option<String>,

    /// Expansion factor for the edges
    #[arg(long)]
    pub ef_edges: Option<String>,

    /// Interval between snapshot builds in the aging experiment, in milliseconds
    #[arg(long)]
    pub build_frequency: Option<String>,

    /// Validate the output of the algorithms
    #[arg(long)]
    pub validate: bool,

    /// Database where to store the results
    #[arg(short = 'd', long)]
    pub database: Option<PathBuf>,

    /// TOML file with parameters; command-line options take precedence
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// List the available libraries and exit
    #[arg(long)]
    pub list_libraries: bool,
}

impl Cli {
    /// Options supplied on the command line, as raw `(name, value)` parameters.
    ///
    /// Numeric values are passed through untouched so the configuration
    /// reports out-of-domain values with the parameter name.
    pub fn to_parameters(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        let mut push = |name: &str, value: Option<String>| {
            if let Some(value) = value {
                params.push((name.to_string(), value));
            }
        };

        push("library", self.library.clone());
        push("graph", self.graph.as_ref().map(|p| p.display().to_string()));
        push("undirected", self.undirected.then(|| "true".to_string()));
        push("update-log", self.update_log.as_ref().map(|p| p.display().to_string()));
        push("threads-read", self.threads_read.clone());
        push("threads-write", self.threads_write.clone());
        push("repetitions", self.repetitions.clone());
        push("timeout", self.timeout.clone());
        push("seed", self.seed.clone());
        push("max-weight", self.max_weight.clone());
        push("aging-coeff", self.aging_coeff.clone());
        push("ef-vertices", self.ef_vertices.clone());
        push("ef-edges", self.ef_edges.clone());
        push("build-frequency", self.build_frequency.clone());
        push("validate", self.validate.then(|| "true".to_string()));
        push("database", self.database.as_ref().map(|p| p.display().to_string()));
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_supplied_options_become_parameters() {
        let cli = Cli::parse_from(["gfe-driver", "-l", "dummy", "-r", "4", "--validate"]);
        assert_eq!(
            cli.to_parameters(),
            vec![
                ("library".to_string(), "dummy".to_string()),
                ("threads-read".to_string(), "4".to_string()),
                ("validate".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_path_alias_and_undirected() {
        let cli = Cli::parse_from(["gfe-driver", "--path", "/tmp/g.el", "--undirected"]);
        let params = cli.to_parameters();
        assert!(params.contains(&("graph".to_string(), "/tmp/g.el".to_string())));
        assert!(params.contains(&("undirected".to_string(), "true".to_string())));
    }

    #[test]
    fn test_negative_value_reaches_configuration() {
        let cli = Cli::parse_from(["gfe-driver", "--threads-write=-2"]);
        assert_eq!(
            cli.to_parameters(),
            vec![("threads-write".to_string(), "-2".to_string())]
        );
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
