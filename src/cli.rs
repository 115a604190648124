//! Command-line surface.

use clap::Parser;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "qof")]
#[command(about = "QoF network function", long_about = None)]
pub struct Cli {
    /// common config file
    #[arg(long = "free5gccfg", value_name = "FILE")]
    pub free5gccfg: Option<String>,

    /// config file
    #[arg(long = "qofcfg", value_name = "FILE")]
    pub qofcfg: Option<String>,
}

impl Cli {
    /// Shared configuration path, if one was given.
    pub fn common_config(&self) -> Option<&str> {
        non_empty(&self.free5gccfg)
    }

    /// Component configuration path, if one was given.
    pub fn component_config(&self) -> Option<&str> {
        non_empty(&self.qofcfg)
    }

    /// `--name value` pairs for every flag with a value, for re-exec.
    pub fn filter_args(&self) -> Vec<String> {
        [
            ("free5gccfg", self.common_config()),
            ("qofcfg", self.component_config()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| [format!("--{name}"), v.to_string()]))
        .flatten()
        .collect()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
